use crate::error::{Result, SettlementError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Represents a positive monetary amount.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce positivity at
/// construction and provide type safety for transaction values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SettlementError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = SettlementError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Rejected,
}

impl TransactionStatus {
    /// Terminal statuses permit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Rejected)
    }

    /// Live transactions are eligible for a settlement attempt.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// One unit of work progressing through the settlement state machine.
///
/// Created by the generator, mutated only by the scheduler. `attempts`
/// counts rejected settlement attempts; an accepted attempt leaves it
/// untouched.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: u64,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
    pub attempts: u32,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn new(id: u64, amount: Amount) -> Self {
        Self {
            id,
            amount,
            created_at: Utc::now(),
            attempts: 0,
            status: TransactionStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(SettlementError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(SettlementError::ValidationError(_))
        ));
    }

    #[test]
    fn test_new_transaction_starts_pending() {
        let tx = Transaction::new(7, Amount::new(dec!(42)).unwrap());
        assert_eq!(tx.id, 7);
        assert_eq!(tx.attempts, 0);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(tx.status.is_live());
    }

    #[test]
    fn test_status_classification() {
        assert!(TransactionStatus::Success.is_terminal());
        assert!(TransactionStatus::Rejected.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(!TransactionStatus::Failed.is_terminal());

        assert!(TransactionStatus::Pending.is_live());
        assert!(TransactionStatus::Failed.is_live());
        assert!(!TransactionStatus::Success.is_live());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }
}
