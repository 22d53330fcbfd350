use crate::error::OracleError;
use async_trait::async_trait;

/// Decision function for settlement attempts.
///
/// Given a transaction id, returns whether the attempt is accepted. The
/// oracle never mutates transactions. An `Err` marks the attempt as a
/// transient processing error: the scheduler logs it, leaves the transaction
/// unchanged, and reconsiders it on the next scan.
#[async_trait]
pub trait SettlementOracle: Send + Sync {
    async fn settle(&self, id: u64) -> Result<bool, OracleError>;
}

pub type OracleBox = Box<dyn SettlementOracle>;
