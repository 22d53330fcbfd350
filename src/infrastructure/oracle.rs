use crate::domain::ports::SettlementOracle;
use crate::error::OracleError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

/// Accepts exactly one pre-selected id and rejects every other attempt.
///
/// The winning id is fixed before any transaction is generated, so whether a
/// run contains a successful settlement at all depends on the draw.
pub struct WinningIdOracle {
    winning_id: u64,
}

impl WinningIdOracle {
    pub fn new(winning_id: u64) -> Self {
        Self { winning_id }
    }

    pub fn winning_id(&self) -> u64 {
        self.winning_id
    }
}

#[async_trait]
impl SettlementOracle for WinningIdOracle {
    async fn settle(&self, id: u64) -> Result<bool, OracleError> {
        Ok(id == self.winning_id)
    }
}

/// Accepts every attempt: the single-attempt success path.
pub struct AlwaysAcceptOracle;

#[async_trait]
impl SettlementOracle for AlwaysAcceptOracle {
    async fn settle(&self, _id: u64) -> Result<bool, OracleError> {
        Ok(true)
    }
}

/// Rejects every attempt: the full retry-to-rejection path.
pub struct AlwaysRejectOracle;

#[async_trait]
impl SettlementOracle for AlwaysRejectOracle {
    async fn settle(&self, _id: u64) -> Result<bool, OracleError> {
        Ok(false)
    }
}

/// Errors out a fixed number of times before settling on a verdict.
///
/// Exercises the per-attempt error path: the scheduler must log the error,
/// leave the transaction unchanged, and try again on a later scan.
pub struct FlakyOracle {
    failures: AtomicU32,
    verdict: bool,
}

impl FlakyOracle {
    pub fn new(failures: u32, verdict: bool) -> Self {
        Self {
            failures: AtomicU32::new(failures),
            verdict,
        }
    }
}

#[async_trait]
impl SettlementOracle for FlakyOracle {
    async fn settle(&self, id: u64) -> Result<bool, OracleError> {
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(OracleError(format!(
                "transient failure settling transaction {id}"
            )))
        } else {
            Ok(self.verdict)
        }
    }
}
