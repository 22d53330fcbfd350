use crate::error::{Result, SettlementError};
use std::time::Duration;

/// Runtime parameters for the retry engine.
///
/// A config is validated once at startup; the scheduler and generator assume
/// a valid config afterwards.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of transactions ever generated.
    pub population_limit: usize,
    /// Number of rejected attempts after which a transaction is rejected
    /// permanently.
    pub attempt_limit: u32,
    /// Backoff table in ticks; attempt N waits `retry_delays[N - 1]` ticks,
    /// clamped to the last entry when the table is shorter than the attempt
    /// limit.
    pub retry_delays: Vec<u32>,
    /// Ids are drawn uniformly from `0..id_space`.
    pub id_space: u64,
    /// Closed range for generated transaction amounts.
    pub amount_min: u64,
    pub amount_max: u64,
    /// Length of one scheduler tick; both periodic cadences and the backoff
    /// table are expressed in this unit.
    pub tick: Duration,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_limit: 2,
            attempt_limit: 6,
            retry_delays: vec![2, 5, 10, 20, 30, 60],
            id_space: 1000,
            amount_min: 10,
            amount_max: 100,
            tick: Duration::from_secs(1),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Rejects configurations that would hang or misbehave at runtime.
    ///
    /// An id space smaller than the population cap would make the
    /// retry-until-unique id draw stall forever, so it is fatal here rather
    /// than a latent hang in the generator.
    pub fn validate(&self) -> Result<()> {
        if self.id_space < self.population_limit as u64 {
            return Err(SettlementError::IdSpaceExhausted {
                id_space: self.id_space,
                population_limit: self.population_limit,
            });
        }
        if self.attempt_limit == 0 {
            return Err(SettlementError::InvalidConfig(
                "attempt limit must be at least 1".to_string(),
            ));
        }
        if self.retry_delays.is_empty() {
            return Err(SettlementError::InvalidConfig(
                "retry-delay table must not be empty".to_string(),
            ));
        }
        if self.retry_delays.windows(2).any(|w| w[0] > w[1]) {
            return Err(SettlementError::InvalidConfig(
                "retry-delay table must be non-decreasing".to_string(),
            ));
        }
        if self.amount_min == 0 || self.amount_min > self.amount_max {
            return Err(SettlementError::InvalidConfig(format!(
                "amount range {}..={} must be positive and non-empty",
                self.amount_min, self.amount_max
            )));
        }
        if self.tick.is_zero() {
            return Err(SettlementError::InvalidConfig(
                "tick length must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Backoff duration before re-attempt number `attempt` (1-based),
    /// clamped to the last table entry.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let index = (attempt.saturating_sub(1) as usize).min(self.retry_delays.len() - 1);
        self.tick * self.retry_delays[index]
    }
}
