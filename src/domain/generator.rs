use crate::config::EngineConfig;
use crate::domain::transaction::{Amount, Transaction};
use crate::error::{Result, SettlementError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Upper bound on collision rejections for a single id draw. With a validated
/// config (id space >= population) the chance of tripping this is negligible;
/// it exists so a misbehaving RNG can never hang the generator.
const MAX_ID_DRAWS: u32 = 10_000;

/// Produces unique, bounded transactions until the population cap is reached.
///
/// Owns the issued-id set and its RNG; there is no process-wide state. Ids
/// are drawn uniformly from the configured id space, rejecting collisions
/// with previously issued ids.
pub struct TransactionGenerator {
    id_space: u64,
    population_limit: usize,
    amount_range: RangeInclusive<u64>,
    issued_ids: HashSet<u64>,
    rng: StdRng,
}

impl TransactionGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            id_space: config.id_space,
            population_limit: config.population_limit,
            amount_range: config.amount_min..=config.amount_max,
            issued_ids: HashSet::new(),
            rng,
        }
    }

    /// Returns one fresh transaction, or `PopulationExhausted` once the cap
    /// has been reached.
    pub fn generate(&mut self) -> Result<Transaction> {
        if self.is_exhausted() {
            return Err(SettlementError::PopulationExhausted);
        }
        let id = self.draw_unique_id()?;
        let amount = Amount::new(Decimal::from(
            self.rng.gen_range(self.amount_range.clone()),
        ))?;
        Ok(Transaction::new(id, amount))
    }

    /// True once the full population has been issued.
    pub fn is_exhausted(&self) -> bool {
        self.issued_ids.len() >= self.population_limit
    }

    pub fn issued_count(&self) -> usize {
        self.issued_ids.len()
    }

    fn draw_unique_id(&mut self) -> Result<u64> {
        for _ in 0..MAX_ID_DRAWS {
            let id = self.rng.gen_range(0..self.id_space);
            if self.issued_ids.insert(id) {
                return Ok(id);
            }
        }
        Err(SettlementError::IdSpaceExhausted {
            id_space: self.id_space,
            population_limit: self.population_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(population_limit: usize, id_space: u64) -> EngineConfig {
        EngineConfig {
            population_limit,
            id_space,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_are_unique_and_bounded() {
        let config = config(50, 50);
        let mut generator = TransactionGenerator::new(&config);

        let mut seen = HashSet::new();
        for _ in 0..50 {
            let tx = generator.generate().unwrap();
            assert!(tx.id < 50);
            assert!(seen.insert(tx.id), "duplicate id {}", tx.id);
        }
        // With id space == population every id got issued exactly once.
        assert_eq!(seen.len(), 50);
    }

    #[test]
    fn test_population_cap_signals_exhaustion() {
        let config = config(2, 100);
        let mut generator = TransactionGenerator::new(&config);

        generator.generate().unwrap();
        generator.generate().unwrap();
        assert!(generator.is_exhausted());
        assert!(matches!(
            generator.generate(),
            Err(SettlementError::PopulationExhausted)
        ));
        assert_eq!(generator.issued_count(), 2);
    }

    #[test]
    fn test_amounts_stay_in_configured_range() {
        let config = EngineConfig {
            population_limit: 100,
            id_space: 1000,
            amount_min: 10,
            amount_max: 100,
            seed: Some(7),
            ..Default::default()
        };
        let mut generator = TransactionGenerator::new(&config);

        for _ in 0..100 {
            let tx = generator.generate().unwrap();
            assert!(tx.amount.value() >= dec!(10));
            assert!(tx.amount.value() <= dec!(100));
        }
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let config = config(10, 100);
        let ids_a: Vec<u64> = {
            let mut generator = TransactionGenerator::new(&config);
            (0..10).map(|_| generator.generate().unwrap().id).collect()
        };
        let ids_b: Vec<u64> = {
            let mut generator = TransactionGenerator::new(&config);
            (0..10).map(|_| generator.generate().unwrap().id).collect()
        };
        assert_eq!(ids_a, ids_b);
    }
}
