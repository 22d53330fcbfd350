#![allow(dead_code)]

use settler::application::scheduler::RetryScheduler;
use settler::config::EngineConfig;
use settler::domain::generator::TransactionGenerator;
use settler::domain::ports::OracleBox;
use settler::domain::transaction::Transaction;

/// Config with id space equal to the population, so every id in
/// `0..population` gets issued exactly once and a winning id is guaranteed
/// to be generated.
pub fn saturated_config(population: usize) -> EngineConfig {
    EngineConfig {
        population_limit: population,
        id_space: population as u64,
        seed: Some(42),
        ..Default::default()
    }
}

pub async fn run_to_completion(config: EngineConfig, oracle: OracleBox) -> Vec<Transaction> {
    let generator = TransactionGenerator::new(&config);
    RetryScheduler::new(config, generator, oracle)
        .run()
        .await
        .expect("scheduler run failed")
}
