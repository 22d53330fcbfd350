use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use settler::application::scheduler::RetryScheduler;
use settler::config::EngineConfig;
use settler::domain::generator::TransactionGenerator;
use settler::domain::ports::OracleBox;
use settler::infrastructure::oracle::{AlwaysAcceptOracle, AlwaysRejectOracle, WinningIdOracle};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of transactions to generate
    #[arg(long, default_value_t = 2)]
    population_limit: usize,

    /// Rejected attempts before a transaction is rejected permanently
    #[arg(long, default_value_t = 6)]
    attempt_limit: u32,

    /// Backoff table in ticks, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = vec![2, 5, 10, 20, 30, 60])]
    retry_delays: Vec<u32>,

    /// Transaction ids are drawn from 0..id-space
    #[arg(long, default_value_t = 1000)]
    id_space: u64,

    /// Minimum generated amount
    #[arg(long, default_value_t = 10)]
    amount_min: u64,

    /// Maximum generated amount
    #[arg(long, default_value_t = 100)]
    amount_max: u64,

    /// Scheduler tick length in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Settlement decision function
    #[arg(long, value_enum, default_value = "winning-id")]
    oracle: OracleKind,

    /// Fix the accepted id instead of drawing one at random
    #[arg(long)]
    winning_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OracleKind {
    WinningId,
    AlwaysAccept,
    AlwaysReject,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the final snapshot.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig {
        population_limit: cli.population_limit,
        attempt_limit: cli.attempt_limit,
        retry_delays: cli.retry_delays.clone(),
        id_space: cli.id_space,
        amount_min: cli.amount_min,
        amount_max: cli.amount_max,
        tick: Duration::from_millis(cli.tick_ms),
        seed: cli.seed,
    };
    config.validate().into_diagnostic()?;

    // The winning id must be fixed before any transaction is generated.
    let oracle: OracleBox = match cli.oracle {
        OracleKind::WinningId => {
            let winning_id = cli.winning_id.unwrap_or_else(|| {
                // Offset the seed so the pick does not mirror the
                // generator's first id draw.
                let mut rng = match config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
                    None => StdRng::from_entropy(),
                };
                rng.gen_range(0..config.id_space)
            });
            tracing::info!(winning_id, "winning id selected");
            Box::new(WinningIdOracle::new(winning_id))
        }
        OracleKind::AlwaysAccept => Box::new(AlwaysAcceptOracle),
        OracleKind::AlwaysReject => Box::new(AlwaysRejectOracle),
    };

    let generator = TransactionGenerator::new(&config);
    let scheduler = RetryScheduler::new(config, generator, oracle);
    let transactions = scheduler.run().await.into_diagnostic()?;

    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &transactions).into_diagnostic()?;
    println!();

    Ok(())
}
