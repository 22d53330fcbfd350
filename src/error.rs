use thiserror::Error;

/// Transient failure reported by a settlement oracle for a single attempt.
///
/// The scheduler logs it and leaves the transaction untouched; it never
/// aborts the processing loop.
#[derive(Error, Debug)]
#[error("oracle failure: {0}")]
pub struct OracleError(pub String);

#[derive(Error, Debug)]
pub enum SettlementError {
    /// The generator has issued its full population. A termination signal,
    /// not a failure.
    #[error("population limit reached, generator exhausted")]
    PopulationExhausted,
    /// The configured id space cannot cover the requested population, or the
    /// bounded unique-draw guard tripped at generation time.
    #[error("id space of {id_space} cannot cover a population of {population_limit}")]
    IdSpaceExhausted {
        id_space: u64,
        population_limit: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, SettlementError>;
