
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronovecError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Source error: {0}")]
    Source(String),
    #[error("Materialization error: {0}")]
    Materialization(String),
    #[error("Column released: {0}")]
    Released(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, ChronovecError>;

// Helper conversions
impl From<config::ConfigError> for ChronovecError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
