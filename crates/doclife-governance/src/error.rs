//! Errors for ownership assignment and review tracking.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("storage error: {0}")]
    Storage(#[from] doclife_storage::StorageError),
    #[error("config error: {0}")]
    Config(#[from] doclife_config::ConfigError),
    #[error("failed to write report: {0}")]
    ReportIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
