//! Errors for retention policy evaluation and archival sweeps.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("storage error: {0}")]
    Storage(#[from] doclife_storage::StorageError),
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] doclife_lifecycle::LifecycleError),
    #[error("config error: {0}")]
    Config(#[from] doclife_config::ConfigError),
    #[error("failed to write report: {0}")]
    ReportIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RetentionError>;
