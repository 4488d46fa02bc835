//! Errors for health metrics collection.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("storage error: {0}")]
    Storage(#[from] doclife_storage::StorageError),
    #[error("governance error: {0}")]
    Governance(#[from] doclife_governance::GovernanceError),
}

pub type Result<T> = std::result::Result<T, HealthError>;
