//! Errors for search operations.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("storage error: {0}")]
    Storage(#[from] doclife_storage::StorageError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
