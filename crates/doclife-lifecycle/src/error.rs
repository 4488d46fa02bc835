//! Errors for document registration and lifecycle transitions.

use doclife_core::enums::DocumentState;
use doclife_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("cannot transition document {document_id} from {from} to {to}")]
    InvalidTransition {
        document_id: i64,
        from: DocumentState,
        to: DocumentState,
    },

    #[error("a reason is required when transitioning to {0}")]
    ReasonRequired(DocumentState),

    #[error("document {0} is already archived")]
    AlreadyArchived(i64),

    #[error("before-transition hook rejected the change: {0}")]
    HookRejected(String),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
