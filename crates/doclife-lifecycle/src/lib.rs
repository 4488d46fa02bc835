//! Document registration and lifecycle state transitions.
//!
//! [`LifecycleManager`] is the orchestration entry point: it registers new
//! documents (extracting frontmatter, path hints, and content hashes),
//! delegates state transitions to [`StateMachine`], and resolves document
//! lineage and archival.

pub mod error;
pub mod frontmatter;
pub mod manager;
pub mod path_hints;
pub mod state_machine;

pub use error::LifecycleError;
pub use manager::LifecycleManager;
pub use state_machine::StateMachine;
