//! Project directory discovery and YAML configuration loading for the
//! document lifecycle engine.

pub mod error;
pub mod governance_config;
pub mod project_dir;
pub mod retention_config;

pub use error::ConfigError;
pub use governance_config::{GovernanceConfig, OwnershipRule, Permissions, load_governance_config};
pub use project_dir::{
    archive_root, documents_db_path, ensure_project_dir, find_project_dir,
    find_project_dir_or_error,
};
pub use retention_config::{RetentionConfig, RetentionPolicy, load_retention_config};
