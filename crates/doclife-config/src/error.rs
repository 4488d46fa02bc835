//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during project directory discovery or config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// No `.gao-dev/` directory was found walking up from the start path.
    #[error("no .gao-dev directory found")]
    ProjectDirNotFound,

    /// The file parsed as valid YAML but was missing its required top-level
    /// key. Unlike a missing *file* (which yields defaults), a *present* file
    /// that omits this key is malformed and must not be silently accepted.
    #[error("{path}: missing required top-level key '{key}'")]
    MissingRequiredKey {
        path: String,
        key: &'static str,
    },

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
