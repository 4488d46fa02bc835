//! Retention policy configuration, loaded from `retention_policies.yaml`.
//!
//! The YAML file is keyed by document type and shaped like:
//!
//! ```yaml
//! retention_policies:
//!   prd:
//!     archive_to_obsolete: 30
//!     obsolete_to_archive: 90
//!     archive_retention: 730
//!     delete_after_archive: false
//!     compliance_tags: ["product-decisions"]
//! ```
//!
//! Unlike most of the teacher's config loading, this file does not default
//! quietly to an empty configuration: retention policy is load-bearing for
//! data deletion, and the reference implementation treats both a missing
//! file and a malformed one (missing the `retention_policies` key) as fatal.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Sentinel meaning "never" when used for a day count.
pub const NEVER: i64 = -1;

/// Retention policy for a single document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Days an `active` document may live before becoming eligible for
    /// `obsolete`. `-1` means never.
    #[serde(default = "default_never")]
    pub archive_to_obsolete: i64,

    /// Days an `obsolete` document may live before becoming eligible for
    /// `archived`. `-1` means never.
    #[serde(default = "default_never")]
    pub obsolete_to_archive: i64,

    /// Days an `archived` document is retained before becoming eligible for
    /// permanent deletion. `-1` means forever.
    #[serde(default = "default_never")]
    pub archive_retention: i64,

    /// Whether an archived document may ever be permanently deleted.
    #[serde(default)]
    pub delete_after_archive: bool,

    /// Tags that, if present on a document, protect it from deletion
    /// regardless of `delete_after_archive` or retention age.
    #[serde(default)]
    pub compliance_tags: Vec<String>,
}

fn default_never() -> i64 {
    NEVER
}

impl RetentionPolicy {
    pub fn never_archives(&self) -> bool {
        self.obsolete_to_archive == NEVER
    }

    pub fn retains_forever(&self) -> bool {
        self.archive_retention == NEVER
    }
}

/// Top-level shape of `retention_policies.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RetentionFile {
    #[serde(default)]
    retention_policies: Option<HashMap<String, RetentionPolicy>>,
}

/// A loaded set of retention policies, keyed by document type string
/// (`"prd"`, `"adr"`, etc, matching [`doclife_core::enums::DocumentType`]'s
/// serialized form).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionConfig {
    pub policies: HashMap<String, RetentionPolicy>,
}

impl RetentionConfig {
    pub fn get(&self, doc_type: &str) -> Option<&RetentionPolicy> {
        self.policies.get(doc_type)
    }
}

/// Loads retention policy configuration from `path`.
///
/// A missing file is a fatal [`ConfigError::ReadError`], not a silent
/// default: the retention engine must not run with no policies just because
/// a file was never configured. A file that parses but is missing the
/// `retention_policies` key is [`ConfigError::MissingRequiredKey`].
pub fn load_retention_config(path: &Path) -> Result<RetentionConfig> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(ConfigError::MissingRequiredKey {
            path: path.display().to_string(),
            key: "retention_policies",
        });
    }

    let parsed: RetentionFile = serde_yaml::from_str(&content)?;
    let policies = parsed.retention_policies.ok_or_else(|| ConfigError::MissingRequiredKey {
        path: path.display().to_string(),
        key: "retention_policies",
    })?;

    Ok(RetentionConfig { policies })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retention_policies.yaml");
        let err = load_retention_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn present_file_missing_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retention_policies.yaml");
        std::fs::write(&path, "some_other_key: {}\n").unwrap();

        let err = load_retention_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKey { .. }));
    }

    #[test]
    fn loads_policy_for_doc_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retention_policies.yaml");
        std::fs::write(
            &path,
            r#"
retention_policies:
  prd:
    archive_to_obsolete: 30
    obsolete_to_archive: 90
    archive_retention: 730
    delete_after_archive: false
    compliance_tags: ["product-decisions"]
  adr:
    archive_to_obsolete: -1
    obsolete_to_archive: -1
    archive_retention: -1
    delete_after_archive: false
    compliance_tags: []
"#,
        )
        .unwrap();

        let config = load_retention_config(&path).unwrap();
        let prd = config.get("prd").unwrap();
        assert_eq!(prd.archive_to_obsolete, 30);
        assert_eq!(prd.archive_retention, 730);
        assert!(!prd.delete_after_archive);
        assert_eq!(prd.compliance_tags, vec!["product-decisions".to_string()]);

        let adr = config.get("adr").unwrap();
        assert!(adr.never_archives());
        assert!(adr.retains_forever());
    }

    #[test]
    fn empty_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retention_policies.yaml");
        std::fs::write(&path, "").unwrap();

        let err = load_retention_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKey { .. }));
    }
}
