//! Governance configuration, loaded from `governance.yaml`.
//!
//! The YAML file is keyed under `document_governance` and shaped like:
//!
//! ```yaml
//! document_governance:
//!   ownership:
//!     prd:
//!       approved_by: product-lead
//!       reviewed_by: eng-manager
//!   review_cadence:
//!     prd: 90
//!     adr: -1
//!   permissions:
//!     archive:
//!       allowed_roles: [owner, engineering_manager]
//!     delete:
//!       allowed_roles: [engineering_manager]
//! ```
//!
//! As with [`crate::retention_config`], a missing file and a present-but-
//! malformed file are both fatal: ownership and review cadence drive
//! auto-assignment on document creation, and silently running with no
//! governance configured would be a correctness hazard, not a convenience.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Cadence sentinel meaning "never due for review".
pub const NEVER_REVIEWED: i64 = -1;

/// Default review cadence (days) applied when a document type has no entry.
pub const DEFAULT_REVIEW_CADENCE_DAYS: i64 = 90;

/// RACI-style ownership assignment for a document type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRule {
    /// Person/role auto-assigned as `owner` ("approved_by" in the RACI sense).
    pub approved_by: Option<String>,
    /// Person/role auto-assigned as `reviewer`.
    pub reviewed_by: Option<String>,
}

/// Allowed roles for a single governed action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionRule {
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

/// Role permissions for the operations the governance engine gates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub archive: PermissionRule,
    #[serde(default)]
    pub delete: PermissionRule,
}

/// Inner `document_governance` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct DocumentGovernance {
    #[serde(default)]
    ownership: HashMap<String, OwnershipRule>,
    #[serde(default)]
    review_cadence: HashMap<String, i64>,
    #[serde(default)]
    permissions: Permissions,
}

/// Top-level shape of `governance.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GovernanceFile {
    document_governance: Option<DocumentGovernance>,
}

/// A loaded governance configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GovernanceConfig {
    ownership: HashMap<String, OwnershipRule>,
    review_cadence: HashMap<String, i64>,
    permissions: Permissions,
}

impl GovernanceConfig {
    /// Ownership rule for a document type, if the governance config has one.
    pub fn ownership_for(&self, doc_type: &str) -> Option<&OwnershipRule> {
        self.ownership.get(doc_type)
    }

    /// Review cadence in days for a document type. Falls back to
    /// [`DEFAULT_REVIEW_CADENCE_DAYS`] when unconfigured, matching the
    /// reference implementation's `.get(doc_type, 90)`.
    pub fn review_cadence_days(&self, doc_type: &str) -> i64 {
        self.review_cadence
            .get(doc_type)
            .copied()
            .unwrap_or(DEFAULT_REVIEW_CADENCE_DAYS)
    }

    pub fn roles_allowed_to_archive(&self) -> &[String] {
        &self.permissions.archive.allowed_roles
    }

    pub fn roles_allowed_to_delete(&self) -> &[String] {
        &self.permissions.delete.allowed_roles
    }

    pub fn can_archive(&self, role: &str) -> bool {
        self.permissions.archive.allowed_roles.iter().any(|r| r == role)
    }

    pub fn can_delete(&self, role: &str) -> bool {
        self.permissions.delete.allowed_roles.iter().any(|r| r == role)
    }
}

/// Loads governance configuration from `path`.
///
/// A missing file is a fatal [`ConfigError::ReadError`]. A file that parses
/// but is missing the `document_governance` key is
/// [`ConfigError::MissingRequiredKey`].
pub fn load_governance_config(path: &Path) -> Result<GovernanceConfig> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(ConfigError::MissingRequiredKey {
            path: path.display().to_string(),
            key: "document_governance",
        });
    }

    let parsed: GovernanceFile = serde_yaml::from_str(&content)?;
    let inner = parsed.document_governance.ok_or_else(|| ConfigError::MissingRequiredKey {
        path: path.display().to_string(),
        key: "document_governance",
    })?;

    Ok(GovernanceConfig {
        ownership: inner.ownership,
        review_cadence: inner.review_cadence,
        permissions: inner.permissions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
document_governance:
  ownership:
    prd:
      approved_by: product-lead
      reviewed_by: eng-manager
  review_cadence:
    prd: 90
    adr: -1
  permissions:
    archive:
      allowed_roles: [owner, engineering_manager]
    delete:
      allowed_roles: [engineering_manager]
"#
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governance.yaml");
        let err = load_governance_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn present_file_missing_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governance.yaml");
        std::fs::write(&path, "something_else: true\n").unwrap();

        let err = load_governance_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKey { .. }));
    }

    #[test]
    fn loads_ownership_and_cadence_and_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governance.yaml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let config = load_governance_config(&path).unwrap();

        let prd_ownership = config.ownership_for("prd").unwrap();
        assert_eq!(prd_ownership.approved_by.as_deref(), Some("product-lead"));
        assert_eq!(prd_ownership.reviewed_by.as_deref(), Some("eng-manager"));

        assert_eq!(config.review_cadence_days("prd"), 90);
        assert_eq!(config.review_cadence_days("adr"), NEVER_REVIEWED);
        assert_eq!(config.review_cadence_days("runbook"), DEFAULT_REVIEW_CADENCE_DAYS);

        assert!(config.can_archive("owner"));
        assert!(!config.can_archive("random-guest"));
        assert!(config.can_delete("engineering_manager"));
        assert!(!config.can_delete("owner"));
    }
}
