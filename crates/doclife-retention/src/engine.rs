//! Evaluates documents against retention policy and executes archival /
//! deletion sweeps.

use std::sync::Arc;

use chrono::Utc;

use doclife_config::RetentionConfig;
use doclife_core::document::Document;
use doclife_core::enums::DocumentState;
use doclife_core::filter::DocumentFilter;
use doclife_lifecycle::LifecycleManager;
use doclife_storage::Storage;

use crate::action::{Action, ArchivalAction};
use crate::error::Result;

/// Evaluates and executes retention policy (archival and deletion) against a
/// document registry.
pub struct RetentionEngine<S: Storage> {
    config: RetentionConfig,
    storage: Arc<S>,
    lifecycle: Arc<LifecycleManager<S>>,
}

impl<S: Storage> RetentionEngine<S> {
    pub fn new(config: RetentionConfig, storage: Arc<S>, lifecycle: Arc<LifecycleManager<S>>) -> Self {
        Self { config, storage, lifecycle }
    }

    pub fn get_policy(&self, doc_type: &str) -> Option<&doclife_config::RetentionPolicy> {
        self.config.get(doc_type)
    }

    pub fn list_policies(&self) -> Vec<&doclife_config::RetentionPolicy> {
        self.config.policies.values().collect()
    }

    pub(crate) fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Archives `obsolete` documents whose time in state has exceeded
    /// `obsolete_to_archive`. Per-document failures (move, transition) are
    /// swallowed so one bad document doesn't stop the sweep, matching the
    /// reference implementation's `try/except: pass` loop.
    pub fn archive_obsolete_documents(&self, dry_run: bool) -> Result<Vec<ArchivalAction>> {
        let obsolete = self.query_by_state(DocumentState::Obsolete)?;
        let mut actions = Vec::new();

        for doc in obsolete {
            let action = self.evaluate_archival(&doc);
            if action.action == Action::Archive {
                if !dry_run {
                    let _ = self.lifecycle.archive_document(doc.id);
                }
                actions.push(action);
            }
        }

        Ok(actions)
    }

    /// Permanently deletes `archived` documents whose retention period has
    /// expired and who carry no compliance-protecting tags.
    pub fn cleanup_expired_documents(&self, dry_run: bool) -> Result<Vec<ArchivalAction>> {
        let archived = self.query_by_state(DocumentState::Archived)?;
        let mut actions = Vec::new();

        for doc in archived {
            let action = self.evaluate_deletion(&doc);
            if action.action == Action::Delete {
                if !dry_run {
                    let _ = self.delete_document(&doc);
                }
                actions.push(action);
            }
        }

        Ok(actions)
    }

    fn query_by_state(&self, state: DocumentState) -> Result<Vec<Document>> {
        let filter = DocumentFilter { state: Some(state), ..Default::default() };
        Ok(self.storage.search_documents("", &filter)?)
    }

    fn delete_document(&self, doc: &Document) -> Result<()> {
        let path = std::path::Path::new(&doc.path);
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
        self.storage.delete_document(doc.id)?;
        Ok(())
    }

    /// Evaluates whether an `obsolete` document is due to be archived.
    /// Uses `modified_at` as the age proxy -- not the actual
    /// obsolete-since timestamp, which this crate does not separately
    /// track (any metadata edit resets the clock), matching the tradeoff
    /// the reference archival system explicitly accepts.
    pub fn evaluate_archival(&self, doc: &Document) -> ArchivalAction {
        let Some(policy) = self.config.get(doc.doc_type.as_str()) else {
            return ArchivalAction::none(doc.clone(), "No archival policy or never archive");
        };

        if policy.never_archives() {
            return ArchivalAction::none(doc.clone(), "No archival policy or never archive");
        }

        let age_days = (Utc::now() - doc.modified_at).num_days();

        if age_days >= policy.obsolete_to_archive {
            ArchivalAction {
                document: doc.clone(),
                action: Action::Archive,
                reason: format!(
                    "Obsolete for {age_days} days (policy: {})",
                    policy.obsolete_to_archive
                ),
                days_until_action: 0,
            }
        } else {
            ArchivalAction {
                document: doc.clone(),
                action: Action::None,
                reason: format!(
                    "Not old enough ({age_days}/{} days)",
                    policy.obsolete_to_archive
                ),
                days_until_action: policy.obsolete_to_archive - age_days,
            }
        }
    }

    /// Evaluates whether an `archived` document is due for permanent
    /// deletion. Compliance tags are checked **before** any other
    /// criterion: a document carrying one is never deleted regardless of
    /// `delete_after_archive` or retention age (I7).
    pub fn evaluate_deletion(&self, doc: &Document) -> ArchivalAction {
        let Some(policy) = self.config.get(doc.doc_type.as_str()) else {
            return ArchivalAction::none(doc.clone(), "No retention policy");
        };

        let doc_tags = doc.tags();
        let protecting_tags: Vec<&String> =
            doc_tags.iter().filter(|t| policy.compliance_tags.contains(t)).collect();
        if !protecting_tags.is_empty() {
            return ArchivalAction::none(
                doc.clone(),
                format!(
                    "Protected by compliance tags: {}",
                    protecting_tags.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                ),
            );
        }

        if !policy.delete_after_archive {
            return ArchivalAction::none(doc.clone(), "Deletion not allowed by policy");
        }

        if policy.retains_forever() {
            return ArchivalAction::none(doc.clone(), "Retention period is forever");
        }

        let age_days = (Utc::now() - doc.modified_at).num_days();

        if age_days >= policy.archive_retention {
            ArchivalAction {
                document: doc.clone(),
                action: Action::Delete,
                reason: format!(
                    "Archived for {age_days} days (retention: {})",
                    policy.archive_retention
                ),
                days_until_action: 0,
            }
        } else {
            ArchivalAction {
                document: doc.clone(),
                action: Action::None,
                reason: format!(
                    "Retention not expired ({age_days}/{} days)",
                    policy.archive_retention
                ),
                days_until_action: policy.archive_retention - age_days,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;
    use doclife_storage::SqliteStore;
    use std::collections::HashMap;

    fn policy(obsolete_to_archive: i64, archive_retention: i64, delete_after_archive: bool, compliance_tags: Vec<String>) -> doclife_config::RetentionPolicy {
        doclife_config::RetentionPolicy {
            archive_to_obsolete: 30,
            obsolete_to_archive,
            archive_retention,
            delete_after_archive,
            compliance_tags,
        }
    }

    fn make_engine(config: RetentionConfig) -> (RetentionEngine<SqliteStore>, tempfile::TempDir) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = Arc::new(LifecycleManager::new(store.clone(), dir.path().join(".archive")).unwrap());
        (RetentionEngine::new(config, store, lifecycle), dir)
    }

    #[test]
    fn evaluate_archival_waits_for_age() {
        let mut policies = HashMap::new();
        policies.insert("prd".to_string(), policy(30, 730, false, vec![]));
        let (engine, _dir) = make_engine(RetentionConfig { policies });

        let mut doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).state(DocumentState::Obsolete).build();
        doc.modified_at = Utc::now() - Duration::days(10);

        let action = engine.evaluate_archival(&doc);
        assert_eq!(action.action, Action::None);
        assert!(action.days_until_action > 0);
    }

    #[test]
    fn evaluate_archival_fires_when_old_enough() {
        let mut policies = HashMap::new();
        policies.insert("prd".to_string(), policy(30, 730, false, vec![]));
        let (engine, _dir) = make_engine(RetentionConfig { policies });

        let mut doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).state(DocumentState::Obsolete).build();
        doc.modified_at = Utc::now() - Duration::days(45);

        let action = engine.evaluate_archival(&doc);
        assert_eq!(action.action, Action::Archive);
    }

    #[test]
    fn compliance_tags_block_deletion_even_when_expired() {
        let mut policies = HashMap::new();
        policies.insert(
            "prd".to_string(),
            policy(30, 30, true, vec!["product-decisions".to_string()]),
        );
        let (engine, _dir) = make_engine(RetentionConfig { policies });

        let mut doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).state(DocumentState::Archived).build();
        doc.modified_at = Utc::now() - Duration::days(1000);
        doc.add_tag("product-decisions");

        let action = engine.evaluate_deletion(&doc);
        assert_eq!(action.action, Action::None);
        assert!(action.reason.contains("Protected"));
    }

    #[test]
    fn deletion_fires_when_retention_expired_and_unprotected() {
        let mut policies = HashMap::new();
        policies.insert("prd".to_string(), policy(30, 30, true, vec![]));
        let (engine, _dir) = make_engine(RetentionConfig { policies });

        let mut doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).state(DocumentState::Archived).build();
        doc.modified_at = Utc::now() - Duration::days(100);

        let action = engine.evaluate_deletion(&doc);
        assert_eq!(action.action, Action::Delete);
    }

    #[test]
    fn forever_retention_never_deletes() {
        let mut policies = HashMap::new();
        policies.insert("adr".to_string(), policy(-1, -1, true, vec![]));
        let (engine, _dir) = make_engine(RetentionConfig { policies });

        let mut doc = DocumentBuilder::new("docs/a.md", DocumentType::Adr).state(DocumentState::Archived).build();
        doc.modified_at = Utc::now() - Duration::days(10000);

        let action = engine.evaluate_deletion(&doc);
        assert_eq!(action.action, Action::None);
        assert!(action.reason.contains("forever"));
    }

    #[test]
    fn no_policy_means_no_action() {
        let (engine, _dir) = make_engine(RetentionConfig::default());
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).state(DocumentState::Obsolete).build();
        assert_eq!(engine.evaluate_archival(&doc).action, Action::None);
        assert_eq!(engine.evaluate_deletion(&doc).action, Action::None);
    }
}
