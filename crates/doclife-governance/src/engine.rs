//! Auto-assigns ownership, tracks review cadence, and gates governed actions
//! behind role permissions.

use std::sync::Arc;

use chrono::{Duration, Utc};

use doclife_config::GovernanceConfig;
use doclife_core::document::Document;
use doclife_core::filter::DocumentFilter;
use doclife_core::review::Review;
use doclife_storage::{DocumentUpdates, Storage};

use crate::error::Result;

/// Reviews due within this many days are surfaced as "upcoming"; strictly
/// before today they are "overdue".
const REVIEW_WINDOW_DAYS: i64 = 7;

pub struct GovernanceEngine<S: Storage> {
    config: GovernanceConfig,
    storage: Arc<S>,
}

impl<S: Storage> GovernanceEngine<S> {
    pub fn new(config: GovernanceConfig, storage: Arc<S>) -> Self {
        Self { config, storage }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    /// Assigns owner and reviewer per the RACI matrix for `document.doc_type`,
    /// and sets an initial review due date from the cadence table. A
    /// document type absent from the ownership map is left untouched --
    /// not every document needs RACI coverage.
    pub fn auto_assign_ownership(&self, document: &Document) -> Result<()> {
        let Some(rule) = self.config.ownership_for(document.doc_type.as_str()) else {
            return Ok(());
        };

        let mut updates = DocumentUpdates::default();
        if let Some(owner) = &rule.approved_by {
            updates.owner = Some(owner.clone());
        }
        if let Some(reviewer) = &rule.reviewed_by {
            updates.reviewer = Some(reviewer.clone());
        }

        let cadence = self.config.review_cadence_days(document.doc_type.as_str());
        if cadence != doclife_config::governance_config::NEVER_REVIEWED {
            let due = (Utc::now() + Duration::days(cadence)).date_naive();
            updates.review_due_date = Some(Some(due));
        }

        self.storage.update_document(document.id, &updates)?;
        Ok(())
    }

    pub fn assign_owner(&self, doc_id: i64, owner: impl Into<String>) -> Result<()> {
        let updates = DocumentUpdates { owner: Some(owner.into()), ..Default::default() };
        self.storage.update_document(doc_id, &updates)?;
        Ok(())
    }

    pub fn assign_reviewer(&self, doc_id: i64, reviewer: impl Into<String>) -> Result<()> {
        let updates = DocumentUpdates { reviewer: Some(reviewer.into()), ..Default::default() };
        self.storage.update_document(doc_id, &updates)?;
        Ok(())
    }

    pub fn get_owned_documents(&self, owner: &str) -> Result<Vec<Document>> {
        let filter = DocumentFilter { owner: Some(owner.to_string()), ..Default::default() };
        Ok(self.storage.search_documents("", &filter)?)
    }

    /// Documents assigned to `reviewer` whose review is due within the
    /// 7-day window (including already overdue).
    pub fn get_review_queue(&self, reviewer: &str) -> Result<Vec<Document>> {
        let all_docs = self.storage.search_documents("", &DocumentFilter::default())?;
        let window = Utc::now().date_naive() + Duration::days(REVIEW_WINDOW_DAYS);

        Ok(all_docs
            .into_iter()
            .filter(|d| d.reviewer.as_deref() == Some(reviewer))
            .filter(|d| d.review_due_date.is_some_and(|due| due <= window))
            .collect())
    }

    /// Documents due for review, optionally scoped to `owner`. When
    /// `include_overdue_only` is false, documents due within the next 7
    /// days are included too. Sorted earliest-due-first.
    pub fn check_review_due(&self, owner: Option<&str>, include_overdue_only: bool) -> Result<Vec<Document>> {
        let filter = DocumentFilter { owner: owner.map(String::from), ..Default::default() };
        let all_docs = self.storage.search_documents("", &filter)?;
        let today = Utc::now().date_naive();
        let window = today + Duration::days(REVIEW_WINDOW_DAYS);

        let mut due: Vec<Document> = all_docs
            .into_iter()
            .filter(|d| match d.review_due_date {
                None => false,
                Some(due_date) => {
                    if include_overdue_only {
                        due_date < today
                    } else {
                        due_date <= window
                    }
                }
            })
            .collect();

        due.sort_by_key(|d| d.review_due_date);
        Ok(due)
    }

    /// Records a completed review and, unless the document type is never
    /// reviewed, advances `review_due_date` by the configured cadence.
    pub fn mark_reviewed(&self, doc_id: i64, reviewer: &str, notes: Option<String>) -> Result<Review> {
        let document = self.storage.get_document(doc_id)?;
        let cadence = self.config.review_cadence_days(document.doc_type.as_str());

        let next_due = if cadence != doclife_config::governance_config::NEVER_REVIEWED {
            let due = (Utc::now() + Duration::days(cadence)).date_naive();
            self.storage.update_document(
                doc_id,
                &DocumentUpdates { review_due_date: Some(Some(due)), ..Default::default() },
            )?;
            Some(due)
        } else {
            None
        };

        let mut review = Review::new(doc_id, reviewer);
        review.notes = notes;
        review.next_review_due = next_due;

        let id = self.storage.record_review(&review)?;
        review.id = id;
        Ok(review)
    }

    pub fn get_review_history(&self, doc_id: i64) -> Result<Vec<Review>> {
        Ok(self.storage.get_reviews(doc_id)?)
    }

    pub fn can_archive(&self, role: &str) -> bool {
        self.config.can_archive(role)
    }

    pub fn can_delete(&self, role: &str) -> bool {
        self.config.can_delete(role)
    }

    pub fn get_unowned_documents(&self) -> Result<Vec<Document>> {
        let all_docs = self.storage.search_documents("", &DocumentFilter::default())?;
        Ok(all_docs.into_iter().filter(|d| d.owner.is_none()).collect())
    }

    pub(crate) fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub(crate) fn is_overdue(&self, doc: &Document) -> bool {
        doc.review_due_date.is_some_and(|d| d < Utc::now().date_naive())
    }

    pub(crate) fn days_overdue(&self, doc: &Document) -> i64 {
        match doc.review_due_date {
            Some(due) => (Utc::now().date_naive() - due).num_days().max(0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;
    use doclife_storage::SqliteStore;
    use std::collections::HashMap;

    fn config_with_prd_ownership() -> GovernanceConfig {
        let yaml = r#"
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
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governance.yaml");
        std::fs::write(&path, yaml).unwrap();
        doclife_config::load_governance_config(&path).unwrap()
    }

    #[test]
    fn auto_assign_ownership_sets_owner_reviewer_and_due_date() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let engine = GovernanceEngine::new(config_with_prd_ownership(), store.clone());

        let doc = DocumentBuilder::new("docs/prd.md", DocumentType::Prd).build();
        let id = store.create_document(&doc).unwrap();
        let mut doc = store.get_document(id).unwrap();
        doc.id = id;

        engine.auto_assign_ownership(&doc).unwrap();

        let updated = store.get_document(id).unwrap();
        assert_eq!(updated.owner.as_deref(), Some("product-lead"));
        assert_eq!(updated.reviewer.as_deref(), Some("eng-manager"));
        assert!(updated.review_due_date.is_some());
    }

    #[test]
    fn never_reviewed_cadence_skips_due_date() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let mut policies = HashMap::new();
        let _ = &mut policies;
        let engine = GovernanceEngine::new(config_with_prd_ownership(), store.clone());

        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Adr).build();
        let id = store.create_document(&doc).unwrap();
        let doc = store.get_document(id).unwrap();

        engine.auto_assign_ownership(&doc).unwrap();

        let updated = store.get_document(id).unwrap();
        assert!(updated.review_due_date.is_none());
    }

    #[test]
    fn mark_reviewed_records_history_and_advances_due_date() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let engine = GovernanceEngine::new(config_with_prd_ownership(), store.clone());

        let doc = DocumentBuilder::new("docs/prd.md", DocumentType::Prd).build();
        let id = store.create_document(&doc).unwrap();

        let review = engine.mark_reviewed(id, "eng-manager", Some("looks good".to_string())).unwrap();
        assert_eq!(review.reviewer, "eng-manager");
        assert!(review.next_review_due.is_some());

        let history = engine.get_review_history(id).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn can_archive_and_delete_respect_allowed_roles() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let engine = GovernanceEngine::new(config_with_prd_ownership(), store);

        assert!(engine.can_archive("owner"));
        assert!(!engine.can_archive("random-guest"));
        assert!(engine.can_delete("engineering_manager"));
        assert!(!engine.can_delete("owner"));
    }

    #[test]
    fn unowned_documents_are_reported() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let engine = GovernanceEngine::new(config_with_prd_ownership(), store.clone());

        let doc = DocumentBuilder::new("docs/prd.md", DocumentType::Prd).build();
        store.create_document(&doc).unwrap();

        let unowned = engine.get_unowned_documents().unwrap();
        assert_eq!(unowned.len(), 1);
    }
}
