//! Collects a [`HealthMetrics`] snapshot in a single pass over the registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use doclife_core::document::Document;
use doclife_core::enums::DocumentState;
use doclife_core::filter::DocumentFilter;
use doclife_core::naming::validate_filename;
use doclife_governance::GovernanceEngine;
use doclife_storage::Storage;

use crate::error::Result;
use crate::metrics::HealthMetrics;

const REQUIRED_FRONTMATTER_FIELDS: [&str; 4] = ["title", "doc_type", "status", "owner"];

pub struct HealthEngine<S: Storage> {
    storage: Arc<S>,
    governance: Arc<GovernanceEngine<S>>,
}

impl<S: Storage> HealthEngine<S> {
    pub fn new(storage: Arc<S>, governance: Arc<GovernanceEngine<S>>) -> Self {
        Self { storage, governance }
    }

    pub fn collect_metrics(&self) -> Result<HealthMetrics> {
        let all_docs = self.storage.search_documents("", &DocumentFilter::default())?;

        let documents_needing_review = self.governance.check_review_due(None, true)?.len() as i64;

        Ok(HealthMetrics {
            total_documents: all_docs.len() as i64,
            documents_by_state: count_by(&all_docs, |d| d.state.to_string()),
            documents_by_type: count_by(&all_docs, |d| d.doc_type.as_str().to_string()),
            stale_documents: self.count_stale_documents()?,
            documents_needing_review,
            orphaned_documents: self.count_orphaned(&all_docs)?,
            documents_without_owners: all_docs.iter().filter(|d| d.owner.is_none()).count() as i64,
            avg_document_age_days: average_age_days(&all_docs),
            oldest_document_days: extreme_age_days(&all_docs, true),
            newest_document_days: extreme_age_days(&all_docs, false),
            naming_compliance_rate: naming_compliance_rate(&all_docs),
            frontmatter_compliance_rate: frontmatter_compliance_rate(&all_docs),
        })
    }

    pub fn generate_health_report(&self) -> Result<String> {
        let metrics = self.collect_metrics()?;
        Ok(crate::report::generate_health_report(&metrics))
    }

    pub fn get_action_items(&self) -> Result<Vec<crate::action_items::ActionItem>> {
        let metrics = self.collect_metrics()?;
        Ok(crate::action_items::action_items(&metrics))
    }

    /// A document is stale if it's `Active` and hasn't been modified within
    /// its type's review cadence. Mirrors [`GovernanceEngine`]'s "not yet
    /// reviewed" logic but measures the filesystem-modification clock
    /// instead of the review-due-date clock.
    fn count_stale_documents(&self) -> Result<i64> {
        let filter = DocumentFilter { state: Some(DocumentState::Active), ..Default::default() };
        let active_docs = self.storage.search_documents("", &filter)?;

        let mut stale = 0;
        for doc in &active_docs {
            let cadence = self.governance.config().review_cadence_days(doc.doc_type.as_str());
            if cadence == doclife_config::governance_config::NEVER_REVIEWED {
                continue;
            }
            let age_days = (Utc::now() - doc.modified_at).num_days();
            if age_days > cadence {
                stale += 1;
            }
        }
        Ok(stale)
    }

    /// A document is orphaned if it has no parent or child relationships.
    /// Temp-classified documents and drafts are excluded: they're expected
    /// to be unlinked.
    fn count_orphaned(&self, all_docs: &[Document]) -> Result<i64> {
        let mut orphaned = 0;
        for doc in all_docs {
            if doc.is_temp_classified() || doc.state == DocumentState::Draft {
                continue;
            }
            let parents = self.storage.get_parent_relationships(doc.id)?;
            let children = self.storage.get_child_relationships(doc.id)?;
            if parents.is_empty() && children.is_empty() {
                orphaned += 1;
            }
        }
        Ok(orphaned)
    }
}

fn count_by(docs: &[Document], key: impl Fn(&Document) -> String) -> Vec<(String, i64)> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for doc in docs {
        *counts.entry(key(doc)).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

fn average_age_days(docs: &[Document]) -> f64 {
    if docs.is_empty() {
        return 0.0;
    }
    let total: i64 = docs.iter().map(|d| (Utc::now() - d.created_at).num_days()).sum();
    total as f64 / docs.len() as f64
}

fn extreme_age_days(docs: &[Document], oldest: bool) -> i64 {
    let pick = if oldest {
        docs.iter().min_by_key(|d| d.created_at)
    } else {
        docs.iter().max_by_key(|d| d.created_at)
    };
    pick.map(|d| (Utc::now() - d.created_at).num_days()).unwrap_or(0)
}

fn naming_compliance_rate(docs: &[Document]) -> f64 {
    if docs.is_empty() {
        return 100.0;
    }
    let compliant = docs
        .iter()
        .filter(|d| {
            let filename = d.path.rsplit('/').next().unwrap_or(&d.path);
            validate_filename(filename).is_ok()
        })
        .count();
    (compliant as f64 / docs.len() as f64) * 100.0
}

fn frontmatter_compliance_rate(docs: &[Document]) -> f64 {
    if docs.is_empty() {
        return 100.0;
    }
    let compliant = docs
        .iter()
        .filter(|d| REQUIRED_FRONTMATTER_FIELDS.iter().all(|field| d.metadata.get(field).is_some()))
        .count();
    (compliant as f64 / docs.len() as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_config::GovernanceConfig;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;
    use doclife_storage::SqliteStore;

    fn make_engine() -> HealthEngine<SqliteStore> {
        let storage = Arc::new(SqliteStore::open_in_memory().unwrap());
        let governance = Arc::new(GovernanceEngine::new(GovernanceConfig::default(), storage.clone()));
        HealthEngine::new(storage, governance)
    }

    #[test]
    fn empty_registry_is_fully_compliant() {
        let engine = make_engine();
        let metrics = engine.collect_metrics().unwrap();
        assert_eq!(metrics.total_documents, 0);
        assert_eq!(metrics.naming_compliance_rate, 100.0);
        assert_eq!(metrics.frontmatter_compliance_rate, 100.0);
        assert_eq!(metrics.avg_document_age_days, 0.0);
    }

    #[test]
    fn counts_documents_without_owners() {
        let engine = make_engine();
        let doc = DocumentBuilder::new("docs/prd-foo-1.0.md", DocumentType::Prd).build();
        engine.storage.create_document(&doc).unwrap();

        let metrics = engine.collect_metrics().unwrap();
        assert_eq!(metrics.total_documents, 1);
        assert_eq!(metrics.documents_without_owners, 1);
    }

    #[test]
    fn draft_documents_are_not_counted_as_orphaned() {
        let engine = make_engine();
        let doc = DocumentBuilder::new("docs/prd-foo-1.0.md", DocumentType::Prd)
            .state(DocumentState::Draft)
            .build();
        engine.storage.create_document(&doc).unwrap();

        let metrics = engine.collect_metrics().unwrap();
        assert_eq!(metrics.orphaned_documents, 0);
    }

    #[test]
    fn active_document_with_no_relationships_is_orphaned() {
        let engine = make_engine();
        let doc = DocumentBuilder::new("docs/prd-foo-1.0.md", DocumentType::Prd)
            .state(DocumentState::Active)
            .build();
        engine.storage.create_document(&doc).unwrap();

        let metrics = engine.collect_metrics().unwrap();
        assert_eq!(metrics.orphaned_documents, 1);
    }
}
