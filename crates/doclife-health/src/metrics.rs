//! The health metrics snapshot produced by a single collection pass.

/// A single-pass aggregation of document registry health.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthMetrics {
    pub total_documents: i64,
    pub documents_by_state: Vec<(String, i64)>,
    pub documents_by_type: Vec<(String, i64)>,

    pub stale_documents: i64,
    pub documents_needing_review: i64,
    pub orphaned_documents: i64,
    pub documents_without_owners: i64,

    pub avg_document_age_days: f64,
    pub oldest_document_days: i64,
    pub newest_document_days: i64,

    pub naming_compliance_rate: f64,
    pub frontmatter_compliance_rate: f64,
}
