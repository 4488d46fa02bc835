//! The [`Storage`] trait and its transactional counterpart.

use chrono::NaiveDate;

use doclife_core::document::Document;
use doclife_core::filter::DocumentFilter;
use doclife_core::relationship::Relationship;
use doclife_core::review::Review;
use doclife_core::transition::StateTransition;

use crate::error::Result;

/// Typed partial update for a document. Every field is `Option`: `None` means
/// "leave unchanged". `review_due_date` and `content_hash` are `Option<Option<T>>`
/// since clearing a previously-set value is itself a meaningful update.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdates {
    pub path: Option<String>,
    pub state: Option<doclife_core::enums::DocumentState>,
    pub author: Option<String>,
    pub feature: Option<String>,
    pub epic: Option<i64>,
    pub story: Option<String>,
    pub content_hash: Option<Option<String>>,
    pub owner: Option<String>,
    pub reviewer: Option<String>,
    pub review_due_date: Option<Option<NaiveDate>>,
    pub metadata: Option<serde_json::Value>,
}

/// Aggregate counts used for registry/health reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentCounts {
    pub total: i64,
    pub by_state: Vec<(String, i64)>,
    pub by_type: Vec<(String, i64)>,
}

/// The storage backend for the document lifecycle engine.
///
/// Implementations must be safe to share across threads; [`SqliteStore`](crate::sqlite::SqliteStore)
/// achieves this with a mutex-protected connection.
pub trait Storage: Send + Sync {
    // -- Document registry ----------------------------------------------------

    fn create_document(&self, doc: &Document) -> Result<i64>;
    fn get_document(&self, id: i64) -> Result<Document>;
    fn get_document_by_path(&self, path: &str) -> Result<Document>;
    fn update_document(&self, id: i64, updates: &DocumentUpdates) -> Result<()>;
    fn delete_document(&self, id: i64) -> Result<()>;
    fn search_documents(&self, query: &str, filter: &DocumentFilter) -> Result<Vec<Document>>;
    /// Ranked full-text search over `{type, state, tags}` filters. See
    /// [`crate::sqlite::SqliteStore`]'s `search_ranked_impl` for the FTS5
    /// relevance-scoring contract.
    fn search_ranked(&self, query: &str, filter: &DocumentFilter) -> Result<Vec<(Document, f64)>>;
    /// Exact tag-set search: `match_all` requires every tag, otherwise any one suffices.
    fn search_by_tags(&self, tags: &[String], match_all: bool, limit: i64) -> Result<Vec<Document>>;
    fn get_documents_by_feature(&self, feature: &str) -> Result<Vec<Document>>;
    fn get_active_document(
        &self,
        doc_type: doclife_core::enums::DocumentType,
        feature: &str,
    ) -> Result<Option<Document>>;
    fn get_document_counts(&self) -> Result<DocumentCounts>;

    // -- Full-text index --------------------------------------------------------

    fn index_document_content(&self, document_id: i64, content: &str) -> Result<()>;
    fn remove_document_index(&self, document_id: i64) -> Result<()>;
    /// Drops and rebuilds the FTS5 index from scratch.
    fn rebuild_index(&self) -> Result<()>;
    /// Merges FTS5 index segments for query performance.
    fn optimize_index(&self) -> Result<()>;

    // -- Relationships ----------------------------------------------------------

    fn add_relationship(&self, rel: &Relationship) -> Result<i64>;
    fn remove_relationship(&self, id: i64) -> Result<()>;
    fn get_parent_relationships(&self, document_id: i64) -> Result<Vec<Relationship>>;
    fn get_child_relationships(&self, document_id: i64) -> Result<Vec<Relationship>>;

    // -- State transitions (audit trail) ------------------------------------------

    fn record_transition(&self, transition: &StateTransition) -> Result<i64>;
    fn get_transitions(&self, document_id: i64) -> Result<Vec<StateTransition>>;

    // -- Reviews ------------------------------------------------------------------

    fn record_review(&self, review: &Review) -> Result<i64>;
    fn get_reviews(&self, document_id: i64) -> Result<Vec<Review>>;
    fn get_latest_review(&self, document_id: i64) -> Result<Option<Review>>;

    // -- Transactions / lifecycle ---------------------------------------------

    fn run_in_transaction(&self, f: &dyn Fn(&dyn Transaction) -> Result<()>) -> Result<()>;
    fn close(&self) -> Result<()>;
}

/// The subset of [`Storage`] operations usable from inside a
/// [`Storage::run_in_transaction`] closure.
///
/// A document's state transition, its audit row, and any relationship changes
/// it implies must commit atomically -- this trait is how the lifecycle
/// manager expresses that.
pub trait Transaction {
    fn create_document(&self, doc: &Document) -> Result<i64>;
    fn get_document(&self, id: i64) -> Result<Document>;
    fn update_document(&self, id: i64, updates: &DocumentUpdates) -> Result<()>;
    fn get_active_document(
        &self,
        doc_type: doclife_core::enums::DocumentType,
        feature: &str,
    ) -> Result<Option<Document>>;
    fn record_transition(&self, transition: &StateTransition) -> Result<i64>;
    fn add_relationship(&self, rel: &Relationship) -> Result<i64>;
    fn record_review(&self, review: &Review) -> Result<i64>;
}
