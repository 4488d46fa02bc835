//! Storage backend for the document lifecycle engine.
//!
//! Provides the [`Storage`] trait and a SQLite implementation ([`SqliteStore`]).

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::{DocumentCounts, DocumentUpdates, Storage, Transaction};

// ---------------------------------------------------------------------------
// Storage trait implementation for SqliteStore
// ---------------------------------------------------------------------------

use doclife_core::document::Document;
use doclife_core::enums::DocumentType;
use doclife_core::filter::DocumentFilter;
use doclife_core::relationship::Relationship;
use doclife_core::review::Review;
use doclife_core::transition::StateTransition;

use crate::error::Result;

impl Storage for SqliteStore {
    fn create_document(&self, doc: &Document) -> Result<i64> {
        self.create_document_impl(doc)
    }

    fn get_document(&self, id: i64) -> Result<Document> {
        self.get_document_impl(id)
    }

    fn get_document_by_path(&self, path: &str) -> Result<Document> {
        self.get_document_by_path_impl(path)
    }

    fn update_document(&self, id: i64, updates: &DocumentUpdates) -> Result<()> {
        self.update_document_impl(id, updates)
    }

    fn delete_document(&self, id: i64) -> Result<()> {
        self.delete_document_impl(id)
    }

    fn search_documents(&self, query: &str, filter: &DocumentFilter) -> Result<Vec<Document>> {
        self.search_documents_impl(query, filter)
    }

    fn search_ranked(&self, query: &str, filter: &DocumentFilter) -> Result<Vec<(Document, f64)>> {
        self.search_ranked_impl(query, filter)
    }

    fn search_by_tags(&self, tags: &[String], match_all: bool, limit: i64) -> Result<Vec<Document>> {
        self.search_by_tags_impl(tags, match_all, limit)
    }

    fn get_documents_by_feature(&self, feature: &str) -> Result<Vec<Document>> {
        self.get_documents_by_feature_impl(feature)
    }

    fn get_active_document(
        &self,
        doc_type: DocumentType,
        feature: &str,
    ) -> Result<Option<Document>> {
        self.get_active_document_impl(doc_type, feature)
    }

    fn get_document_counts(&self) -> Result<DocumentCounts> {
        self.get_document_counts_impl()
    }

    fn index_document_content(&self, document_id: i64, content: &str) -> Result<()> {
        self.index_document_content_impl(document_id, content)
    }

    fn remove_document_index(&self, document_id: i64) -> Result<()> {
        self.remove_document_index_impl(document_id)
    }

    fn rebuild_index(&self) -> Result<()> {
        self.rebuild_index_impl()
    }

    fn optimize_index(&self) -> Result<()> {
        self.optimize_index_impl()
    }

    fn add_relationship(&self, rel: &Relationship) -> Result<i64> {
        self.add_relationship_impl(rel)
    }

    fn remove_relationship(&self, id: i64) -> Result<()> {
        self.remove_relationship_impl(id)
    }

    fn get_parent_relationships(&self, document_id: i64) -> Result<Vec<Relationship>> {
        self.get_parent_relationships_impl(document_id)
    }

    fn get_child_relationships(&self, document_id: i64) -> Result<Vec<Relationship>> {
        self.get_child_relationships_impl(document_id)
    }

    fn record_transition(&self, transition: &StateTransition) -> Result<i64> {
        self.record_transition_impl(transition)
    }

    fn get_transitions(&self, document_id: i64) -> Result<Vec<StateTransition>> {
        self.get_transitions_impl(document_id)
    }

    fn record_review(&self, review: &Review) -> Result<i64> {
        self.record_review_impl(review)
    }

    fn get_reviews(&self, document_id: i64) -> Result<Vec<Review>> {
        self.get_reviews_impl(document_id)
    }

    fn get_latest_review(&self, document_id: i64) -> Result<Option<Review>> {
        self.get_latest_review_impl(document_id)
    }

    fn run_in_transaction(&self, f: &dyn Fn(&dyn Transaction) -> Result<()>) -> Result<()> {
        self.run_in_transaction_impl(f)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
