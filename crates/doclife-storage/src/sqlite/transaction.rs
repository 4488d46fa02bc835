//! Transaction wrapper for [`SqliteStore`].

use rusqlite::Connection;

use doclife_core::document::Document;
use doclife_core::enums::DocumentType;
use doclife_core::relationship::Relationship;
use doclife_core::review::Review;
use doclife_core::transition::StateTransition;

use crate::error::{Result, StorageError};
use crate::sqlite::documents;
use crate::sqlite::relationships;
use crate::sqlite::reviews;
use crate::sqlite::store::SqliteStore;
use crate::sqlite::transitions;
use crate::traits::{DocumentUpdates, Transaction};

/// A thin wrapper around a SQLite connection that is inside a transaction.
///
/// Delegates to the same connection-level helpers used by [`SqliteStore`], so
/// the single-connection and transactional code paths never diverge.
pub(crate) struct SqliteTx<'a> {
    pub(crate) conn: &'a Connection,
}

impl Transaction for SqliteTx<'_> {
    fn create_document(&self, doc: &Document) -> Result<i64> {
        documents::insert_document_on_conn(self.conn, doc)
    }

    fn get_document(&self, id: i64) -> Result<Document> {
        documents::get_document_on_conn(self.conn, id)
    }

    fn update_document(&self, id: i64, updates: &DocumentUpdates) -> Result<()> {
        documents::update_document_on_conn(self.conn, id, updates)
    }

    fn get_active_document(&self, doc_type: DocumentType, feature: &str) -> Result<Option<Document>> {
        documents::get_active_document_on_conn(self.conn, doc_type, feature)
    }

    fn record_transition(&self, transition: &StateTransition) -> Result<i64> {
        transitions::record_transition_on_conn(self.conn, transition)
    }

    fn add_relationship(&self, rel: &Relationship) -> Result<i64> {
        relationships::add_relationship_on_conn(self.conn, rel)
    }

    fn record_review(&self, review: &Review) -> Result<i64> {
        reviews::record_review_on_conn(self.conn, review)
    }
}

impl SqliteStore {
    /// Runs a closure inside a database transaction. Commits on `Ok`; the
    /// transaction rolls back via `Drop` if the closure returns `Err`.
    pub fn run_in_transaction_impl(
        &self,
        f: &dyn Fn(&dyn Transaction) -> Result<()>,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;

        let sqlite_tx = SqliteTx { conn: &tx };
        match f(&sqlite_tx) {
            Ok(()) => {
                tx.commit()
                    .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::{DocumentState, DocumentType};

    #[test]
    fn transaction_commit() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .run_in_transaction_impl(&|tx| {
                let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
                let id = tx.create_document(&doc)?;
                tx.record_transition(&StateTransition::new(
                    id,
                    DocumentState::Draft,
                    DocumentState::Active,
                    "approved",
                    "alice",
                ))?;
                Ok(())
            })
            .unwrap();

        let doc = store.get_document_by_path_impl("docs/a.md").unwrap();
        let history = store.get_transitions_impl(doc.id).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn transaction_rollback_on_error() {
        let store = SqliteStore::open_in_memory().unwrap();

        let result = store.run_in_transaction_impl(&|tx| {
            let doc = DocumentBuilder::new("docs/b.md", DocumentType::Prd).build();
            tx.create_document(&doc)?;
            Err(StorageError::Internal("forced rollback".into()))
        });

        assert!(result.is_err());
        assert!(store
            .get_document_by_path_impl("docs/b.md")
            .unwrap_err()
            .is_not_found());
    }
}
