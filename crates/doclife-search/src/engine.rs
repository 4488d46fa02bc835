//! Full-text, tag, and similarity search over the document registry.
//!
//! Grounded on `DocumentSearch` in the reference implementation: ranked FTS5
//! search (`search`), exact tag-set search (`search_by_tags`), and lexical
//! similarity via key-term extraction (`get_related_documents`).

use std::fs;
use std::sync::Arc;

use tracing::debug;

use doclife_core::document::Document;
use doclife_core::filter::DocumentFilter;
use doclife_storage::Storage;

use crate::error::Result;
use crate::terms::extract_key_terms;

/// Number of high-frequency terms used to build the similarity query --
/// matches the reference's choice of the top ten out of up to twenty
/// extracted terms.
const SIMILARITY_TERM_COUNT: usize = 10;

pub struct SearchEngine<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> SearchEngine<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Ranked full-text search over `{type, state, tags}` filters. An empty
    /// query returns no results rather than falling back to an unranked
    /// listing -- callers that want "no query, just filters" should use
    /// [`Storage::search_documents`] directly.
    pub fn search(
        &self,
        query: &str,
        filter: &DocumentFilter,
        limit: i64,
    ) -> Result<Vec<(Document, f64)>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let filter = DocumentFilter { limit: Some(limit), ..filter.clone() };
        Ok(self.storage.search_ranked(query, &filter)?)
    }

    /// Exact tag-set search. `match_all` requires every tag; otherwise any
    /// one tag is enough.
    pub fn search_by_tags(&self, tags: &[String], match_all: bool, limit: i64) -> Result<Vec<Document>> {
        Ok(self.storage.search_by_tags(tags, match_all, limit)?)
    }

    /// Finds documents lexically similar to `document_id`: reads its content
    /// (falling back to its path and tags if the file can't be read),
    /// extracts key terms, and searches for the top ten. The source document
    /// is excluded from the results.
    pub fn get_related_documents(&self, document_id: i64, limit: i64) -> Result<Vec<(Document, f64)>> {
        let source = self.storage.get_document(document_id)?;

        let content = fs::read_to_string(&source.path)
            .unwrap_or_else(|_| format!("{} {}", source.path, source.tags().join(" ")));

        let key_terms = extract_key_terms(&content);
        if key_terms.is_empty() {
            return Ok(Vec::new());
        }

        let query = key_terms
            .iter()
            .take(SIMILARITY_TERM_COUNT)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        // +1 to absorb the source document, which search() may itself match.
        let results = self.search(&query, &DocumentFilter::default(), limit + 1)?;

        Ok(results
            .into_iter()
            .filter(|(doc, _)| doc.id != document_id)
            .take(limit.max(0) as usize)
            .collect())
    }

    /// Drops and rebuilds the FTS5 index from scratch. Use after bulk
    /// changes to the registry or to recover from index corruption.
    pub fn rebuild_index(&self) -> Result<()> {
        debug!("rebuilding FTS5 index");
        Ok(self.storage.rebuild_index()?)
    }

    /// Merges FTS5 index segments for query performance. Cheap relative to
    /// `rebuild_index`; safe to run periodically.
    pub fn optimize_index(&self) -> Result<()> {
        debug!("optimizing FTS5 index");
        Ok(self.storage.optimize_index()?)
    }

    /// Refreshes the index with each registered document's current on-disk
    /// content. Expensive -- reads every file in the registry -- so this is
    /// meant to run on demand or on a schedule, not per query.
    pub fn reindex_content(&self) -> Result<()> {
        let all_docs = self.storage.search_documents("", &DocumentFilter::default())?;
        debug!(count = all_docs.len(), "reindexing document content");
        for doc in all_docs {
            let content = fs::read_to_string(&doc.path).unwrap_or_default();
            self.storage.index_document_content(doc.id, &content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;
    use doclife_storage::SqliteStore;
    use std::io::Write;

    fn make_engine() -> SearchEngine<SqliteStore> {
        SearchEngine::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    #[test]
    fn empty_query_returns_no_results() {
        let engine = make_engine();
        let results = engine.search("", &DocumentFilter::default(), 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn search_ranks_by_relevance() {
        let engine = make_engine();
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = engine.storage.create_document(&doc).unwrap();
        engine
            .storage
            .index_document_content(id, "authentication security review")
            .unwrap();

        let results = engine
            .search("security", &DocumentFilter::default(), 10)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.path, "docs/a.md");
    }

    #[test]
    fn search_by_tags_match_all() {
        let engine = make_engine();
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd)
            .metadata(serde_json::json!({"tags": ["epic-3", "security"]}))
            .build();
        engine.storage.create_document(&doc).unwrap();

        let results = engine
            .search_by_tags(&["epic-3".to_string(), "security".to_string()], true, 10)
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn related_documents_excludes_source_and_reads_file_content() {
        let engine = make_engine();

        // get_related_documents quotes its extracted terms as a single FTS5
        // phrase (see search_ranked_on_conn), so a match requires the same
        // token sequence -- identical content on both documents here.
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("source.md");
        let other_path = dir.path().join("other.md");
        std::fs::write(&source_path, "checkout refund policy discussion").unwrap();
        std::fs::write(&other_path, "checkout refund policy discussion").unwrap();

        let source = DocumentBuilder::new(source_path.to_str().unwrap(), DocumentType::Prd).build();
        let other = DocumentBuilder::new(other_path.to_str().unwrap(), DocumentType::Prd).build();
        let source_id = engine.storage.create_document(&source).unwrap();
        let other_id = engine.storage.create_document(&other).unwrap();
        engine
            .storage
            .index_document_content(source_id, "checkout refund policy discussion")
            .unwrap();
        engine
            .storage
            .index_document_content(other_id, "checkout refund policy discussion")
            .unwrap();

        let related = engine.get_related_documents(source_id, 5).unwrap();
        assert!(related.iter().all(|(doc, _)| doc.id != source_id));
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0.id, other_id);
    }

    #[test]
    fn related_documents_falls_back_when_file_missing() {
        let engine = make_engine();
        let doc = DocumentBuilder::new("docs/does-not-exist.md", DocumentType::Prd)
            .metadata(serde_json::json!({"tags": ["checkout"]}))
            .build();
        let id = engine.storage.create_document(&doc).unwrap();

        // No content indexed and the file doesn't exist; falls back to
        // path + tags as the term source, which may or may not yield terms,
        // but must not error.
        let result = engine.get_related_documents(id, 5);
        assert!(result.is_ok());
    }

    #[test]
    fn rebuild_and_reindex_do_not_error() {
        let engine = make_engine();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "some reindexed content").unwrap();

        let doc = DocumentBuilder::new(path.to_str().unwrap(), DocumentType::Prd).build();
        engine.storage.create_document(&doc).unwrap();

        engine.reindex_content().unwrap();
        engine.rebuild_index().unwrap();
        engine.optimize_index().unwrap();

        let results = engine
            .search("reindexed", &DocumentFilter::default(), 10)
            .unwrap();
        assert_eq!(results.len(), 1);
    }
}
