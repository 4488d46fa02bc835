//! Full-text index maintenance and ranked/tag-based search.
//!
//! The indexed document body is read from disk by the lifecycle manager, not
//! by this crate -- storage only knows how to put a given string into (or
//! remove it from) the FTS5 index, and how to query it.

use rusqlite::{params, Connection};

use doclife_core::document::Document;
use doclife_core::filter::DocumentFilter;

use crate::error::Result;
use crate::sqlite::documents::{qualified_document_columns, scan_document, sanitize_fts_query, DOCUMENT_COLUMNS};
use crate::sqlite::store::SqliteStore;

pub(crate) fn index_document_on_conn(
    conn: &Connection,
    document_id: i64,
    path: &str,
    content: &str,
    tags: &[String],
) -> Result<()> {
    conn.execute(
        "DELETE FROM documents_fts WHERE rowid = ?1",
        params![document_id],
    )?;
    conn.execute(
        "INSERT INTO documents_fts (rowid, path, content, tags) VALUES (?1, ?2, ?3, ?4)",
        params![document_id, path, content, tags.join(" ")],
    )?;
    Ok(())
}

pub(crate) fn remove_document_index_on_conn(conn: &Connection, document_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM documents_fts WHERE rowid = ?1",
        params![document_id],
    )?;
    Ok(())
}

/// Full-text search ranked by FTS5 relevance. Applies the `{type, state,
/// tags}` filter subset plus `limit`; an empty query matches nothing (the
/// caller decides whether an empty query means "list everything" via
/// [`SqliteStore::search_documents_impl`] instead).
///
/// FTS5's `rank` is negative, with more-negative meaning more relevant;
/// `abs()` turns it into an ascending-is-worse positive relevance score.
pub(crate) fn search_ranked_on_conn(
    conn: &Connection,
    query: &str,
    filter: &DocumentFilter,
) -> Result<Vec<(Document, f64)>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = format!(
        "SELECT {cols}, fts.rank AS search_rank FROM documents d
         INNER JOIN documents_fts fts ON fts.rowid = d.id
         WHERE documents_fts MATCH ?1",
        cols = qualified_document_columns()
    );

    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(sanitize_fts_query(query))];

    if let Some(doc_type) = filter.doc_type {
        param_values.push(Box::new(doc_type.as_str().to_string()));
        sql.push_str(&format!(" AND d.doc_type = ?{}", param_values.len()));
    }
    if let Some(state) = filter.state {
        param_values.push(Box::new(state.as_str().to_string()));
        sql.push_str(&format!(" AND d.state = ?{}", param_values.len()));
    }
    for tag in &filter.tags {
        param_values.push(Box::new(tag.clone()));
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM json_each(d.metadata, '$.tags') WHERE value = ?{})",
            param_values.len()
        ));
    }
    if !filter.tags_any.is_empty() {
        let placeholders: Vec<String> = filter
            .tags_any
            .iter()
            .map(|tag| {
                param_values.push(Box::new(tag.clone()));
                format!("?{}", param_values.len())
            })
            .collect();
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM json_each(d.metadata, '$.tags') WHERE value IN ({}))",
            placeholders.join(", ")
        ));
    }

    sql.push_str(" ORDER BY fts.rank");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        let doc = scan_document(row)?;
        let rank: f64 = row.get("search_rank")?;
        Ok((doc, rank.abs()))
    })?;
    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Tag-set search directly against `documents.metadata`, bypassing the FTS5
/// index entirely (no free-text component).
pub(crate) fn search_by_tags_on_conn(
    conn: &Connection,
    tags: &[String],
    match_all: bool,
    limit: i64,
) -> Result<Vec<Document>> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let sql = if match_all {
        let mut s = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE 1=1");
        for tag in tags {
            param_values.push(Box::new(tag.clone()));
            s.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM json_each(metadata, '$.tags') WHERE value = ?{})",
                param_values.len()
            ));
        }
        param_values.push(Box::new(limit));
        s.push_str(&format!(" LIMIT ?{}", param_values.len()));
        s
    } else {
        let placeholders: Vec<String> = tags
            .iter()
            .map(|tag| {
                param_values.push(Box::new(tag.clone()));
                format!("?{}", param_values.len())
            })
            .collect();
        let mut s = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
             WHERE EXISTS (SELECT 1 FROM json_each(metadata, '$.tags') WHERE value IN ({}))",
            placeholders.join(", ")
        );
        param_values.push(Box::new(limit));
        s.push_str(&format!(" LIMIT ?{}", param_values.len()));
        s
    };

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), scan_document)?;
    let mut docs = Vec::new();
    for row in rows {
        docs.push(row?);
    }
    Ok(docs)
}

pub(crate) fn rebuild_index_on_conn(conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO documents_fts(documents_fts) VALUES('rebuild')", [])?;
    Ok(())
}

pub(crate) fn optimize_index_on_conn(conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO documents_fts(documents_fts) VALUES('optimize')", [])?;
    Ok(())
}

impl SqliteStore {
    pub fn index_document_content_impl(&self, document_id: i64, content: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let doc = crate::sqlite::documents::get_document_on_conn(&conn, document_id)?;
        index_document_on_conn(&conn, document_id, &doc.path, content, &doc.tags())
    }

    pub fn remove_document_index_impl(&self, document_id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        remove_document_index_on_conn(&conn, document_id)
    }

    pub fn search_ranked_impl(&self, query: &str, filter: &DocumentFilter) -> Result<Vec<(Document, f64)>> {
        let conn = self.lock_conn()?;
        search_ranked_on_conn(&conn, query, filter)
    }

    pub fn search_by_tags_impl(&self, tags: &[String], match_all: bool, limit: i64) -> Result<Vec<Document>> {
        let conn = self.lock_conn()?;
        search_by_tags_on_conn(&conn, tags, match_all, limit)
    }

    pub fn rebuild_index_impl(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        rebuild_index_on_conn(&conn)
    }

    pub fn optimize_index_impl(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        optimize_index_on_conn(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;
    use doclife_core::filter::DocumentFilter;

    #[test]
    fn index_and_search_by_content() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = DocumentBuilder::new("docs/prd/checkout.md", DocumentType::Prd).build();
        let id = store.create_document_impl(&doc).unwrap();
        store
            .index_document_content_impl(id, "This PRD describes the checkout refund flow.")
            .unwrap();

        let results = store
            .search_documents_impl("refund flow", &DocumentFilter::default())
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "docs/prd/checkout.md");
    }

    #[test]
    fn removed_index_drops_from_search() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document_impl(&doc).unwrap();
        store.index_document_content_impl(id, "unique-token-xyz").unwrap();
        store.remove_document_index_impl(id).unwrap();

        let results = store
            .search_documents_impl("unique-token-xyz", &DocumentFilter::default())
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn ranked_search_orders_by_relevance() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let b = DocumentBuilder::new("docs/b.md", DocumentType::Prd).build();
        let id_a = store.create_document_impl(&a).unwrap();
        let id_b = store.create_document_impl(&b).unwrap();
        store
            .index_document_content_impl(id_a, "checkout checkout checkout refund flow")
            .unwrap();
        store
            .index_document_content_impl(id_b, "checkout mentioned once in passing")
            .unwrap();

        let results = store
            .search_ranked_impl("checkout", &DocumentFilter::default())
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.path, "docs/a.md");
        assert!(results[0].1 >= results[1].1);
    }

    #[test]
    fn ranked_search_empty_query_returns_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        let results = store.search_ranked_impl("", &DocumentFilter::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn search_by_tags_match_all_vs_any() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = DocumentBuilder::new("docs/a.md", DocumentType::Prd)
            .metadata(serde_json::json!({"tags": ["epic-3", "security"]}))
            .build();
        let b = DocumentBuilder::new("docs/b.md", DocumentType::Prd)
            .metadata(serde_json::json!({"tags": ["epic-3"]}))
            .build();
        store.create_document_impl(&a).unwrap();
        store.create_document_impl(&b).unwrap();

        let any = store
            .search_by_tags_impl(&["epic-3".to_string()], false, 50)
            .unwrap();
        assert_eq!(any.len(), 2);

        let all = store
            .search_by_tags_impl(&["epic-3".to_string(), "security".to_string()], true, 50)
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].path, "docs/a.md");
    }

    #[test]
    fn rebuild_and_optimize_index_do_not_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document_impl(&doc).unwrap();
        store.index_document_content_impl(id, "some content").unwrap();

        store.rebuild_index_impl().unwrap();
        store.optimize_index_impl().unwrap();

        let results = store
            .search_documents_impl("content", &DocumentFilter::default())
            .unwrap();
        assert_eq!(results.len(), 1);
    }
}
