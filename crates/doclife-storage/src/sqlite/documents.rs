//! Document registry CRUD and full-text search.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::str::FromStr;

use doclife_core::document::Document;
use doclife_core::enums::{DocumentState, DocumentType};
use doclife_core::filter::DocumentFilter;

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;
use crate::traits::{DocumentCounts, DocumentUpdates};

pub(crate) const DOCUMENT_COLUMNS: &str = r#"
    id, path, doc_type, state, created_at, modified_at,
    author, feature, epic, story, content_hash, owner, reviewer,
    review_due_date, metadata
"#;

/// Formats a `DateTime<Utc>` as the ISO 8601 TEXT this schema stores.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses an ISO 8601 TEXT string from SQLite into a `DateTime<Utc>`.
///
/// Returns an error rather than silently substituting `Utc::now()`: a row
/// this crate itself wrote should always be parseable, so a failure here
/// means the data is corrupt and callers need to know.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>().map_err(|e| {
        StorageError::Internal(format!("corrupt timestamp {s:?}: {e}"))
    })
}

pub(crate) fn scan_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    let doc_type_str: String = row.get("doc_type")?;
    let state_str: String = row.get("state")?;
    let created_at_str: String = row.get("created_at")?;
    let modified_at_str: String = row.get("modified_at")?;
    let review_due_date_str: Option<String> = row.get("review_due_date")?;
    let metadata_str: String = row.get("metadata")?;

    let doc_type = DocumentType::from_str(&doc_type_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    let state = DocumentState::from_str(&state_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    let created_at = parse_datetime(&created_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    let modified_at = parse_datetime(&modified_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    let review_due_date = review_due_date_str
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    let metadata: serde_json::Value = serde_json::from_str(&metadata_str).unwrap_or(serde_json::json!({}));

    Ok(Document {
        id: row.get("id")?,
        path: row.get("path")?,
        doc_type,
        state,
        created_at,
        modified_at,
        author: row.get("author")?,
        feature: row.get("feature")?,
        epic: row.get("epic")?,
        story: row.get("story")?,
        content_hash: row.get("content_hash")?,
        owner: row.get("owner")?,
        reviewer: row.get("reviewer")?,
        review_due_date,
        metadata,
    })
}

pub(crate) fn insert_document_on_conn(conn: &Connection, doc: &Document) -> Result<i64> {
    let review_due = doc.review_due_date.map(|d| d.format("%Y-%m-%d").to_string());
    let metadata_str = serde_json::to_string(&doc.metadata)?;

    let result = conn.execute(
        "INSERT INTO documents
         (path, doc_type, state, created_at, modified_at, author, feature, epic,
          story, content_hash, owner, reviewer, review_due_date, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            doc.path,
            doc.doc_type.as_str(),
            doc.state.as_str(),
            format_datetime(&doc.created_at),
            format_datetime(&doc.modified_at),
            doc.author,
            doc.feature,
            doc.epic,
            doc.story,
            doc.content_hash,
            doc.owner,
            doc.reviewer,
            review_due,
            metadata_str,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StorageError::DuplicatePath(doc.path.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn get_document_on_conn(conn: &Connection, id: i64) -> Result<Document> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");
    conn.query_row(&sql, params![id], scan_document)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                StorageError::not_found("document", id.to_string())
            }
            other => other.into(),
        })
}

pub(crate) fn get_document_by_path_on_conn(conn: &Connection, path: &str) -> Result<Document> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE path = ?1");
    conn.query_row(&sql, params![path], scan_document)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                StorageError::not_found("document", path.to_string())
            }
            other => other.into(),
        })
}

pub(crate) fn update_document_on_conn(
    conn: &Connection,
    id: i64,
    updates: &DocumentUpdates,
) -> Result<()> {
    let mut set_clauses: Vec<String> = vec!["modified_at = ?".to_string()];
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(format_datetime(&Utc::now()))];

    macro_rules! add_field {
        ($field:ident, $col:expr) => {
            if let Some(ref val) = updates.$field {
                set_clauses.push(format!("{} = ?", $col));
                param_values.push(Box::new(val.clone()));
            }
        };
    }

    if let Some(state) = updates.state {
        set_clauses.push("state = ?".to_string());
        param_values.push(Box::new(state.as_str().to_string()));
    }
    add_field!(path, "path");
    add_field!(author, "author");
    add_field!(feature, "feature");
    add_field!(story, "story");
    if let Some(epic) = updates.epic {
        set_clauses.push("epic = ?".to_string());
        param_values.push(Box::new(epic));
    }
    if let Some(ref hash) = updates.content_hash {
        set_clauses.push("content_hash = ?".to_string());
        param_values.push(Box::new(hash.clone()));
    }
    add_field!(owner, "owner");
    add_field!(reviewer, "reviewer");
    if let Some(due) = updates.review_due_date {
        set_clauses.push("review_due_date = ?".to_string());
        param_values.push(Box::new(due.map(|d| d.format("%Y-%m-%d").to_string())));
    }
    if let Some(ref metadata) = updates.metadata {
        set_clauses.push("metadata = ?".to_string());
        param_values.push(Box::new(serde_json::to_string(metadata)?));
    }

    param_values.push(Box::new(id));
    let sql = format!(
        "UPDATE documents SET {} WHERE id = ?{}",
        set_clauses.join(", "),
        param_values.len()
    );

    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|v| v.as_ref()).collect();
    let result = conn.execute(&sql, param_refs.as_slice());
    let affected = match result {
        Ok(n) => n,
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            let path = updates.path.clone().unwrap_or_default();
            return Err(StorageError::DuplicatePath(path));
        }
        Err(e) => return Err(e.into()),
    };
    if affected == 0 {
        return Err(StorageError::not_found("document", id.to_string()));
    }
    Ok(())
}

pub(crate) fn delete_document_on_conn(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(StorageError::not_found("document", id.to_string()));
    }
    Ok(())
}

pub(crate) fn get_active_document_on_conn(
    conn: &Connection,
    doc_type: DocumentType,
    feature: &str,
) -> Result<Option<Document>> {
    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         WHERE doc_type = ?1 AND feature = ?2 AND state = ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(
        params![doc_type.as_str(), feature, DocumentState::Active.as_str()],
        scan_document,
    )?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub(crate) fn get_documents_by_feature_on_conn(
    conn: &Connection,
    feature: &str,
) -> Result<Vec<Document>> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE feature = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![feature], scan_document)?;
    let mut docs = Vec::new();
    for row in rows {
        docs.push(row?);
    }
    Ok(docs)
}

pub(crate) fn get_document_counts_on_conn(conn: &Connection) -> Result<DocumentCounts> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;

    let mut by_state = Vec::new();
    let mut stmt =
        conn.prepare("SELECT state, COUNT(*) FROM documents GROUP BY state ORDER BY state")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        by_state.push(row?);
    }

    let mut by_type = Vec::new();
    let mut stmt =
        conn.prepare("SELECT doc_type, COUNT(*) FROM documents GROUP BY doc_type ORDER BY doc_type")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        by_type.push(row?);
    }

    Ok(DocumentCounts {
        total,
        by_state,
        by_type,
    })
}

// ---------------------------------------------------------------------------
// Search: dynamic WHERE + optional FTS5 join
// ---------------------------------------------------------------------------

/// Wraps a free-text query in quotes so it is interpreted as a single FTS5
/// phrase, disabling boolean operators (`AND`/`OR`/`NOT`/`NEAR`) that a raw
/// query would otherwise let a caller inject. Embedded quotes are escaped by
/// doubling, matching FTS5's own phrase-escaping rule.
pub(crate) fn sanitize_fts_query(query: &str) -> String {
    format!("\"{}\"", query.replace('"', "\"\""))
}

/// [`DOCUMENT_COLUMNS`] prefixed with `d.`, for queries that join `documents`
/// (aliased `d`) against another table.
pub(crate) fn qualified_document_columns() -> String {
    DOCUMENT_COLUMNS
        .trim()
        .split(',')
        .map(|c| format!("d.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn search_documents_on_conn(
    conn: &Connection,
    query: &str,
    filter: &DocumentFilter,
) -> Result<Vec<Document>> {
    let mut sql = if query.trim().is_empty() {
        format!("SELECT {DOCUMENT_COLUMNS} FROM documents d WHERE 1=1")
    } else {
        format!(
            "SELECT {cols} FROM documents d
             INNER JOIN documents_fts fts ON fts.rowid = d.id
             WHERE documents_fts MATCH ?1",
            cols = qualified_document_columns()
        )
    };

    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    if !query.trim().is_empty() {
        param_values.push(Box::new(sanitize_fts_query(query)));
    }

    if let Some(doc_type) = filter.doc_type {
        param_values.push(Box::new(doc_type.as_str().to_string()));
        sql.push_str(&format!(" AND d.doc_type = ?{}", param_values.len()));
    }
    if let Some(state) = filter.state {
        param_values.push(Box::new(state.as_str().to_string()));
        sql.push_str(&format!(" AND d.state = ?{}", param_values.len()));
    }
    if let Some(ref feature) = filter.feature {
        param_values.push(Box::new(feature.clone()));
        sql.push_str(&format!(" AND d.feature = ?{}", param_values.len()));
    }
    if let Some(ref epic) = filter.epic {
        param_values.push(Box::new(epic.clone()));
        sql.push_str(&format!(" AND d.epic = ?{}", param_values.len()));
    }
    if let Some(ref owner) = filter.owner {
        param_values.push(Box::new(owner.clone()));
        sql.push_str(&format!(" AND d.owner = ?{}", param_values.len()));
    }
    if let Some(ref author) = filter.author {
        param_values.push(Box::new(author.clone()));
        sql.push_str(&format!(" AND d.author = ?{}", param_values.len()));
    }
    if let Some(ref path_fragment) = filter.path_contains {
        param_values.push(Box::new(format!("%{path_fragment}%")));
        sql.push_str(&format!(" AND d.path LIKE ?{}", param_values.len()));
    }
    if filter.no_owner {
        sql.push_str(" AND (d.owner IS NULL OR d.owner = '')");
    }
    if filter.review_overdue {
        param_values.push(Box::new(format_datetime(&Utc::now())[..10].to_string()));
        sql.push_str(&format!(
            " AND d.review_due_date IS NOT NULL AND d.review_due_date < ?{}",
            param_values.len()
        ));
    }
    for state in &filter.exclude_states {
        param_values.push(Box::new(state.as_str().to_string()));
        sql.push_str(&format!(" AND d.state != ?{}", param_values.len()));
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
    if let Some(after) = filter.created_after {
        param_values.push(Box::new(format_datetime(&after)));
        sql.push_str(&format!(" AND d.created_at > ?{}", param_values.len()));
    }
    if let Some(before) = filter.created_before {
        param_values.push(Box::new(format_datetime(&before)));
        sql.push_str(&format!(" AND d.created_at < ?{}", param_values.len()));
    }
    if let Some(after) = filter.modified_after {
        param_values.push(Box::new(format_datetime(&after)));
        sql.push_str(&format!(" AND d.modified_at > ?{}", param_values.len()));
    }
    if let Some(before) = filter.modified_before {
        param_values.push(Box::new(format_datetime(&before)));
        sql.push_str(&format!(" AND d.modified_at < ?{}", param_values.len()));
    }

    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), scan_document)?;
    let mut docs = Vec::new();
    for row in rows {
        docs.push(row?);
    }
    Ok(docs)
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn create_document_impl(&self, doc: &Document) -> Result<i64> {
        let conn = self.lock_conn()?;
        insert_document_on_conn(&conn, doc)
    }

    pub fn get_document_impl(&self, id: i64) -> Result<Document> {
        let conn = self.lock_conn()?;
        get_document_on_conn(&conn, id)
    }

    pub fn get_document_by_path_impl(&self, path: &str) -> Result<Document> {
        let conn = self.lock_conn()?;
        get_document_by_path_on_conn(&conn, path)
    }

    pub fn update_document_impl(&self, id: i64, updates: &DocumentUpdates) -> Result<()> {
        let conn = self.lock_conn()?;
        update_document_on_conn(&conn, id, updates)
    }

    pub fn delete_document_impl(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_document_on_conn(&conn, id)
    }

    pub fn search_documents_impl(
        &self,
        query: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>> {
        let conn = self.lock_conn()?;
        search_documents_on_conn(&conn, query, filter)
    }

    pub fn get_documents_by_feature_impl(&self, feature: &str) -> Result<Vec<Document>> {
        let conn = self.lock_conn()?;
        get_documents_by_feature_on_conn(&conn, feature)
    }

    pub fn get_active_document_impl(
        &self,
        doc_type: DocumentType,
        feature: &str,
    ) -> Result<Option<Document>> {
        let conn = self.lock_conn()?;
        get_active_document_on_conn(&conn, doc_type, feature)
    }

    pub fn get_document_counts_impl(&self) -> Result<DocumentCounts> {
        let conn = self.lock_conn()?;
        get_document_counts_on_conn(&conn)
    }
}
