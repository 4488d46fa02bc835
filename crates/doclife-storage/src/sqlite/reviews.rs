//! Review records for [`SqliteStore`].

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use doclife_core::review::Review;

use crate::error::Result;
use crate::sqlite::documents::{format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;

fn scan_review(row: &Row<'_>) -> rusqlite::Result<Review> {
    let reviewed_at_str: String = row.get("reviewed_at")?;
    let next_review_due_str: Option<String> = row.get("next_review_due")?;

    let reviewed_at = parse_datetime(&reviewed_at_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let next_review_due = next_review_due_str
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Review {
        id: row.get("id")?,
        document_id: row.get("document_id")?,
        reviewer: row.get("reviewer")?,
        reviewed_at,
        notes: row.get("notes")?,
        next_review_due,
    })
}

pub(crate) fn record_review_on_conn(conn: &Connection, review: &Review) -> Result<i64> {
    let next_due = review
        .next_review_due
        .map(|d| d.format("%Y-%m-%d").to_string());
    conn.execute(
        "INSERT INTO document_reviews
         (document_id, reviewer, reviewed_at, notes, next_review_due)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            review.document_id,
            review.reviewer,
            format_datetime(&review.reviewed_at),
            review.notes,
            next_due,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn get_reviews_on_conn(conn: &Connection, document_id: i64) -> Result<Vec<Review>> {
    let mut stmt = conn.prepare(
        "SELECT id, document_id, reviewer, reviewed_at, notes, next_review_due
         FROM document_reviews WHERE document_id = ?1 ORDER BY reviewed_at ASC",
    )?;
    let rows = stmt.query_map(params![document_id], scan_review)?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

pub(crate) fn get_latest_review_on_conn(
    conn: &Connection,
    document_id: i64,
) -> Result<Option<Review>> {
    let mut stmt = conn.prepare(
        "SELECT id, document_id, reviewer, reviewed_at, notes, next_review_due
         FROM document_reviews WHERE document_id = ?1 ORDER BY reviewed_at DESC LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![document_id], scan_review)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

impl SqliteStore {
    pub fn record_review_impl(&self, review: &Review) -> Result<i64> {
        let conn = self.lock_conn()?;
        record_review_on_conn(&conn, review)
    }

    pub fn get_reviews_impl(&self, document_id: i64) -> Result<Vec<Review>> {
        let conn = self.lock_conn()?;
        get_reviews_on_conn(&conn, document_id)
    }

    pub fn get_latest_review_impl(&self, document_id: i64) -> Result<Option<Review>> {
        let conn = self.lock_conn()?;
        get_latest_review_on_conn(&conn, document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;

    #[test]
    fn record_and_fetch_latest_review() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document_impl(&doc).unwrap();

        let r1 = Review::new(id, "alice");
        store.record_review_impl(&r1).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let r2 = Review::new(id, "bob");
        store.record_review_impl(&r2).unwrap();

        let all = store.get_reviews_impl(id).unwrap();
        assert_eq!(all.len(), 2);

        let latest = store.get_latest_review_impl(id).unwrap().unwrap();
        assert_eq!(latest.reviewer, "bob");
    }

    #[test]
    fn no_reviews_returns_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document_impl(&doc).unwrap();
        assert!(store.get_latest_review_impl(id).unwrap().is_none());
    }
}
