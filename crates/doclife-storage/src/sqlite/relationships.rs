//! Relationship CRUD for [`SqliteStore`].

use rusqlite::{params, Connection, Row};
use std::str::FromStr;

use doclife_core::enums::RelationshipType;
use doclife_core::relationship::Relationship;

use crate::error::{Result, StorageError};
use crate::sqlite::documents::{format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;

fn scan_relationship(row: &Row<'_>) -> rusqlite::Result<Relationship> {
    let rel_type_str: String = row.get("type")?;
    let created_at_str: String = row.get("created_at")?;
    let rel_type = RelationshipType::from_str(&rel_type_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at = parse_datetime(&created_at_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Relationship {
        id: row.get("id")?,
        parent_id: row.get("parent_id")?,
        child_id: row.get("child_id")?,
        rel_type,
        created_at,
    })
}

pub(crate) fn add_relationship_on_conn(conn: &Connection, rel: &Relationship) -> Result<i64> {
    conn.execute(
        "INSERT OR REPLACE INTO document_relationships (parent_id, child_id, type, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            rel.parent_id,
            rel.child_id,
            rel.rel_type.as_str(),
            format_datetime(&rel.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn remove_relationship_on_conn(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM document_relationships WHERE id = ?1",
        params![id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("relationship", id.to_string()));
    }
    Ok(())
}

pub(crate) fn get_parent_relationships_on_conn(
    conn: &Connection,
    document_id: i64,
) -> Result<Vec<Relationship>> {
    let mut stmt = conn.prepare(
        "SELECT id, parent_id, child_id, type, created_at
         FROM document_relationships WHERE child_id = ?1",
    )?;
    let rows = stmt.query_map(params![document_id], scan_relationship)?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

pub(crate) fn get_child_relationships_on_conn(
    conn: &Connection,
    document_id: i64,
) -> Result<Vec<Relationship>> {
    let mut stmt = conn.prepare(
        "SELECT id, parent_id, child_id, type, created_at
         FROM document_relationships WHERE parent_id = ?1",
    )?;
    let rows = stmt.query_map(params![document_id], scan_relationship)?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

impl SqliteStore {
    pub fn add_relationship_impl(&self, rel: &Relationship) -> Result<i64> {
        let conn = self.lock_conn()?;
        add_relationship_on_conn(&conn, rel)
    }

    pub fn remove_relationship_impl(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        remove_relationship_on_conn(&conn, id)
    }

    pub fn get_parent_relationships_impl(&self, document_id: i64) -> Result<Vec<Relationship>> {
        let conn = self.lock_conn()?;
        get_parent_relationships_on_conn(&conn, document_id)
    }

    pub fn get_child_relationships_impl(&self, document_id: i64) -> Result<Vec<Relationship>> {
        let conn = self.lock_conn()?;
        get_child_relationships_on_conn(&conn, document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;

    fn test_store_with_two_docs() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::open_in_memory().unwrap();
        let parent = DocumentBuilder::new("docs/prd/a.md", DocumentType::Prd).build();
        let child = DocumentBuilder::new("docs/architecture/a.md", DocumentType::Architecture).build();
        let parent_id = store.create_document_impl(&parent).unwrap();
        let child_id = store.create_document_impl(&child).unwrap();
        (store, parent_id, child_id)
    }

    #[test]
    fn add_and_query_relationship() {
        let (store, parent_id, child_id) = test_store_with_two_docs();
        let rel = Relationship::new(parent_id, child_id, RelationshipType::DerivedFrom);
        store.add_relationship_impl(&rel).unwrap();

        let children = store.get_child_relationships_impl(parent_id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].child_id, child_id);

        let parents = store.get_parent_relationships_impl(child_id).unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].parent_id, parent_id);
    }

    #[test]
    fn remove_missing_relationship_is_not_found() {
        let (store, _parent_id, _child_id) = test_store_with_two_docs();
        let err = store.remove_relationship_impl(999).unwrap_err();
        assert!(err.is_not_found());
    }
}
