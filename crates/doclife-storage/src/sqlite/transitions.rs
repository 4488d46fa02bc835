//! State transition audit trail for [`SqliteStore`].

use rusqlite::{params, Connection, Row};
use std::str::FromStr;

use doclife_core::enums::DocumentState;
use doclife_core::transition::StateTransition;

use crate::error::Result;
use crate::sqlite::documents::{format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;

fn scan_transition(row: &Row<'_>) -> rusqlite::Result<StateTransition> {
    let from_state_str: String = row.get("from_state")?;
    let to_state_str: String = row.get("to_state")?;
    let changed_at_str: String = row.get("changed_at")?;

    let from_state = DocumentState::from_str(&from_state_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let to_state = DocumentState::from_str(&to_state_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let changed_at = parse_datetime(&changed_at_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StateTransition {
        id: row.get("id")?,
        document_id: row.get("document_id")?,
        from_state,
        to_state,
        reason: row.get("reason")?,
        changed_by: row.get("changed_by")?,
        changed_at,
    })
}

pub(crate) fn record_transition_on_conn(
    conn: &Connection,
    transition: &StateTransition,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO document_transitions
         (document_id, from_state, to_state, reason, changed_by, changed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            transition.document_id,
            transition.from_state.as_str(),
            transition.to_state.as_str(),
            transition.reason,
            transition.changed_by,
            format_datetime(&transition.changed_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Ordered most-recent-first. `changed_at` is only millisecond precision, so
/// ties break on `id DESC` (insertion order) to keep the order deterministic.
pub(crate) fn get_transitions_on_conn(
    conn: &Connection,
    document_id: i64,
) -> Result<Vec<StateTransition>> {
    let mut stmt = conn.prepare(
        "SELECT id, document_id, from_state, to_state, reason, changed_by, changed_at
         FROM document_transitions WHERE document_id = ?1 ORDER BY changed_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![document_id], scan_transition)?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

impl SqliteStore {
    pub fn record_transition_impl(&self, transition: &StateTransition) -> Result<i64> {
        let conn = self.lock_conn()?;
        record_transition_on_conn(&conn, transition)
    }

    pub fn get_transitions_impl(&self, document_id: i64) -> Result<Vec<StateTransition>> {
        let conn = self.lock_conn()?;
        get_transitions_on_conn(&conn, document_id)
    }
}
