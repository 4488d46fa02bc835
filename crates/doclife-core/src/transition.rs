//! StateTransition -- an append-only audit row recording a lifecycle change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::DocumentState;

/// A single recorded state change for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    #[serde(default)]
    pub id: i64,

    pub document_id: i64,

    pub from_state: DocumentState,

    pub to_state: DocumentState,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    pub changed_by: String,

    pub changed_at: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(
        document_id: i64,
        from_state: DocumentState,
        to_state: DocumentState,
        reason: impl Into<String>,
        changed_by: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            document_id,
            from_state,
            to_state,
            reason: reason.into(),
            changed_by: changed_by.into(),
            changed_at: Utc::now(),
        }
    }
}
