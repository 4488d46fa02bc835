//! Review -- an append-only record of a completed document review.

use chrono::{DateTime, Utc};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recorded review of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: i64,

    pub document_id: i64,

    pub reviewer: String,

    pub reviewed_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_due: Option<NaiveDate>,
}

impl Review {
    pub fn new(document_id: i64, reviewer: impl Into<String>) -> Self {
        Self {
            id: 0,
            document_id,
            reviewer: reviewer.into(),
            reviewed_at: Utc::now(),
            notes: None,
            next_review_due: None,
        }
    }
}
