//! Filter types for querying documents.

use chrono::{DateTime, Utc};

use crate::enums::{DocumentState, DocumentType};

/// Filter for document registry queries.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub doc_type: Option<DocumentType>,
    pub state: Option<DocumentState>,
    pub feature: Option<String>,
    pub epic: Option<i64>,
    pub story: Option<String>,
    pub owner: Option<String>,
    pub reviewer: Option<String>,
    pub author: Option<String>,

    /// AND semantics: document must have ALL these tags.
    pub tags: Vec<String>,
    /// OR semantics: document must have AT LEAST ONE of these tags.
    pub tags_any: Vec<String>,

    /// Substring match against `path`.
    pub path_contains: Option<String>,

    /// Exclude documents with these states.
    pub exclude_states: Vec<DocumentState>,

    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub modified_after: Option<DateTime<Utc>>,
    pub modified_before: Option<DateTime<Utc>>,

    /// Documents whose `review_due_date` has already passed.
    pub review_overdue: bool,

    /// Documents with no `owner` set.
    pub no_owner: bool,

    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_filter_defaults() {
        let f = DocumentFilter::default();
        assert!(f.doc_type.is_none());
        assert!(f.state.is_none());
        assert!(f.tags.is_empty());
        assert!(!f.review_overdue);
        assert!(!f.no_owner);
        assert!(f.limit.is_none());
    }
}
