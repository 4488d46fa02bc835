//! Pure validation functions for documents.
//!
//! These check structural invariants only -- they never touch storage.
//! Cross-document invariants (single active document per type/feature, valid
//! state transitions) are enforced by the lifecycle manager, which has the
//! registry access needed to check them.

use crate::document::Document;

/// A validation failure for a single document field or invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("document path must not be empty")]
    EmptyPath,

    #[error("document path must be relative, got absolute path {0:?}")]
    AbsolutePath(String),

    #[error("author, if set, must not be empty")]
    EmptyAuthor,

    #[error("content_hash, if set, must not be empty")]
    EmptyContentHash,

    #[error("modified_at ({modified_at}) must not precede created_at ({created_at})")]
    ModifiedBeforeCreated {
        created_at: String,
        modified_at: String,
    },

    #[error("review_due_date is set but reviewer is empty")]
    ReviewDueWithoutReviewer,

    #[error("metadata.tags, if present, must be an array of strings")]
    InvalidTagsShape,

    #[error("metadata.priority, if present, must be one of low, medium, high, critical")]
    InvalidPriority,
}

/// Validates a document's structural invariants.
///
/// Checked invariants:
/// - `path` is non-empty and relative.
/// - `author`, if present, is non-empty.
/// - `content_hash`, if present, is non-empty.
/// - `modified_at` is not earlier than `created_at`.
/// - if `review_due_date` is set, `reviewer` must be set too.
/// - `metadata.tags`, if present, is an array of strings.
/// - `metadata.priority`, if present, is one of the four recognised levels.
pub fn validate(doc: &Document) -> Result<(), ValidationError> {
    if doc.path.trim().is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    if doc.path.starts_with('/') {
        return Err(ValidationError::AbsolutePath(doc.path.clone()));
    }
    if let Some(author) = &doc.author {
        if author.trim().is_empty() {
            return Err(ValidationError::EmptyAuthor);
        }
    }
    if let Some(hash) = &doc.content_hash {
        if hash.trim().is_empty() {
            return Err(ValidationError::EmptyContentHash);
        }
    }
    if doc.modified_at < doc.created_at {
        return Err(ValidationError::ModifiedBeforeCreated {
            created_at: doc.created_at.to_rfc3339(),
            modified_at: doc.modified_at.to_rfc3339(),
        });
    }
    if doc.review_due_date.is_some() && doc.reviewer.as_deref().unwrap_or("").trim().is_empty() {
        return Err(ValidationError::ReviewDueWithoutReviewer);
    }
    validate_tags_shape(doc)?;
    validate_priority(doc)?;

    Ok(())
}

fn validate_tags_shape(doc: &Document) -> Result<(), ValidationError> {
    let Some(tags) = doc.metadata.get(crate::document::metadata_keys::TAGS) else {
        return Ok(());
    };
    let Some(arr) = tags.as_array() else {
        return Err(ValidationError::InvalidTagsShape);
    };
    if arr.iter().any(|v| !v.is_string()) {
        return Err(ValidationError::InvalidTagsShape);
    }
    Ok(())
}

fn validate_priority(doc: &Document) -> Result<(), ValidationError> {
    let Some(priority) = doc.metadata.get(crate::document::metadata_keys::PRIORITY) else {
        return Ok(());
    };
    match priority.as_str() {
        Some("low") | Some("medium") | Some("high") | Some("critical") => Ok(()),
        _ => Err(ValidationError::InvalidPriority),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::DocumentType;
    use serde_json::json;

    fn base_doc() -> Document {
        let mut doc = Document::new(
            "docs/features/checkout/prd_checkout_2026-01-01_v1.0.md",
            DocumentType::Prd,
        );
        doc.author = Some("alice".to_owned());
        doc
    }

    #[test]
    fn valid_document_passes() {
        assert!(validate(&base_doc()).is_ok());
    }

    #[test]
    fn rejects_empty_path() {
        let mut doc = base_doc();
        doc.path = "  ".to_owned();
        assert_eq!(validate(&doc), Err(ValidationError::EmptyPath));
    }

    #[test]
    fn rejects_absolute_path() {
        let mut doc = base_doc();
        doc.path = "/etc/passwd".to_owned();
        assert!(matches!(validate(&doc), Err(ValidationError::AbsolutePath(_))));
    }

    #[test]
    fn rejects_empty_author() {
        let mut doc = base_doc();
        doc.author = Some("   ".to_owned());
        assert_eq!(validate(&doc), Err(ValidationError::EmptyAuthor));
    }

    #[test]
    fn rejects_modified_before_created() {
        let mut doc = base_doc();
        doc.modified_at = doc.created_at - chrono::Duration::days(1);
        assert!(matches!(
            validate(&doc),
            Err(ValidationError::ModifiedBeforeCreated { .. })
        ));
    }

    #[test]
    fn rejects_review_due_without_reviewer() {
        let mut doc = base_doc();
        doc.review_due_date = Some(chrono::Utc::now().date_naive());
        assert_eq!(validate(&doc), Err(ValidationError::ReviewDueWithoutReviewer));
    }

    #[test]
    fn rejects_non_array_tags() {
        let mut doc = base_doc();
        doc.metadata = json!({ "tags": "not-an-array" });
        assert_eq!(validate(&doc), Err(ValidationError::InvalidTagsShape));
    }

    #[test]
    fn rejects_invalid_priority() {
        let mut doc = base_doc();
        doc.metadata = json!({ "priority": "urgent" });
        assert_eq!(validate(&doc), Err(ValidationError::InvalidPriority));
    }

    #[test]
    fn accepts_valid_priority() {
        let mut doc = base_doc();
        doc.metadata = json!({ "priority": "high" });
        assert!(validate(&doc).is_ok());
    }
}
