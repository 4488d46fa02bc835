//! Document struct -- the central domain model for the lifecycle engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{DocumentState, DocumentType};

/// A catalog entry for a single engineering document.
///
/// Fields are organised into logical groups for maintainability, following
/// the same grouping convention used for the larger domain structs in this
/// codebase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    // ===== Identity =====
    /// Database-assigned surrogate key. `0` for a not-yet-persisted document.
    #[serde(default)]
    pub id: i64,

    /// Path to the document file, relative to the project root. Unique.
    pub path: String,

    // ===== Classification & lifecycle =====
    pub doc_type: DocumentType,

    #[serde(default)]
    pub state: DocumentState,

    // ===== Timestamps =====
    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,

    // ===== Authorship & scope =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,

    // ===== Content =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,

    // ===== Governance =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_due_date: Option<NaiveDate>,

    // ===== Free-form metadata =====
    /// Well-known keys: `tags` (array), `5s_classification`, `priority`,
    /// `retention_policy`; any other key is passed through unchanged.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Well-known metadata keys, kept as constants to avoid typos scattered
/// across the codebase.
pub mod metadata_keys {
    pub const TAGS: &str = "tags";
    pub const CLASSIFICATION_5S: &str = "5s_classification";
    pub const PRIORITY: &str = "priority";
    pub const RETENTION_POLICY: &str = "retention_policy";
    pub const OWNER: &str = "owner";
    pub const RELATED_DOCS: &str = "related_docs";
    pub const CONTENT_HASH: &str = "content_hash";
}

impl Document {
    /// Creates a new, not-yet-persisted document with required fields set
    /// and everything else defaulted.
    pub fn new(path: impl Into<String>, doc_type: DocumentType) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            path: path.into(),
            doc_type,
            state: DocumentState::default(),
            created_at: now,
            modified_at: now,
            author: None,
            feature: None,
            epic: None,
            story: None,
            content_hash: None,
            owner: None,
            reviewer: None,
            review_due_date: None,
            metadata: serde_json::json!({}),
        }
    }

    /// Returns the tags recorded in `metadata.tags`, or an empty vector if
    /// absent or malformed.
    pub fn tags(&self) -> Vec<String> {
        self.metadata
            .get(metadata_keys::TAGS)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adds a tag to `metadata.tags` if not already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let mut tags = self.tags();
        if !tags.contains(&tag) {
            tags.push(tag);
            self.set_tags(tags);
        }
    }

    /// Removes a tag from `metadata.tags`.
    pub fn remove_tag(&mut self, tag: &str) {
        let tags: Vec<String> = self.tags().into_iter().filter(|t| t != tag).collect();
        self.set_tags(tags);
    }

    fn set_tags(&mut self, tags: Vec<String>) {
        if !self.metadata.is_object() {
            self.metadata = serde_json::json!({});
        }
        self.metadata[metadata_keys::TAGS] = serde_json::json!(tags);
    }

    /// Returns the `metadata.retention_policy` override, if set.
    pub fn retention_policy_override(&self) -> Option<String> {
        self.metadata
            .get(metadata_keys::RETENTION_POLICY)
            .and_then(|v| v.as_str())
            .map(str::to_owned)
    }

    /// Returns the `metadata.priority` value, defaulting to `"default"`.
    pub fn priority(&self) -> String {
        self.metadata
            .get(metadata_keys::PRIORITY)
            .and_then(|v| v.as_str())
            .unwrap_or("default")
            .to_owned()
    }

    /// Returns `true` if `metadata.5s_classification` equals `"temp"`.
    pub fn is_temp_classified(&self) -> bool {
        self.metadata
            .get(metadata_keys::CLASSIFICATION_5S)
            .and_then(|v| v.as_str())
            == Some("temp")
    }
}

/// Builder for [`Document`], following the builder pattern used elsewhere in
/// this codebase for constructing domain structs with many optional fields.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    pub fn new(path: impl Into<String>, doc_type: DocumentType) -> Self {
        Self {
            doc: Document::new(path, doc_type),
        }
    }

    pub fn state(mut self, state: DocumentState) -> Self {
        self.doc.state = state;
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.doc.author = Some(author.into());
        self
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.doc.feature = Some(feature.into());
        self
    }

    pub fn epic(mut self, epic: i64) -> Self {
        self.doc.epic = Some(epic);
        self
    }

    pub fn story(mut self, story: impl Into<String>) -> Self {
        self.doc.story = Some(story.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.doc.owner = Some(owner.into());
        self
    }

    pub fn reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.doc.reviewer = Some(reviewer.into());
        self
    }

    pub fn review_due_date(mut self, date: NaiveDate) -> Self {
        self.doc.review_due_date = Some(date);
        self
    }

    pub fn content_hash(mut self, hash: impl Into<String>) -> Self {
        self.doc.content_hash = Some(hash.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.doc.metadata = metadata;
        self
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_defaults() {
        let doc = Document::new("docs/prd/foo.md", DocumentType::Prd);
        assert_eq!(doc.state, DocumentState::Draft);
        assert_eq!(doc.id, 0);
        assert!(doc.tags().is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let doc = DocumentBuilder::new("docs/epics/bar.md", DocumentType::Epic)
            .state(DocumentState::Active)
            .feature("checkout")
            .epic(42)
            .owner("alice")
            .build();
        assert_eq!(doc.state, DocumentState::Active);
        assert_eq!(doc.feature.as_deref(), Some("checkout"));
        assert_eq!(doc.epic, Some(42));
        assert_eq!(doc.owner.as_deref(), Some("alice"));
    }

    #[test]
    fn tag_add_remove() {
        let mut doc = Document::new("docs/a.md", DocumentType::Prd);
        doc.add_tag("compliance");
        doc.add_tag("pii");
        doc.add_tag("compliance"); // no duplicate
        assert_eq!(doc.tags(), vec!["compliance", "pii"]);
        doc.remove_tag("pii");
        assert_eq!(doc.tags(), vec!["compliance"]);
    }

    #[test]
    fn priority_defaults() {
        let doc = Document::new("docs/a.md", DocumentType::Prd);
        assert_eq!(doc.priority(), "default");
    }

    #[test]
    fn temp_classification() {
        let mut doc = Document::new("docs/a.md", DocumentType::Prd);
        assert!(!doc.is_temp_classified());
        doc.metadata = serde_json::json!({"5s_classification": "temp"});
        assert!(doc.is_temp_classified());
    }
}
