//! Relationship type -- edges between documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::RelationshipType;

/// A directed edge between two documents.
///
/// Unlike the richer `Dependency` edges used elsewhere in this codebase,
/// document relationships carry no actor/metadata payload -- the reference
/// system this was ported from models them as a bare (parent, child, type)
/// triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub id: i64,

    pub parent_id: i64,

    pub child_id: i64,

    #[serde(rename = "type")]
    pub rel_type: RelationshipType,

    pub created_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(parent_id: i64, child_id: i64, rel_type: RelationshipType) -> Self {
        Self {
            id: 0,
            parent_id,
            child_id,
            rel_type,
            created_at: Utc::now(),
        }
    }
}

/// Infers the relationship type between a parent and child document type.
///
/// Mirrors the fixed inference table from the reference document manager:
/// PRD -> Architecture is `derived_from`; Architecture -> {Epic, Story} is
/// `derived_from`; Epic -> Story is `implements`; Story -> Runbook is
/// `implements`; {TestReport, QaReport} -> Story is `tests`; anything else
/// defaults to `references`.
pub fn infer_relationship_type(
    parent_type: crate::enums::DocumentType,
    child_type: crate::enums::DocumentType,
) -> RelationshipType {
    use crate::enums::DocumentType::*;
    match (parent_type, child_type) {
        (Prd, Architecture) => RelationshipType::DerivedFrom,
        (Architecture, Epic) => RelationshipType::DerivedFrom,
        (Architecture, Story) => RelationshipType::DerivedFrom,
        (Epic, Story) => RelationshipType::Implements,
        (Story, Runbook) => RelationshipType::Implements,
        (TestReport, Story) => RelationshipType::Tests,
        (QaReport, Story) => RelationshipType::Tests,
        _ => RelationshipType::References,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::DocumentType;

    #[test]
    fn infers_known_pairs() {
        assert_eq!(
            infer_relationship_type(DocumentType::Prd, DocumentType::Architecture),
            RelationshipType::DerivedFrom
        );
        assert_eq!(
            infer_relationship_type(DocumentType::Epic, DocumentType::Story),
            RelationshipType::Implements
        );
        assert_eq!(
            infer_relationship_type(DocumentType::TestReport, DocumentType::Story),
            RelationshipType::Tests
        );
    }

    #[test]
    fn defaults_to_references() {
        assert_eq!(
            infer_relationship_type(DocumentType::Runbook, DocumentType::Adr),
            RelationshipType::References
        );
    }
}
