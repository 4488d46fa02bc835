//! Structured action items derived from a [`HealthMetrics`] snapshot.

use crate::metrics::HealthMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionItem {
    pub kind: &'static str,
    pub count: i64,
    pub severity: Severity,
    pub description: &'static str,
    pub resolution_steps: Vec<&'static str>,
}

/// Builds the structured action-item list for programmatic consumption.
/// Mirrors [`markdown_action_items`]'s checklist but as typed data instead of
/// prose.
pub fn action_items(metrics: &HealthMetrics) -> Vec<ActionItem> {
    let mut items = Vec::new();

    if metrics.stale_documents > 0 {
        items.push(ActionItem {
            kind: "stale_documents",
            count: metrics.stale_documents,
            severity: Severity::Medium,
            description: "Documents not updated within review cadence",
            resolution_steps: vec![
                "Identify stale documents using the governance engine",
                "Review and update documents",
                "Mark as reviewed or mark as obsolete if no longer needed",
            ],
        });
    }

    if metrics.documents_needing_review > 0 {
        items.push(ActionItem {
            kind: "overdue_reviews",
            count: metrics.documents_needing_review,
            severity: Severity::High,
            description: "Documents past their review due date",
            resolution_steps: vec![
                "List overdue reviews via the governance engine",
                "Review each document",
                "Record the review to reset its due date",
            ],
        });
    }

    if metrics.orphaned_documents > 0 {
        items.push(ActionItem {
            kind: "orphaned_documents",
            count: metrics.orphaned_documents,
            severity: Severity::Low,
            description: "Documents with no relationships to other documents",
            resolution_steps: vec![
                "Identify orphaned documents",
                "Add relationships to parent/child documents",
                "Or mark as obsolete if no longer relevant",
            ],
        });
    }

    if metrics.documents_without_owners > 0 {
        items.push(ActionItem {
            kind: "missing_owners",
            count: metrics.documents_without_owners,
            severity: Severity::Medium,
            description: "Documents without assigned owners",
            resolution_steps: vec![
                "Review the governance configuration",
                "Assign owners based on the RACI matrix",
                "Update document frontmatter",
            ],
        });
    }

    if metrics.naming_compliance_rate < 100.0 {
        let non_compliant = non_compliant_count(metrics.total_documents, metrics.naming_compliance_rate);
        items.push(ActionItem {
            kind: "naming_non_compliance",
            count: non_compliant,
            severity: Severity::Low,
            description: "Documents not following naming convention",
            resolution_steps: vec![
                "Identify non-compliant filenames",
                "Rename to follow convention: <type>-<subject>-<version>.md",
                "Update references in other documents",
            ],
        });
    }

    if metrics.frontmatter_compliance_rate < 100.0 {
        let incomplete =
            non_compliant_count(metrics.total_documents, metrics.frontmatter_compliance_rate);
        items.push(ActionItem {
            kind: "frontmatter_incomplete",
            count: incomplete,
            severity: Severity::Medium,
            description: "Documents missing required frontmatter fields",
            resolution_steps: vec![
                "Identify documents with incomplete frontmatter",
                "Add missing fields: title, doc_type, status, owner",
                "Validate using naming convention tools",
            ],
        });
    }

    items
}

fn non_compliant_count(total: i64, compliance_rate: f64) -> i64 {
    ((total as f64) * (100.0 - compliance_rate) / 100.0) as i64
}
