//! Markdown health report generation.

use std::fmt::Write as _;

use crate::action_items::action_items;
use crate::metrics::HealthMetrics;

/// Renders a full Markdown health report: summary table, state/type
/// breakdowns, and an action-item checklist.
pub fn generate_health_report(metrics: &HealthMetrics) -> String {
    let mut report = String::new();
    report.push_str("# Document Lifecycle Health Report\n\n");
    writeln!(report, "Generated: {}\n", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")).ok();
    report.push_str("---\n\n## Summary Metrics\n\n");
    report.push_str("| Metric | Value |\n|--------|-------|\n");

    let stale_pct = percent(metrics.stale_documents, metrics.total_documents);
    writeln!(report, "| **Total Documents** | {} |", metrics.total_documents).ok();
    writeln!(report, "| **Stale Documents** | {} ({stale_pct:.1}%) |", metrics.stale_documents).ok();
    writeln!(report, "| **Needs Review** | {} |", metrics.documents_needing_review).ok();
    writeln!(report, "| **Orphaned Documents** | {} |", metrics.orphaned_documents).ok();
    writeln!(report, "| **Without Owners** | {} |", metrics.documents_without_owners).ok();
    writeln!(report, "| **Avg Document Age** | {:.1} days |", metrics.avg_document_age_days).ok();
    writeln!(report, "| **Naming Compliance** | {:.1}% |", metrics.naming_compliance_rate).ok();
    writeln!(report, "| **Frontmatter Compliance** | {:.1}% |\n", metrics.frontmatter_compliance_rate).ok();

    report.push_str("---\n\n## Documents by State\n\n| State | Count |\n|-------|-------|\n");
    for (state, count) in &metrics.documents_by_state {
        writeln!(report, "| {state} | {count} |").ok();
    }

    report.push_str("\n---\n\n## Documents by Type\n\n| Type | Count |\n|------|-------|\n");
    for (doc_type, count) in &metrics.documents_by_type {
        writeln!(report, "| {doc_type} | {count} |").ok();
    }

    report.push_str("\n---\n\n## Action Items\n\n");
    let items = action_items(metrics);
    if items.is_empty() {
        report.push_str("No action items - system is healthy.\n");
    } else {
        for item in &items {
            writeln!(report, "- [ ] **{}: {}** ({})", item.kind, item.count, item.description).ok();
        }
    }

    report.push_str("\n---\n\n*Report generated by the document health engine*\n");
    report
}

fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
