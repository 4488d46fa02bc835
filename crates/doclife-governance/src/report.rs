//! Governance compliance reporting: review status, unowned documents, and
//! per-type review statistics.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use doclife_core::document::Document;
use doclife_core::filter::DocumentFilter;
use doclife_storage::Storage;

use crate::engine::GovernanceEngine;
use crate::error::Result;
use crate::priority::priority_value;

pub enum ReportFormat {
    Markdown,
    Csv,
}

struct TypeStats {
    total: i64,
    with_owner: i64,
    reviewed: i64,
    due_soon: i64,
}

impl<S: Storage> GovernanceEngine<S> {
    pub fn generate_governance_report(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Markdown => self.generate_markdown_report(),
            ReportFormat::Csv => self.generate_csv_report(),
        }
    }

    fn generate_markdown_report(&self) -> Result<String> {
        let mut report = String::new();
        writeln!(report, "# Document Governance Report\n").ok();

        let review_due = self.check_review_due(None, false)?;
        let overdue: Vec<&Document> = review_due.iter().filter(|d| self.is_overdue(d)).collect();

        writeln!(report, "## Review Status\n").ok();
        writeln!(report, "- **Overdue Reviews**: {}", overdue.len()).ok();
        writeln!(report, "- **Due Within 7 Days**: {}", review_due.len() - overdue.len()).ok();
        writeln!(report, "- **Total Needing Review**: {}\n", review_due.len()).ok();

        if !overdue.is_empty() {
            writeln!(report, "### Overdue Reviews\n").ok();
            report.push_str("| Document | Type | Owner | Due Date | Days Overdue | Priority |\n");
            report.push_str("|----------|------|-------|----------|--------------|----------|\n");

            let mut sorted_overdue = overdue.clone();
            sorted_overdue.sort_by_key(|d| {
                (priority_value(&d.priority()), -self.days_overdue(d))
            });

            for doc in &sorted_overdue {
                writeln!(
                    report,
                    "| {} | {} | {} | {} | {} | {} |",
                    doc.path,
                    doc.doc_type.as_str(),
                    doc.owner.as_deref().unwrap_or("N/A"),
                    doc.review_due_date.map(|d| d.to_string()).unwrap_or_else(|| "N/A".to_string()),
                    self.days_overdue(doc),
                    doc.priority(),
                )
                .ok();
            }
            report.push('\n');
        }

        let all_docs = self.storage().search_documents("", &DocumentFilter::default())?;
        let no_owner: Vec<&Document> = all_docs.iter().filter(|d| d.owner.is_none()).collect();

        if !no_owner.is_empty() {
            writeln!(report, "### Documents Without Owners ({})\n", no_owner.len()).ok();
            for doc in &no_owner {
                writeln!(report, "- {} ({})", doc.path, doc.doc_type.as_str()).ok();
            }
            report.push('\n');
        }

        writeln!(report, "## Review Statistics by Document Type\n").ok();
        report.push_str("| Document Type | Total | With Owner | Reviewed | Due Soon |\n");
        report.push_str("|---------------|-------|------------|----------|----------|\n");

        let mut stats: BTreeMap<String, TypeStats> = BTreeMap::new();
        for doc in &all_docs {
            let entry = stats.entry(doc.doc_type.as_str().to_string()).or_insert(TypeStats {
                total: 0,
                with_owner: 0,
                reviewed: 0,
                due_soon: 0,
            });
            entry.total += 1;
            if doc.owner.is_some() {
                entry.with_owner += 1;
            }
            if review_due.iter().any(|d| d.id == doc.id) {
                entry.due_soon += 1;
            }
            if !self.get_review_history(doc.id)?.is_empty() {
                entry.reviewed += 1;
            }
        }

        for (doc_type, s) in &stats {
            writeln!(
                report,
                "| {} | {} | {} | {} | {} |",
                doc_type, s.total, s.with_owner, s.reviewed, s.due_soon
            )
            .ok();
        }
        report.push('\n');

        Ok(report)
    }

    fn generate_csv_report(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str(
            "Document Path,Type,State,Owner,Reviewer,Review Due Date,Days Overdue,Priority,Last Reviewed,Review Count\n",
        );

        let review_due = self.check_review_due(None, false)?;

        for doc in &review_due {
            let history = self.get_review_history(doc.id)?;
            let last_reviewed = history
                .first()
                .map(|r| r.reviewed_at.to_rfc3339())
                .unwrap_or_else(|| "Never".to_string());
            let days_overdue = if self.is_overdue(doc) { self.days_overdue(doc) } else { 0 };

            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{}",
                csv_escape(&doc.path),
                doc.doc_type.as_str(),
                doc.state,
                csv_escape(doc.owner.as_deref().unwrap_or("N/A")),
                csv_escape(doc.reviewer.as_deref().unwrap_or("N/A")),
                doc.review_due_date.map(|d| d.to_string()).unwrap_or_else(|| "N/A".to_string()),
                days_overdue,
                doc.priority(),
                csv_escape(&last_reviewed),
                history.len(),
            )
            .ok();
        }

        Ok(out)
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
