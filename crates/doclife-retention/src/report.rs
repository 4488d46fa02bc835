//! Retention compliance reporting, grouped by document type.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use doclife_core::document::Document;
use doclife_core::enums::DocumentState;
use doclife_core::filter::DocumentFilter;
use doclife_storage::Storage;

use crate::action::{Action, ArchivalAction};
use crate::engine::RetentionEngine;
use crate::error::Result;

pub enum ReportFormat {
    Markdown,
    Csv,
}

impl<S: Storage> RetentionEngine<S> {
    pub fn generate_retention_report(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Markdown => self.generate_markdown_report(),
            ReportFormat::Csv => self.generate_csv_report(),
        }
    }

    fn action_for(&self, doc: &Document) -> Option<ArchivalAction> {
        match doc.state {
            DocumentState::Obsolete => Some(self.evaluate_archival(doc)),
            DocumentState::Archived => Some(self.evaluate_deletion(doc)),
            _ => None,
        }
    }

    fn all_documents(&self) -> Result<Vec<Document>> {
        Ok(self.storage().search_documents("", &DocumentFilter::default())?)
    }

    fn generate_markdown_report(&self) -> Result<String> {
        let all_docs = match self.all_documents() {
            Ok(docs) => docs,
            Err(_) => {
                return Ok(
                    "# Document Retention Policy Report\n\nError: Could not query documents.\n"
                        .to_string(),
                );
            }
        };

        let mut report = String::new();
        writeln!(report, "# Document Retention Policy Report\n").ok();

        let mut by_type: BTreeMap<String, Vec<&Document>> = BTreeMap::new();
        for doc in &all_docs {
            by_type.entry(doc.doc_type.as_str().to_string()).or_default().push(doc);
        }

        let mut total_actions = 0usize;

        for (doc_type, docs) in &by_type {
            writeln!(report, "## {} ({} documents)\n", doc_type.to_uppercase(), docs.len()).ok();

            match self.get_policy(doc_type) {
                Some(policy) => {
                    writeln!(
                        report,
                        "**Policy Configuration:**\n- Obsolete to Archive: {} days{}\n- Archive Retention: {} days{}\n- Delete After Archive: {}\n- Compliance Tags: {}\n",
                        policy.obsolete_to_archive,
                        if policy.obsolete_to_archive == -1 { " (never)" } else { "" },
                        policy.archive_retention,
                        if policy.archive_retention == -1 { " (forever)" } else { "" },
                        if policy.delete_after_archive { "Yes" } else { "No" },
                        if policy.compliance_tags.is_empty() {
                            "None".to_string()
                        } else {
                            policy.compliance_tags.join(", ")
                        }
                    )
                    .ok();
                }
                None => {
                    writeln!(report, "**Policy:** No retention policy configured\n").ok();
                }
            }

            let pending: Vec<ArchivalAction> = docs
                .iter()
                .filter_map(|d| self.action_for(d))
                .filter(|a| a.action != Action::None)
                .collect();

            if pending.is_empty() {
                writeln!(report, "**Status:** All documents compliant with retention policy.\n")
                    .ok();
            } else {
                writeln!(report, "**Pending Actions:**\n").ok();
                for action in &pending {
                    writeln!(report, "- `{}`", action.document.path).ok();
                    writeln!(report, "  - Action: **{}**", action.action.as_str().to_uppercase())
                        .ok();
                    writeln!(report, "  - Reason: {}", action.reason).ok();
                    writeln!(report, "  - State: {}", action.document.state).ok();
                    let tags = action.document.tags();
                    if !tags.is_empty() {
                        writeln!(report, "  - Tags: {}", tags.join(", ")).ok();
                    }
                    report.push('\n');
                }
            }

            report.push_str("---\n\n");
            total_actions += pending.len();
        }

        writeln!(report, "## Summary\n").ok();
        writeln!(report, "- Total Documents: {}", all_docs.len()).ok();
        writeln!(report, "- Pending Actions: {total_actions}").ok();
        writeln!(report, "- Document Types: {}", by_type.len()).ok();

        Ok(report)
    }

    fn generate_csv_report(&self) -> Result<String> {
        let all_docs = match self.all_documents() {
            Ok(docs) => docs,
            Err(_) => return Ok("error,Could not query documents\n".to_string()),
        };

        let mut out = String::new();
        out.push_str("Path,Type,State,Created,Modified,Action,Reason,Days Until Action,Compliance Tags\n");

        for doc in &all_docs {
            let action = self.action_for(doc).unwrap_or_else(|| {
                ArchivalAction::none(doc.clone(), "Not obsolete or archived")
            });
            let tags = doc.tags().join(", ");

            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{}",
                csv_escape(&doc.path),
                doc.doc_type.as_str(),
                doc.state,
                doc.created_at.to_rfc3339(),
                doc.modified_at.to_rfc3339(),
                action.action.as_str(),
                csv_escape(&action.reason),
                action.days_until_action,
                csv_escape(&tags),
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
