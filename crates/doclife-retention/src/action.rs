//! The outcome of evaluating a single document against retention policy.

use doclife_core::document::Document;

/// What the retention engine proposes (or did) to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Archive,
    Delete,
    None,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Archive => "archive",
            Action::Delete => "delete",
            Action::None => "none",
        }
    }
}

/// A proposed or executed retention action for a document.
#[derive(Debug, Clone)]
pub struct ArchivalAction {
    pub document: Document,
    pub action: Action,
    pub reason: String,
    /// Days until the action becomes due; `0` = now, `-1` = never.
    pub days_until_action: i64,
}

impl ArchivalAction {
    pub fn none(document: Document, reason: impl Into<String>) -> Self {
        Self { document, action: Action::None, reason: reason.into(), days_until_action: -1 }
    }
}
