//! Document lifecycle state machine: transition validation and audit trail.
//!
//! Valid transitions: `Draft -> {Active, Archived}`, `Active -> {Obsolete,
//! Archived}`, `Obsolete -> Archived`, `Archived` is terminal. Enforced by
//! [`doclife_core::enums::DocumentState::allowed_next_states`]; this module
//! adds the transition *contract* around it: reason requirements, the
//! single-active-per-(type, feature) business rule, hooks, and the audit
//! trail.

use std::sync::Arc;

use doclife_core::document::Document;
use doclife_core::enums::{DocumentState, DocumentType};
use doclife_core::transition::StateTransition;
use doclife_storage::{DocumentUpdates, Storage, StorageError, Transaction};

use crate::error::{LifecycleError, Result};

type BeforeHook = dyn Fn(&Document, DocumentState) -> std::result::Result<(), String> + Send + Sync;
type AfterHook = dyn Fn(&Document, DocumentState, DocumentState) + Send + Sync;

/// Enforces lifecycle transition rules against a [`Storage`] backend.
///
/// Hooks are an idiomatic Rust rendition of the reference implementation's
/// `register_before_hook`/`register_after_hook` callable lists: before-hooks
/// can veto a transition by returning `Err`, after-hooks observe a completed
/// one for side effects.
pub struct StateMachine<S: Storage> {
    storage: Arc<S>,
    before_hooks: Vec<Box<BeforeHook>>,
    after_hooks: Vec<Box<AfterHook>>,
}

impl<S: Storage> StateMachine<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
        }
    }

    pub fn register_before_hook(
        &mut self,
        hook: impl Fn(&Document, DocumentState) -> std::result::Result<(), String> + Send + Sync + 'static,
    ) {
        self.before_hooks.push(Box::new(hook));
    }

    pub fn register_after_hook(
        &mut self,
        hook: impl Fn(&Document, DocumentState, DocumentState) + Send + Sync + 'static,
    ) {
        self.after_hooks.push(Box::new(hook));
    }

    pub fn clear_hooks(&mut self) {
        self.before_hooks.clear();
        self.after_hooks.clear();
    }

    pub fn can_transition(&self, from_state: DocumentState, to_state: DocumentState) -> bool {
        from_state.allowed_next_states().contains(&to_state)
    }

    pub fn is_terminal_state(&self, state: DocumentState) -> bool {
        state.is_terminal()
    }

    pub fn get_valid_transitions(&self, from_state: DocumentState) -> Vec<DocumentState> {
        from_state.allowed_next_states()
    }

    /// Ordered most-recent-first (see [`Transaction`] and the `document_transitions`
    /// schema note on `changed_at` precision).
    pub fn get_transition_history(&self, document_id: i64) -> Result<Vec<StateTransition>> {
        Ok(self.storage.get_transitions(document_id)?)
    }

    /// Executes a validated state transition:
    /// 1. validates the transition is allowed,
    /// 2. requires a non-empty reason for `Obsolete`/`Archived` targets,
    /// 3. runs before-hooks (any `Err` aborts the transition),
    /// 4. enforces single-active-per-(type, feature) when activating,
    /// 5. updates document state,
    /// 6. records the audit row,
    /// 7. runs after-hooks.
    ///
    /// Steps 4-6 run inside a single [`Storage::run_in_transaction`] call: a
    /// failure partway through must not leave a document's state changed
    /// without a matching audit row.
    pub fn transition(
        &self,
        document: &Document,
        to_state: DocumentState,
        reason: Option<&str>,
        changed_by: Option<&str>,
    ) -> Result<Document> {
        let from_state = document.state;

        if !self.can_transition(from_state, to_state) {
            return Err(LifecycleError::InvalidTransition {
                document_id: document.id,
                from: from_state,
                to: to_state,
            });
        }

        let requires_reason = matches!(to_state, DocumentState::Obsolete | DocumentState::Archived);
        if requires_reason && reason.map(str::trim).unwrap_or("").is_empty() {
            return Err(LifecycleError::ReasonRequired(to_state));
        }

        for hook in &self.before_hooks {
            hook(document, to_state).map_err(LifecycleError::HookRejected)?;
        }

        let document_id = document.id;
        let doc_type = document.doc_type;
        let feature = document.feature.clone();
        let changed_by = changed_by.unwrap_or("system").to_owned();
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("No reason provided")
            .to_owned();

        self.storage.run_in_transaction(&|tx| {
            if to_state == DocumentState::Active {
                enforce_single_active_tx(tx, document_id, doc_type, feature.as_deref())?;
            }

            tx.update_document(
                document_id,
                &DocumentUpdates {
                    state: Some(to_state),
                    ..Default::default()
                },
            )?;

            tx.record_transition(&StateTransition::new(
                document_id,
                from_state,
                to_state,
                reason.clone(),
                changed_by.clone(),
            ))?;

            Ok(())
        })?;

        let updated = self.storage.get_document(document_id)?;

        for hook in &self.after_hooks {
            hook(&updated, from_state, to_state);
        }

        Ok(updated)
    }
}

/// When activating a document with a `feature`, demotes any other currently-active
/// document of the same type+feature to `Obsolete`. Runs inside the caller's
/// transaction so the demotion commits atomically with the primary transition.
fn enforce_single_active_tx(
    tx: &dyn Transaction,
    document_id: i64,
    doc_type: DocumentType,
    feature: Option<&str>,
) -> std::result::Result<(), StorageError> {
    let Some(feature) = feature else {
        return Ok(());
    };

    if let Some(active) = tx.get_active_document(doc_type, feature)? {
        if active.id != document_id {
            tx.update_document(
                active.id,
                &DocumentUpdates {
                    state: Some(DocumentState::Obsolete),
                    ..Default::default()
                },
            )?;

            tx.record_transition(&StateTransition::new(
                active.id,
                DocumentState::Active,
                DocumentState::Obsolete,
                format!("Replaced by document {document_id}"),
                "system",
            ))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::document::DocumentBuilder;
    use doclife_core::enums::DocumentType;
    use doclife_storage::SqliteStore;
    use std::sync::Mutex;

    fn make_store() -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open_in_memory().unwrap())
    }

    #[test]
    fn allows_draft_to_active() {
        let machine: StateMachine<SqliteStore> = StateMachine::new(make_store());
        assert!(machine.can_transition(DocumentState::Draft, DocumentState::Active));
        assert!(!machine.can_transition(DocumentState::Archived, DocumentState::Active));
    }

    #[test]
    fn archived_is_terminal() {
        let machine: StateMachine<SqliteStore> = StateMachine::new(make_store());
        assert!(machine.is_terminal_state(DocumentState::Archived));
        assert!(!machine.is_terminal_state(DocumentState::Draft));
    }

    #[test]
    fn transition_requires_reason_for_obsolete() {
        let store = make_store();
        let machine = StateMachine::new(store.clone());

        let mut doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        doc.state = DocumentState::Active;
        let id = store.create_document(&doc).unwrap();
        doc.id = id;

        let err = machine.transition(&doc, DocumentState::Obsolete, None, None).unwrap_err();
        assert!(matches!(err, LifecycleError::ReasonRequired(_)));
    }

    #[test]
    fn invalid_transition_is_rejected() {
        let store = make_store();
        let machine = StateMachine::new(store.clone());

        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document(&doc).unwrap();
        let mut doc = doc;
        doc.id = id;
        doc.state = DocumentState::Archived;

        let err = machine
            .transition(&doc, DocumentState::Active, Some("reason"), None)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn activating_document_demotes_previous_active() {
        let store = make_store();
        let machine = StateMachine::new(store.clone());

        let mut old_active = DocumentBuilder::new("docs/old.md", DocumentType::Prd)
            .feature("auth")
            .build();
        old_active.state = DocumentState::Active;
        let old_id = store.create_document(&old_active).unwrap();

        let mut new_doc = DocumentBuilder::new("docs/new.md", DocumentType::Prd)
            .feature("auth")
            .build();
        let new_id = store.create_document(&new_doc).unwrap();
        new_doc.id = new_id;

        machine
            .transition(&new_doc, DocumentState::Active, Some("approved"), Some("alice"))
            .unwrap();

        let old_after = store.get_document(old_id).unwrap();
        assert_eq!(old_after.state, DocumentState::Obsolete);

        let history = store.get_transitions(old_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].to_state, DocumentState::Obsolete);
    }

    #[test]
    fn before_hook_can_veto_transition() {
        let store = make_store();
        let mut machine = StateMachine::new(store.clone());
        machine.register_before_hook(|_doc, to_state| {
            if to_state == DocumentState::Active {
                Err("not approved".to_owned())
            } else {
                Ok(())
            }
        });

        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document(&doc).unwrap();
        let mut doc = doc;
        doc.id = id;

        let err = machine
            .transition(&doc, DocumentState::Active, Some("approved"), None)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::HookRejected(_)));
    }

    #[test]
    fn after_hook_observes_completed_transition() {
        let store = make_store();
        let mut machine = StateMachine::new(store.clone());
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        machine.register_after_hook(move |doc, from, to| {
            *seen_clone.lock().unwrap() = Some((doc.id, from, to));
        });

        let doc = DocumentBuilder::new("docs/a.md", DocumentType::Prd).build();
        let id = store.create_document(&doc).unwrap();
        let mut doc = doc;
        doc.id = id;

        machine
            .transition(&doc, DocumentState::Active, Some("approved"), None)
            .unwrap();

        let observed = seen.lock().unwrap().clone().unwrap();
        assert_eq!(observed, (id, DocumentState::Draft, DocumentState::Active));
    }
}
