//! High-level orchestration: document registration, transitions, lineage,
//! and archival.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use doclife_core::content_hash::compute_file_hash;
use doclife_core::document::{Document, DocumentBuilder};
use doclife_core::enums::{DocumentState, DocumentType};
use doclife_core::filter::DocumentFilter;
use doclife_core::relationship::{Relationship, infer_relationship_type};
use doclife_storage::Storage;

use crate::error::{LifecycleError, Result};
use crate::frontmatter::extract_frontmatter;
use crate::path_hints::extract_path_hints;
use crate::state_machine::StateMachine;

/// Orchestrates document registration and lifecycle transitions against a
/// [`Storage`] backend, mirroring the reference `DocumentLifecycleManager`.
pub struct LifecycleManager<S: Storage> {
    storage: Arc<S>,
    archive_dir: PathBuf,
    state_machine: StateMachine<S>,
}

impl<S: Storage> LifecycleManager<S> {
    pub fn new(storage: Arc<S>, archive_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let archive_dir = archive_dir.into();
        std::fs::create_dir_all(&archive_dir)?;
        let state_machine = StateMachine::new(storage.clone());
        Ok(Self { storage, archive_dir, state_machine })
    }

    pub fn state_machine(&self) -> &StateMachine<S> {
        &self.state_machine
    }

    pub fn state_machine_mut(&mut self) -> &mut StateMachine<S> {
        &mut self.state_machine
    }

    /// Registers a new document, extracting metadata from the file at `path`
    /// (YAML frontmatter, path-derived hints, content hash) and merging it
    /// with `metadata_override` at the highest precedence. Infers and
    /// creates relationships from a `related_docs` metadata entry.
    pub fn register_document(
        &self,
        path: &Path,
        doc_type: DocumentType,
        author: &str,
        metadata_override: Option<serde_json::Value>,
    ) -> Result<Document> {
        let path_str = path.to_string_lossy().to_string();

        let content = std::fs::read_to_string(path).ok();
        let frontmatter = content.as_deref().map(extract_frontmatter).unwrap_or(serde_json::Value::Null);
        let path_hints = extract_path_hints(&path_str);
        let content_hash = compute_file_hash(path).ok().flatten();

        let mut metadata = serde_json::json!({});
        merge_path_hints(&mut metadata, &path_hints);
        merge_json(&mut metadata, &frontmatter);
        if let Some(override_meta) = &metadata_override {
            merge_json(&mut metadata, override_meta);
        }
        if let Some(hash) = &content_hash {
            metadata["content_hash"] = serde_json::Value::String(hash.clone());
        }

        let owner = string_field(&metadata, "owner");
        let reviewer = string_field(&metadata, "reviewer");
        let feature = string_field(&metadata, "feature");
        let epic = metadata.get("epic").and_then(|v| v.as_i64());
        let story = string_field(&metadata, "story");

        let mut builder = DocumentBuilder::new(path_str, doc_type).author(author).metadata(metadata.clone());
        if let Some(o) = owner {
            builder = builder.owner(o);
        }
        if let Some(r) = reviewer {
            builder = builder.reviewer(r);
        }
        if let Some(f) = feature {
            builder = builder.feature(f);
        }
        if let Some(e) = epic {
            builder = builder.epic(e);
        }
        if let Some(s) = story {
            builder = builder.story(s);
        }
        if let Some(hash) = content_hash {
            builder = builder.content_hash(hash);
        }

        let document = builder.build();
        let id = self.storage.create_document(&document)?;
        let mut document = self.storage.get_document(id)?;

        if let Some(related) = metadata.get("related_docs").and_then(|v| v.as_array()) {
            self.create_relationships(&document, related);
            document = self.storage.get_document(id)?;
        }

        Ok(document)
    }

    fn create_relationships(&self, document: &Document, related_docs: &[serde_json::Value]) {
        for related_path in related_docs.iter().filter_map(|v| v.as_str()) {
            let Ok(related_doc) = self.storage.get_document_by_path(related_path) else {
                continue;
            };

            let rel_type = infer_relationship_type(related_doc.doc_type, document.doc_type);
            let _ = self
                .storage
                .add_relationship(&Relationship::new(related_doc.id, document.id, rel_type));
        }
    }

    /// Delegates to the state machine for transition validation and audit
    /// recording.
    pub fn transition_state(
        &self,
        doc_id: i64,
        new_state: DocumentState,
        reason: Option<&str>,
        changed_by: Option<&str>,
    ) -> Result<Document> {
        let document = self.storage.get_document(doc_id)?;
        self.state_machine.transition(&document, new_state, reason, changed_by)
    }

    /// The currently-active document of `doc_type`, optionally scoped to
    /// `feature`.
    pub fn get_current_document(
        &self,
        doc_type: DocumentType,
        feature: Option<&str>,
    ) -> Result<Option<Document>> {
        match feature {
            Some(feature) => Ok(self.storage.get_active_document(doc_type, feature)?),
            None => {
                let filter = DocumentFilter {
                    doc_type: Some(doc_type),
                    state: Some(DocumentState::Active),
                    ..Default::default()
                };
                let mut docs = self.storage.search_documents("", &filter)?;
                Ok(if docs.is_empty() { None } else { Some(docs.remove(0)) })
            }
        }
    }

    /// Ancestors (first-parent-wins walk to the root) and descendants
    /// (depth-first) of a document, each cycle-guarded with a visited set.
    pub fn get_document_lineage(&self, doc_id: i64) -> Result<(Vec<Document>, Vec<Document>)> {
        let mut ancestors = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut current_id = Some(doc_id);

        while let Some(id) = current_id {
            if !visited.insert(id) {
                break;
            }
            let parents = self.get_parent_documents(id)?;
            match parents.into_iter().next() {
                Some(parent) => {
                    current_id = Some(parent.id);
                    ancestors.push(parent);
                }
                None => break,
            }
        }

        let mut descendants = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut stack = vec![doc_id];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            for child in self.get_child_documents(id)? {
                stack.push(child.id);
                descendants.push(child);
            }
        }

        Ok((ancestors, descendants))
    }

    fn get_parent_documents(&self, doc_id: i64) -> Result<Vec<Document>> {
        let rels = self.storage.get_parent_relationships(doc_id)?;
        let mut docs = Vec::with_capacity(rels.len());
        for rel in rels {
            docs.push(self.storage.get_document(rel.parent_id)?);
        }
        Ok(docs)
    }

    fn get_child_documents(&self, doc_id: i64) -> Result<Vec<Document>> {
        let rels = self.storage.get_child_relationships(doc_id)?;
        let mut docs = Vec::with_capacity(rels.len());
        for rel in rels {
            docs.push(self.storage.get_document(rel.child_id)?);
        }
        Ok(docs)
    }

    /// Moves the document's file into the archive directory (preserving its
    /// relative structure), transitions it to `Archived`, and updates its
    /// path. Proceeds even if the filesystem move fails -- the registry row
    /// still updates, matching the reference implementation's tolerance for
    /// a missing or locked source file.
    pub fn archive_document(&self, doc_id: i64) -> Result<PathBuf> {
        let document = self.storage.get_document(doc_id)?;
        if document.state == DocumentState::Archived {
            return Err(LifecycleError::AlreadyArchived(doc_id));
        }

        let source_path = Path::new(&document.path);
        let archive_path = if source_path.is_absolute() {
            self.archive_dir.join(source_path.file_name().unwrap_or_default())
        } else {
            self.archive_dir.join(source_path)
        };

        if let Some(parent) = archive_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        if source_path.exists() {
            if std::fs::rename(source_path, &archive_path).is_err()
                && std::fs::copy(source_path, &archive_path).is_ok()
            {
                let _ = std::fs::remove_file(source_path);
            }
        }

        self.state_machine.transition(
            &document,
            DocumentState::Archived,
            Some("Archived by system"),
            Some("system"),
        )?;

        let archive_path_str = archive_path.to_string_lossy().to_string();
        if archive_path_str != document.path {
            self.storage.update_document(
                doc_id,
                &doclife_storage::DocumentUpdates {
                    path: Some(archive_path_str),
                    ..Default::default()
                },
            )?;
        }

        Ok(archive_path)
    }

    pub fn query_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        Ok(self.storage.search_documents("", filter)?)
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(str::to_owned)
}

fn merge_path_hints(metadata: &mut serde_json::Value, hints: &crate::path_hints::PathHints) {
    if let Some(feature) = &hints.feature {
        metadata["feature"] = serde_json::Value::String(feature.clone());
    }
    if let Some(epic) = hints.epic {
        metadata["epic"] = serde_json::Value::Number(epic.into());
    }
    if let Some(story) = &hints.story {
        metadata["story"] = serde_json::Value::String(story.clone());
    }
}

/// Shallow object merge: keys in `overlay` take precedence over `base`.
fn merge_json(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    let (Some(base_obj), Some(overlay_obj)) = (base.as_object_mut(), overlay.as_object()) else {
        return;
    };
    for (key, value) in overlay_obj {
        base_obj.insert(key.clone(), value.clone());
    }
}
