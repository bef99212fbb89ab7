//! Transport-agnostic application state.
//!
//! `CoreState` is the single shared state behind the HTTP API: the current
//! file selection, the current batch's result collection, and the preview
//! store that owns every live preview. Wrapped in `Arc` at startup.
//!
//! The result collection is the only shared mutable resource of the batch
//! flow and is replaced wholesale at exactly two points — once with pending
//! placeholders when a batch starts, once with the settled outcomes — never
//! mutated slot by slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use thiserror::Error;

use crate::pipeline::batch::{BatchSnapshot, ProcessedResult};
use crate::pipeline::ingest::UploadedFile;
use crate::pipeline::preview::PreviewStore;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("state lock poisoned")]
    LockPoisoned,
}

pub struct CoreState {
    /// Accumulated file selection. New uploads append; clear empties it.
    selection: RwLock<Vec<UploadedFile>>,
    /// Current batch results (pending or settled).
    results: RwLock<Vec<ProcessedResult>>,
    /// True between batch start and final publication.
    processing: AtomicBool,
    /// Batch-level error slot; never fed by per-file failures.
    global_error: RwLock<Option<String>>,
    /// Owns every live preview handle.
    previews: PreviewStore,
}

impl CoreState {
    pub fn new() -> Self {
        Self {
            selection: RwLock::new(Vec::new()),
            results: RwLock::new(Vec::new()),
            processing: AtomicBool::new(false),
            global_error: RwLock::new(None),
            previews: PreviewStore::new(),
        }
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    // ── Selection ───────────────────────────────────────────

    /// Append newly accepted files — a deliberate accumulation policy:
    /// selecting more files extends the batch instead of replacing it.
    pub fn append_selection(&self, files: Vec<UploadedFile>) -> Result<(), CoreError> {
        let mut selection = self.selection.write().map_err(|_| CoreError::LockPoisoned)?;
        selection.extend(files);
        Ok(())
    }

    pub fn selection(&self) -> Result<Vec<UploadedFile>, CoreError> {
        let selection = self.selection.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(selection.clone())
    }

    /// Clear the selection and the result collection, releasing every
    /// preview the state holds. This is the user-facing "clear all" and the
    /// teardown path.
    pub fn clear_selection(&self) -> Result<(), CoreError> {
        {
            let mut selection = self.selection.write().map_err(|_| CoreError::LockPoisoned)?;
            selection.clear();
        }
        {
            let mut results = self.results.write().map_err(|_| CoreError::LockPoisoned)?;
            results.clear();
        }
        *self.global_error.write().map_err(|_| CoreError::LockPoisoned)? = None;
        self.processing.store(false, Ordering::SeqCst);
        self.previews.revoke_all();
        Ok(())
    }

    // ── Batch lifecycle ─────────────────────────────────────

    /// Publish pending placeholders and mark the batch in flight.
    pub fn begin_batch(&self, pending: Vec<ProcessedResult>) -> Result<(), CoreError> {
        {
            let mut results = self.results.write().map_err(|_| CoreError::LockPoisoned)?;
            *results = pending;
        }
        *self.global_error.write().map_err(|_| CoreError::LockPoisoned)? = None;
        self.processing.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Publish the settled outcomes wholesale and mark the batch done.
    pub fn publish_results(&self, settled: Vec<ProcessedResult>) -> Result<(), CoreError> {
        {
            let mut results = self.results.write().map_err(|_| CoreError::LockPoisoned)?;
            *results = settled;
        }
        self.processing.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Record a batch-level failure (not attributable to a single file).
    pub fn set_global_error(&self, message: String) -> Result<(), CoreError> {
        *self.global_error.write().map_err(|_| CoreError::LockPoisoned)? = Some(message);
        self.processing.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Result<BatchSnapshot, CoreError> {
        let results = self.results.read().map_err(|_| CoreError::LockPoisoned)?;
        let global_error = self.global_error.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(BatchSnapshot {
            processing: self.is_processing(),
            global_error: global_error.clone(),
            results: results.clone(),
        })
    }

    /// Look up one result by id (export path).
    pub fn result(&self, id: uuid::Uuid) -> Result<Option<ProcessedResult>, CoreError> {
        let results = self.results.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(results.iter().find(|r| r.id == id).cloned())
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::batch::pending_results;

    fn uploaded(state: &CoreState, name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.into(),
            mime_type: "image/png".into(),
            size_bytes: 1,
            base64_data: "YQ==".into(),
            preview: state.previews().register("image/png", vec![1]),
        }
    }

    #[test]
    fn selection_accumulates_across_appends() {
        let state = CoreState::new();
        let first = uploaded(&state, "a.png");
        let second = uploaded(&state, "b.png");
        state.append_selection(vec![first]).unwrap();
        state.append_selection(vec![second]).unwrap();
        let selection = state.selection().unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection[0].file_name, "a.png");
        assert_eq!(selection[1].file_name, "b.png");
    }

    #[test]
    fn clear_revokes_previews_and_drops_results() {
        let state = CoreState::new();
        let file = uploaded(&state, "a.png");
        let preview = file.preview;
        state.append_selection(vec![file]).unwrap();

        let pending = pending_results(&state.selection().unwrap());
        state.begin_batch(pending).unwrap();

        state.clear_selection().unwrap();
        assert!(state.selection().unwrap().is_empty());
        assert!(state.snapshot().unwrap().results.is_empty());
        assert!(state.previews().get(preview).is_none());
    }

    #[test]
    fn batch_lifecycle_replaces_results_wholesale() {
        let state = CoreState::new();
        let file = uploaded(&state, "a.png");
        state.append_selection(vec![file]).unwrap();

        let pending = pending_results(&state.selection().unwrap());
        let id = pending[0].id;
        state.begin_batch(pending).unwrap();
        assert!(state.is_processing());
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.results.len(), 1);
        assert!(snapshot.results[0].is_pending());

        let settled = vec![snapshot.results[0].clone().failed("lỗi".into())];
        state.publish_results(settled).unwrap();
        assert!(!state.is_processing());
        let result = state.result(id).unwrap().unwrap();
        assert_eq!(result.error.as_deref(), Some("lỗi"));
    }

    #[test]
    fn begin_batch_resets_global_error() {
        let state = CoreState::new();
        state.set_global_error("hỏng".into()).unwrap();
        assert_eq!(state.snapshot().unwrap().global_error.as_deref(), Some("hỏng"));
        state.begin_batch(vec![]).unwrap();
        assert!(state.snapshot().unwrap().global_error.is_none());
    }

    #[test]
    fn unknown_result_id_is_none() {
        let state = CoreState::new();
        assert!(state.result(uuid::Uuid::new_v4()).unwrap().is_none());
    }
}
