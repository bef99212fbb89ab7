//! Types for the batch fan-out: per-file result slots and the snapshot the
//! HTTP layer serves.

use serde::Serialize;
use uuid::Uuid;

use crate::models::InvoiceRecord;
use crate::pipeline::ingest::UploadedFile;
use crate::pipeline::preview::PreviewId;

/// The per-file outcome slot. Created pending at batch submission with a
/// stable id, mutated exactly once to a terminal state: exactly one of
/// `record` / `error` is populated after completion, neither while pending.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedResult {
    pub id: Uuid,
    pub file_name: String,
    pub preview: PreviewId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<InvoiceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessedResult {
    /// A pending slot for one uploaded file. The id is assigned here, before
    /// any extraction begins, so UI placeholders are stable.
    pub fn pending(file: &UploadedFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file.file_name.clone(),
            preview: file.preview,
            record: None,
            error: None,
        }
    }

    pub fn completed(mut self, record: InvoiceRecord) -> Self {
        self.record = Some(record);
        self.error = None;
        self
    }

    pub fn failed(mut self, error: String) -> Self {
        self.error = Some(error);
        self.record = None;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.record.is_none() && self.error.is_none()
    }
}

/// Point-in-time view of the current batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSnapshot {
    pub processing: bool,
    /// Batch-level error not attributable to any single file. Never
    /// populated by per-file failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_error: Option<String>,
    pub results: Vec<ProcessedResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preview::PreviewStore;

    fn uploaded(name: &str) -> UploadedFile {
        let previews = PreviewStore::new();
        UploadedFile {
            file_name: name.into(),
            mime_type: "image/png".into(),
            size_bytes: 8,
            base64_data: "aW1n".into(),
            preview: previews.register("image/png", vec![1]),
        }
    }

    #[test]
    fn pending_slot_has_neither_record_nor_error() {
        let slot = ProcessedResult::pending(&uploaded("a.png"));
        assert!(slot.is_pending());
        assert_eq!(slot.file_name, "a.png");
    }

    #[test]
    fn completion_populates_exactly_one_side() {
        let ok = ProcessedResult::pending(&uploaded("a.png")).completed(InvoiceRecord::default());
        assert!(ok.record.is_some() && ok.error.is_none());

        let failed = ProcessedResult::pending(&uploaded("b.png")).failed("lỗi mạng".into());
        assert!(failed.record.is_none() && failed.error.as_deref() == Some("lỗi mạng"));
    }

    #[test]
    fn pending_ids_are_unique() {
        let file = uploaded("a.png");
        let a = ProcessedResult::pending(&file);
        let b = ProcessedResult::pending(&file);
        assert_ne!(a.id, b.id);
    }
}
