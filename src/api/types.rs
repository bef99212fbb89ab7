//! Shared types for the API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::core_state::CoreState;
use crate::pipeline::batch::{BatchSnapshot, ProcessedResult};
use crate::pipeline::extraction::InvoiceExtractor;
use crate::pipeline::ingest::UploadedFile;

/// Shared context for all API routes: the application state plus the
/// extraction capability (injectable, so tests run without the network).
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub extractor: Arc<InvoiceExtractor>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>, extractor: Arc<InvoiceExtractor>) -> Self {
        Self { core, extractor }
    }
}

// ═══════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════

/// One selected file as shown in the selection list.
#[derive(Debug, Serialize)]
pub struct SelectionEntry {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub preview_url: String,
}

impl From<&UploadedFile> for SelectionEntry {
    fn from(file: &UploadedFile) -> Self {
        Self {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            size_bytes: file.size_bytes,
            preview_url: format!("/api/previews/{}", file.preview),
        }
    }
}

/// One per-file result as rendered by the UI.
#[derive(Debug, Serialize)]
pub struct ResultEntry {
    pub id: uuid::Uuid,
    pub file_name: String,
    pub preview_url: String,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<crate::models::InvoiceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Pending,
    Completed,
    Failed,
}

impl From<&ProcessedResult> for ResultEntry {
    fn from(result: &ProcessedResult) -> Self {
        let status = if result.record.is_some() {
            ResultStatus::Completed
        } else if result.error.is_some() {
            ResultStatus::Failed
        } else {
            ResultStatus::Pending
        };
        Self {
            id: result.id,
            file_name: result.file_name.clone(),
            preview_url: format!("/api/previews/{}", result.preview),
            status,
            record: result.record.clone(),
            error: result.error.clone(),
        }
    }
}

/// Snapshot of the current batch for polling clients.
#[derive(Debug, Serialize)]
pub struct ExtractionsResponse {
    pub processing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_error: Option<String>,
    pub results: Vec<ResultEntry>,
}

impl From<BatchSnapshot> for ExtractionsResponse {
    fn from(snapshot: BatchSnapshot) -> Self {
        Self {
            processing: snapshot.processing,
            global_error: snapshot.global_error,
            results: snapshot.results.iter().map(ResultEntry::from).collect(),
        }
    }
}
