//! Selection endpoints — add files, list the selection, clear it.
//!
//! Adding files runs ingestion: every file is validated independently,
//! rejections come back as one aggregated multi-line message, and accepted
//! files append to (never replace) the current selection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SelectionEntry};
use crate::pipeline::ingest::{ingest_files, RawUpload};

#[derive(Deserialize)]
pub struct AddFilesRequest {
    pub files: Vec<RawUpload>,
}

#[derive(Serialize)]
pub struct AddFilesResponse {
    pub accepted: Vec<SelectionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
    pub selection_count: usize,
}

/// `POST /api/selection/files` — validate, decode and append new files.
pub async fn add_files(
    State(ctx): State<ApiContext>,
    Json(payload): Json<AddFilesRequest>,
) -> Result<Json<AddFilesResponse>, ApiError> {
    let outcome = ingest_files(ctx.core.previews(), payload.files).await;

    let accepted: Vec<SelectionEntry> = outcome.accepted.iter().map(SelectionEntry::from).collect();
    let rejection_message = outcome.rejection_message();

    tracing::info!(
        accepted = accepted.len(),
        rejected = outcome.rejections.len(),
        "Selection upload processed"
    );

    ctx.core.append_selection(outcome.accepted)?;
    let selection_count = ctx.core.selection()?.len();

    Ok(Json(AddFilesResponse {
        accepted,
        rejection_message,
        selection_count,
    }))
}

#[derive(Serialize)]
pub struct SelectionResponse {
    pub files: Vec<SelectionEntry>,
}

/// `GET /api/selection`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<SelectionResponse>, ApiError> {
    let files = ctx
        .core
        .selection()?
        .iter()
        .map(SelectionEntry::from)
        .collect();
    Ok(Json(SelectionResponse { files }))
}

/// `DELETE /api/selection` — clear everything and release every preview.
pub async fn clear(State(ctx): State<ApiContext>) -> Result<StatusCode, ApiError> {
    ctx.core.clear_selection()?;
    tracing::info!("Selection cleared");
    Ok(StatusCode::NO_CONTENT)
}
