//! Batch extraction endpoints — start a batch over the current selection,
//! poll its snapshot.
//!
//! Starting a batch publishes pending placeholders first (stable ids, so
//! the UI can render slots immediately), then settles every file
//! concurrently in a background task and publishes the final set wholesale.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ExtractionsResponse};
use crate::pipeline::batch::{pending_results, run_batch};

/// `POST /api/extractions` — start extracting the current selection.
pub async fn start(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<ExtractionsResponse>), ApiError> {
    if ctx.core.is_processing() {
        return Err(ApiError::Conflict(
            "Đang xử lý lô hóa đơn hiện tại. Vui lòng đợi hoàn tất.".into(),
        ));
    }

    let files = ctx.core.selection()?;
    if files.is_empty() {
        return Err(ApiError::BadRequest(
            "Vui lòng chọn ít nhất một tệp ảnh hóa đơn.".into(),
        ));
    }

    let pending = pending_results(&files);
    ctx.core.begin_batch(pending.clone())?;
    tracing::info!(files = files.len(), "Batch extraction started");

    // Snapshot before spawning so the response always shows pending slots.
    let snapshot = ctx.core.snapshot()?;

    let core = ctx.core.clone();
    let extractor = ctx.extractor.clone();
    tokio::spawn(async move {
        let settled = run_batch(&files, pending, &extractor).await;
        if let Err(e) = core.publish_results(settled) {
            tracing::error!(error = %e, "Failed to publish batch results");
        }
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot.into())))
}

/// `GET /api/extractions` — current batch snapshot (pending or settled).
pub async fn snapshot(
    State(ctx): State<ApiContext>,
) -> Result<Json<ExtractionsResponse>, ApiError> {
    let snapshot = ctx.core.snapshot()?;
    Ok(Json(snapshot.into()))
}
