//! Preview endpoint — serves a registered preview image by handle.
//!
//! A revoked handle is a 404: the reference is dead once released.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `GET /api/previews/{id}`
pub async fn fetch(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let preview = ctx
        .core
        .previews()
        .get(id)
        .ok_or_else(|| ApiError::NotFound("Không tìm thấy ảnh xem trước.".into()))?;

    Ok(([(header::CONTENT_TYPE, preview.mime_type)], preview.bytes).into_response())
}
