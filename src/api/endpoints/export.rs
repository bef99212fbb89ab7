//! Export endpoint — download one result as JSON or Markdown.
//!
//! The download is named after the originating file:
//! `txinvoice_<stem>.json` / `txinvoice_<stem>.md`.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::export::{self, ExportFormat};

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: String,
}

/// `GET /api/extractions/{id}/export?format=json|markdown`
pub async fn download(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = parse_format(&query.format)?;

    let result = ctx
        .core
        .result(id)?
        .ok_or_else(|| ApiError::NotFound("Không tìm thấy kết quả trích xuất.".into()))?;

    let record = result.record.as_ref().ok_or_else(|| {
        ApiError::Conflict("Tệp này chưa có dữ liệu trích xuất để tải về.".into())
    })?;

    let content = match format {
        ExportFormat::Json => export::to_json(record),
        ExportFormat::Markdown => export::to_markdown(record),
    };
    let file_name = export::export_file_name(&result.file_name, format);

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ascii_file_name(&file_name)),
            ),
        ],
        content,
    )
        .into_response())
}

fn parse_format(raw: &str) -> Result<ExportFormat, ApiError> {
    match raw {
        "json" => Ok(ExportFormat::Json),
        "markdown" | "md" => Ok(ExportFormat::Markdown),
        other => Err(ApiError::BadRequest(format!(
            "Định dạng không được hỗ trợ: {other}. Chọn 'json' hoặc 'markdown'."
        ))),
    }
}

/// Header values must stay ASCII; non-ASCII name characters degrade to '_'.
fn ascii_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_accepts_both_spellings_of_markdown() {
        assert_eq!(parse_format("markdown").unwrap(), ExportFormat::Markdown);
        assert_eq!(parse_format("md").unwrap(), ExportFormat::Markdown);
        assert_eq!(parse_format("json").unwrap(), ExportFormat::Json);
        assert!(parse_format("xlsx").is_err());
    }

    #[test]
    fn ascii_file_name_degrades_non_ascii() {
        assert_eq!(ascii_file_name("txinvoice_hoadon.json"), "txinvoice_hoadon.json");
        assert_eq!(ascii_file_name("txinvoice_hóa đơn.md"), "txinvoice_h_a __n.md");
        assert_eq!(ascii_file_name("a\"b.json"), "a_b.json");
    }
}
