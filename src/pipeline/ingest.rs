//! Image Ingestion — turns raw file selections into transportable uploads.
//!
//! Each file is validated and decoded independently; one bad file never
//! blocks its siblings. Rejection reasons are accumulated for the whole
//! batch and reported together as one multi-line message. Accepted files
//! carry a clean base64 payload plus a registered preview handle.

use base64::Engine as _;
use futures_util::future::join_all;
use serde::Deserialize;

use super::preview::{PreviewId, PreviewStore};

/// Per-file size cap: 5 MiB.
const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the extraction model accepts.
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// One raw selection as submitted by the client: a file name plus either a
/// base64 data URL (`data:image/jpeg;base64,...`) or raw base64.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUpload {
    pub name: String,
    pub data: String,
}

/// An accepted, decoded file ready for extraction.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// Clean base64 payload (no data-URL prefix) as sent to the model.
    pub base64_data: String,
    /// Revocable display handle; released by the owning state, exactly once.
    pub preview: PreviewId,
}

/// Outcome of ingesting one batch of selections.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub accepted: Vec<UploadedFile>,
    pub rejections: Vec<String>,
}

impl IngestOutcome {
    /// The aggregated form-level message, one rejection per line.
    pub fn rejection_message(&self) -> Option<String> {
        if self.rejections.is_empty() {
            None
        } else {
            Some(self.rejections.join("\n"))
        }
    }
}

/// Validate and decode every selection, concurrently and independently.
/// Accepted files keep their submission order.
pub async fn ingest_files(previews: &PreviewStore, uploads: Vec<RawUpload>) -> IngestOutcome {
    let results = join_all(
        uploads
            .into_iter()
            .map(|upload| async move { ingest_one(previews, upload).await }),
    )
    .await;

    let mut outcome = IngestOutcome::default();
    for result in results {
        match result {
            Ok(file) => outcome.accepted.push(file),
            Err(reason) => outcome.rejections.push(reason),
        }
    }
    outcome
}

async fn ingest_one(previews: &PreviewStore, upload: RawUpload) -> Result<UploadedFile, String> {
    let name = upload.name;
    let (declared_mime, payload) = split_data_url(&upload.data);

    // Rule 1: declared MIME type must be one the model accepts.
    if let Some(mime) = declared_mime {
        if !ALLOWED_MIME_TYPES.contains(&mime) {
            return Err(format!(
                "{name}: Loại tệp không hợp lệ. Chỉ chấp nhận JPG, PNG, WEBP."
            ));
        }
    }

    // Rule 2: size cap, computed from the payload before decoding.
    if decoded_len_estimate(payload) > MAX_FILE_BYTES {
        return Err(format!("{name}: Kích thước tệp quá lớn (tối đa 5MB)."));
    }

    // Rule 3: the payload must actually decode to non-empty image bytes.
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| {
            tracing::debug!(file = %name, error = %e, "Base64 decode failed");
            format!("{name}: Không thể đọc dữ liệu ảnh.")
        })?;
    if bytes.is_empty() {
        return Err(format!("{name}: Không thể đọc dữ liệu ảnh."));
    }

    // The magic bytes are authoritative over the declared type.
    let mime_type = match sniff_mime(&bytes) {
        Some(mime) => mime.to_string(),
        None => {
            return Err(format!(
                "{name}: Loại tệp không hợp lệ. Chỉ chấp nhận JPG, PNG, WEBP."
            ))
        }
    };

    let size_bytes = bytes.len();
    let base64_data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    let preview = previews.register(&mime_type, bytes);

    Ok(UploadedFile {
        file_name: name,
        mime_type,
        size_bytes,
        base64_data,
        preview,
    })
}

/// Split `data:<mime>;base64,<payload>` into its parts. Raw base64 input
/// yields no declared MIME.
fn split_data_url(data: &str) -> (Option<&str>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, data),
    }
}

/// Decoded size of a base64 payload without decoding it.
fn decoded_len_estimate(payload: &str) -> usize {
    let trimmed = payload.trim();
    let padding = trimmed.chars().rev().take_while(|&c| c == '=').count();
    ((trimmed.len() / 4) * 3).saturating_sub(padding.min(2))
}

/// Identify the image type from its magic bytes (JPEG, PNG, WEBP).
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
        Some("image/jpeg")
    } else if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
