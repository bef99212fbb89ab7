//! Extraction-specific error types.
//!
//! Display strings are user-facing and therefore in Vietnamese — they travel
//! unchanged into the per-file result slot the UI renders. Credential
//! problems are kept distinct from generic failures so the UI can point the
//! user at configuration instead of the invoice photo.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No credential configured — detected before any network call.
    #[error("API Key chưa được cấu hình. Vui lòng kiểm tra biến môi trường GEMINI_API_KEY.")]
    MissingApiKey,

    /// The remote service rejected the configured credential.
    #[error("API Key không hợp lệ. Vui lòng kiểm tra lại.")]
    InvalidApiKey,

    /// Transport-level failure (connect, timeout, TLS, ...).
    #[error("Không thể trích xuất dữ liệu: {0}")]
    Http(String),

    /// Non-success HTTP status from the remote service.
    #[error("Không thể trích xuất dữ liệu: mã lỗi {status}: {body}")]
    Api { status: u16, body: String },

    /// The response contained no text to parse.
    #[error("Không thể trích xuất dữ liệu: phản hồi rỗng từ mô hình.")]
    EmptyResponse,

    /// The response text was not the promised JSON shape.
    #[error("Không thể trích xuất dữ liệu: {0}")]
    ResponseParsing(String),
}
