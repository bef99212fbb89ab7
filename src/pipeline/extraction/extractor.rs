//! `InvoiceExtractor` — one image in, one normalized record out.
//!
//! Composes the fixed instruction prompt, an injected [`VisionModel`], and
//! the response parser. Exactly one attempt per call; every failure maps to
//! a single descriptive [`ExtractionError`].

use std::sync::Arc;
use std::time::Instant;

use super::error::ExtractionError;
use super::gemini::VisionModel;
use super::parser::parse_invoice_response;
use super::prompt::INVOICE_EXTRACTION_PROMPT;
use crate::models::InvoiceRecord;

pub struct InvoiceExtractor {
    model: Arc<dyn VisionModel>,
}

impl InvoiceExtractor {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// Extract the structured record from one base64-encoded invoice image.
    pub async fn extract(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<InvoiceRecord, ExtractionError> {
        let start = Instant::now();

        let raw = self
            .model
            .generate(INVOICE_EXTRACTION_PROMPT, image_base64, mime_type)
            .await?;

        let record = parse_invoice_response(&raw)?;

        tracing::info!(
            mime_type,
            elapsed_ms = %start.elapsed().as_millis(),
            line_items = record.line_items.as_ref().map(Vec::len).unwrap_or(0),
            "Invoice extraction complete"
        );

        Ok(record)
    }
}
