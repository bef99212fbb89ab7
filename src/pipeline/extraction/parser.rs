//! Normalizes the model's raw text response into an [`InvoiceRecord`].
//!
//! The model is asked for bare JSON but sometimes wraps its output in a
//! fenced code block (optionally language-tagged). Exactly one level of
//! fencing is stripped before parsing; already-bare JSON passes through
//! untouched. Parsing is typed — a response whose fields have the wrong
//! shape becomes a descriptive error instead of corrupt data — except for
//! line-item rows, which are parsed leniently one by one so a single
//! malformed row does not sink the rest of the invoice.

use std::sync::OnceLock;

use regex::Regex;

use super::error::ExtractionError;
use crate::models::{InvoiceRecord, LineItem};

const LINE_ITEMS_KEY: &str = "danhSachHangHoaDichVu";

/// Parse the trimmed, possibly-fenced response text into a record.
pub fn parse_invoice_response(response: &str) -> Result<InvoiceRecord, ExtractionError> {
    let json_str = strip_code_fence(response.trim());

    let mut value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

    // Detach the line-item array before the typed parse so its rows can be
    // handled leniently.
    let raw_items = match value.get_mut(LINE_ITEMS_KEY) {
        Some(v) if v.is_array() => Some(v.take()),
        _ => None,
    };

    let mut record: InvoiceRecord = serde_json::from_value(value)
        .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

    if let Some(serde_json::Value::Array(rows)) = raw_items {
        record.line_items = Some(parse_rows_lenient(rows));
    }

    Ok(record)
}

/// Parse line-item rows one by one, skipping rows that fail to deserialize.
fn parse_rows_lenient(rows: Vec<serde_json::Value>) -> Vec<LineItem> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed invoice line item");
                None
            }
        })
        .collect()
}

/// Strip exactly one level of ``` fencing, with or without a language tag.
/// Unfenced input is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("fence regex compiles")
    });
    match fence.captures(text) {
        Some(caps) => caps.get(2).map(|m| m.as_str().trim()).unwrap_or(text),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
  "tenDonViBan": "Công ty TNHH ABC",
  "soHoaDon": "0000123",
  "ngayLap": "01/06/2024",
  "danhSachHangHoaDichVu": [
    {"stt": 1, "tenHangHoaDichVu": "Bút", "soLuong": 2, "donGia": 5000, "thanhTien": 10000, "thueSuat": "10%"}
  ],
  "congTienHang": 10000,
  "tienThueGTGT": 1000,
  "tongCongThanhToan": 11000
}"#;

    // ── fence stripping ──

    #[test]
    fn strips_language_tagged_fence() {
        let fenced = format!("```json\n{SAMPLE_JSON}\n```");
        assert_eq!(strip_code_fence(&fenced), SAMPLE_JSON);
    }

    #[test]
    fn strips_untagged_fence() {
        let fenced = format!("```\n{SAMPLE_JSON}\n```");
        assert_eq!(strip_code_fence(&fenced), SAMPLE_JSON);
    }

    #[test]
    fn bare_json_passes_through() {
        assert_eq!(strip_code_fence(SAMPLE_JSON), SAMPLE_JSON);
    }

    #[test]
    fn fence_stripping_is_idempotent() {
        let fenced = format!("```json\n{SAMPLE_JSON}\n```");
        let once = strip_code_fence(&fenced);
        assert_eq!(strip_code_fence(once), once);
    }

    #[test]
    fn fenced_and_bare_parse_to_equal_records() {
        let fenced = format!("```json\n{SAMPLE_JSON}\n```");
        let a = parse_invoice_response(&fenced).unwrap();
        let b = parse_invoice_response(SAMPLE_JSON).unwrap();
        assert_eq!(a, b);
    }

    // ── typed parsing ──

    #[test]
    fn parses_full_record() {
        let record = parse_invoice_response(SAMPLE_JSON).unwrap();
        assert_eq!(record.invoice_number.as_deref(), Some("0000123"));
        assert_eq!(record.subtotal, Some(10000.0));
        assert_eq!(record.line_items.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let padded = format!("\n  {SAMPLE_JSON}  \n");
        assert!(parse_invoice_response(&padded).is_ok());
    }

    #[test]
    fn non_json_response_is_a_parse_error() {
        let err = parse_invoice_response("Xin lỗi, tôi không đọc được hóa đơn này.").unwrap_err();
        assert!(matches!(err, ExtractionError::ResponseParsing(_)));
    }

    #[test]
    fn wrong_field_type_is_a_parse_error() {
        let err = parse_invoice_response(r#"{"congTienHang": "mười nghìn"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::ResponseParsing(_)));
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let response = r#"{
            "danhSachHangHoaDichVu": [
                {"tenHangHoaDichVu": "Bút", "thanhTien": 10000},
                {"tenHangHoaDichVu": "Thiếu thành tiền"},
                {"tenHangHoaDichVu": "Vở", "thanhTien": 24000}
            ]
        }"#;
        let record = parse_invoice_response(response).unwrap();
        let items = record.line_items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Bút");
        assert_eq!(items[1].name, "Vở");
    }

    #[test]
    fn null_line_item_list_stays_none() {
        let record = parse_invoice_response(r#"{"danhSachHangHoaDichVu": null}"#).unwrap();
        assert!(record.line_items.is_none());
    }
}
