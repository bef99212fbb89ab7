//! The normalized result of extracting one Vietnamese VAT invoice image.
//!
//! Field names on the wire are the Vietnamese keys the extraction model is
//! instructed to produce; struct declaration order is the canonical key
//! order for JSON export. Every field is optional — an invoice photo may be
//! missing any of them — except a line item's name and line total.

use serde::{Deserialize, Serialize};

/// One extracted invoice. No identity of its own; identity is carried by
/// the originating file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Seller unit name.
    #[serde(rename = "tenDonViBan", skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    /// Seller tax code.
    #[serde(rename = "maSoThueNguoiBan", skip_serializing_if = "Option::is_none")]
    pub seller_tax_code: Option<String>,
    /// Seller address.
    #[serde(rename = "diaChiNguoiBan", skip_serializing_if = "Option::is_none")]
    pub seller_address: Option<String>,
    /// Invoice number.
    #[serde(rename = "soHoaDon", skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Template symbol, e.g. `01GTKT0/001`.
    #[serde(rename = "kyHieuMauHoaDon", skip_serializing_if = "Option::is_none")]
    pub template_symbol: Option<String>,
    /// Series symbol, e.g. `AA/23E`.
    #[serde(rename = "kyHieuHoaDon", skip_serializing_if = "Option::is_none")]
    pub series_symbol: Option<String>,
    /// Issue date as printed, `DD/MM/YYYY`.
    #[serde(rename = "ngayLap", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    /// Buyer unit name.
    #[serde(rename = "tenDonViMua", skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    /// Buyer tax code.
    #[serde(rename = "maSoThueNguoiMua", skip_serializing_if = "Option::is_none")]
    pub buyer_tax_code: Option<String>,
    /// Buyer address.
    #[serde(rename = "diaChiNguoiMua", skip_serializing_if = "Option::is_none")]
    pub buyer_address: Option<String>,
    /// Payment method, e.g. `TM`, `CK`.
    #[serde(rename = "hinhThucThanhToan", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Ordered goods/services rows.
    #[serde(
        rename = "danhSachHangHoaDichVu",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_items: Option<Vec<LineItem>>,
    /// Subtotal before VAT.
    #[serde(rename = "congTienHang", skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    /// Total VAT amount.
    #[serde(rename = "tienThueGTGT", skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<f64>,
    /// Grand total including VAT.
    #[serde(rename = "tongCongThanhToan", skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<f64>,
    /// Amount in words.
    #[serde(rename = "soTienVietBangChu", skip_serializing_if = "Option::is_none")]
    pub amount_in_words: Option<String>,
    /// Free-text note.
    #[serde(rename = "ghiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl InvoiceRecord {
    /// True when none of the three seller fields is present.
    pub fn seller_section_empty(&self) -> bool {
        self.seller_name.is_none() && self.seller_tax_code.is_none() && self.seller_address.is_none()
    }

    /// True when none of the three buyer fields is present.
    pub fn buyer_section_empty(&self) -> bool {
        self.buyer_name.is_none() && self.buyer_tax_code.is_none() && self.buyer_address.is_none()
    }
}

/// One goods/services row. `line_total` is trusted verbatim from the
/// extraction source — it is never re-derived from `quantity × unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Row ordinal as printed. Falls back to the 1-based position when absent.
    #[serde(rename = "stt", skip_serializing_if = "Option::is_none", default)]
    pub ordinal: Option<Ordinal>,
    /// Goods/services name.
    #[serde(rename = "tenHangHoaDichVu")]
    pub name: String,
    /// Unit of measure.
    #[serde(rename = "donViTinh", skip_serializing_if = "Option::is_none", default)]
    pub unit: Option<String>,
    /// Quantity.
    #[serde(rename = "soLuong", skip_serializing_if = "Option::is_none", default)]
    pub quantity: Option<f64>,
    /// Unit price in VND.
    #[serde(rename = "donGia", skip_serializing_if = "Option::is_none", default)]
    pub unit_price: Option<f64>,
    /// Line total in VND.
    #[serde(rename = "thanhTien")]
    pub line_total: f64,
    /// VAT rate as printed — `10%`, `5%`, `KCT`, ...
    #[serde(rename = "thueSuat", skip_serializing_if = "Option::is_none", default)]
    pub tax_rate: Option<String>,
}

/// The `stt` column arrives as either a string or a number depending on the
/// invoice layout and the model's mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ordinal {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Ordinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Whole-number ordinals print without a decimal point.
            Ordinal::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Ordinal::Number(n) => write!(f, "{n}"),
            Ordinal::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_vietnamese_keys() {
        let json = r#"{
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
        let record: InvoiceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.seller_name.as_deref(), Some("Công ty TNHH ABC"));
        assert_eq!(record.invoice_number.as_deref(), Some("0000123"));
        let items = record.line_items.as_ref().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bút");
        assert_eq!(items[0].line_total, 10000.0);
        assert_eq!(record.grand_total, Some(11000.0));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let record: InvoiceRecord = serde_json::from_str("{}").unwrap();
        assert!(record.invoice_number.is_none());
        assert!(record.line_items.is_none());
        assert!(record.seller_section_empty());
        assert!(record.buyer_section_empty());
    }

    #[test]
    fn null_fields_deserialize_as_none() {
        let record: InvoiceRecord =
            serde_json::from_str(r#"{"soHoaDon": null, "ghiChu": null}"#).unwrap();
        assert!(record.invoice_number.is_none());
        assert!(record.note.is_none());
    }

    #[test]
    fn none_fields_are_omitted_on_serialize() {
        let record = InvoiceRecord {
            invoice_number: Some("001".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"soHoaDon":"001"}"#);
    }

    #[test]
    fn ordinal_accepts_string_or_number() {
        let text: Ordinal = serde_json::from_str(r#""2a""#).unwrap();
        assert_eq!(text, Ordinal::Text("2a".into()));
        let num: Ordinal = serde_json::from_str("3").unwrap();
        assert_eq!(num, Ordinal::Number(3.0));
    }

    #[test]
    fn ordinal_display_trims_whole_numbers() {
        assert_eq!(Ordinal::Number(3.0).to_string(), "3");
        assert_eq!(Ordinal::Number(1.5).to_string(), "1.5");
        assert_eq!(Ordinal::Text("II".into()).to_string(), "II");
    }

    #[test]
    fn line_item_requires_name_and_total() {
        let missing_total = r#"{"tenHangHoaDichVu": "Bút"}"#;
        assert!(serde_json::from_str::<LineItem>(missing_total).is_err());
        let missing_name = r#"{"thanhTien": 10000}"#;
        assert!(serde_json::from_str::<LineItem>(missing_name).is_err());
    }

    #[test]
    fn seller_section_empty_requires_all_three_absent() {
        let record = InvoiceRecord {
            seller_address: Some("Hà Nội".into()),
            ..Default::default()
        };
        assert!(!record.seller_section_empty());
    }
}
