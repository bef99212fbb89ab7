//! Markdown export — a fixed-order, human-readable rendering of one invoice.
//!
//! Section order: general info, seller, buyer, line-item table, totals,
//! note. Seller/buyer sections disappear entirely when all their fields are
//! absent; individual absent fields are omitted, never rendered blank.
//! Rendering is pure: identical records yield byte-identical documents.

use std::fmt::Write as _;

use crate::models::{InvoiceRecord, LineItem};

/// Render the record as a Markdown document.
pub fn to_markdown(record: &InvoiceRecord) -> String {
    let mut md = String::new();
    md.push_str("# Thông Tin Hóa Đơn TxInvoice\n\n");

    md.push_str("## Thông Tin Chung\n");
    push_field(&mut md, "Số hóa đơn", record.invoice_number.as_deref());
    push_field(&mut md, "Ký hiệu mẫu HĐ", record.template_symbol.as_deref());
    push_field(&mut md, "Ký hiệu HĐ", record.series_symbol.as_deref());
    push_field(&mut md, "Ngày lập", record.issue_date.as_deref());
    push_field(
        &mut md,
        "Hình thức thanh toán",
        record.payment_method.as_deref(),
    );
    md.push('\n');

    if !record.seller_section_empty() {
        md.push_str("## Thông Tin Bên Bán\n");
        push_field(&mut md, "Tên đơn vị", record.seller_name.as_deref());
        push_field(&mut md, "Mã số thuế", record.seller_tax_code.as_deref());
        push_field(&mut md, "Địa chỉ", record.seller_address.as_deref());
        md.push('\n');
    }

    if !record.buyer_section_empty() {
        md.push_str("## Thông Tin Bên Mua\n");
        push_field(&mut md, "Tên đơn vị", record.buyer_name.as_deref());
        push_field(&mut md, "Mã số thuế", record.buyer_tax_code.as_deref());
        push_field(&mut md, "Địa chỉ", record.buyer_address.as_deref());
        md.push('\n');
    }

    if let Some(items) = record.line_items.as_deref().filter(|i| !i.is_empty()) {
        md.push_str("## Chi Tiết Hàng Hóa/Dịch Vụ\n");
        md.push_str(
            "| STT | Tên Hàng Hóa/Dịch Vụ | ĐVT | Số Lượng | Đơn Giá | Thành Tiền | Thuế Suất |\n",
        );
        md.push_str("|---|---|---|---|---|---|---|\n");
        for (index, item) in items.iter().enumerate() {
            md.push_str(&render_row(item, index));
        }
        md.push('\n');
    }

    md.push_str("## Tổng Cộng\n");
    push_money(&mut md, "Cộng tiền hàng (trước thuế)", record.subtotal);
    push_money(&mut md, "Tiền thuế GTGT", record.vat_amount);
    push_money(&mut md, "Tổng cộng thanh toán", record.grand_total);
    push_field(
        &mut md,
        "Số tiền viết bằng chữ",
        record.amount_in_words.as_deref(),
    );
    md.push('\n');

    if let Some(note) = record.note.as_deref().filter(|n| !n.is_empty()) {
        md.push_str("## Ghi Chú\n");
        md.push_str(note);
        md.push('\n');
    }

    md
}

fn push_field(md: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        let _ = writeln!(md, "- **{label}:** {value}");
    }
}

fn push_money(md: &mut String, label: &str, amount: Option<f64>) {
    if let Some(amount) = amount {
        let _ = writeln!(md, "- **{label}:** {}", format_currency(amount));
    }
}

/// One table row. Empty cells collapse to `| |` rather than padding.
fn render_row(item: &LineItem, index: usize) -> String {
    let ordinal = match &item.ordinal {
        Some(o) => o.to_string(),
        None => (index + 1).to_string(),
    };
    let cells = [
        ordinal,
        item.name.clone(),
        item.unit.clone().unwrap_or_default(),
        item.quantity.map(format_number).unwrap_or_default(),
        item.unit_price.map(format_currency).unwrap_or_default(),
        format_currency(item.line_total),
        item.tax_rate.clone().unwrap_or_default(),
    ];
    let mut row = String::new();
    for cell in &cells {
        row.push_str("| ");
        if !cell.is_empty() {
            row.push_str(cell);
            row.push(' ');
        }
    }
    row.push_str("|\n");
    row
}

/// Monetary rendering: vi-VN grouped number plus the currency suffix.
pub fn format_currency(amount: f64) -> String {
    format!("{} VND", format_number(amount))
}

/// vi-VN number formatting: `.` as thousands separator, `,` as decimal
/// separator, at most three fraction digits (rounded, trailing zeros
/// dropped) — the `toLocaleString('vi-VN')` convention.
pub fn format_number(value: f64) -> String {
    let negative = value < 0.0;
    // Scale to milli-units so rounding carry propagates into the integer part.
    let scaled = (value.abs() * 1000.0).round() as i128;
    let int_part = scaled / 1000;
    let frac_part = (scaled % 1000) as u32;

    let mut out = String::new();
    if negative && scaled != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if frac_part != 0 {
        let frac = format!("{frac_part:03}");
        out.push(',');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

fn group_thousands(mut n: i128) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push((n % 1000) as u16);
        n /= 1000;
    }
    let mut out = groups.pop().map(|g| g.to_string()).unwrap_or_default();
    while let Some(g) = groups.pop() {
        let _ = write!(out, ".{g:03}");
    }
    out
}
