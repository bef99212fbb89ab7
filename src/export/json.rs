//! Canonical JSON export: pretty-printed with 2-space indentation, key order
//! following the record's field declaration order, absent fields omitted.

use crate::models::InvoiceRecord;

/// Render the record as pretty JSON. Pure and deterministic — identical
/// input yields byte-identical output.
pub fn to_json(record: &InvoiceRecord) -> String {
    // serde_json preserves struct field order; to_string_pretty uses
    // 2-space indentation. InvoiceRecord serialization cannot fail.
    serde_json::to_string_pretty(record).expect("InvoiceRecord serializes infallibly")
}
