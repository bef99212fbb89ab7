//! Export formatting — renders an extracted invoice as canonical JSON or a
//! human-readable Markdown document, plus the download naming convention.

pub mod json;
pub mod markdown;

pub use json::to_json;
pub use markdown::to_markdown;

/// Export formats offered for a successfully extracted invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

/// Download file name: the original name's stem prefixed with `txinvoice_`,
/// with the format's extension. An extension-less original keeps its full
/// name as the stem.
pub fn export_file_name(original_name: &str, format: ExportFormat) -> String {
    let stem = match original_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original_name,
    };
    format!("txinvoice_{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_last_extension_only() {
        assert_eq!(
            export_file_name("hoadon.scan.jpg", ExportFormat::Json),
            "txinvoice_hoadon.scan.json"
        );
    }

    #[test]
    fn file_name_without_extension_keeps_full_stem() {
        assert_eq!(
            export_file_name("hoadon", ExportFormat::Markdown),
            "txinvoice_hoadon.md"
        );
    }

    #[test]
    fn file_name_with_leading_dot_keeps_full_name() {
        // ".env"-style names have an empty stem; keep the whole name.
        assert_eq!(
            export_file_name(".hidden", ExportFormat::Json),
            "txinvoice_.hidden.json"
        );
    }
}
