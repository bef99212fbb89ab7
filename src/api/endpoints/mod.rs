//! API endpoint handlers.
//!
//! One module per feature of the upload-extract-export flow.

pub mod export;
pub mod extractions;
pub mod health;
pub mod previews;
pub mod selection;
