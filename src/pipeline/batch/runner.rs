//! Batch Orchestrator — fans N uploaded files out to concurrent extraction
//! calls and folds the outcomes back into their pre-assigned result slots.
//!
//! All calls are launched together with no concurrency cap, no timeout and
//! no cancellation; the join waits for the slowest. Each call's outcome is
//! attached only to its own slot — a failing file never affects a sibling.

use std::time::Instant;

use futures_util::future::join_all;

use super::types::ProcessedResult;
use crate::pipeline::extraction::InvoiceExtractor;
use crate::pipeline::ingest::UploadedFile;

/// Materialize one pending slot per file, ids assigned before any
/// extraction begins. Slot order is file order and never changes.
pub fn pending_results(files: &[UploadedFile]) -> Vec<ProcessedResult> {
    files.iter().map(ProcessedResult::pending).collect()
}

/// Run every extraction concurrently and settle all slots. Returns exactly
/// `files.len()` results, in the same order as `pending`.
pub async fn run_batch(
    files: &[UploadedFile],
    pending: Vec<ProcessedResult>,
    extractor: &InvoiceExtractor,
) -> Vec<ProcessedResult> {
    debug_assert_eq!(files.len(), pending.len());
    let start = Instant::now();

    let outcomes = join_all(
        files
            .iter()
            .map(|file| extractor.extract(&file.base64_data, &file.mime_type)),
    )
    .await;

    let results: Vec<ProcessedResult> = pending
        .into_iter()
        .zip(outcomes)
        .map(|(slot, outcome)| match outcome {
            Ok(record) => slot.completed(record),
            Err(e) => {
                tracing::warn!(file = %slot.file_name, error = %e, "Invoice extraction failed");
                slot.failed(e.to_string())
            }
        })
        .collect();

    tracing::info!(
        files = results.len(),
        failed = results.iter().filter(|r| r.error.is_some()).count(),
        elapsed_ms = %start.elapsed().as_millis(),
        "Batch extraction settled"
    );

    results
}
