//! Byte-budgeted summaries and out-of-band blob payloads.
//!
//! A summary is the UI-safe preview of a value: a JSON tree bounded in
//! rendered size, plus a blob map carrying any large payloads that were
//! extracted to keep the inline part small. Container adapters share one
//! budgeting pass: measure every element's rendered summary, derive how
//! many elements fit inside the budget, and keep only those.

use serde::Serialize;
use std::collections::BTreeMap;

/// Out-of-band payloads keyed by content identifier.
pub type BlobMap = BTreeMap<String, Vec<u8>>;

/// A size-bounded summary plus the blobs its entries reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryOutput {
    pub summary: serde_json::Value,
    pub blobs: BlobMap,
}

impl SummaryOutput {
    /// A summary with no out-of-band payloads.
    pub fn inline(summary: serde_json::Value) -> Self {
        SummaryOutput {
            summary,
            blobs: BlobMap::new(),
        }
    }
}

/// Byte ceiling applied to a container's inline summary, process-wide.
pub const SUMMARY_BUDGET_BYTES: usize = 131_072;

/// Per-element overhead added to the measured summary size, accounting
/// for array separators.
const ELEMENT_OVERHEAD_BYTES: usize = 2;

/// Strings longer than this are moved to the blob map by the scalar
/// summarizer, leaving a truncated preview inline.
pub(crate) const TEXT_BLOB_THRESHOLD: usize = 4096;

/// Length of the inline preview kept for a blobbed string, in characters.
pub(crate) const TEXT_PREVIEW_CHARS: usize = 256;

/// Assemble a container summary from per-element summaries under the
/// byte budget.
///
/// `length` is the container's true element count and is always reported
/// verbatim, even when the summary list is truncated. The number of
/// retained elements is `max(budget / (max element size + overhead), 1)`:
/// a non-empty container always surfaces at least one example element,
/// so the budget is best-effort, not a hard ceiling. Only the retained
/// elements' blobs are merged, in iteration order, last write winning on
/// colliding identifiers.
pub(crate) fn budgeted_summary(
    per_element: Vec<(serde_json::Value, BlobMap)>,
    length: usize,
) -> SummaryOutput {
    if per_element.is_empty() {
        return SummaryOutput::inline(serde_json::json!({
            "length": length,
            "summary": [],
        }));
    }

    let max_element_bytes = per_element
        .iter()
        .map(|(summary, _)| summary.to_string().len())
        .max()
        .unwrap_or(0);
    let per_element_bytes = max_element_bytes + ELEMENT_OVERHEAD_BYTES;
    let retained = (SUMMARY_BUDGET_BYTES / per_element_bytes).max(1);

    let mut summaries = Vec::new();
    let mut blobs = BlobMap::new();
    for (summary, element_blobs) in per_element.into_iter().take(retained) {
        summaries.push(summary);
        blobs.extend(element_blobs);
    }

    SummaryOutput {
        summary: serde_json::json!({
            "length": length,
            "summary": summaries,
        }),
        blobs,
    }
}
