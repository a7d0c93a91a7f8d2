//! Classifier: split flattened entries into attributes and series
//!
//! The top-level `timestamp` sequence anchors the time axis and is never
//! classified itself.

use serde_json::Value;
use tracing::{debug, warn};

use super::error::PipelineError;
use super::flatten::FlatMap;
use super::path::FlatPath;
use super::value::FlatValue;

/// Reserved top-level key holding the sample timestamps
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Result of classification, each list in encounter order
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Scalar entries, shown in the attribute table
    pub attributes: Vec<FlatPath>,
    /// Sequence entries eligible for plotting
    pub series: Vec<FlatPath>,
    /// Sequences rejected because their length differs from `timestamp`
    pub misaligned: Vec<FlatPath>,
    pub timestamp_count: usize,
}

fn is_timestamp(path: &FlatPath) -> bool {
    path.depth() == 1 && path.first() == TIMESTAMP_KEY
}

/// The raw `timestamp` sequence, which must exist and be non-empty
pub fn timestamp_sequence(flat: &FlatMap) -> Result<&[Value], PipelineError> {
    match flat.get_path(&FlatPath::root(TIMESTAMP_KEY)) {
        Some(FlatValue::Sequence(items)) if !items.is_empty() => Ok(items),
        _ => Err(PipelineError::MissingTimestamp),
    }
}

/// Partition flattened entries.
///
/// With `require_aligned_length`, a sequence only becomes a series when
/// its length equals the timestamp count; others land in `misaligned`.
pub fn classify(flat: &FlatMap, require_aligned_length: bool) -> Result<Classification, PipelineError> {
    let timestamp_count = timestamp_sequence(flat)?.len();
    let mut out = Classification {
        timestamp_count,
        ..Default::default()
    };

    for (path, value) in flat.iter() {
        if is_timestamp(path) {
            continue;
        }
        match value {
            FlatValue::Scalar(_) => out.attributes.push(path.clone()),
            FlatValue::Sequence(items) => {
                if require_aligned_length && items.len() != timestamp_count {
                    warn!(
                        key = %path.join(flat.separator()),
                        len = items.len(),
                        timestamp_count,
                        "Sequence length differs from timestamp count, skipped"
                    );
                    out.misaligned.push(path.clone());
                } else {
                    out.series.push(path.clone());
                }
            }
        }
    }

    debug!(
        attributes = out.attributes.len(),
        series = out.series.len(),
        misaligned = out.misaligned.len(),
        timestamp_count,
        "Classified entries"
    );
    Ok(out)
}
