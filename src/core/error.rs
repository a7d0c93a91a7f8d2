//! Error types for the flattening pipeline
//!
//! Structural problems abort the whole document. Empty results (no
//! attributes, no series, an all-null group) are not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Root is not a single JSON object, or two paths flatten to the same key
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// No top-level `timestamp` array, or the array is empty
    #[error("document has no usable `timestamp` array")]
    MissingTimestamp,

    #[error("cannot build a time axis from an empty timestamp sequence")]
    EmptyTimestamp,

    #[error("timestamp at index {index} is not a number")]
    NonNumericTimestamp { index: usize },

    /// Series key with a single path segment has no group to belong to
    #[error("series `{key}` has no group segment")]
    UngroupableKey { key: String },

    #[error("malformed upload: {reason}")]
    MalformedUpload { reason: String },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput { reason: reason.into() }
    }
}
