//! Pipeline configuration
//!
//! Every policy point of the pipeline lives here so callers pick it
//! explicitly. Deserialises from JSON with all fields optional.

use serde::{Deserialize, Serialize};

use super::path::DEFAULT_SEPARATOR;

/// What to do with a series whose key has a single path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UngroupedSeriesPolicy {
    /// Fail the document with `UngroupableKey`
    #[default]
    Reject,
    /// Leave the series out and list it in the diagnostics
    Drop,
}

/// Which path segment labels a nested attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeLabeling {
    /// Second segment for nested keys (`meta/rig/name` → `rig`)
    #[default]
    SecondSegment,
    /// Last segment (`meta/rig/name` → `name`)
    LastSegment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub separator: String,
    /// Only sequences as long as `timestamp` count as series.
    /// When off, any sequence qualifies and rendering truncates to the
    /// shorter of series and time axis.
    pub require_timestamp_aligned_length: bool,
    pub ungrouped_series: UngroupedSeriesPolicy,
    pub attribute_labels: AttributeLabeling,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            require_timestamp_aligned_length: true,
            ungrouped_series: UngroupedSeriesPolicy::default(),
            attribute_labels: AttributeLabeling::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
