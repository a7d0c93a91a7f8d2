//! Time axis construction and plot-ready filtering
//!
//! A sub-series is plot-ready only when every element is a JSON number.
//! Missing values are excluded, never substituted or interpolated.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use super::error::PipelineError;
use super::group::{Group, SeriesRole};

/// Why a sub-series was left out of the plot-ready set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Contains `null`
    Missing,
    /// Contains a string, bool or nested value
    NonNumeric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedSeries {
    pub sub_key: String,
    pub reason: ExclusionReason,
    /// First offending element
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotReadySeries {
    pub sub_key: String,
    pub role: SeriesRole,
    pub values: Vec<f64>,
}

/// Group after null-filtering. `series` keeps the group's sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotReadyGroup {
    pub name: String,
    pub series: Vec<PlotReadySeries>,
    pub excluded: Vec<ExcludedSeries>,
}

impl PlotReadyGroup {
    pub fn get(&self, sub_key: &str) -> Option<&PlotReadySeries> {
        self.series.iter().find(|s| s.sub_key == sub_key)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Numeric timestamps from the raw `timestamp` sequence
pub fn timestamps_from(items: &[Value]) -> Result<Vec<f64>, PipelineError> {
    items
        .iter()
        .enumerate()
        .map(|(index, v)| v.as_f64().ok_or(PipelineError::NonNumericTimestamp { index }))
        .collect()
}

/// `axis[i] = timestamps[i] - timestamps[0]`. Monotonicity is not checked.
pub fn build_time_axis(timestamps: &[f64]) -> Result<Vec<f64>, PipelineError> {
    let Some(&start) = timestamps.first() else {
        return Err(PipelineError::EmptyTimestamp);
    };
    Ok(timestamps.iter().map(|&t| t - start).collect())
}

fn numeric_values(sub_key: &str, items: &[Value]) -> Result<Vec<f64>, ExcludedSeries> {
    items
        .iter()
        .enumerate()
        .map(|(index, v)| match v {
            Value::Null => Err(ExcludedSeries {
                sub_key: sub_key.to_string(),
                reason: ExclusionReason::Missing,
                index,
            }),
            other => other.as_f64().ok_or_else(|| ExcludedSeries {
                sub_key: sub_key.to_string(),
                reason: ExclusionReason::NonNumeric,
                index,
            }),
        })
        .collect()
}

/// Drop every sub-series holding a missing or non-numeric value.
///
/// An all-excluded group yields an empty, valid result.
pub fn filter_plot_ready(group: &Group) -> PlotReadyGroup {
    let mut out = PlotReadyGroup {
        name: group.name.clone(),
        series: Vec::with_capacity(group.len()),
        excluded: Vec::new(),
    };

    for (sub_key, items) in &group.series {
        match numeric_values(sub_key, items) {
            Ok(values) => out.series.push(PlotReadySeries {
                sub_key: sub_key.clone(),
                role: SeriesRole::of(sub_key),
                values,
            }),
            Err(excluded) => {
                trace!(
                    group = %group.name,
                    sub_key = %sub_key,
                    reason = ?excluded.reason,
                    index = excluded.index,
                    "Sub-series excluded"
                );
                out.excluded.push(excluded);
            }
        }
    }

    debug!(
        group = %group.name,
        ready = out.series.len(),
        excluded = out.excluded.len(),
        "Filtered group"
    );
    out
}

/// Pair a series with the time axis up to the shorter length.
///
/// Returns the `[t, y]` points and whether anything was cut off.
pub fn align_to_axis(time_axis: &[f64], values: &[f64]) -> (Vec<[f64; 2]>, bool) {
    let points: Vec<[f64; 2]> = time_axis
        .iter()
        .zip(values)
        .map(|(&t, &y)| [t, y])
        .collect();
    let truncated = time_axis.len() != values.len();
    (points, truncated)
}
