//! End-to-end pipeline: document → attribute table + plot groups
//!
//! Structural errors abort the whole document. A group that ends up with
//! no plot-ready series is still reported, just with nothing to draw.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::attributes::{build_attribute_table, AttributeRow};
use super::classify::{classify, timestamp_sequence};
use super::config::PipelineConfig;
use super::error::PipelineError;
use super::flatten::flatten;
use super::group::{group, SeriesRole};
use super::timeline::{
    align_to_axis, build_time_axis, filter_plot_ready, timestamps_from, ExcludedSeries,
    PlotReadyGroup,
};

pub const X_AXIS_LABEL: &str = "Timestamp(diff)";
pub const Y_AXIS_LABEL: &str = "Values";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub sub_key: String,
    pub role: SeriesRole,
    pub values: Vec<f64>,
    /// Length differed from the time axis; only the overlap is drawn
    pub truncated: bool,
}

/// One chart: a group's plot-ready series against the shared time axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotGroup {
    pub name: String,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub time_axis: Vec<f64>,
    /// Sorted by sub-key
    pub series: Vec<PlotSeries>,
    pub excluded: Vec<ExcludedSeries>,
}

impl PlotGroup {
    fn new(ready: PlotReadyGroup, time_axis: &[f64]) -> Self {
        let series = ready
            .series
            .into_iter()
            .map(|s| PlotSeries {
                truncated: s.values.len() != time_axis.len(),
                sub_key: s.sub_key,
                role: s.role,
                values: s.values,
            })
            .collect();

        Self {
            title: ready.name.clone(),
            name: ready.name,
            x_label: X_AXIS_LABEL,
            y_label: Y_AXIS_LABEL,
            time_axis: time_axis.to_vec(),
            series,
            excluded: ready.excluded,
        }
    }

    pub fn get(&self, sub_key: &str) -> Option<&PlotSeries> {
        self.series.iter().find(|s| s.sub_key == sub_key)
    }

    pub fn sub_keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.sub_key.as_str())
    }

    /// Primary series first, then the rest, each in sub-key order
    pub fn draw_order(&self) -> impl Iterator<Item = &PlotSeries> {
        let primary = self.series.iter().filter(|s| s.role == SeriesRole::Primary);
        let secondary = self.series.iter().filter(|s| s.role == SeriesRole::Secondary);
        primary.chain(secondary)
    }

    /// `(series, [t, y] points)` in draw order
    pub fn lines(&self) -> impl Iterator<Item = (&PlotSeries, Vec<[f64; 2]>)> {
        self.draw_order()
            .map(move |s| (s, align_to_axis(&self.time_axis, &s.values).0))
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub timestamp_count: usize,
    /// Sequences skipped because their length differs from `timestamp`
    pub misaligned: Vec<String>,
    /// Depth-1 series dropped by policy
    pub ungrouped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotReport {
    pub attributes: Vec<AttributeRow>,
    pub groups: Vec<PlotGroup>,
    pub diagnostics: Diagnostics,
}

impl PlotReport {
    pub fn group(&self, name: &str) -> Option<&PlotGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full pipeline over one document
pub fn parse_document(doc: &Value, config: &PipelineConfig) -> Result<PlotReport, PipelineError> {
    let flat = flatten(doc, &config.separator)?;
    let classification = classify(&flat, config.require_timestamp_aligned_length)?;

    let timestamps = timestamps_from(timestamp_sequence(&flat)?)?;
    let time_axis = build_time_axis(&timestamps)?;

    let grouping = group(&classification.series, &flat, config.ungrouped_series)?;
    let attributes = build_attribute_table(&flat, &classification.attributes, config.attribute_labels);

    let groups: Vec<PlotGroup> = grouping
        .groups
        .iter()
        .map(|g| PlotGroup::new(filter_plot_ready(g), &time_axis))
        .collect();

    for g in groups.iter().filter(|g| g.is_empty()) {
        debug!(group = %g.name, excluded = g.excluded.len(), "Group has no plot-ready series");
    }

    let separator = flat.separator();
    let diagnostics = Diagnostics {
        timestamp_count: classification.timestamp_count,
        misaligned: classification.misaligned.iter().map(|p| p.join(separator)).collect(),
        ungrouped: grouping.ungrouped.iter().map(|p| p.join(separator)).collect(),
    };

    info!(
        attributes = attributes.len(),
        groups = groups.len(),
        timestamps = diagnostics.timestamp_count,
        "Parsed document"
    );

    Ok(PlotReport {
        attributes,
        groups,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UngroupedSeriesPolicy;
    use serde_json::json;

    #[test]
    fn test_draw_order_primary_first() {
        let doc = json!({
            "timestamp": [0, 1],
            "signal": {"A": [1, 2], "TV1": [3, 4], "HV": [5, 6], "ch/HV2": [7, 8]}
        });
        let report = parse_document(&doc, &PipelineConfig::default()).unwrap();
        let signal = report.group("signal").unwrap();

        assert_eq!(signal.sub_keys().collect::<Vec<_>>(), vec!["A", "HV", "TV1", "ch/HV2"]);
        let drawn: Vec<&str> = signal.draw_order().map(|s| s.sub_key.as_str()).collect();
        assert_eq!(drawn, vec!["HV", "ch/HV2", "A", "TV1"]);
    }

    #[test]
    fn test_relaxed_alignment_marks_truncation() {
        let doc = json!({
            "timestamp": [10, 11, 12],
            "signal": {"short": [1, 2], "full": [1, 2, 3]}
        });
        let config = PipelineConfig {
            require_timestamp_aligned_length: false,
            ..Default::default()
        };
        let report = parse_document(&doc, &config).unwrap();
        let signal = report.group("signal").unwrap();

        assert!(signal.get("short").unwrap().truncated);
        assert!(!signal.get("full").unwrap().truncated);

        let lines: Vec<(String, Vec<[f64; 2]>)> = signal
            .lines()
            .map(|(s, points)| (s.sub_key.clone(), points))
            .collect();
        assert_eq!(lines[0], ("full".to_string(), vec![[0.0, 1.0], [1.0, 2.0], [2.0, 3.0]]));
        assert_eq!(lines[1], ("short".to_string(), vec![[0.0, 1.0], [1.0, 2.0]]));
    }

    #[test]
    fn test_strict_alignment_reports_misaligned() {
        let doc = json!({"timestamp": [0, 1, 2], "signal": {"short": [1, 2], "ok": [1, 2, 3]}});
        let report = parse_document(&doc, &PipelineConfig::default()).unwrap();
        assert_eq!(report.diagnostics.misaligned, vec!["signal/short"]);
        assert_eq!(report.group("signal").unwrap().sub_keys().collect::<Vec<_>>(), vec!["ok"]);
    }

    #[test]
    fn test_empty_group_does_not_affect_siblings() {
        let doc = json!({
            "timestamp": [0, 1],
            "bad": {"a": [null, null]},
            "good": {"b": [1, 2]}
        });
        let report = parse_document(&doc, &PipelineConfig::default()).unwrap();
        assert!(report.group("bad").unwrap().is_empty());
        assert_eq!(report.group("good").unwrap().get("b").unwrap().values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_dropped_ungrouped_series_in_diagnostics() {
        let doc = json!({"timestamp": [0, 1], "flat": [1, 2], "s": {"x": [1, 2]}});
        let config = PipelineConfig {
            ungrouped_series: UngroupedSeriesPolicy::Drop,
            ..Default::default()
        };
        let report = parse_document(&doc, &config).unwrap();
        assert_eq!(report.diagnostics.ungrouped, vec!["flat"]);
        assert_eq!(report.groups.len(), 1);
    }

    #[test]
    fn test_literal_separator_keys() {
        let doc = json!({"timestamp": [0, 1], "meta/id": "abc", "sig/A": [1, 2]});
        let report = parse_document(&doc, &PipelineConfig::default()).unwrap();

        assert_eq!(report.attributes.len(), 1);
        assert_eq!(report.attributes[0].label, "id");
        assert_eq!(report.attributes[0].value, "abc");
        assert_eq!(report.group("sig").unwrap().get("A").unwrap().values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_non_numeric_timestamp() {
        let doc = json!({"timestamp": [0, "x"]});
        let err = parse_document(&doc, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NonNumericTimestamp { index: 1 }));
    }

    #[test]
    fn test_report_serializes() {
        let doc = json!({"timestamp": [0, 1], "meta": {"id": "abc"}, "signal": {"HV": [1, 2]}});
        let report = parse_document(&doc, &PipelineConfig::default()).unwrap();
        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["attributes"][0], json!({"label": "id", "value": "abc"}));
        assert_eq!(value["groups"][0]["x_label"], json!("Timestamp(diff)"));
        assert_eq!(value["groups"][0]["series"][0]["role"], json!("primary"));
        assert_eq!(value["groups"][0]["time_axis"], json!([0.0, 1.0]));
    }
}
