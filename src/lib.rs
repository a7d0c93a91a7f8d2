//! jsonplot - turn one nested telemetry JSON document into chart-ready data
//!
//! Produces:
//! - an attribute table of one-off scalar values
//! - one plot group per top-level signal object, time-aligned against the
//!   document's `timestamp` array
//!
//! Rendering is left to the caller; see `PlotReport`.

pub mod core;

pub use crate::core::{
    decode_data_url, parse_document, parse_json, AttributeLabeling, PipelineConfig, PipelineError,
    PlotGroup, PlotReport, PlotSeries, UngroupedSeriesPolicy,
};
