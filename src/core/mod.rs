//! Flattening, classification and grouping engine
//!
//! Platform-agnostic core shared by the library API and the CLI.

pub mod attributes;
pub mod classify;
pub mod config;
pub mod error;
pub mod flatten;
pub mod group;
pub mod path;
pub mod pipeline;
pub mod timeline;
pub mod upload;
pub mod value;

pub use attributes::{attribute_label, build_attribute_table, AttributeRow};
pub use classify::{classify, timestamp_sequence, Classification, TIMESTAMP_KEY};
pub use config::{AttributeLabeling, PipelineConfig, UngroupedSeriesPolicy};
pub use error::PipelineError;
pub use flatten::{flatten, FlatMap};
pub use group::{group, is_primary_series, Group, Grouping, SeriesRole, PRIMARY_MARKER};
pub use path::{FlatPath, DEFAULT_SEPARATOR};
pub use pipeline::{parse_document, Diagnostics, PlotGroup, PlotReport, PlotSeries};
pub use timeline::{
    align_to_axis, build_time_axis, filter_plot_ready, timestamps_from, ExcludedSeries,
    ExclusionReason, PlotReadyGroup, PlotReadySeries,
};
pub use upload::{decode_data_url, parse_json};
pub use value::{FlatValue, Scalar};
