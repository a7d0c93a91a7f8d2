//! jsonplot CLI: run the pipeline over one document and print the result
//!
//! Run with: cargo run --features cli -- recording.json

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use jsonplot::core::{PlotReport, SeriesRole};
use jsonplot::{
    decode_data_url, parse_document, parse_json, AttributeLabeling, PipelineConfig,
    UngroupedSeriesPolicy,
};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON report for a renderer
    Json,
    /// Human-readable overview
    Summary,
}

#[derive(Parser, Debug)]
#[command(about = "Flatten a telemetry JSON document into attributes and plot groups")]
struct Cli {
    /// Input file; `-` or absent reads stdin
    input: Option<PathBuf>,

    /// Input is a `data:<mime>;base64,<payload>` upload string
    #[arg(long)]
    data_url: bool,

    /// JSON file with pipeline settings
    #[arg(long, env = "JSONPLOT_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "summary", env = "JSONPLOT_FORMAT")]
    format: OutputFormat,

    /// Accept sequences of any length, drawing only the overlap with the time axis
    #[arg(long, env = "JSONPLOT_ALLOW_MISALIGNED")]
    allow_misaligned: bool,

    /// Drop series with no group segment instead of failing
    #[arg(long, env = "JSONPLOT_DROP_UNGROUPED")]
    drop_ungrouped: bool,

    /// Label nested attributes by their last path segment
    #[arg(long, env = "JSONPLOT_LAST_SEGMENT_LABELS")]
    last_segment_labels: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                PipelineConfig::from_json(&std::fs::read_to_string(path)?)?
            }
            None => PipelineConfig::default(),
        };

        if self.allow_misaligned {
            config.require_timestamp_aligned_length = false;
        }
        if self.drop_ungrouped {
            config.ungrouped_series = UngroupedSeriesPolicy::Drop;
        }
        if self.last_segment_labels {
            config.attribute_labels = AttributeLabeling::LastSegment;
        }
        Ok(config)
    }

    fn read_input(&self) -> std::io::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
            _ => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

fn print_summary(report: &PlotReport) {
    if !report.attributes.is_empty() {
        let width = report.attributes.iter().map(|r| r.label.len()).max().unwrap_or(0);
        println!("Attributes");
        for row in &report.attributes {
            println!("  {:width$}  {}", row.label, row.value, width = width);
        }
        println!();
    }

    for group in &report.groups {
        println!(
            "{} ({} samples, span {})",
            group.title,
            group.time_axis.len(),
            group.time_axis.last().copied().unwrap_or(0.0)
        );
        if group.is_empty() {
            println!("  (nothing to plot)");
        }
        for series in group.draw_order() {
            let marker = match series.role {
                SeriesRole::Primary => "*",
                SeriesRole::Secondary => " ",
            };
            let note = if series.truncated { " [truncated]" } else { "" };
            println!("  {marker} {} ({} points){note}", series.sub_key, series.values.len());
        }
        for excluded in &group.excluded {
            println!(
                "  - {} excluded: {:?} at index {}",
                excluded.sub_key, excluded.reason, excluded.index
            );
        }
    }

    let diag = &report.diagnostics;
    for key in &diag.misaligned {
        println!("skipped {key}: length differs from {} timestamps", diag.timestamp_count);
    }
    for key in &diag.ungrouped {
        println!("skipped {key}: no group segment");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,jsonplot=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;
    let text = cli.read_input()?;
    info!(bytes = text.len(), data_url = cli.data_url, "Read input");

    let doc = if cli.data_url {
        decode_data_url(text.trim())
    } else {
        parse_json(&text)
    }
    .inspect_err(|e| error!(error = %e, "Failed to decode input"))?;

    let report = parse_document(&doc, &config)
        .inspect_err(|e| error!(error = %e, "Failed to parse document"))?;

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Summary => print_summary(&report),
    }
    Ok(())
}
