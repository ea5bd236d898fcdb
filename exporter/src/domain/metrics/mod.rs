//! Metrics export pipeline
//!
//! Walks OTLP metrics, flattens each data point into a row and inserts the rows
//! one by one. Supports Gauge, Sum and Histogram; other shapes are ignored.

mod exporter;
mod factory;
mod mapper;
pub mod sample;
mod walker;
mod writer;

pub use exporter::{Capabilities, MetricsExporter};
pub use factory::{ExporterFactory, StabilityLevel};
pub use mapper::{MetricShape, ResourceContext, histogram_mean, map_metric, number_value};
pub use walker::walk_batch;
pub use writer::{BatchWriter, ExportSummary, RowFailure};
