//! Export OpenTelemetry metrics to ClickHouse
//!
//! Flattens OTLP metrics (resource → scope → metric → data point) into rows of
//! `(timestamp, metric_name, metric_type, value, labels, service_name, host_name)`
//! and inserts them one at a time. Gauge and Sum points map directly; histogram
//! points map to their mean and are skipped when empty.

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
