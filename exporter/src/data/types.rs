//! Row types produced by the export pipeline

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric type column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Gauge,
    Sum,
    Histogram,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Sum => "sum",
            Self::Histogram => "histogram",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gauge" => Some(Self::Gauge),
            "sum" => Some(Self::Sum),
            "histogram" => Some(Self::Histogram),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flattened metric observation, in table column order
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub timestamp: DateTime<Utc>,
    pub metric_name: String,
    pub metric_type: MetricType,
    pub value: f64,
    pub labels: HashMap<String, String>,
    pub service_name: String,
    pub host_name: String,
}
