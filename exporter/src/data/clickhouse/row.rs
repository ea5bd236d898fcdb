//! ClickHouse row encoding for metric rows

use clickhouse::Row;
use serde::{Deserialize, Serialize};

use crate::data::types::{MetricRow, MetricType};
use crate::utils::time::{chrono_to_time, time_to_chrono};

/// Row structure for the metrics table
///
/// `labels` is a `Map(String, String)` column, encoded as key/value pairs sorted by key.
#[derive(Debug, Row, Serialize, Deserialize)]
pub(crate) struct ClickhouseMetricRow {
    #[serde(with = "clickhouse::serde::time::datetime64::nanos")]
    timestamp: time::OffsetDateTime,
    metric_name: String,
    metric_type: String,
    value: f64,
    labels: Vec<(String, String)>,
    service_name: String,
    host_name: String,
}

impl From<&MetricRow> for ClickhouseMetricRow {
    fn from(row: &MetricRow) -> Self {
        let mut labels: Vec<(String, String)> = row
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        labels.sort();

        Self {
            timestamp: chrono_to_time(row.timestamp),
            metric_name: row.metric_name.clone(),
            metric_type: row.metric_type.as_str().to_string(),
            value: row.value,
            labels,
            service_name: row.service_name.clone(),
            host_name: row.host_name.clone(),
        }
    }
}

impl ClickhouseMetricRow {
    /// Convert a fetched row back; rows with an unrecognized metric_type are dropped
    pub(crate) fn into_metric_row(self) -> Option<MetricRow> {
        let Some(metric_type) = MetricType::parse(&self.metric_type) else {
            tracing::warn!(
                metric_name = %self.metric_name,
                metric_type = %self.metric_type,
                "Skipping row with unknown metric_type"
            );
            return None;
        };

        Some(MetricRow {
            timestamp: time_to_chrono(self.timestamp),
            metric_name: self.metric_name,
            metric_type,
            value: self.value,
            labels: self.labels.into_iter().collect(),
            service_name: self.service_name,
            host_name: self.host_name,
        })
    }
}
