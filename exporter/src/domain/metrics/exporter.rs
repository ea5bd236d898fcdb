//! Metrics exporter
//!
//! Owns the store connection from construction to shutdown. Each export call
//! prepares its own statement, walks the batch and inserts rows one at a time.
//! Calls may run concurrently; the store must support concurrent statements.

use std::sync::Arc;

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use tokio::time::Instant;

use super::walker::walk_batch;
use super::writer::{BatchWriter, ExportSummary};
use crate::core::config::ExporterConfig;
use crate::data::clickhouse::ClickhouseStore;
use crate::data::error::ExportError;
use crate::data::traits::MetricStore;

/// Consumer capabilities advertised to the host pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub mutates_data: bool,
}

pub struct MetricsExporter {
    store: Arc<dyn MetricStore>,
}

impl MetricsExporter {
    /// Connect to ClickHouse. Fails if the liveness check fails.
    pub async fn connect(config: &ExporterConfig) -> Result<Self, ExportError> {
        let store = ClickhouseStore::open(config).await?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Wrap an existing store after checking it is reachable
    pub async fn from_store(store: Arc<dyn MetricStore>) -> Result<Self, ExportError> {
        store.ping().await?;
        tracing::debug!(backend = store.backend_name(), table = %store.table(), "Exporter ready");
        Ok(Self { store })
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            mutates_data: false,
        }
    }

    /// No-op: all startup work happens at construction
    pub async fn start(&self) -> Result<(), ExportError> {
        Ok(())
    }

    /// Export a batch. Only statement preparation (or an unavailable connection)
    /// fails the call; row failures are reported in the summary.
    pub async fn consume_metrics(
        &self,
        request: &ExportMetricsServiceRequest,
    ) -> Result<ExportSummary, ExportError> {
        self.export(request, None).await
    }

    /// Export a batch with a deadline. Rows attempted after the deadline fail
    /// individually; traversal still runs to the end of the batch.
    pub async fn consume_metrics_until(
        &self,
        request: &ExportMetricsServiceRequest,
        deadline: Instant,
    ) -> Result<ExportSummary, ExportError> {
        self.export(request, Some(deadline)).await
    }

    async fn export(
        &self,
        request: &ExportMetricsServiceRequest,
        deadline: Option<Instant>,
    ) -> Result<ExportSummary, ExportError> {
        let mut writer = BatchWriter::open(self.store.as_ref(), deadline).await?;

        for row in walk_batch(request) {
            writer.write(&row).await;
        }

        let summary = writer.finish();
        if summary.is_partial() {
            tracing::warn!(
                table = %self.store.table(),
                rows_written = summary.rows_written,
                rows_failed = summary.rows_failed,
                "Metrics export completed with row failures"
            );
        } else {
            tracing::debug!(
                table = %self.store.table(),
                rows_written = summary.rows_written,
                "Metrics exported"
            );
        }
        Ok(summary)
    }

    /// Release the connection. Safe to call more than once.
    pub async fn shutdown(&self) -> Result<(), ExportError> {
        self.store.close().await
    }
}
