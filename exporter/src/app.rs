//! Demo driver
//!
//! Exports a metrics batch (the sample batch or an OTLP file) and reads back the
//! most recent rows.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::ExporterConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::input::read_metrics_file;
use crate::data::clickhouse::ClickhouseStore;
use crate::data::memory::MemoryStore;
use crate::data::traits::MetricStore;
use crate::data::types::MetricRow;
use crate::domain::metrics::sample::sample_batch;
use crate::domain::metrics::{ExportSummary, MetricsExporter};
use crate::utils::time::datetime_to_nanos;
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;

pub struct CoreApp;

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Export { input, dry_run }) => {
                Self::export(&cli_config, input.as_deref(), dry_run).await
            }
            None => Self::export(&cli_config, None, false).await,
            Some(Commands::Tail { limit }) => Self::tail(&cli_config, limit).await,
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn load_batch(input: Option<&Path>) -> Result<ExportMetricsServiceRequest> {
        match input {
            Some(path) => Ok(read_metrics_file(path).await?),
            None => Ok(sample_batch(datetime_to_nanos(chrono::Utc::now()))),
        }
    }

    async fn export(cli: &CliConfig, input: Option<&Path>, dry_run: bool) -> Result<()> {
        let batch = Self::load_batch(input).await?;

        if dry_run {
            let store = MemoryStore::new();
            let exporter = MetricsExporter::from_store(Arc::new(store.clone())).await?;
            let summary = exporter.consume_metrics(&batch).await?;
            exporter.shutdown().await?;

            Self::print_summary(&summary);
            Self::print_rows(&store.rows());
            return Ok(());
        }

        let config = ExporterConfig::load(cli)?;
        let exporter = MetricsExporter::connect(&config).await?;
        exporter.start().await?;

        let result = exporter.consume_metrics(&batch).await;
        exporter.shutdown().await?;

        Self::print_summary(&result?);
        Ok(())
    }

    async fn tail(cli: &CliConfig, limit: u64) -> Result<()> {
        let config = ExporterConfig::load(cli)?;
        let store = ClickhouseStore::open(&config).await?;
        let rows = store.recent_rows(limit).await;
        store.close().await?;

        println!("\nLast {} metrics in {}.{}:", limit, config.database, config.table);
        Self::print_rows(&rows?);
        Ok(())
    }

    fn print_summary(summary: &ExportSummary) {
        println!(
            "Exported {} rows ({} failed)",
            summary.rows_written, summary.rows_failed
        );
        for failure in &summary.failures {
            println!("  {}: {}", failure.metric_name, failure.error);
        }
    }

    fn print_rows(rows: &[MetricRow]) {
        println!("--------------------------------------------------");
        for row in rows {
            let mut labels: Vec<_> = row.labels.iter().collect();
            labels.sort();
            println!(
                "Time: {}\nMetric: {}\nType: {}\nValue: {}\nLabels: {:?}\nService: {}\nHost: {}\n",
                row.timestamp.to_rfc3339(),
                row.metric_name,
                row.metric_type,
                row.value,
                labels,
                row.service_name,
                row.host_name
            );
        }
    }
}
