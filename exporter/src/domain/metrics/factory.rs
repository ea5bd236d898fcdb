//! Exporter factory
//!
//! Component type and default configuration for hosts that build exporters from
//! partial configuration. The default config carries no endpoint and no credentials.

use super::exporter::MetricsExporter;
use crate::core::cli::CliConfig;
use crate::core::config::{ExporterConfig, FileConfig};
use crate::core::constants::{
    DEFAULT_COMPRESSION, DEFAULT_SECURE, DEFAULT_TIMEOUT_SECS, TYPE_STR,
};
use crate::data::clickhouse::schema::DEFAULT_TABLE;
use crate::data::error::ExportError;

/// Maturity of the exporter component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityLevel {
    Development,
    Alpha,
    Beta,
    Stable,
}

pub struct ExporterFactory;

impl ExporterFactory {
    pub const STABILITY: StabilityLevel = StabilityLevel::Beta;

    pub fn type_str(&self) -> &'static str {
        TYPE_STR
    }

    /// Defaults for every non-secret setting
    pub fn create_default_config(&self) -> FileConfig {
        FileConfig {
            secure: Some(DEFAULT_SECURE),
            table: Some(DEFAULT_TABLE.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            compression: Some(DEFAULT_COMPRESSION),
            ..Default::default()
        }
    }

    /// Resolve `overrides` on top of the defaults
    pub fn resolve_config(&self, overrides: FileConfig) -> Result<ExporterConfig, ExportError> {
        let mut config = self.create_default_config();
        config.merge(overrides);
        ExporterConfig::resolve(config, &CliConfig::default())
    }

    /// Validate the configuration and connect a metrics exporter
    pub async fn create_metrics_exporter(
        &self,
        overrides: FileConfig,
    ) -> Result<MetricsExporter, ExportError> {
        let config = self.resolve_config(overrides)?;
        MetricsExporter::connect(&config).await
    }
}
