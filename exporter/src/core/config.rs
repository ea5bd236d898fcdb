//! Exporter configuration
//!
//! Sources, lowest to highest priority:
//! 1. Defaults (no endpoint or credentials are ever defaulted)
//! 2. JSON config file (`--config` / `CLICKHOUSE_EXPORTER_CONFIG`)
//! 3. Environment variables (`CLICKHOUSE_*`)
//! 4. CLI flags

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    DEFAULT_COMPRESSION, DEFAULT_SECURE, DEFAULT_TIMEOUT_SECS, ENV_DATABASE, ENV_ENDPOINT,
    ENV_PASSWORD, ENV_USERNAME,
};
use crate::data::clickhouse::schema::DEFAULT_TABLE;
use crate::data::error::ExportError;

// =============================================================================
// File Config
// =============================================================================

/// File-based configuration (JSON). Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    /// ClickHouse endpoint, `host:port` or a full URL
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    /// Use TLS when the endpoint has no scheme (default: true)
    pub secure: Option<bool>,
    /// Target table (default: "metrics")
    pub table: Option<String>,
    /// Server-side max_execution_time in seconds (default: 60)
    pub timeout_secs: Option<u64>,
    /// LZ4 compression (default: true)
    pub compression: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ExportError> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ExportError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.warn_unknown_fields();
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    pub fn merge(&mut self, other: FileConfig) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.secure.is_some() {
            self.secure = other.secure;
        }
        if other.table.is_some() {
            self.table = other.table;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.compression.is_some() {
            self.compression = other.compression;
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

/// Resolved exporter configuration
#[derive(Clone)]
pub struct ExporterConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub secure: bool,
    pub table: String,
    pub timeout_secs: u64,
    pub compression: bool,
}

impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("secure", &self.secure)
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .field("compression", &self.compression)
            .finish()
    }
}

impl ExporterConfig {
    /// Load configuration from all sources
    pub fn load(cli: &CliConfig) -> Result<Self, ExportError> {
        tracing::debug!("Loading exporter configuration");

        let file_config = match cli.config {
            Some(ref path) => {
                if !path.exists() {
                    return Err(ExportError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                FileConfig::load_from_file(path)?
            }
            None => FileConfig::default(),
        };

        Self::resolve(file_config, cli)
    }

    /// Load configuration from `CLICKHOUSE_*` environment variables only
    pub fn from_env() -> Result<Self, ExportError> {
        Self::load(&CliConfig::from_env_with(|key| std::env::var(key).ok()))
    }

    /// Combine file values with CLI/env values (CLI/env take precedence)
    pub fn resolve(file: FileConfig, cli: &CliConfig) -> Result<Self, ExportError> {
        let endpoint = required(cli.endpoint.clone().or(file.endpoint), "endpoint", ENV_ENDPOINT)?;
        let username = required(cli.username.clone().or(file.username), "username", ENV_USERNAME)?;
        let password = required(cli.password.clone().or(file.password), "password", ENV_PASSWORD)?;
        let database = required(cli.database.clone().or(file.database), "database", ENV_DATABASE)?;

        let config = Self {
            endpoint,
            username,
            password,
            database,
            secure: cli.secure.or(file.secure).unwrap_or(DEFAULT_SECURE),
            table: cli
                .table
                .clone()
                .or(file.table)
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            compression: file.compression.unwrap_or(DEFAULT_COMPRESSION),
        };
        config.validate()?;

        tracing::trace!(config = ?config, "Resolved exporter config");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExportError> {
        for (name, value) in [
            ("endpoint", &self.endpoint),
            ("username", &self.username),
            ("password", &self.password),
            ("database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(ExportError::Config(format!("{} must be specified", name)));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ExportError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !is_identifier(&self.table) {
            return Err(ExportError::Config(format!(
                "table must be a plain identifier, got {:?}",
                self.table
            )));
        }

        Ok(())
    }

    /// Endpoint as an HTTP(S) URL
    ///
    /// A bare `host:port` gets `https://` when secure and `http://` otherwise.
    pub fn url(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else if self.secure {
            format!("https://{}", self.endpoint)
        } else {
            format!("http://{}", self.endpoint)
        }
    }
}

fn required(value: Option<String>, name: &str, env: &str) -> Result<String, ExportError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        ExportError::Config(format!(
            "{} must be specified (config file, --{} or {})",
            name, name, env
        ))
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
