use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    DEFAULT_TAIL_LIMIT, ENV_CONFIG, ENV_DATABASE, ENV_ENDPOINT, ENV_PASSWORD, ENV_SECURE,
    ENV_TABLE, ENV_USERNAME,
};

#[derive(Parser)]
#[command(name = "otel-clickhouse-exporter")]
#[command(version, about = "Export OpenTelemetry metrics to ClickHouse", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// ClickHouse endpoint (host:port or URL)
    #[arg(long, global = true, env = ENV_ENDPOINT)]
    pub endpoint: Option<String>,

    /// ClickHouse username
    #[arg(long, global = true, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// ClickHouse password
    #[arg(long, global = true, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// ClickHouse database
    #[arg(long, global = true, env = ENV_DATABASE)]
    pub database: Option<String>,

    /// Use TLS for endpoints without a scheme
    #[arg(long, global = true, env = ENV_SECURE)]
    pub secure: Option<bool>,

    /// Metrics table
    #[arg(long, global = true, env = ENV_TABLE)]
    pub table: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a metrics batch (the built-in sample batch unless --input is given)
    Export {
        /// OTLP metrics file: protobuf, or JSON when the extension is .json
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Map rows into memory and print them instead of connecting
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the most recent rows of the metrics table
    Tail {
        /// Number of rows
        #[arg(long, short = 'n', default_value_t = DEFAULT_TAIL_LIMIT)]
        limit: u64,
    },
}

/// Connection settings from CLI flags and their environment fallbacks
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub secure: Option<bool>,
    pub table: Option<String>,
}

impl CliConfig {
    /// Build from an environment lookup (used when there is no command line)
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            config: get(ENV_CONFIG).map(PathBuf::from),
            endpoint: get(ENV_ENDPOINT),
            username: get(ENV_USERNAME),
            password: get(ENV_PASSWORD),
            database: get(ENV_DATABASE),
            secure: get(ENV_SECURE).and_then(|v| parse_bool(&v)),
            table: get(ENV_TABLE),
        }
    }
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("command", &self.command)
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse CLI arguments and return config and command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    tracing::trace!(cli = ?cli, "Parsed CLI");
    let config = CliConfig {
        config: cli.config,
        endpoint: cli.endpoint,
        username: cli.username,
        password: cli.password,
        database: cli.database,
        secure: cli.secure,
        table: cli.table,
    };
    (config, cli.command)
}
