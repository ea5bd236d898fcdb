//! ClickHouse metric store
//!
//! Owns the ClickHouse client for the exporter's lifetime. The client is an HTTP
//! client with keep-alive connection pooling, so it can be cloned into every export
//! call and used from concurrent tasks. Each call gets its own `InsertStatement`.

mod row;
pub mod schema;

use async_trait::async_trait;
use clickhouse::{Client, Row};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::core::config::ExporterConfig;
use crate::data::error::ExportError;
use crate::data::traits::{InsertStatement, MetricStore};
use crate::data::types::MetricRow;
use row::ClickhouseMetricRow;

#[derive(Row, Deserialize)]
struct ColumnName {
    name: String,
}

/// ClickHouse-backed metric store
pub struct ClickhouseStore {
    client: RwLock<Option<Client>>,
    database: String,
    table: String,
}

impl ClickhouseStore {
    /// Connect and verify the server is reachable
    ///
    /// Configures the client the way the exporter needs it:
    /// - LZ4 compression when enabled
    /// - `max_execution_time` bounded by the configured timeout
    pub async fn open(config: &ExporterConfig) -> Result<Self, ExportError> {
        config.validate()?;

        let mut client = Client::default()
            .with_url(config.url())
            .with_database(&config.database)
            .with_user(&config.username)
            .with_password(&config.password)
            .with_option("max_execution_time", config.timeout_secs.to_string());

        if config.compression {
            client = client.with_compression(clickhouse::Compression::Lz4);
        }

        let store = Self {
            client: RwLock::new(Some(client)),
            database: config.database.clone(),
            table: config.table.clone(),
        };

        store.ping().await?;

        tracing::debug!(
            url = %config.url(),
            database = %config.database,
            table = %config.table,
            compression = %config.compression,
            "ClickhouseStore connected"
        );

        Ok(store)
    }

    fn client(&self) -> Result<Client, ExportError> {
        self.client
            .read()
            .clone()
            .ok_or_else(|| ExportError::Connection("connection is closed".to_string()))
    }

    /// Most recent rows in the metrics table, newest first
    pub async fn recent_rows(&self, limit: u64) -> Result<Vec<MetricRow>, ExportError> {
        let sql = format!(
            "SELECT ?fields FROM {} ORDER BY timestamp DESC LIMIT ?",
            self.table
        );
        let rows = self
            .client()?
            .query(&sql)
            .bind(limit)
            .fetch_all::<ClickhouseMetricRow>()
            .await
            .map_err(|e| ExportError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(ClickhouseMetricRow::into_metric_row)
            .collect())
    }
}

#[async_trait]
impl MetricStore for ClickhouseStore {
    fn backend_name(&self) -> &'static str {
        "clickhouse"
    }

    fn table(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }

    async fn ping(&self) -> Result<(), ExportError> {
        self.client()?
            .query("SELECT 1")
            .execute()
            .await
            .map_err(|e| ExportError::Connection(format!("failed to ping ClickHouse: {}", e)))
    }

    async fn prepare_insert(&self) -> Result<Box<dyn InsertStatement>, ExportError> {
        let client = self.client()?;
        let statement_err = |reason: String| ExportError::Statement {
            table: self.table(),
            reason,
        };

        let columns = client
            .query("SELECT ?fields FROM system.columns WHERE database = ? AND table = ?")
            .bind(&self.database)
            .bind(&self.table)
            .fetch_all::<ColumnName>()
            .await
            .map_err(|e| statement_err(e.to_string()))?;

        if columns.is_empty() {
            return Err(statement_err("table does not exist".to_string()));
        }

        let names: Vec<String> = columns.into_iter().map(|c| c.name).collect();
        let missing = schema::missing_columns(names.as_slice());
        if !missing.is_empty() {
            return Err(statement_err(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Box::new(ClickhouseInsertStatement {
            client,
            table: self.table.clone(),
        }))
    }

    async fn close(&self) -> Result<(), ExportError> {
        if self.client.write().take().is_some() {
            tracing::debug!("ClickHouse connection closed");
        }
        Ok(())
    }
}

/// Per-call insert. Each `execute` is one independent INSERT of a single row.
struct ClickhouseInsertStatement {
    client: Client,
    table: String,
}

#[async_trait]
impl InsertStatement for ClickhouseInsertStatement {
    async fn execute(&mut self, row: &MetricRow) -> Result<(), ExportError> {
        let row_err = |e: clickhouse::error::Error| ExportError::RowInsert {
            metric_name: row.metric_name.clone(),
            reason: e.to_string(),
        };

        let mut insert: clickhouse::insert::Insert<ClickhouseMetricRow> =
            self.client.insert(&self.table).await.map_err(row_err)?;
        insert
            .write(&ClickhouseMetricRow::from(row))
            .await
            .map_err(row_err)?;
        insert.end().await.map_err(row_err)
    }
}
