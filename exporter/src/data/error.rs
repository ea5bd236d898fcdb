//! Error type for the export pipeline
//!
//! Fatal classes (`Config`, `Connection`, `Statement`) terminate the operation
//! that hit them. `RowInsert` is recoverable: the batch writer logs and records it
//! and never returns it from an export call.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Missing or invalid configuration, raised before any connection attempt
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or auth failure on open/liveness check, or the handle is closed
    #[error("Connection error: {0}")]
    Connection(String),

    /// The insert statement could not be prepared
    #[error("Failed to prepare insert into {table}: {reason}")]
    Statement { table: String, reason: String },

    /// A single row failed to persist
    #[error("Failed to insert metric {metric_name}: {reason}")]
    RowInsert { metric_name: String, reason: String },

    /// Input batch could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Read query against the metrics table failed
    #[error("Query error: {0}")]
    Query(String),
}

impl ExportError {
    /// Whether the error aborts the operation that produced it
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::RowInsert { .. })
    }
}
