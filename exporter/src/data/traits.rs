//! Store traits for the export pipeline
//!
//! A `MetricStore` owns the connection for the exporter's lifetime and hands out
//! one `InsertStatement` per export call. Implementations must be safe for
//! concurrent statement execution: export calls may run in parallel on the same
//! store, each with its own statement.

use async_trait::async_trait;

use crate::data::error::ExportError;
use crate::data::types::MetricRow;

#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    /// Fully qualified insert target
    fn table(&self) -> String;

    /// Liveness check
    async fn ping(&self) -> Result<(), ExportError>;

    /// Prepare the parameterized insert for one export call
    async fn prepare_insert(&self) -> Result<Box<dyn InsertStatement>, ExportError>;

    /// Release the connection. Closing twice is a no-op.
    async fn close(&self) -> Result<(), ExportError>;
}

/// A prepared seven-column insert. Dropping it releases the statement.
#[async_trait]
pub trait InsertStatement: Send {
    /// Execute one insertion with the row bound positionally in column order
    async fn execute(&mut self, row: &MetricRow) -> Result<(), ExportError>;
}
