//! Data layer: row types, store traits and backends

pub mod clickhouse;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use clickhouse::ClickhouseStore;
pub use error::ExportError;
pub use memory::MemoryStore;
pub use traits::{InsertStatement, MetricStore};
pub use types::{MetricRow, MetricType};
