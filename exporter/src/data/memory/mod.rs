//! In-memory metric store
//!
//! Keeps inserted rows in a vector. Used for dry runs of the demo driver and as
//! the store behind the pipeline tests; failures can be injected for preparation
//! and for rows of a given metric name.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::data::error::ExportError;
use crate::data::traits::{InsertStatement, MetricStore};
use crate::data::types::MetricRow;

#[derive(Default)]
struct Failures {
    prepare: Option<String>,
    metrics: HashSet<String>,
}

/// Metric store backed by a shared `Vec<MetricRow>`
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Vec<MetricRow>>>,
    failures: Arc<Mutex<Failures>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `prepare_insert` fail with the given reason
    pub fn fail_prepare(&self, reason: impl Into<String>) {
        self.failures.lock().prepare = Some(reason.into());
    }

    /// Make every row of the given metric fail to insert
    pub fn fail_metric(&self, metric_name: impl Into<String>) {
        self.failures.lock().metrics.insert(metric_name.into());
    }

    /// Snapshot of persisted rows in insertion order
    pub fn rows(&self) -> Vec<MetricRow> {
        self.rows.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), ExportError> {
        if self.is_closed() {
            return Err(ExportError::Connection("connection is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn table(&self) -> String {
        "memory.metrics".to_string()
    }

    async fn ping(&self) -> Result<(), ExportError> {
        self.ensure_open()
    }

    async fn prepare_insert(&self) -> Result<Box<dyn InsertStatement>, ExportError> {
        self.ensure_open()?;
        let prepare_failure = self.failures.lock().prepare.clone();
        if let Some(reason) = prepare_failure {
            return Err(ExportError::Statement {
                table: self.table(),
                reason,
            });
        }
        Ok(Box::new(MemoryInsertStatement {
            store: self.clone(),
        }))
    }

    async fn close(&self) -> Result<(), ExportError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

struct MemoryInsertStatement {
    store: MemoryStore,
}

#[async_trait]
impl InsertStatement for MemoryInsertStatement {
    async fn execute(&mut self, row: &MetricRow) -> Result<(), ExportError> {
        if self.store.failures.lock().metrics.contains(&row.metric_name) {
            return Err(ExportError::RowInsert {
                metric_name: row.metric_name.clone(),
                reason: "injected failure".to_string(),
            });
        }
        self.store.rows.lock().push(row.clone());
        Ok(())
    }
}
