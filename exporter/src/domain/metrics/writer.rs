//! Batch writer
//!
//! Holds the one prepared insert statement of an export call. Each row is inserted
//! on its own; a failed row is logged with its metric name, recorded in the
//! summary, and does not stop the call. There is no transaction across rows.

use tokio::time::Instant;

use crate::data::error::ExportError;
use crate::data::traits::{InsertStatement, MetricStore};
use crate::data::types::MetricRow;

/// One failed row insertion
#[derive(Debug)]
pub struct RowFailure {
    pub metric_name: String,
    pub error: ExportError,
}

/// Outcome of one export call
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub rows_written: usize,
    pub rows_failed: usize,
    pub failures: Vec<RowFailure>,
}

impl ExportSummary {
    pub fn is_partial(&self) -> bool {
        self.rows_failed > 0
    }
}

pub struct BatchWriter {
    statement: Box<dyn InsertStatement>,
    deadline: Option<Instant>,
    summary: ExportSummary,
}

impl BatchWriter {
    /// Prepare the insert statement. Failure is fatal for the export call.
    pub async fn open(
        store: &dyn MetricStore,
        deadline: Option<Instant>,
    ) -> Result<Self, ExportError> {
        let statement = store.prepare_insert().await?;
        Ok(Self {
            statement,
            deadline,
            summary: ExportSummary::default(),
        })
    }

    /// Insert one row, recovering from its failure
    pub async fn write(&mut self, row: &MetricRow) {
        match self.execute(row).await {
            Ok(()) => self.summary.rows_written += 1,
            Err(error) => {
                tracing::error!(
                    metric_name = %row.metric_name,
                    error = %error,
                    "Failed to insert metric row"
                );
                self.summary.rows_failed += 1;
                self.summary.failures.push(RowFailure {
                    metric_name: row.metric_name.clone(),
                    error,
                });
            }
        }
    }

    async fn execute(&mut self, row: &MetricRow) -> Result<(), ExportError> {
        let Some(deadline) = self.deadline else {
            return self.statement.execute(row).await;
        };

        let deadline_err = || ExportError::RowInsert {
            metric_name: row.metric_name.clone(),
            reason: "deadline exceeded".to_string(),
        };

        if Instant::now() >= deadline {
            return Err(deadline_err());
        }
        tokio::time::timeout_at(deadline, self.statement.execute(row))
            .await
            .map_err(|_| deadline_err())?
    }

    /// Release the statement and return the call's outcome
    pub fn finish(self) -> ExportSummary {
        self.summary
    }
}
