//! Metrics table shape

/// Insert columns, in bind order
pub const COLUMNS: [&str; 7] = [
    "timestamp",
    "metric_name",
    "metric_type",
    "value",
    "labels",
    "service_name",
    "host_name",
];

/// Default table name inside the configured database
pub const DEFAULT_TABLE: &str = "metrics";

/// Insert columns absent from the table's column list
pub fn missing_columns<S: AsRef<str>>(existing: &[S]) -> Vec<&'static str> {
    COLUMNS
        .iter()
        .copied()
        .filter(|col| !existing.iter().any(|e| e.as_ref() == *col))
        .collect()
}
