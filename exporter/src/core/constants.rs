// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for log filters and identifiers)
pub const APP_NAME_LOWER: &str = "otel_clickhouse_exporter";

/// Exporter component type
pub const TYPE_STR: &str = "clickhouse";

// =============================================================================
// Environment Variables - Connection
// =============================================================================

pub const ENV_ENDPOINT: &str = "CLICKHOUSE_ENDPOINT";
pub const ENV_USERNAME: &str = "CLICKHOUSE_USERNAME";
pub const ENV_PASSWORD: &str = "CLICKHOUSE_PASSWORD";
pub const ENV_DATABASE: &str = "CLICKHOUSE_DATABASE";
pub const ENV_SECURE: &str = "CLICKHOUSE_SECURE";
pub const ENV_TABLE: &str = "CLICKHOUSE_TABLE";

// =============================================================================
// Environment Variables - Application
// =============================================================================

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "CLICKHOUSE_EXPORTER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "CLICKHOUSE_EXPORTER_LOG";

// =============================================================================
// Defaults
// =============================================================================

/// TLS is on unless explicitly disabled
pub const DEFAULT_SECURE: bool = true;

/// Server-side `max_execution_time` in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// LZ4 compression on by default
pub const DEFAULT_COMPRESSION: bool = true;

/// Rows printed by `tail` when no limit is given
pub const DEFAULT_TAIL_LIMIT: u64 = 5;
