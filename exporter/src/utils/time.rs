//! Time utility functions

use chrono::{DateTime, TimeZone, Utc};

/// Convert nanoseconds since Unix epoch to DateTime<Utc>
pub fn nanos_to_datetime(nanos: u64) -> DateTime<Utc> {
    let secs = (nanos / 1_000_000_000) as i64;
    let nsecs = (nanos % 1_000_000_000) as u32;
    Utc.timestamp_opt(secs, nsecs).single().unwrap_or_else(|| {
        tracing::warn!(nanos, "Invalid timestamp, using epoch");
        DateTime::UNIX_EPOCH
    })
}

/// Convert DateTime<Utc> to nanoseconds since Unix epoch (0 when out of range)
pub fn datetime_to_nanos(dt: DateTime<Utc>) -> u64 {
    dt.timestamp_nanos_opt()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

/// Convert chrono DateTime to time OffsetDateTime
pub fn chrono_to_time(dt: DateTime<Utc>) -> time::OffsetDateTime {
    time::OffsetDateTime::from_unix_timestamp_nanos(dt.timestamp_nanos_opt().unwrap_or(0) as i128)
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
}

/// Convert time OffsetDateTime back to chrono DateTime<Utc>
pub fn time_to_chrono(dt: time::OffsetDateTime) -> DateTime<Utc> {
    let nanos = dt.unix_timestamp_nanos();
    let secs = nanos.div_euclid(1_000_000_000) as i64;
    let nsecs = nanos.rem_euclid(1_000_000_000) as u32;
    Utc.timestamp_opt(secs, nsecs)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}
