//! Shared helpers

pub mod otlp;
pub mod time;
