//! OTLP metrics input decoding
//!
//! Supports both protobuf and JSON encodings of `ExportMetricsServiceRequest`.

use std::path::Path;

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use prost::Message;

use crate::data::error::ExportError;

/// Encoding of an OTLP payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtlpFormat {
    Protobuf,
    Json,
}

impl OtlpFormat {
    /// Detect from file extension. Defaults to protobuf.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Protobuf,
        }
    }
}

/// Decode a metrics request from bytes
pub fn decode_metrics(
    bytes: &[u8],
    format: OtlpFormat,
) -> Result<ExportMetricsServiceRequest, ExportError> {
    match format {
        OtlpFormat::Protobuf => ExportMetricsServiceRequest::decode(bytes)
            .map_err(|e| ExportError::Decode(format!("protobuf decode error: {}", e))),
        OtlpFormat::Json => serde_json::from_slice(bytes)
            .map_err(|e| ExportError::Decode(format!("JSON decode error: {}", e))),
    }
}

/// Read and decode a metrics file
pub async fn read_metrics_file(path: &Path) -> Result<ExportMetricsServiceRequest, ExportError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ExportError::Decode(format!("Failed to read {}: {}", path.display(), e))
    })?;
    decode_metrics(&bytes, OtlpFormat::from_path(path))
}
