//! Sample batch used by the demo driver

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use opentelemetry_proto::tonic::metrics::v1::{
    AggregationTemporality, Gauge, Metric, NumberDataPoint, ResourceMetrics, ScopeMetrics, Sum,
    metric::Data, number_data_point,
};
use opentelemetry_proto::tonic::resource::v1::Resource;

fn string_kv(key: &str, value: &str) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(AnyValue {
            value: Some(any_value::Value::StringValue(value.to_string())),
        }),
    }
}

fn point(timestamp_nanos: u64, value: f64, attributes: Vec<KeyValue>) -> NumberDataPoint {
    NumberDataPoint {
        time_unix_nano: timestamp_nanos,
        value: Some(number_data_point::Value::AsDouble(value)),
        attributes,
        ..Default::default()
    }
}

/// One resource (`test-service` on `test-host`) with a memory gauge, a CPU
/// counter and a labeled request gauge, all stamped with `timestamp_nanos`.
pub fn sample_batch(timestamp_nanos: u64) -> ExportMetricsServiceRequest {
    let memory = Metric {
        name: "system.memory.usage".to_string(),
        data: Some(Data::Gauge(Gauge {
            data_points: vec![point(timestamp_nanos, 8589934592.0, Vec::new())],
        })),
        ..Default::default()
    };

    let cpu = Metric {
        name: "system.cpu.time".to_string(),
        data: Some(Data::Sum(Sum {
            data_points: vec![point(timestamp_nanos, 12.7, Vec::new())],
            aggregation_temporality: AggregationTemporality::Cumulative as i32,
            is_monotonic: true,
        })),
        ..Default::default()
    };

    let requests = Metric {
        name: "http.requests".to_string(),
        data: Some(Data::Gauge(Gauge {
            data_points: vec![point(
                timestamp_nanos,
                42.0,
                vec![
                    string_kv("method", "GET"),
                    string_kv("path", "/api/users"),
                    string_kv("status", "200"),
                ],
            )],
        })),
        ..Default::default()
    };

    ExportMetricsServiceRequest {
        resource_metrics: vec![ResourceMetrics {
            resource: Some(Resource {
                attributes: vec![
                    string_kv("service.name", "test-service"),
                    string_kv("host.name", "test-host"),
                ],
                ..Default::default()
            }),
            scope_metrics: vec![ScopeMetrics {
                metrics: vec![memory, cpu, requests],
                ..Default::default()
            }],
            ..Default::default()
        }],
    }
}
