//! Metrics tree traversal
//!
//! Walks resource → scope → metric in input order. Resource context is computed
//! once per resource; rows are produced lazily, one metric at a time.

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;

use super::mapper::{ResourceContext, map_metric};
use crate::data::types::MetricRow;

/// Lazily flatten a batch into rows, preserving input order
pub fn walk_batch(request: &ExportMetricsServiceRequest) -> impl Iterator<Item = MetricRow> + '_ {
    request.resource_metrics.iter().flat_map(|resource_metrics| {
        let ctx = ResourceContext::from_resource(resource_metrics.resource.as_ref());
        resource_metrics
            .scope_metrics
            .iter()
            .flat_map(|scope_metrics| scope_metrics.metrics.iter())
            .flat_map(move |metric| map_metric(metric, &ctx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::MetricType;
    use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
    use opentelemetry_proto::tonic::metrics::v1::{
        ExponentialHistogram, Gauge, Histogram, HistogramDataPoint, Metric, NumberDataPoint,
        ResourceMetrics, ScopeMetrics, Sum, metric::Data, number_data_point,
    };
    use opentelemetry_proto::tonic::resource::v1::Resource;

    fn make_key_value(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.to_string())),
            }),
        }
    }

    fn points(n: usize) -> Vec<NumberDataPoint> {
        (0..n)
            .map(|i| NumberDataPoint {
                time_unix_nano: 1_000 + i as u64,
                value: Some(number_data_point::Value::AsInt(i as i64)),
                ..Default::default()
            })
            .collect()
    }

    fn hist_points(counts: &[u64]) -> Vec<HistogramDataPoint> {
        counts
            .iter()
            .map(|&count| HistogramDataPoint {
                count,
                sum: Some(10.0),
                ..Default::default()
            })
            .collect()
    }

    fn metric(name: &str, data: Data) -> Metric {
        Metric {
            name: name.to_string(),
            data: Some(data),
            ..Default::default()
        }
    }

    fn resource(service: &str, host: Option<&str>) -> Option<Resource> {
        let mut attributes = vec![make_key_value("service.name", service)];
        if let Some(host) = host {
            attributes.push(make_key_value("host.name", host));
        }
        Some(Resource {
            attributes,
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_request() {
        let request = ExportMetricsServiceRequest::default();
        assert_eq!(walk_batch(&request).count(), 0);
    }

    #[test]
    fn test_row_count_matches_data_points() {
        let request = ExportMetricsServiceRequest {
            resource_metrics: vec![ResourceMetrics {
                resource: resource("svc", Some("host")),
                scope_metrics: vec![
                    ScopeMetrics {
                        metrics: vec![
                            metric("g", Data::Gauge(Gauge { data_points: points(3) })),
                            metric(
                                "s",
                                Data::Sum(Sum {
                                    data_points: points(2),
                                    is_monotonic: true,
                                    ..Default::default()
                                }),
                            ),
                        ],
                        ..Default::default()
                    },
                    ScopeMetrics {
                        metrics: vec![
                            metric(
                                "h",
                                Data::Histogram(Histogram {
                                    data_points: hist_points(&[0, 1, 5, 0]),
                                    ..Default::default()
                                }),
                            ),
                            metric(
                                "eh",
                                Data::ExponentialHistogram(ExponentialHistogram::default()),
                            ),
                        ],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
        };

        // 3 gauge + 2 sum + 2 histogram points with count > 0
        assert_eq!(walk_batch(&request).count(), 7);
    }

    #[test]
    fn test_input_order_is_preserved() {
        let request = ExportMetricsServiceRequest {
            resource_metrics: vec![
                ResourceMetrics {
                    resource: resource("first", None),
                    scope_metrics: vec![ScopeMetrics {
                        metrics: vec![
                            metric("b", Data::Gauge(Gauge { data_points: points(1) })),
                            metric("a", Data::Gauge(Gauge { data_points: points(1) })),
                        ],
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                ResourceMetrics {
                    resource: resource("second", None),
                    scope_metrics: vec![ScopeMetrics {
                        metrics: vec![metric(
                            "c",
                            Data::Histogram(Histogram {
                                data_points: hist_points(&[2]),
                                ..Default::default()
                            }),
                        )],
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
        };

        let rows: Vec<MetricRow> = walk_batch(&request).collect();
        let names: Vec<&str> = rows.iter().map(|r| r.metric_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(rows[2].metric_type, MetricType::Histogram);
        assert_eq!(rows[2].service_name, "second");
    }

    #[test]
    fn test_resource_context_shared_across_rows() {
        let request = ExportMetricsServiceRequest {
            resource_metrics: vec![
                ResourceMetrics {
                    resource: resource("svc", Some("host-1")),
                    scope_metrics: vec![
                        ScopeMetrics {
                            metrics: vec![metric("g", Data::Gauge(Gauge { data_points: points(2) }))],
                            ..Default::default()
                        },
                        ScopeMetrics {
                            metrics: vec![metric(
                                "s",
                                Data::Sum(Sum {
                                    data_points: points(2),
                                    ..Default::default()
                                }),
                            )],
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                ResourceMetrics {
                    resource: None,
                    scope_metrics: vec![ScopeMetrics {
                        metrics: vec![metric("g", Data::Gauge(Gauge { data_points: points(1) }))],
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
        };

        let rows: Vec<MetricRow> = walk_batch(&request).collect();
        assert_eq!(rows.len(), 5);
        for row in &rows[..4] {
            assert_eq!(row.service_name, "svc");
            assert_eq!(row.host_name, "host-1");
        }
        assert_eq!(rows[4].service_name, "");
        assert_eq!(rows[4].host_name, "");
    }
}
