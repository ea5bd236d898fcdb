//! Row mapping for a single metric
//!
//! Dispatches on the metric shape and turns each data point into one `MetricRow`.
//! Pure: the same metric and resource context always produce the same rows.

use opentelemetry_proto::tonic::metrics::v1::{
    HistogramDataPoint, Metric, NumberDataPoint, metric::Data, number_data_point,
};
use opentelemetry_proto::tonic::resource::v1::Resource;

use crate::data::types::{MetricRow, MetricType};
use crate::utils::otlp::{extract_attributes, get_attribute, keys};
use crate::utils::time::nanos_to_datetime;

/// Resource-level context extracted once per resource_metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceContext {
    pub service_name: String,
    pub host_name: String,
}

impl ResourceContext {
    pub fn from_resource(resource: Option<&Resource>) -> Self {
        let attrs = resource.map(|r| r.attributes.as_slice()).unwrap_or_default();
        Self {
            service_name: get_attribute(attrs, keys::SERVICE_NAME),
            host_name: get_attribute(attrs, keys::HOST_NAME),
        }
    }
}

/// The metric shapes the exporter knows how to flatten
#[derive(Debug, Clone, Copy)]
pub enum MetricShape<'a> {
    Gauge(&'a [NumberDataPoint]),
    /// Any OTLP Sum; monotonicity is taken as given by the producer
    MonotonicSum(&'a [NumberDataPoint]),
    Histogram(&'a [HistogramDataPoint]),
    /// Shapes that produce no rows, named for logging
    Unknown(&'static str),
}

impl<'a> MetricShape<'a> {
    pub fn of(metric: &'a Metric) -> Self {
        match &metric.data {
            Some(Data::Gauge(g)) => Self::Gauge(&g.data_points),
            Some(Data::Sum(s)) => Self::MonotonicSum(&s.data_points),
            Some(Data::Histogram(h)) => Self::Histogram(&h.data_points),
            Some(Data::ExponentialHistogram(_)) => Self::Unknown("exponential_histogram"),
            Some(Data::Summary(_)) => Self::Unknown("summary"),
            None => Self::Unknown("empty"),
        }
    }
}

/// Map one metric to rows
pub fn map_metric(metric: &Metric, ctx: &ResourceContext) -> Vec<MetricRow> {
    if metric.name.is_empty() {
        tracing::warn!("Skipping metric with empty name");
        return Vec::new();
    }

    match MetricShape::of(metric) {
        MetricShape::Gauge(points) => points
            .iter()
            .map(|dp| number_row(&metric.name, MetricType::Gauge, dp, ctx))
            .collect(),
        MetricShape::MonotonicSum(points) => points
            .iter()
            .map(|dp| number_row(&metric.name, MetricType::Sum, dp, ctx))
            .collect(),
        MetricShape::Histogram(points) => points
            .iter()
            .filter_map(|dp| histogram_row(&metric.name, dp, ctx))
            .collect(),
        MetricShape::Unknown(kind) => {
            tracing::debug!(
                metric_name = %metric.name,
                kind,
                "Ignoring metric with unsupported shape"
            );
            Vec::new()
        }
    }
}

/// Numeric value of a Gauge/Sum point; ints widen to f64, absent is 0
pub fn number_value(dp: &NumberDataPoint) -> f64 {
    match dp.value {
        Some(number_data_point::Value::AsDouble(d)) => d,
        Some(number_data_point::Value::AsInt(i)) => i as f64,
        None => 0.0,
    }
}

/// Mean of a histogram point, `None` when count is 0
pub fn histogram_mean(dp: &HistogramDataPoint) -> Option<f64> {
    (dp.count > 0).then(|| dp.sum.unwrap_or(0.0) / dp.count as f64)
}

fn number_row(
    name: &str,
    metric_type: MetricType,
    dp: &NumberDataPoint,
    ctx: &ResourceContext,
) -> MetricRow {
    MetricRow {
        timestamp: nanos_to_datetime(dp.time_unix_nano),
        metric_name: name.to_string(),
        metric_type,
        value: number_value(dp),
        labels: extract_attributes(&dp.attributes),
        service_name: ctx.service_name.clone(),
        host_name: ctx.host_name.clone(),
    }
}

fn histogram_row(name: &str, dp: &HistogramDataPoint, ctx: &ResourceContext) -> Option<MetricRow> {
    let value = histogram_mean(dp)?;
    Some(MetricRow {
        timestamp: nanos_to_datetime(dp.time_unix_nano),
        metric_name: name.to_string(),
        metric_type: MetricType::Histogram,
        value,
        labels: extract_attributes(&dp.attributes),
        service_name: ctx.service_name.clone(),
        host_name: ctx.host_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
    use opentelemetry_proto::tonic::metrics::v1::{Gauge, Histogram, Sum, Summary};

    const TS: u64 = 1_704_067_200_000_000_000;

    fn make_key_value(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.to_string())),
            }),
        }
    }

    fn ctx() -> ResourceContext {
        ResourceContext {
            service_name: "test-service".to_string(),
            host_name: "test-host".to_string(),
        }
    }

    fn number_point(value: number_data_point::Value) -> NumberDataPoint {
        NumberDataPoint {
            time_unix_nano: TS,
            value: Some(value),
            ..Default::default()
        }
    }

    fn gauge(name: &str, points: Vec<NumberDataPoint>) -> Metric {
        Metric {
            name: name.to_string(),
            data: Some(Data::Gauge(Gauge { data_points: points })),
            ..Default::default()
        }
    }

    fn histogram(points: Vec<HistogramDataPoint>) -> Metric {
        Metric {
            name: "http.server.duration".to_string(),
            data: Some(Data::Histogram(Histogram {
                data_points: points,
                aggregation_temporality: 2,
            })),
            ..Default::default()
        }
    }

    fn histogram_point(count: u64, sum: Option<f64>) -> HistogramDataPoint {
        HistogramDataPoint {
            time_unix_nano: TS,
            count,
            sum,
            ..Default::default()
        }
    }

    #[test]
    fn test_gauge_int_value_widens() {
        let metric = gauge(
            "system.memory.usage",
            vec![number_point(number_data_point::Value::AsInt(8589934592))],
        );
        let rows = map_metric(&metric, &ctx());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].metric_name, "system.memory.usage");
        assert_eq!(rows[0].metric_type, MetricType::Gauge);
        assert_eq!(rows[0].value, 8589934592.0);
        assert_eq!(rows[0].timestamp, nanos_to_datetime(TS));
    }

    #[test]
    fn test_sum_double_value() {
        let metric = Metric {
            name: "system.cpu.time".to_string(),
            data: Some(Data::Sum(Sum {
                data_points: vec![number_point(number_data_point::Value::AsDouble(12.7))],
                aggregation_temporality: 2,
                is_monotonic: true,
            })),
            ..Default::default()
        };
        let rows = map_metric(&metric, &ctx());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].metric_type, MetricType::Sum);
        assert_eq!(rows[0].value, 12.7);
    }

    #[test]
    fn test_non_monotonic_sum_is_not_rejected() {
        let metric = Metric {
            name: "queue.depth".to_string(),
            data: Some(Data::Sum(Sum {
                data_points: vec![number_point(number_data_point::Value::AsInt(-3))],
                is_monotonic: false,
                ..Default::default()
            })),
            ..Default::default()
        };
        let rows = map_metric(&metric, &ctx());
        assert_eq!(rows[0].metric_type, MetricType::Sum);
        assert_eq!(rows[0].value, -3.0);
    }

    #[test]
    fn test_gauge_labels() {
        let mut dp = number_point(number_data_point::Value::AsDouble(42.0));
        dp.attributes = vec![
            make_key_value("method", "GET"),
            make_key_value("path", "/api/users"),
            make_key_value("status", "200"),
        ];
        let rows = map_metric(&gauge("http.requests", vec![dp]), &ctx());
        assert_eq!(rows.len(), 1);

        let labels = &rows[0].labels;
        assert_eq!(labels.len(), 3);
        assert_eq!(labels["method"], "GET");
        assert_eq!(labels["path"], "/api/users");
        assert_eq!(labels["status"], "200");
    }

    #[test]
    fn test_missing_number_value_is_zero() {
        let dp = NumberDataPoint {
            time_unix_nano: TS,
            ..Default::default()
        };
        let rows = map_metric(&gauge("no.value", vec![dp]), &ctx());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 0.0);
    }

    #[test]
    fn test_histogram_mean() {
        let rows = map_metric(&histogram(vec![histogram_point(4, Some(20.0))]), &ctx());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].metric_type, MetricType::Histogram);
        assert_eq!(rows[0].value, 5.0);
    }

    #[test]
    fn test_histogram_zero_count_skipped() {
        let rows = map_metric(
            &histogram(vec![
                histogram_point(0, Some(100.0)),
                histogram_point(2, Some(3.0)),
                histogram_point(0, None),
            ]),
            &ctx(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 1.5);
    }

    #[test]
    fn test_histogram_missing_sum() {
        assert_eq!(histogram_mean(&histogram_point(3, None)), Some(0.0));
        assert_eq!(histogram_mean(&histogram_point(0, None)), None);
    }

    #[test]
    fn test_unknown_shapes_produce_no_rows() {
        let summary = Metric {
            name: "rpc.latency".to_string(),
            data: Some(Data::Summary(Summary::default())),
            ..Default::default()
        };
        let empty = Metric {
            name: "no.data".to_string(),
            ..Default::default()
        };
        assert!(matches!(MetricShape::of(&summary), MetricShape::Unknown("summary")));
        assert!(map_metric(&summary, &ctx()).is_empty());
        assert!(map_metric(&empty, &ctx()).is_empty());
    }

    #[test]
    fn test_empty_name_skipped() {
        let metric = gauge("", vec![number_point(number_data_point::Value::AsInt(1))]);
        assert!(map_metric(&metric, &ctx()).is_empty());
    }

    #[test]
    fn test_mapping_is_pure() {
        let mut dp = number_point(number_data_point::Value::AsDouble(1.25));
        dp.attributes = vec![make_key_value("k", "v")];
        let metric = gauge("m", vec![dp]);
        assert_eq!(map_metric(&metric, &ctx()), map_metric(&metric, &ctx()));
    }

    #[test]
    fn test_resource_context_absent_attributes() {
        assert_eq!(ResourceContext::from_resource(None), ResourceContext::default());

        let resource = Resource {
            attributes: vec![make_key_value("service.name", "svc")],
            ..Default::default()
        };
        let ctx = ResourceContext::from_resource(Some(&resource));
        assert_eq!(ctx.service_name, "svc");
        assert_eq!(ctx.host_name, "");
    }
}
