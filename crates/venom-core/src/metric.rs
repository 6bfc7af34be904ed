//! Metric kinds and the closed set of numeric values each kind carries.

use serde::{Deserialize, Serialize};

/// The four metric kinds a snapshot or aggregate may hold per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Rate,
    Trend,
}

/// A tagged metric record: `{"type": ..., "values": {...}}` on the wire.
///
/// `values` is a closed, numeric-only mapping — see [`MetricValues`] — rather
/// than an open map-of-any, since every kind has a fixed, small vocabulary of
/// value names (§3 of the design).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub values: MetricValues,
}

impl Metric {
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            values: MetricValues::default(),
        }
    }
}

/// The union of every numeric field any metric kind may populate.
///
/// Per kind, only a subset is meaningful:
/// - counter: `count`, `rate`
/// - gauge: `value`, `min`, `max`
/// - rate: `passes`, `fails`, `value`
/// - trend: `count`, `min`, `max`, `avg`, `p50`, `p90`, `p95`, `p99`
///
/// Unused fields are simply absent (`None`) rather than zeroed, so a merge
/// can tell "never set" apart from "set to zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fails: Option<f64>,
    #[serde(rename = "p(50)", default, skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(rename = "p(90)", default, skip_serializing_if = "Option::is_none")]
    pub p90: Option<f64>,
    #[serde(rename = "p(95)", default, skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
    #[serde(rename = "p(99)", default, skip_serializing_if = "Option::is_none")]
    pub p99: Option<f64>,
}

impl MetricValues {
    /// The six named percentile/avg/max slots a duration threshold can target,
    /// paired with their JSON value-name.
    pub const DURATION_SLOTS: [(&'static str, fn(&MetricValues) -> Option<f64>); 6] = [
        ("p(50)", |v| v.p50),
        ("p(90)", |v| v.p90),
        ("p(95)", |v| v.p95),
        ("p(99)", |v| v.p99),
        ("avg", |v| v.avg),
        ("max", |v| v.max),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_metric_round_trips_through_json() {
        let metric = Metric {
            kind: MetricKind::Trend,
            values: MetricValues {
                count: Some(5.0),
                min: Some(10.0),
                max: Some(400.0),
                avg: Some(160.0),
                p95: Some(224.0),
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&metric).unwrap();
        assert!(json.contains("\"p(95)\""));
        let back: Metric = serde_json::from_str(&json).unwrap();
        assert_eq!(back.values.p95, Some(224.0));
        assert_eq!(back.values.rate, None);
    }

    #[test]
    fn integer_json_values_survive_as_floats() {
        let json = r#"{"type":"counter","values":{"count":1234}}"#;
        let metric: Metric = serde_json::from_str(json).unwrap();
        assert_eq!(metric.values.count, Some(1234.0));
    }
}
