//! Threshold configuration and breach records (§3, §6).
//!
//! `groups` is a `BTreeMap` rather than an insertion-ordered map so that
//! pattern iteration is lexicographically stable by construction (§4.6) —
//! no separate sort step is needed at resolve time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// The three-tier threshold configuration loaded from YAML (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub options: ThresholdOptions,
    pub defaults: ThresholdValues,
    pub groups: BTreeMap<String, ThresholdValues>,
    pub endpoints: BTreeMap<String, ThresholdValues>,
}

/// Run-wide tolerance and sample-count knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdOptions {
    pub tolerance_percent: f64,
    pub min_samples: u64,
    /// When true (the default), threshold breaches never fail the process;
    /// they are only reported. A caller must both set this to false *and*
    /// request `--hard-fail` to turn error-severity breaches into a nonzero
    /// exit (§7).
    pub soft_fail: bool,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            tolerance_percent: 0.0,
            min_samples: 0,
            soft_fail: true,
        }
    }
}

/// The threshold values configurable at any tier (defaults/group/endpoint).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<DurationThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<DurationThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<DurationThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<DurationThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<DurationThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<DurationThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<RateThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rps: Option<RateThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_samples: Option<u64>,
}

impl ThresholdValues {
    /// Overlay `other` onto `self`, field-wise replace-if-not-empty (§4.6).
    pub fn overlay(&mut self, other: &ThresholdValues) {
        macro_rules! take {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field.clone();
                }
            };
        }
        take!(p50);
        take!(p90);
        take!(p95);
        take!(p99);
        take!(avg);
        take!(max);
        take!(error_rate);
        take!(rps);
        take!(min_samples);
    }

    /// Iterate the configured duration thresholds as `(value-name, threshold)`.
    pub fn duration_thresholds(&self) -> impl Iterator<Item = (&'static str, &DurationThreshold)> {
        [
            ("p(50)", &self.p50),
            ("p(90)", &self.p90),
            ("p(95)", &self.p95),
            ("p(99)", &self.p99),
            ("avg", &self.avg),
            ("max", &self.max),
        ]
        .into_iter()
        .filter_map(|(name, t)| t.as_ref().map(|t| (name, t)))
    }
}

/// A duration threshold in milliseconds, with an optional per-threshold
/// tolerance override. Deserializes from either a bare duration string
/// (`"500ms"`) or `{value: "500ms", tolerance_percent: 10}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationThreshold {
    pub value_ms: f64,
    pub tolerance_percent: Option<f64>,
}

impl<'de> Deserialize<'de> for DurationThreshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bare(String),
            Full {
                value: String,
                tolerance_percent: Option<f64>,
            },
        }

        let repr = Repr::deserialize(deserializer)?;
        let (raw, tolerance_percent) = match repr {
            Repr::Bare(s) => (s, None),
            Repr::Full {
                value,
                tolerance_percent,
            } => (value, tolerance_percent),
        };
        let duration: Duration = humantime::parse_duration(&raw).map_err(serde::de::Error::custom)?;
        Ok(DurationThreshold {
            value_ms: duration.as_secs_f64() * 1000.0,
            tolerance_percent,
        })
    }
}

impl Serialize for DurationThreshold {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = Duration::from_secs_f64(self.value_ms / 1000.0);
        let text = humantime::format_duration(duration).to_string();
        match self.tolerance_percent {
            None => serializer.serialize_str(&text),
            Some(tol) => {
                use serde::ser::SerializeStruct;
                let mut s = serializer.serialize_struct("DurationThreshold", 2)?;
                s.serialize_field("value", &text)?;
                s.serialize_field("tolerance_percent", &tol)?;
                s.end()
            }
        }
    }
}

/// A rate threshold (e.g. `error_rate`, `rps`), bare number or
/// `{value: <number>, tolerance_percent: <float>}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateThreshold {
    pub value: f64,
    pub tolerance_percent: Option<f64>,
}

impl<'de> Deserialize<'de> for RateThreshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bare(f64),
            Full {
                value: f64,
                tolerance_percent: Option<f64>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bare(value) => RateThreshold {
                value,
                tolerance_percent: None,
            },
            Repr::Full {
                value,
                tolerance_percent,
            } => RateThreshold {
                value,
                tolerance_percent,
            },
        })
    }
}

impl Serialize for RateThreshold {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.tolerance_percent {
            None => serializer.serialize_f64(self.value),
            Some(tol) => {
                use serde::ser::SerializeStruct;
                let mut s = serializer.serialize_struct("RateThreshold", 2)?;
                s.serialize_field("value", &self.value)?;
                s.serialize_field("tolerance_percent", &tol)?;
                s.end()
            }
        }
    }
}

/// Severity of a threshold breach: `warning` is within 1.5x tolerance,
/// `error` is beyond it (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One observed-value-exceeds-threshold record (§3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Breach {
    pub endpoint: String,
    pub metric: String,
    pub observed: f64,
    pub threshold: f64,
    pub unit: String,
    pub severity: Severity,
    pub sample_count: u64,
}
