//! Threshold validator (C7): walk an aggregate's endpoint metrics and emit
//! breach records (§4.7).

use venom_core::{is_global_metric, Aggregate, MetricKind, MetricValues, Severity, ThresholdConfig};

use crate::resolver::ThresholdResolver;

/// Validate every non-global metric in `aggregate` against `config`,
/// returning the full list of breaches (§4.7).
pub fn validate(aggregate: &Aggregate, config: &ThresholdConfig) -> Vec<venom_core::Breach> {
    let resolver = ThresholdResolver::new(config);
    let mut breaches = Vec::new();

    for (name, metric) in &aggregate.metrics {
        if is_global_metric(name) {
            continue;
        }

        let thresholds = resolver.resolve(name);
        let min_samples = thresholds.min_samples.unwrap_or(config.options.min_samples);
        let sample_count = sample_count(&metric.values);
        if sample_count < min_samples {
            continue;
        }

        if metric.kind == MetricKind::Trend {
            for (key, threshold) in thresholds.duration_thresholds() {
                let Some(observed) = duration_value(&metric.values, key) else {
                    continue;
                };
                let tolerance = threshold.tolerance_percent.unwrap_or(config.options.tolerance_percent);
                let effective = threshold.value_ms * (1.0 + tolerance / 100.0);
                if observed > effective {
                    let severity = severity_for(observed, threshold.value_ms, tolerance);
                    breaches.push(venom_core::Breach {
                        endpoint: name.clone(),
                        metric: key.to_string(),
                        observed,
                        threshold: threshold.value_ms,
                        unit: "ms".to_string(),
                        severity,
                        sample_count,
                    });
                }
            }
        }

        if let Some(rate_threshold) = &thresholds.error_rate {
            // `count` here is total trials (passes + fails), not the Trend
            // kind's sample count — a Rate metric has no separate `count`
            // field of its own (§3).
            let fails = metric.values.fails.unwrap_or(0.0);
            let passes = metric.values.passes.unwrap_or(0.0);
            let count = passes + fails;
            let observed = if count > 0.0 { fails / count } else { 0.0 };
            let tolerance = rate_threshold.tolerance_percent.unwrap_or(config.options.tolerance_percent);
            let effective = rate_threshold.value * (1.0 + tolerance / 100.0);
            if observed > effective {
                let severity = severity_for(observed, rate_threshold.value, tolerance);
                breaches.push(venom_core::Breach {
                    endpoint: name.clone(),
                    metric: "error_rate".to_string(),
                    observed: observed * 100.0,
                    threshold: rate_threshold.value * 100.0,
                    unit: "%".to_string(),
                    severity,
                    sample_count,
                });
            }
        }

        if let Some(rps_threshold) = &thresholds.rps {
            let observed = metric.values.rate.unwrap_or(0.0);
            let tolerance = rps_threshold.tolerance_percent.unwrap_or(config.options.tolerance_percent);
            let effective = rps_threshold.value * (1.0 + tolerance / 100.0);
            if observed > effective {
                let severity = severity_for(observed, rps_threshold.value, tolerance);
                breaches.push(venom_core::Breach {
                    endpoint: name.clone(),
                    metric: "rps".to_string(),
                    observed,
                    threshold: rps_threshold.value,
                    unit: "req/s".to_string(),
                    severity,
                    sample_count,
                });
            }
        }
    }

    breaches
}

/// A rate metric carries no `count` of its own (§3) — its sample count is
/// `passes + fails` instead, same reasoning as the `error_rate` denominator
/// below.
fn sample_count(values: &MetricValues) -> u64 {
    let count = values
        .count
        .unwrap_or_else(|| values.passes.unwrap_or(0.0) + values.fails.unwrap_or(0.0));
    count.floor() as u64
}

fn duration_value(values: &MetricValues, key: &str) -> Option<f64> {
    MetricValues::DURATION_SLOTS
        .iter()
        .find(|(name, _)| *name == key)
        .and_then(|(_, getter)| getter(values))
}

/// Warning if within 1.5x the configured tolerance of the threshold, error
/// beyond it (§4.7 step 4).
fn severity_for(observed: f64, threshold: f64, tolerance_percent: f64) -> Severity {
    let warning_ceiling = threshold * (1.0 + 1.5 * tolerance_percent / 100.0);
    if observed <= warning_ceiling {
        Severity::Warning
    } else {
        Severity::Error
    }
}
