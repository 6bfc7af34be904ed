//! Merge kernel (C5): fold one source metric into a target of the same kind
//! (§4.5). Dispatches on `MetricKind`; a kind mismatch is a silent no-op
//! tracked via [`MergeStats`] rather than a propagated error (§7).

use venom_core::{Metric, MetricKind, MetricValues};

use crate::strategy::MergeStrategy;

/// Run-level counters the orchestrator surfaces alongside the aggregate.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeStats {
    pub kind_mismatches: usize,
}

/// Merge `source` into `target` in place. `strategy` only affects trend
/// merges; `Sketch` currently behaves identically to `Weighted` (§4.5).
pub fn merge_metric(
    target: &mut Metric,
    source: &Metric,
    strategy: MergeStrategy,
    stats: &mut MergeStats,
) {
    if target.kind != source.kind {
        stats.kind_mismatches += 1;
        return;
    }

    match target.kind {
        MetricKind::Counter => merge_counter(&mut target.values, &source.values),
        MetricKind::Gauge => merge_gauge(&mut target.values, &source.values),
        MetricKind::Rate => merge_rate(&mut target.values, &source.values),
        MetricKind::Trend => merge_trend(&mut target.values, &source.values, strategy),
    }
}

fn merge_counter(t: &mut MetricValues, s: &MetricValues) {
    let duration = rate_duration_hint(t).unwrap_or(1.0);
    let count = t.count.unwrap_or(0.0) + s.count.unwrap_or(0.0);
    t.count = Some(count);
    t.rate = Some(count / duration);
}

/// Best-effort duration hint for counter rate recomputation: `rate` was
/// previously `count / duration`, so back out `duration` from it when
/// possible; otherwise assume a one-second window (§4.5).
fn rate_duration_hint(values: &MetricValues) -> Option<f64> {
    match (values.count, values.rate) {
        (Some(count), Some(rate)) if rate > 0.0 => Some(count / rate),
        _ => None,
    }
}

fn merge_gauge(t: &mut MetricValues, s: &MetricValues) {
    merge_max_field(&mut t.value, s.value);
    merge_max_field(&mut t.min, s.min);
    merge_max_field(&mut t.max, s.max);
}

fn merge_max_field(target: &mut Option<f64>, source: Option<f64>) {
    *target = match (*target, source) {
        (Some(t), Some(s)) => Some(t.max(s)),
        (None, Some(s)) => Some(s),
        (t, None) => t,
    };
}

fn merge_rate(t: &mut MetricValues, s: &MetricValues) {
    let passes = t.passes.unwrap_or(0.0) + s.passes.unwrap_or(0.0);
    let fails = t.fails.unwrap_or(0.0) + s.fails.unwrap_or(0.0);
    t.passes = Some(passes);
    t.fails = Some(fails);
    let denom = passes + fails;
    if denom > 0.0 {
        t.value = Some(passes / denom);
    }
}

fn merge_trend(t: &mut MetricValues, s: &MetricValues, _strategy: MergeStrategy) {
    let n_t = t.count.unwrap_or(0.0);
    let n_s = s.count.unwrap_or(0.0);
    let n = n_t + n_s;
    if n == 0.0 {
        return;
    }

    t.count = Some(n);
    merge_min_field(&mut t.min, s.min);
    merge_max_field(&mut t.max, s.max);
    t.avg = weighted_average(t.avg, n_t, s.avg, n_s, n);
    t.p50 = weighted_average(t.p50, n_t, s.p50, n_s, n);
    t.p90 = weighted_average(t.p90, n_t, s.p90, n_s, n);
    t.p95 = weighted_average(t.p95, n_t, s.p95, n_s, n);
    t.p99 = weighted_average(t.p99, n_t, s.p99, n_s, n);
}

fn merge_min_field(target: &mut Option<f64>, source: Option<f64>) {
    *target = match (*target, source) {
        (Some(t), Some(s)) => Some(t.min(s)),
        (None, Some(s)) => Some(s),
        (t, None) => t,
    };
}

/// A percentile or `avg` present on both sides merges to the sample-weighted
/// average; present on only one side it is left untouched on target — it is
/// never imported from source alone (§4.5).
fn weighted_average(t: Option<f64>, n_t: f64, s: Option<f64>, n_s: f64, n: f64) -> Option<f64> {
    match (t, s) {
        (Some(tv), Some(sv)) => Some((tv * n_t + sv * n_s) / n),
        (t, _) => t,
    }
}
