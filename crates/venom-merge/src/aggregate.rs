//! Fold one snapshot into the running aggregate (§4.5, §4.8 step 2).
//!
//! Endpoint metrics flow through the cardinality controller; global metrics
//! bypass it entirely and land in the same aggregate map under their
//! canonical name.

use venom_core::{is_global_metric, Aggregate, Metric, Snapshot, TestCheck, TestGroup};
use venom_normalize::{Admission, CardinalityController, PathNormalizer};

use crate::merge::{merge_metric, MergeStats};
use crate::strategy::MergeStrategy;

/// Fold `source` into `aggregate` in place: every non-global metric name is
/// first collapsed to its endpoint template by `normalizer` (C2), then
/// admitted through `cardinality` (C3); global metrics bypass both and merge
/// directly under their canonical name.
pub fn fold_into(
    aggregate: &mut Aggregate,
    source: Snapshot,
    normalizer: &PathNormalizer,
    cardinality: &CardinalityController,
    strategy: MergeStrategy,
    stats: &mut MergeStats,
) {
    for (name, metric) in source.metrics {
        let key = if is_global_metric(&name) {
            name
        } else {
            let template = normalizer.normalize_path(&name);
            match cardinality.admit(&template, &name) {
                Admission::Key(k) => k,
                Admission::Bucketed(k) => k,
                Admission::Dropped => continue,
            }
        };
        insert_or_merge(aggregate, key, metric, strategy, stats);
    }

    merge_group(&mut aggregate.root_group, source.root_group);

    if let Some(setup) = source.setup_data {
        aggregate.setup_data.get_or_insert(setup);
    }

    aggregate.start_time = earlier(aggregate.start_time, source.start_time);
    aggregate.end_time = later(aggregate.end_time, source.end_time);
}

fn insert_or_merge(
    aggregate: &mut Aggregate,
    key: String,
    metric: Metric,
    strategy: MergeStrategy,
    stats: &mut MergeStats,
) {
    // Clone-on-first-insert: never alias the source's map data into the
    // aggregate (§4.5).
    match aggregate.metrics.get_mut(&key) {
        Some(target) => merge_metric(target, &metric, strategy, stats),
        None => {
            aggregate.metrics.insert(key, metric.clone());
        }
    }
}

/// Merge two test-group trees by key, recursively unioning nested groups and
/// summing check pass/fail counts. Not specified precisely by the merge
/// kernel (which only covers metrics) — this is the natural reading of
/// "fold N runs of the same suite into one report".
fn merge_group(target: &mut TestGroup, source: TestGroup) {
    if target.name.is_empty() {
        target.name = source.name;
    }
    if target.path.is_empty() {
        target.path = source.path;
    }
    if target.id.is_empty() {
        target.id = source.id;
    }

    for (name, check) in source.checks {
        target
            .checks
            .entry(name)
            .and_modify(|t| merge_check(t, &check))
            .or_insert(check);
    }

    for (name, group) in source.groups {
        target
            .groups
            .entry(name)
            .and_modify(|t| merge_group(t, group.clone()))
            .or_insert(group);
    }
}

fn merge_check(target: &mut TestCheck, source: &TestCheck) {
    target.passes += source.passes;
    target.fails += source.fails;
}

fn earlier(
    a: Option<chrono::DateTime<chrono::Utc>>,
    b: Option<chrono::DateTime<chrono::Utc>>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn later(
    a: Option<chrono::DateTime<chrono::Utc>>,
    b: Option<chrono::DateTime<chrono::Utc>>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
