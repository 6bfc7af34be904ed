//! Orchestrator (C8): parallel snapshot ingest, then a deterministic
//! sequential fold into one aggregate (§4.8, §5).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use venom_core::{Aggregate, Snapshot, SnapshotError};
use venom_merge::{fold_into, read_snapshot, MergeStats, MergeStrategy};
use venom_normalize::{CardinalityController, PathNormalizer};

use crate::progress::IngestProgress;

pub struct OrchestratorConfig {
    pub max_endpoints: usize,
    pub no_bucket: bool,
    pub strategy: MergeStrategy,
}

pub struct RunOutcome {
    pub aggregate: Aggregate,
    pub stats: MergeStats,
    pub endpoints_bucketed: usize,
}

/// Ingest every file in `files` in parallel, then fold the results into one
/// aggregate in sorted-path order so parallel ingest never changes
/// aggregation order (§5). Any ingest failure aborts the whole run; no
/// partial aggregate is ever returned.
pub fn run(
    files: &[PathBuf],
    config: &OrchestratorConfig,
    cancel: &AtomicBool,
    progress: &IngestProgress,
) -> Result<RunOutcome, SnapshotError> {
    let mut sorted: Vec<PathBuf> = files.to_vec();
    sorted.sort();

    tracing::info!(file_count = sorted.len(), "starting snapshot ingest");
    let ingest_started = Instant::now();

    let ingested: Vec<Result<(PathBuf, Snapshot), SnapshotError>> = sorted
        .par_iter()
        .map(|path| {
            if cancel.load(Ordering::Relaxed) {
                return Err(SnapshotError::Cancelled(path.clone()));
            }
            read_snapshot(path).map(|snapshot| (path.clone(), snapshot))
        })
        .collect();

    tracing::info!(elapsed_ms = ingest_started.elapsed().as_millis(), "ingest complete");

    let mut aggregate = Aggregate::empty();
    let normalizer = PathNormalizer::default();
    let cardinality = CardinalityController::new(config.max_endpoints, config.no_bucket);
    let mut stats = MergeStats::default();

    let merge_started = Instant::now();
    for result in ingested {
        match result {
            Ok((path, snapshot)) => {
                progress.tick(&path.display().to_string());
                fold_into(
                    &mut aggregate,
                    snapshot,
                    &normalizer,
                    &cardinality,
                    config.strategy,
                    &mut stats,
                );
            }
            Err(err) => {
                tracing::warn!(file = %err.file().display(), error = %err, "ingest failed, aborting run");
                progress.finish();
                return Err(err);
            }
        }
    }
    progress.finish();

    tracing::info!(
        elapsed_ms = merge_started.elapsed().as_millis(),
        kind_mismatches = stats.kind_mismatches,
        "merge complete"
    );
    if stats.kind_mismatches > 0 {
        tracing::warn!(
            count = stats.kind_mismatches,
            "dropped metrics with mismatched kinds across sources"
        );
    }

    Ok(RunOutcome {
        aggregate,
        stats,
        endpoints_bucketed: cardinality.endpoints_bucketed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_snapshot(metric_name: &str, count: f64) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        let json = format!(
            r#"{{"root_group":{{"name":"","path":"","id":"","groups":{{}},"checks":{{}}}},
                "metrics":{{"{metric_name}":{{"type":"counter","values":{{"count":{count}}}}}}}}}"#
        );
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn folds_two_snapshots_deterministically() {
        // Same raw path in both files collapses to the same endpoint
        // template ("users_profile", per the C2 worked example) and merges.
        let raw = "/api/v1/users/550e8400-e29b-41d4-a716-446655440000/profile";
        let a = write_snapshot(raw, 2.0);
        let b = write_snapshot(raw, 3.0);
        let files = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let config = OrchestratorConfig {
            max_endpoints: 100,
            no_bucket: false,
            strategy: MergeStrategy::Weighted,
        };
        let cancel = AtomicBool::new(false);
        let progress = IngestProgress::new(0, true);
        let outcome = run(&files, &config, &cancel, &progress).unwrap();
        assert_eq!(outcome.aggregate.metrics["users_profile"].values.count, Some(5.0));
    }

    #[test]
    fn missing_file_aborts_whole_run() {
        let files = vec![PathBuf::from("/no/such/file.json")];
        let config = OrchestratorConfig {
            max_endpoints: 100,
            no_bucket: false,
            strategy: MergeStrategy::Weighted,
        };
        let cancel = AtomicBool::new(false);
        let progress = IngestProgress::new(0, true);
        let err = run(&files, &config, &cancel, &progress).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[test]
    fn cancellation_is_observed_per_file() {
        let a = write_snapshot("GET_users", 2.0);
        let files = vec![a.path().to_path_buf()];
        let config = OrchestratorConfig {
            max_endpoints: 100,
            no_bucket: false,
            strategy: MergeStrategy::Weighted,
        };
        let cancel = AtomicBool::new(true);
        let progress = IngestProgress::new(0, true);
        let err = run(&files, &config, &cancel, &progress).unwrap_err();
        assert!(matches!(err, SnapshotError::Cancelled(_)));
    }
}
