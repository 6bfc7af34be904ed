//! Shared data model for the Dynamic Path Normalization and Metrics
//! Aggregation/Threshold-Validation engine (DPN+MATV).
//!
//! Defines the snapshot/metric/threshold types exchanged between every other
//! crate in the workspace, plus the typed error kinds returned at each
//! boundary. Nothing in here normalizes paths, merges metrics, or resolves
//! thresholds — see `venom-normalize`, `venom-merge`, and `venom-thresholds`.

pub mod collaborator;
pub mod error;
pub mod metric;
pub mod snapshot;
pub mod threshold;

pub use error::{ConfigError, SnapshotError};
pub use metric::{Metric, MetricKind, MetricValues};
pub use snapshot::{is_global_metric, Aggregate, Snapshot, TestCheck, TestGroup};
pub use threshold::{
    Breach, DurationThreshold, RateThreshold, Severity, ThresholdConfig, ThresholdOptions,
    ThresholdValues,
};
