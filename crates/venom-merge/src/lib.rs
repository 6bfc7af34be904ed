//! Snapshot ingest and the merge kernel: reading per-run JSON output (C4)
//! and folding it into a running aggregate (C5).

pub mod aggregate;
pub mod merge;
pub mod reader;
pub mod strategy;

pub use aggregate::fold_into;
pub use merge::{merge_metric, MergeStats};
pub use reader::read_snapshot;
pub use strategy::MergeStrategy;
