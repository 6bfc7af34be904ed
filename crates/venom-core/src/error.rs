//! Typed error kinds surfaced at crate boundaries (§7).
//!
//! `MergeKindMismatch` deliberately has no variant here — a kind mismatch
//! during merge is a silent no-op, not a propagated error (§4.5, §7); callers
//! track it via a run-level counter instead (see `venom_merge::MergeStats`).

use std::path::PathBuf;

/// Failure reading or validating a per-run metric snapshot (C4).
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot file not found: {0}")]
    NotFound(PathBuf),
    #[error("permission denied reading {0}")]
    Permission(PathBuf),
    #[error("corrupt snapshot JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {0} has no root_group")]
    MissingRootGroup(PathBuf),
    #[error("ingest of {0} was cancelled")]
    Cancelled(PathBuf),
}

impl SnapshotError {
    /// The file this error is about, for orchestrator-level reporting.
    pub fn file(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::Permission(p) | Self::MissingRootGroup(p) | Self::Cancelled(p) => p,
            Self::Corrupt { path, .. } => path,
        }
    }
}

/// Failure loading or applying threshold configuration (C6/C7), or an
/// invocation-level precondition failure (an empty input set).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read threshold config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse threshold config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid duration or rate threshold: {0}")]
    InvalidValue(String),
    #[error("no input snapshot files were given")]
    EmptyInputSet,
}
