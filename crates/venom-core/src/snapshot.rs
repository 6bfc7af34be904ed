//! Per-run metric snapshots and the in-memory aggregate they fold into.

use crate::metric::Metric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single load-test run's output: the group/check tree plus endpoint and
/// global metrics. Read once via `venom-merge`'s snapshot reader, then
/// discarded after folding into the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub root_group: TestGroup,
    #[serde(default)]
    pub metrics: BTreeMap<String, Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// An empty snapshot skeleton, the seed the orchestrator folds sources into.
    pub fn empty() -> Self {
        Self {
            root_group: TestGroup::default(),
            metrics: BTreeMap::new(),
            setup_data: None,
            start_time: None,
            end_time: None,
        }
    }
}

/// The aggregate produced by merging every input snapshot. Same shape as a
/// `Snapshot` — the output file format is the input file format (§6).
pub type Aggregate = Snapshot;

/// A test group node: name/path/id plus nested groups and checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub groups: BTreeMap<String, TestGroup>,
    #[serde(default)]
    pub checks: BTreeMap<String, TestCheck>,
}

/// A named assertion inside a group, with pass/fail counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCheck {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub passes: u64,
    #[serde(default)]
    pub fails: u64,
}

/// The canonical global-metric names, merged into the aggregate without
/// passing through the cardinality controller. Any name prefixed with one of
/// these plus `_` is also treated as global (§4.5).
pub const GLOBAL_METRIC_NAMES: &[&str] = &[
    "checks",
    "data_received",
    "data_sent",
    "http_req_duration",
    "http_req_failed",
    "http_reqs",
    "iterations",
    "vus",
    "vus_max",
    "http_req_blocked",
    "http_req_connecting",
    "http_req_sending",
    "http_req_waiting",
    "http_req_receiving",
    "http_req_tls_handshaking",
];

/// Whether `name` belongs to the global-metric set (exact match or
/// `<global>_`-prefixed variant), and therefore bypasses cardinality control
/// and threshold validation's endpoint walk.
pub fn is_global_metric(name: &str) -> bool {
    GLOBAL_METRIC_NAMES.iter().any(|g| {
        name == *g
            || name
                .strip_prefix(g)
                .is_some_and(|rest| rest.starts_with('_'))
    })
}
