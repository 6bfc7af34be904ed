//! Cardinality controller (C3): enforce a ceiling on distinct endpoint keys,
//! bucket or drop overflow, and resolve same-key/different-origin collisions
//! (§4.3).
//!
//! `endpoint_count` tracks *distinct admitted keys*, not total admissions —
//! re-admitting a key already recorded under the same origin is a no-op read,
//! not a new insertion, or the ceiling would be reached after a handful of
//! repeat requests to the same endpoint rather than after `MaxEndpoints`
//! distinct endpoints (§3's invariant only makes sense under that reading).

use md5::{Digest, Md5};
use std::collections::HashMap;
use std::sync::RwLock;

/// Default ceiling used by the standalone normalizer (distinct from the
/// aggregator's default of 2000 — see `venom_merge`).
pub const DEFAULT_MAX_ENDPOINTS: usize = 5000;

/// `DEFAULT_MAX_ENDPOINTS`, overridable via `VENOM_MAX_ENDPOINTS` for callers
/// that build a controller directly rather than through the CLI's
/// `--max-endpoints` flag (§6, §10.3).
pub fn env_max_endpoints() -> usize {
    let mut max = DEFAULT_MAX_ENDPOINTS;
    if let Ok(v) = std::env::var("VENOM_MAX_ENDPOINTS")
        && let Ok(n) = v.parse()
    {
        max = n;
    }
    max
}

/// The outcome of admitting a normalized key into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Admitted under this key (possibly collision-suffixed).
    Key(String),
    /// Ceiling reached; bucketed into the overflow key.
    Bucketed(String),
    /// Ceiling reached and bucketing disabled; caller must drop the sample.
    Dropped,
}

#[derive(Debug, Default)]
struct State {
    endpoint_count: usize,
    endpoints_bucketed: usize,
    key_to_origin: HashMap<String, String>,
}

/// Thread-safe cardinality ceiling enforcement, one instance per aggregation
/// run (or per normalizer instance).
#[derive(Debug)]
pub struct CardinalityController {
    max_endpoints: usize,
    no_bucket: bool,
    state: RwLock<State>,
}

impl CardinalityController {
    pub fn new(max_endpoints: usize, no_bucket: bool) -> Self {
        Self {
            max_endpoints,
            no_bucket,
            state: RwLock::new(State::default()),
        }
    }

    /// Admit normalized key `key`, originally derived from metric name
    /// `origin`, applying the policy table in §4.3.
    pub fn admit(&self, key: &str, origin: &str) -> Admission {
        let mut state = self.state.write().unwrap();

        if state.endpoint_count >= self.max_endpoints {
            return if self.no_bucket {
                Admission::Dropped
            } else {
                state.endpoints_bucketed += 1;
                Admission::Bucketed("other".to_string())
            };
        }

        match state.key_to_origin.get(key) {
            Some(existing) if existing == origin => Admission::Key(key.to_string()),
            Some(_) => {
                let collided = format!("{key}_{}", first8_md5(origin));
                if !state.key_to_origin.contains_key(&collided) {
                    state.key_to_origin.insert(collided.clone(), origin.to_string());
                    state.endpoint_count += 1;
                }
                Admission::Key(collided)
            }
            None => {
                state.key_to_origin.insert(key.to_string(), origin.to_string());
                state.endpoint_count += 1;
                Admission::Key(key.to_string())
            }
        }
    }

    /// Number of distinct keys admitted so far (excluding the overflow bucket).
    pub fn endpoint_count(&self) -> usize {
        self.state.read().unwrap().endpoint_count
    }

    /// Number of samples routed into the overflow bucket.
    pub fn endpoints_bucketed(&self) -> usize {
        self.state.read().unwrap().endpoints_bucketed
    }
}

fn first8_md5(s: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(s.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_distinct_keys_until_ceiling() {
        let ctl = CardinalityController::new(2, false);
        assert_eq!(ctl.admit("a", "a_origin"), Admission::Key("a".to_string()));
        assert_eq!(ctl.admit("b", "b_origin"), Admission::Key("b".to_string()));
        assert_eq!(
            ctl.admit("c", "c_origin"),
            Admission::Bucketed("other".to_string())
        );
        assert_eq!(ctl.endpoint_count(), 2);
        assert_eq!(ctl.endpoints_bucketed(), 1);
    }

    #[test]
    fn no_bucket_drops_overflow() {
        let ctl = CardinalityController::new(1, true);
        assert_eq!(ctl.admit("a", "origin"), Admission::Key("a".to_string()));
        assert_eq!(ctl.admit("b", "origin"), Admission::Dropped);
    }

    #[test]
    fn repeat_admission_of_same_origin_does_not_grow_count() {
        let ctl = CardinalityController::new(10, false);
        ctl.admit("users_profile", "http_req_duration{users_profile}");
        ctl.admit("users_profile", "http_req_duration{users_profile}");
        assert_eq!(ctl.endpoint_count(), 1);
    }

    #[test]
    fn colliding_origin_gets_suffixed_key() {
        let ctl = CardinalityController::new(10, false);
        let first = ctl.admit("users_profile", "origin_a");
        let second = ctl.admit("users_profile", "origin_b");
        assert_eq!(first, Admission::Key("users_profile".to_string()));
        match second {
            Admission::Key(k) => {
                assert!(k.starts_with("users_profile_"));
                assert_eq!(k.len(), "users_profile_".len() + 8);
            }
            other => panic!("expected collision-suffixed key, got {other:?}"),
        }
        assert_eq!(ctl.endpoint_count(), 2);
    }

    #[test]
    fn never_exceeds_ceiling_excluding_other() {
        let ctl = CardinalityController::new(50, false);
        for i in 0..500 {
            let key = format!("key_{i}");
            ctl.admit(&key, &key);
        }
        assert!(ctl.endpoint_count() <= 50);
    }
}
