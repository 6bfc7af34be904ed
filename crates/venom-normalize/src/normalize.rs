//! Path normalizer (C2): turn a raw path (+ optional method) into a stable
//! endpoint template or key (§4.2).
//!
//! `normalize_path` returns the bare template; `normalize` additionally
//! prefixes `METHOD_`. They're kept as separate entry points — not one
//! function with an `Option<&str>` — because "no method was given" and
//! "method was given as an empty string" are genuinely different inputs
//! here: the former skips the prefix, the latter defaults it to `GET`.

use crate::classify::{classify, TokenOutcome};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

/// Default size of the raw-path → template cache.
pub const DEFAULT_CACHE_SIZE: usize = 8192;

const MAX_TEMPLATE_LEN: usize = 80;

static OPERATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""operationName"\s*:\s*"([^"]*)""#).unwrap());

/// A per-instance, thread-safe raw-path → template cache. No ambient global
/// state (§9) — every caller owns its own normalizer.
pub struct PathNormalizer {
    cache_size: usize,
    cache: RwLock<HashMap<String, String>>,
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl PathNormalizer {
    pub fn new(cache_size: usize) -> Self {
        Self {
            cache_size,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Normalize `path` to a bare template, with no method prefix (§4.2
    /// steps 1–8).
    pub fn normalize_path(&self, path: &str) -> String {
        if let Some(hit) = self.cache.read().unwrap().get(path) {
            return hit.clone();
        }
        let template = compute_template(path);
        let mut cache = self.cache.write().unwrap();
        // Bounded cache: flush whole rather than evict piecemeal (§4.2).
        if cache.len() >= self.cache_size {
            cache.clear();
        }
        cache.insert(path.to_string(), template.clone());
        template
    }

    /// Normalize `path` and prefix with the upper-cased `method` (empty
    /// string defaults to `GET`), producing a full endpoint key (§4.2 step 9).
    pub fn normalize(&self, path: &str, method: &str) -> String {
        let template = self.normalize_path(path);
        let method = if method.is_empty() {
            "GET".to_string()
        } else {
            method.to_uppercase()
        };
        format!("{method}_{template}")
    }
}

fn compute_template(path: &str) -> String {
    // Step 1: lower-case, strip query/fragment/matrix suffix, trailing slash.
    let lower = path.to_lowercase();
    let cut = ['?', '#', ';']
        .iter()
        .filter_map(|c| lower.find(*c))
        .min();
    let mut trimmed = match cut {
        Some(idx) => &lower[..idx],
        None => &lower[..],
    };
    trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    // Step 2: empty or "/" -> root.
    if trimmed.is_empty() {
        return "root".to_string();
    }

    // Step 3: GraphQL short-circuit.
    if trimmed.ends_with("/graphql") || trimmed.ends_with("/gql") {
        return "graphql".to_string();
    }

    // Step 4: tokenize and classify.
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    let mut kept: Vec<String> = Vec::with_capacity(segments.len());
    for (i, seg) in segments.iter().enumerate() {
        if let TokenOutcome::Keep(t) = classify(seg, i) {
            kept.push(t);
        }
    }

    // Step 5: shape.
    let shaped = match kept.len() {
        0 => "root".to_string(),
        1..=3 => kept.join("_"),
        _ => {
            let last = kept.last().unwrap();
            format!("{}_{}_{}", kept[0], kept[1], last)
        }
    };

    // Step 6: trim a trailing file extension near the end of the string.
    let trimmed_ext = match shaped.rfind('.') {
        Some(idx) if shaped.len() - idx <= 6 => &shaped[..idx],
        _ => &shaped[..],
    };

    // Step 7: collapse underscore runs, strip leading/trailing underscores.
    let collapsed = collapse_underscores(trimmed_ext);

    // Step 8: truncate to 80 chars.
    truncate_chars(&collapsed, MAX_TEMPLATE_LEN)
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_underscore = false;
    for c in s.chars() {
        if c == '_' {
            if !last_was_underscore {
                out.push('_');
            }
            last_was_underscore = true;
        } else {
            out.push(c);
            last_was_underscore = false;
        }
    }
    out.trim_matches('_').to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Best-effort extraction of a GraphQL `operationName` from a JSON request
/// body, for logging/metrics only — it never affects the endpoint key
/// (§4.2 step 3).
pub fn extract_graphql_operation_name(body: &str) -> Option<String> {
    OPERATION_NAME
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_slash_paths_normalize_to_root() {
        let n = PathNormalizer::default();
        assert_eq!(n.normalize_path(""), "root");
        assert_eq!(n.normalize_path("/"), "root");
        assert_eq!(n.normalize_path("///"), "root");
    }

    #[test]
    fn drop_only_path_normalizes_to_root() {
        let n = PathNormalizer::default();
        assert_eq!(n.normalize_path("/api/v1/post"), "root");
    }

    #[test]
    fn strips_uuid_and_shapes_three_tokens() {
        let n = PathNormalizer::default();
        assert_eq!(
            n.normalize_path("/api/v1/users/550e8400-e29b-41d4-a716-446655440000/profile"),
            "users_profile"
        );
    }

    #[test]
    fn template_variable_stripped_with_method_prefix() {
        let n = PathNormalizer::default();
        assert_eq!(
            n.normalize("/policy/{{.setup.tenant_locator}}/holds", "patch"),
            "PATCH_policy_holds"
        );
    }

    #[test]
    fn five_token_path_keeps_head_two_and_tail_one() {
        let n = PathNormalizer::default();
        assert_eq!(n.normalize("/a/b/c/d/e", ""), "GET_a_b_e");
    }

    #[test]
    fn well_known_jwks_trims_json_extension() {
        let n = PathNormalizer::default();
        assert_eq!(n.normalize_path("/.well-known/jwks.json"), ".well-known_jwks");
    }

    #[test]
    fn graphql_short_circuits_regardless_of_suffix() {
        let n = PathNormalizer::default();
        assert_eq!(n.normalize_path("/v2/graphql"), "graphql");
        assert_eq!(n.normalize_path("/api/gql"), "graphql");
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = PathNormalizer::default();
        let once = n.normalize_path("/api/v1/users/550e8400-e29b-41d4-a716-446655440000/profile");
        let twice = n.normalize_path(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn cache_flushes_whole_when_full() {
        let n = PathNormalizer::new(2);
        n.normalize_path("/a");
        n.normalize_path("/b");
        assert_eq!(n.cache.read().unwrap().len(), 2);
        n.normalize_path("/c");
        // Flushed whole, then re-populated with just the new entry.
        assert_eq!(n.cache.read().unwrap().len(), 1);
    }

    #[test]
    fn extracts_graphql_operation_name_for_logging_only() {
        let body = r#"{"operationName":"GetUser","query":"{ user { id } }"}"#;
        assert_eq!(extract_graphql_operation_name(body), Some("GetUser".to_string()));
        // Does not affect the key itself.
        let n = PathNormalizer::default();
        assert_eq!(n.normalize_path("/graphql"), "graphql");
    }
}
