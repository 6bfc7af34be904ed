//! Threshold resolver (C6): defaults → first matching group pattern →
//! exact endpoint overlay (§4.6).

use std::collections::BTreeMap;
use std::sync::RwLock;

use globset::Glob;
use venom_core::{ThresholdConfig, ThresholdValues};

/// Resolves per-endpoint threshold values against a loaded [`ThresholdConfig`],
/// caching compiled group-pattern matchers since `Glob::compile_matcher`
/// isn't free and the same config is resolved once per endpoint per run.
pub struct ThresholdResolver<'a> {
    config: &'a ThresholdConfig,
    compiled: RwLock<Option<Vec<(String, globset::GlobMatcher)>>>,
}

impl<'a> ThresholdResolver<'a> {
    pub fn new(config: &'a ThresholdConfig) -> Self {
        Self {
            config,
            compiled: RwLock::new(None),
        }
    }

    /// Resolve the effective threshold values for `endpoint` (§4.6).
    pub fn resolve(&self, endpoint: &str) -> ThresholdValues {
        let mut resolved = self.config.defaults.clone();

        if let Some((_, values)) = self.first_matching_group(endpoint) {
            resolved.overlay(values);
        }

        if let Some(values) = self.config.endpoints.get(endpoint) {
            resolved.overlay(values);
        }

        resolved
    }

    fn first_matching_group(&self, endpoint: &str) -> Option<(String, &'a ThresholdValues)> {
        self.ensure_compiled();
        let compiled = self.compiled.read().unwrap();
        let matchers = compiled.as_ref().unwrap();
        // `groups` is a BTreeMap, so `matchers` was built in lexicographic
        // pattern order; the first hit here is the lexicographically-first
        // match (§4.6).
        let pattern = matchers
            .iter()
            .find(|(_, matcher)| matcher.is_match(endpoint))
            .map(|(pattern, _)| pattern.clone())?;
        self.config.groups.get(&pattern).map(|values| (pattern, values))
    }

    fn ensure_compiled(&self) {
        if self.compiled.read().unwrap().is_some() {
            return;
        }
        let mut compiled = self.compiled.write().unwrap();
        if compiled.is_some() {
            return;
        }
        let built: Vec<(String, globset::GlobMatcher)> = self
            .config
            .groups
            .keys()
            .filter_map(|pattern| {
                Glob::new(pattern)
                    .ok()
                    .map(|g| (pattern.clone(), g.compile_matcher()))
            })
            .collect();
        *compiled = Some(built);
    }
}

/// Resolve every distinct endpoint in `endpoints` up front, useful when the
/// validator needs to walk all of them without repeated lock churn.
pub fn resolve_all<'a>(
    config: &'a ThresholdConfig,
    endpoints: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<&'a str, ThresholdValues> {
    let resolver = ThresholdResolver::new(config);
    endpoints.into_iter().map(|e| (e, resolver.resolve(e))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use venom_core::DurationThreshold;

    fn config_with_groups() -> ThresholdConfig {
        let yaml = r#"
defaults:
  p95: "500ms"
groups:
  "auth/*": { p95: "350ms" }
  "zzz/*": { p95: "1s" }
endpoints:
  "GET /users": { p95: "300ms" }
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn falls_back_to_defaults_with_no_match() {
        let cfg = config_with_groups();
        let resolver = ThresholdResolver::new(&cfg);
        let values = resolver.resolve("GET /billing/invoice");
        assert_eq!(values.p95.unwrap().value_ms, 500.0);
    }

    #[test]
    fn group_pattern_overlays_defaults() {
        let cfg = config_with_groups();
        let resolver = ThresholdResolver::new(&cfg);
        let values = resolver.resolve("auth/login");
        assert_eq!(values.p95.unwrap().value_ms, 350.0);
    }

    #[test]
    fn exact_endpoint_overlays_group_and_defaults() {
        let cfg = config_with_groups();
        let resolver = ThresholdResolver::new(&cfg);
        let values = resolver.resolve("GET /users");
        assert_eq!(values.p95.unwrap().value_ms, 300.0);
    }

    #[test]
    fn lexicographically_first_group_pattern_wins_on_collision() {
        let yaml = r#"
groups:
  "b*": { p95: "200ms" }
  "a*": { p95: "100ms" }
"#;
        let cfg: ThresholdConfig = serde_yaml::from_str(yaml).unwrap();
        let resolver = ThresholdResolver::new(&cfg);
        // Both patterns match "abc"; lexicographic order picks "a*" first.
        let values = resolver.resolve("abc");
        assert_eq!(values.p95.unwrap().value_ms, 100.0);
    }

    #[test]
    fn resolve_all_builds_a_per_endpoint_map() {
        let cfg = config_with_groups();
        let out = resolve_all(&cfg, ["auth/login", "GET /users"]);
        assert_eq!(out["auth/login"].p95, Some(DurationThreshold { value_ms: 350.0, tolerance_percent: None }));
        assert_eq!(out["GET /users"].p95.as_ref().unwrap().value_ms, 300.0);
    }
}
