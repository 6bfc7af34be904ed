//! Token classifier (C1): decide, per path segment, whether to keep, drop,
//! or rewrite a lower-cased token (§4.1).
//!
//! Rules run in strict priority order; the first match wins. The keep-list
//! (step 2) runs before the ID/version/method rules specifically so that
//! meaningful-looking suffixes like `status200` or `v2-final` formats don't
//! get silently dropped by a later, broader rule.

use crate::ids::{is_known_id_shape, looks_like_heuristic_id};
use regex::Regex;
use std::sync::LazyLock;

/// What the classifier decided to do with one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Keep the token (possibly rewritten — always identity here; no rule
    /// currently rewrites a kept token's text).
    Keep(String),
    /// Drop the token from the normalized path entirely.
    Drop,
    /// A template-variable placeholder: removed from the sequence, distinct
    /// from `Drop` only in intent (§4.1 step 1).
    RewriteEmpty,
}

static TEMPLATE_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{\{\..*\}\}$").unwrap());
static STATUS_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^status\d{3}$").unwrap());
static LOCALE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[a-z]{2})?$").unwrap());
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(api-)?v\d+([a-z0-9]+)?$").unwrap());
static DATE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

const KEEP_LIST: &[&str] = &[
    ".well-known",
    "openid-configuration",
    "oauth2",
    "healthz",
    "readyz",
    "livez",
    "metrics",
    "search",
    "bulk",
    "export",
    "jwks",
];

const FORMAT_TOKENS: &[&str] = &["json", "ndjson", "csv", "xml"];
const IDENTITY_KEYWORDS: &[&str] = &["me", "self", "current"];
const API_PREFIXES: &[&str] = &["api", "rest", "graphql"];
const HTTP_METHOD_TOKENS: &[&str] = &[
    "get", "post", "put", "patch", "delete", "head", "options",
];

/// Classify one lower-cased path token at position `i` (§4.1).
pub fn classify(t: &str, i: usize) -> TokenOutcome {
    // 1. Template variable
    if TEMPLATE_VAR.is_match(t) {
        return TokenOutcome::RewriteEmpty;
    }

    // 2. Keep-list
    if STATUS_CODE.is_match(t)
        || t == "http2"
        || t == "ipv6"
        || KEEP_LIST.contains(&t)
        || FORMAT_TOKENS.contains(&t)
        || LOCALE.is_match(t)
    {
        return TokenOutcome::Keep(t.to_string());
    }

    // 3. Identity keywords
    if IDENTITY_KEYWORDS.contains(&t) {
        return TokenOutcome::Keep(t.to_string());
    }

    // 4. API prefixes (position-sensitive)
    if API_PREFIXES.contains(&t) && i <= 2 {
        return TokenOutcome::Drop;
    }

    // 5. Version tokens
    if VERSION_TOKEN.is_match(t) || DATE_VERSION.is_match(t) {
        return TokenOutcome::Drop;
    }

    // 6. HTTP method token
    if HTTP_METHOD_TOKENS.contains(&t) {
        return TokenOutcome::Drop;
    }

    // 7. Known-ID shapes
    if is_known_id_shape(t) {
        return TokenOutcome::Drop;
    }

    // 8. Heuristic ID
    if looks_like_heuristic_id(t) {
        return TokenOutcome::Drop;
    }

    // 9. Otherwise keep
    TokenOutcome::Keep(t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_variable_rewrites_to_empty() {
        assert_eq!(
            classify("{{.setup.tenant_locator}}", 1),
            TokenOutcome::RewriteEmpty
        );
    }

    #[test]
    fn keep_list_preempts_heuristic_id() {
        // "status200" would otherwise look like a heuristic ID (digit ratio 3/9).
        assert_eq!(classify("status200", 3), TokenOutcome::Keep("status200".to_string()));
    }

    #[test]
    fn well_known_is_kept() {
        assert_eq!(
            classify(".well-known", 0),
            TokenOutcome::Keep(".well-known".to_string())
        );
    }

    #[test]
    fn identity_keyword_kept() {
        assert_eq!(classify("me", 2), TokenOutcome::Keep("me".to_string()));
    }

    #[test]
    fn api_prefix_dropped_only_near_start() {
        assert_eq!(classify("api", 0), TokenOutcome::Drop);
        assert_eq!(classify("api", 5), TokenOutcome::Keep("api".to_string()));
    }

    #[test]
    fn version_token_dropped() {
        assert_eq!(classify("v1", 1), TokenOutcome::Drop);
        assert_eq!(classify("api-v2beta", 1), TokenOutcome::Drop);
        assert_eq!(classify("2024-01-15", 1), TokenOutcome::Drop);
    }

    #[test]
    fn http_method_token_dropped() {
        assert_eq!(classify("patch", 0), TokenOutcome::Drop);
    }

    #[test]
    fn uuid_dropped() {
        assert_eq!(
            classify("550e8400-e29b-41d4-a716-446655440000", 2),
            TokenOutcome::Drop
        );
    }

    #[test]
    fn ordinary_word_kept() {
        assert_eq!(classify("profile", 2), TokenOutcome::Keep("profile".to_string()));
    }
}
