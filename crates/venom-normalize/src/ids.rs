//! Shape detectors for the "known-ID" classification rule (§4.1 step 7).
//!
//! Each function takes an already lower-cased token and reports whether it
//! looks like an identifier of that shape. These are pure shape checks —
//! they never validate that e.g. a UUID's version nibble is semantically
//! meaningful, only that the token has the right character layout.

use regex::Regex;
use std::sync::LazyLock;

static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap()
});

// Crockford base32 alphabet, lower-cased, excludes i/l/o/u.
static ULID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9abcdefghjkmnpqrstvwxyz]{26}$").unwrap()
});

static KSUID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-z]{27}$").unwrap());

static MONGO_OID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{24}$").unwrap());

static PURE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6,}$").unwrap());

static HEX_BLOB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{12,}$").unwrap());

static RESOURCE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+[-_]*\d+[a-z0-9_-]*$").unwrap());

/// True if `t` matches any recognized ID shape (§4.1 step 7). A 10- or
/// 13-digit Unix timestamp is already covered by the pure-digits check
/// (both are ≥6 digits), so it isn't checked separately.
pub fn is_known_id_shape(t: &str) -> bool {
    UUID.is_match(t)
        || ULID.is_match(t)
        || KSUID.is_match(t)
        || MONGO_OID.is_match(t)
        || PURE_DIGITS.is_match(t)
        || HEX_BLOB.is_match(t)
        || RESOURCE_KEY.is_match(t)
}

/// Heuristic ID check (§4.1 step 8): length ≥6 and either a high digit ratio
/// or at least two separate runs of digits (e.g. `order42-v3`).
pub fn looks_like_heuristic_id(t: &str) -> bool {
    if t.len() < 6 {
        return false;
    }
    let digit_count = t.chars().filter(char::is_ascii_digit).count();
    let digit_ratio = digit_count as f64 / t.len() as f64;
    if digit_ratio >= 0.4 {
        return true;
    }
    count_digit_runs(t) >= 2
}

fn count_digit_runs(t: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for c in t.chars() {
        if c.is_ascii_digit() {
            if !in_run {
                runs += 1;
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }
    runs
}
