//! Noise filtering
//!
//! Suppresses reports for known-benign conditions before they reach the
//! transport. The pattern list is fixed; caller-defined `ignore` patterns
//! in the configuration are not consulted here.

use std::sync::LazyLock;

use regex::RegexSet;

/// Patterns for cross-origin lookup markers, layout-observer notification
/// loops and generic timeouts.
const NOISE_PATTERNS: [&str; 4] = [
    r"(?i)Object Not Found Matching Id",
    r"(?i)ResizeObserver loop completed with undelivered notifications",
    r"Timeout",
    r"Timeout \(B\)",
];

static NOISE: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(NOISE_PATTERNS).expect("noise patterns are valid regexes"));

/// Decides which reports are worth sending.
pub struct NoiseFilter;

impl NoiseFilter {
    /// Whether a report with this message and stack should be transmitted.
    ///
    /// A match in either field suppresses the report.
    pub fn should_report(message: &str, stack: &str) -> bool {
        !Self::is_noise(message) && !Self::is_noise(stack)
    }

    /// Whether `text` matches any noise pattern.
    pub fn is_noise(text: &str) -> bool {
        NOISE.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_known_noise() {
        assert!(NoiseFilter::is_noise(
            "Non-Error promise rejection captured with value: Object Not Found Matching Id:3"
        ));
        assert!(NoiseFilter::is_noise(
            "resizeobserver loop completed with undelivered notifications."
        ));
        assert!(NoiseFilter::is_noise("Timeout (B)"));
        assert!(NoiseFilter::is_noise("Request Timeout after 30s"));
    }

    #[test]
    fn test_timeout_marker_is_case_sensitive() {
        assert!(!NoiseFilter::is_noise("connection timed out"));
        assert!(!NoiseFilter::is_noise("timeout waiting for lock"));
    }

    #[test]
    fn test_match_in_either_field_suppresses() {
        assert!(!NoiseFilter::should_report("Timeout", ""));
        assert!(!NoiseFilter::should_report("fetch failed", "at poll (Timeout.js:1:1)"));
        assert!(NoiseFilter::should_report("database corrupted", "at migrate (db.rs:10:2)"));
    }

    #[test]
    fn test_accepts_real_errors() {
        assert!(NoiseFilter::should_report("x is undefined", ""));
        assert!(NoiseFilter::should_report("schema migration failed", ""));
    }
}
