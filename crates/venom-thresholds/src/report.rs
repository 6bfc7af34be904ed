//! JUnit XML breach report writer, one `<testcase>` per breach, grouped
//! under a single `<testsuite>` (§6, §7).

use std::fmt::Write;

use venom_core::{Breach, Severity};

/// Render `breaches` as a JUnit XML document suitable for CI consumption.
pub fn to_junit_xml(breaches: &[Breach]) -> String {
    let failures = breaches.iter().filter(|b| b.severity == Severity::Error).count();

    let mut out = String::new();
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
    writeln!(
        out,
        r#"<testsuite name="threshold-validation" tests="{}" failures="{}">"#,
        breaches.len(),
        failures
    )
    .unwrap();

    for breach in breaches {
        writeln!(
            out,
            r#"  <testcase name="{} - {}" classname="thresholds">"#,
            escape(&breach.endpoint),
            escape(&breach.metric)
        )
        .unwrap();

        let tag = if breach.severity == Severity::Error {
            "failure"
        } else {
            "warning"
        };
        writeln!(
            out,
            r#"    <{tag} message="observed {:.2}{unit} exceeds threshold {:.2}{unit} (n={})"/>"#,
            breach.observed,
            breach.threshold,
            breach.sample_count,
            unit = escape(&breach.unit),
        )
        .unwrap();

        writeln!(out, "  </testcase>").unwrap();
    }

    writeln!(out, "</testsuite>").unwrap();
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breach(severity: Severity) -> Breach {
        Breach {
            endpoint: "GET_users".to_string(),
            metric: "p(95)".to_string(),
            observed: 600.0,
            threshold: 500.0,
            unit: "ms".to_string(),
            severity,
            sample_count: 120,
        }
    }

    #[test]
    fn counts_failures_as_error_severity_only() {
        let xml = to_junit_xml(&[breach(Severity::Error), breach(Severity::Warning)]);
        assert!(xml.contains(r#"tests="2" failures="1""#));
    }

    #[test]
    fn error_breach_renders_as_failure_tag() {
        let xml = to_junit_xml(&[breach(Severity::Error)]);
        assert!(xml.contains("<failure "));
        assert!(!xml.contains("<warning "));
    }

    #[test]
    fn warning_breach_renders_as_warning_tag() {
        let xml = to_junit_xml(&[breach(Severity::Warning)]);
        assert!(xml.contains("<warning "));
    }

    #[test]
    fn empty_breach_list_still_produces_well_formed_suite() {
        let xml = to_junit_xml(&[]);
        assert!(xml.contains(r#"tests="0" failures="0""#));
        assert!(xml.contains("</testsuite>"));
    }
}
