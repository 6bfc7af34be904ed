//! Plain-text run summary. Optional tooling around the core engine, not
//! part of it (§6, §9 — the two divergent teacher commands are unified here
//! as a single formatter function rather than two binaries).

use venom_core::{Aggregate, Breach, Severity};

pub fn format_summary(aggregate: &Aggregate, breaches: &[Breach], bucketed: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("endpoints: {}\n", aggregate.metrics.len()));
    if bucketed > 0 {
        out.push_str(&format!("bucketed into \"other\": {bucketed}\n"));
    }

    if breaches.is_empty() {
        out.push_str("threshold breaches: none\n");
        return out;
    }

    let errors = breaches.iter().filter(|b| b.severity == Severity::Error).count();
    let warnings = breaches.len() - errors;
    out.push_str(&format!(
        "threshold breaches: {} ({} error, {} warning)\n",
        breaches.len(),
        errors,
        warnings
    ));
    for breach in breaches {
        out.push_str(&format!(
            "  [{:?}] {} {}: observed {:.2}{} > threshold {:.2}{} (n={})\n",
            breach.severity,
            breach.endpoint,
            breach.metric,
            breach.observed,
            breach.unit,
            breach.threshold,
            breach.unit,
            breach.sample_count
        ));
    }
    out
}
