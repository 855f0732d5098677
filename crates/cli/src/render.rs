//! Terminal rendering. Glyphs are presentation only and never appear in JSON output.

use chrono::NaiveDate;
use onco_core::{PatientEvaluation, PopulationReport, RuleResult, Severity, Status};
use std::fmt::Write;

const RULE: &str = "────────────────────────────────────────────────────────────";

fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Compliant => "✅",
        Status::Warning => "⚠️ ",
        Status::Violation => "❌",
    }
}

fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟠",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
        Severity::Info => "ℹ️ ",
    }
}

fn result_block(out: &mut String, result: &RuleResult) {
    let _ = writeln!(
        out,
        "{} [{}] {} {} {}",
        status_glyph(result.status),
        result.rule_id,
        result.rule_name,
        severity_glyph(result.severity),
        result.severity
    );
    let _ = writeln!(out, "     {}", result.message);
    if let Some(action) = &result.action {
        let _ = writeln!(out, "     → {action}");
    }
}

/// One patient's results, non-compliant first, then the summary line.
pub fn evaluation(evaluation: &PatientEvaluation) -> String {
    let mut out = String::new();
    let summary = &evaluation.summary;

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Patient {}", evaluation.patient_id);
    let _ = writeln!(out, "{RULE}");

    let (failing, passing): (Vec<&RuleResult>, Vec<&RuleResult>) = evaluation
        .results
        .iter()
        .partition(|result| result.is_non_compliant());
    for result in failing.into_iter().chain(passing) {
        result_block(&mut out, result);
    }

    let _ = writeln!(
        out,
        "\nOverall: {} {}  ({} compliant, {} warning, {} violation)\n",
        status_glyph(summary.overall),
        summary.overall,
        summary.counts.compliant,
        summary.counts.warning,
        summary.counts.violation
    );
    out
}

/// Population report with one line per rule in registry order.
pub fn report(report: &PopulationReport, as_of: NaiveDate) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Compliance report as of {as_of}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Patients evaluated: {}", report.total_patients);
    let _ = writeln!(
        out,
        "  {} compliant {}  {} warning {}  {} violation {}\n",
        status_glyph(Status::Compliant),
        report.overall.compliant,
        status_glyph(Status::Warning),
        report.overall.warning,
        status_glyph(Status::Violation),
        report.overall.violation
    );

    for tally in &report.rules {
        let _ = writeln!(
            out,
            "{} {:<5} {:<45} ✅ {:>3}  ⚠️  {:>3}  ❌ {:>3}",
            severity_glyph(tally.severity),
            tally.rule_id,
            tally.rule_name,
            tally.counts.compliant,
            tally.counts.warning,
            tally.counts.violation
        );
    }

    if !report.patients_in_violation.is_empty() {
        let _ = writeln!(
            out,
            "\nPatients in violation: {}",
            report.patients_in_violation.join(", ")
        );
    }
    out
}
