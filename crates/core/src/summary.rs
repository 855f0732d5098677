//! Per-patient and population aggregation of rule results.

use crate::registry::RuleRegistry;
use crate::result::{RuleResult, Severity, Status};
use serde::Serialize;

/// Number of results per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusCounts {
    pub compliant: usize,
    pub warning: usize,
    pub violation: usize,
}

impl StatusCounts {
    fn record(&mut self, status: Status) {
        match status {
            Status::Compliant => self.compliant += 1,
            Status::Warning => self.warning += 1,
            Status::Violation => self.violation += 1,
        }
    }
}

/// Number of results per severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }
}

/// Aggregate verdict for one patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComplianceSummary {
    pub overall: Status,
    pub counts: StatusCounts,
    pub by_severity: SeverityCounts,
    /// Ids of rules in VIOLATION, in result order.
    pub failing_rules: Vec<String>,
}

/// Aggregate a patient's results.
///
/// The overall status is VIOLATION when any CRITICAL or HIGH rule is in violation. Otherwise any
/// WARNING, or any VIOLATION at MEDIUM severity or below, makes it WARNING. Everything else is
/// COMPLIANT.
pub fn summarize(results: &[RuleResult]) -> ComplianceSummary {
    let mut counts = StatusCounts::default();
    let mut by_severity = SeverityCounts::default();
    for result in results {
        counts.record(result.status);
        by_severity.record(result.severity);
    }

    let blocking = results
        .iter()
        .any(|r| r.status == Status::Violation && r.severity.is_blocking());
    let overall = if blocking {
        Status::Violation
    } else if results.iter().any(RuleResult::is_non_compliant) {
        Status::Warning
    } else {
        Status::Compliant
    };

    ComplianceSummary {
        overall,
        counts,
        by_severity,
        failing_rules: results
            .iter()
            .filter(|r| r.status == Status::Violation)
            .map(|r| r.rule_id.clone())
            .collect(),
    }
}

/// A patient's full evaluation: every rule result plus the summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PatientEvaluation {
    pub patient_id: String,
    pub results: Vec<RuleResult>,
    pub summary: ComplianceSummary,
}

/// Per-rule outcome counts across a population.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RuleTally {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Population compliance report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PopulationReport {
    pub total_patients: usize,
    /// Patients per overall status.
    pub overall: StatusCounts,
    /// One entry per registered rule, in registry order.
    pub rules: Vec<RuleTally>,
    pub patients_in_violation: Vec<String>,
}

pub fn build_report(registry: &RuleRegistry, evaluations: &[PatientEvaluation]) -> PopulationReport {
    let mut overall = StatusCounts::default();
    let mut patients_in_violation = Vec::new();
    for evaluation in evaluations {
        overall.record(evaluation.summary.overall);
        if evaluation.summary.overall == Status::Violation {
            patients_in_violation.push(evaluation.patient_id.clone());
        }
    }

    let rules = registry
        .definitions()
        .map(|definition| {
            let mut counts = StatusCounts::default();
            evaluations
                .iter()
                .flat_map(|evaluation| &evaluation.results)
                .filter(|result| result.rule_id == definition.id)
                .for_each(|result| counts.record(result.status));
            RuleTally {
                rule_id: definition.id.to_string(),
                rule_name: definition.name.to_string(),
                severity: definition.severity,
                counts,
            }
        })
        .collect();

    PopulationReport {
        total_patients: evaluations.len(),
        overall,
        rules,
        patients_in_violation,
    }
}
