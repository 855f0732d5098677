//! Rule evaluation engine.
//!
//! The engine runs every registered rule against a record in registry order and returns exactly
//! one [`RuleResult`] per rule. A rule that returns a [`RuleError`] or panics is contained: its
//! slot is filled with an INFO placeholder (see [`RuleResult::evaluation_failed`]), the failure
//! is logged, and the remaining rules still run.

use crate::config::{AdjuvantPolicy, CoreConfig};
use crate::error::RuleError;
use crate::record::PatientRecord;
use crate::registry::{Rule, RuleRegistry};
use crate::result::RuleResult;
use crate::source::RecordSource;
use crate::summary::{summarize, PatientEvaluation};
use crate::{OncologyError, OncologyResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Inputs shared by every rule in a run: the reference date and the adjuvant duration policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluationContext {
    as_of: NaiveDate,
    adjuvant: AdjuvantPolicy,
}

impl EvaluationContext {
    pub fn new(as_of: NaiveDate, adjuvant: AdjuvantPolicy) -> Self {
        Self { as_of, adjuvant }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.as_of(), config.adjuvant())
    }

    /// Date treated as "today" when measuring ongoing therapy.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn adjuvant(&self) -> AdjuvantPolicy {
        self.adjuvant
    }
}

/// Runs a [`RuleRegistry`] against patient records.
///
/// Holds no mutable state, so one engine can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct RuleEngine {
    registry: RuleRegistry,
    context: EvaluationContext,
}

impl RuleEngine {
    pub fn new(registry: RuleRegistry, context: EvaluationContext) -> Self {
        Self { registry, context }
    }

    /// Engine over the standard ten-rule registry.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(RuleRegistry::standard(), EvaluationContext::from_config(config))
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    /// Evaluate every rule against one record, in registry order.
    pub fn evaluate(&self, record: &PatientRecord) -> Vec<RuleResult> {
        let results: Vec<RuleResult> = self
            .registry
            .iter()
            .map(|rule| self.evaluate_rule(rule, record))
            .collect();

        tracing::debug!(
            patient = record.id.as_str(),
            non_compliant = results.iter().filter(|r| r.is_non_compliant()).count(),
            "evaluated patient"
        );
        results
    }

    fn evaluate_rule(&self, rule: &dyn Rule, record: &PatientRecord) -> RuleResult {
        let definition = rule.definition();
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate(record, &self.context)))
            .unwrap_or_else(|panic| Err(RuleError::Internal(panic_message(panic.as_ref()))));

        match outcome {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(
                    patient = record.id.as_str(),
                    rule = definition.id,
                    "rule evaluation failed: {}",
                    error
                );
                RuleResult::evaluation_failed(definition, &error)
            }
        }
    }

    /// Evaluate a batch of records, keyed by patient id.
    pub fn evaluate_all(&self, records: &[PatientRecord]) -> BTreeMap<String, Vec<RuleResult>> {
        records
            .iter()
            .map(|record| (record.id.to_string(), self.evaluate(record)))
            .collect()
    }

    /// Evaluate one record and attach its summary.
    pub fn evaluate_record(&self, record: &PatientRecord) -> PatientEvaluation {
        let results = self.evaluate(record);
        PatientEvaluation {
            patient_id: record.id.to_string(),
            summary: summarize(&results),
            results,
        }
    }

    /// Look up a patient in `source` and evaluate it.
    ///
    /// # Errors
    ///
    /// Returns [`OncologyError::NotFound`] when the id is absent, or any error raised by the
    /// source itself.
    pub fn evaluate_patient(
        &self,
        source: &dyn RecordSource,
        id: &str,
    ) -> OncologyResult<PatientEvaluation> {
        let record = source
            .get(id)?
            .ok_or_else(|| OncologyError::NotFound(id.to_string()))?;
        Ok(self.evaluate_record(&record))
    }

    /// Evaluate every record in `source`, in source order.
    pub fn evaluate_source(&self, source: &dyn RecordSource) -> OncologyResult<Vec<PatientEvaluation>> {
        let records = source.list_all()?;
        tracing::info!("Evaluating {} patient records", records.len());
        Ok(records
            .iter()
            .map(|record| self.evaluate_record(record))
            .collect())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
