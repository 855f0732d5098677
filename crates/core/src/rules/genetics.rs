//! R003: hereditary risk counselling.

use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::PatientRecord;
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity};

const GENETIC_COUNSELLING: &[&str] = &["genetic_counseling", "genetic_counselling"];

/// R003: a BRCA1 mutation requires a documented genetic counselling consultation.
///
/// Only the `brca1` observation triggers the rule; a BRCA2 result is not consulted.
pub struct BrcaGeneticCounselling;

const DEFINITION: RuleDefinition = RuleDefinition {
    id: "R003",
    name: "BRCA+ → Genetic Counseling Required",
    description: "If BRCA1/BRCA2 mutation detected, genetic counseling MANDATORY",
    severity: Severity::High,
};

impl Rule for BrcaGeneticCounselling {
    fn definition(&self) -> &RuleDefinition {
        &DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        if record.observation_value("brca1").is_none() {
            return Ok(RuleResult::not_applicable(def, "N/A: BRCA1 status not recorded"));
        }
        if !record.observation_is("brca1", "present") {
            return Ok(RuleResult::not_applicable(def, "N/A: Patient BRCA-negative"));
        }

        if record.has_consultation(GENETIC_COUNSELLING) {
            Ok(RuleResult::compliant(
                def,
                "Genetic counseling documented for BRCA+ patient",
            ))
        } else {
            Ok(
                RuleResult::violation(def, "Patient BRCA+ but NO genetic counseling documented")
                    .with_action("MUST refer to genetic counselor - family counseling recommended")
                    .affecting("consultations"),
            )
        }
    }
}
