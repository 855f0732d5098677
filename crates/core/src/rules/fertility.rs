//! R004: fertility preservation for young patients.

use crate::constants::FERTILITY_AGE_THRESHOLD;
use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::PatientRecord;
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity};

pub struct FertilityPreservation;

const DEFINITION: RuleDefinition = RuleDefinition {
    id: "R004",
    name: "Young Patient → Fertility Discussion",
    description: "Age < 40 with breast cancer SHOULD discuss fertility preservation",
    severity: Severity::Medium,
};

impl Rule for FertilityPreservation {
    fn definition(&self) -> &RuleDefinition {
        &DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();
        let age = record.demographics.age;

        if age >= FERTILITY_AGE_THRESHOLD {
            return Ok(RuleResult::not_applicable(
                def,
                format!("N/A: Patient aged {age} (rule applies under {FERTILITY_AGE_THRESHOLD})"),
            ));
        }

        if record.has_consultation(&["fertility_preservation"]) {
            Ok(RuleResult::compliant(
                def,
                "Fertility preservation discussed with young patient",
            )
            .with_detail("age", age))
        } else {
            Ok(RuleResult::warning(
                def,
                format!("Patient aged {age} with NO fertility preservation discussion documented"),
            )
            .with_action("SHOULD discuss fertility preservation before starting systemic therapy")
            .affecting("consultations")
            .with_detail("age", age))
        }
    }
}
