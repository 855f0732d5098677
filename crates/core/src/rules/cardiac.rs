//! R006: cardiac monitoring for anthracycline chemotherapy.

use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::{normalise_label, ImagingStudy, PatientRecord};
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity};

const ANTHRACYCLINES: &[&str] = &[
    "Doxorubicin",
    "Adriamycin",
    "Epirubicin",
    "Daunorubicin",
    "Idarubicin",
    "Liposomal Doxorubicin",
];

pub struct AnthracyclineCardiacMonitoring;

const DEFINITION: RuleDefinition = RuleDefinition {
    id: "R006",
    name: "Anthracycline → Cardiac Monitoring",
    description: "Patients on Anthracycline MUST have cardiac monitoring (ECHO/EF)",
    severity: Severity::High,
};

/// Echocardiogram, ejection fraction measurement or MUGA scan.
fn is_cardiac_study(study: &ImagingStudy) -> bool {
    let label = normalise_label(&study.kind);
    label == "ef"
        || label == "lvef"
        || ["echo", "ejection", "muga"]
            .iter()
            .any(|marker| label.contains(marker))
}

impl Rule for AnthracyclineCardiacMonitoring {
    fn definition(&self) -> &RuleDefinition {
        &DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        let Some(drug) = record.find_medication(ANTHRACYCLINES) else {
            return Ok(RuleResult::not_applicable(
                def,
                "N/A: No anthracycline prescribed",
            ));
        };

        match record.imaging.iter().find(|study| is_cardiac_study(study)) {
            Some(study) => Ok(RuleResult::compliant(
                def,
                format!("Cardiac monitoring ({}) documented for {}", study.kind, drug.name),
            )),
            None => Ok(RuleResult::violation(
                def,
                format!("{} prescribed with NO cardiac monitoring documented", drug.name),
            )
            .with_action("MUST obtain baseline ECHO or MUGA scan before anthracycline therapy")
            .affecting("imaging")
            .with_detail("anthracycline", drug.name.as_str())),
        }
    }
}
