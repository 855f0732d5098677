//! R005: Tamoxifen and strong CYP3A4 inhibitors.

use super::TAMOXIFEN_CLASS;
use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::PatientRecord;
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity};
use chrono::NaiveDate;

const CYP3A4_INHIBITORS: &[&str] = &[
    "Fluconazole",
    "Ketoconazole",
    "Itraconazole",
    "Voriconazole",
    "Posaconazole",
    "Clarithromycin",
    "Erythromycin",
    "Ritonavir",
    "Verapamil",
    "Diltiazem",
];

/// R005: Tamoxifen must not overlap a strong CYP3A4 inhibitor.
///
/// Two courses interact when their active periods share at least one day. Open-ended courses
/// are treated as ongoing.
pub struct TamoxifenInteraction;

const DEFINITION: RuleDefinition = RuleDefinition {
    id: "R005",
    name: "Tamoxifen Interaction Check",
    description: "Tamoxifen + CYP3A4 inhibitors = DANGEROUS interaction",
    severity: Severity::High,
};

impl Rule for TamoxifenInteraction {
    fn definition(&self) -> &RuleDefinition {
        &DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        let tamoxifen: Vec<_> = record.medications_named(TAMOXIFEN_CLASS).collect();
        if tamoxifen.is_empty() {
            return Ok(RuleResult::not_applicable(def, "N/A: Patient not on Tamoxifen"));
        }

        let mut interacting: Vec<&str> = Vec::new();
        let mut earliest: Option<NaiveDate> = None;

        for course in &tamoxifen {
            let course_period = course.period()?;
            for inhibitor in record.medications_named(CYP3A4_INHIBITORS) {
                let Some(from) = course_period.overlap_start(&inhibitor.period()?) else {
                    continue;
                };
                if !interacting.contains(&inhibitor.name.as_str()) {
                    interacting.push(inhibitor.name.as_str());
                }
                earliest = Some(earliest.map_or(from, |current| current.min(from)));
            }
        }

        let Some(overlap_from) = earliest else {
            return Ok(RuleResult::compliant(
                def,
                "No concurrent CYP3A4 inhibitor with Tamoxifen",
            ));
        };

        Ok(RuleResult::violation(
            def,
            format!(
                "Tamoxifen taken concurrently with CYP3A4 inhibitor(s): {}",
                interacting.join(", ")
            ),
        )
        .with_action(format!(
            "Switch {} to a non-interacting alternative or monitor Tamoxifen efficacy",
            interacting.join(", ")
        ))
        .affecting("medications")
        .with_detail("interacting", interacting)
        .with_detail("overlap_from", overlap_from.to_string()))
    }
}
