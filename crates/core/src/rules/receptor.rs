//! Receptor-status rules: ER (R001), HER2 (R002) and PR (R010).

use super::{AROMATASE_INHIBITORS, SERDS, TAMOXIFEN_CLASS};
use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::{same_label, Medication, PatientRecord};
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity};
use serde_json::{json, Value};

const ENDOCRINE_CLASSES: [&[&str]; 3] = [TAMOXIFEN_CLASS, AROMATASE_INHIBITORS, SERDS];

const HER2_THERAPIES: &[&str] = &["Herceptin", "Trastuzumab"];

/// R001: ER-positive tumours require endocrine therapy.
pub struct EstrogenReceptorTherapy;

const ER_DEFINITION: RuleDefinition = RuleDefinition {
    id: "R001",
    name: "ER+ → Hormone Therapy Mandatory",
    description: "If Estrogen Receptor positive, hormone therapy MUST be prescribed",
    severity: Severity::Critical,
};

impl Rule for EstrogenReceptorTherapy {
    fn definition(&self) -> &RuleDefinition {
        &ER_DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        let Some(er_status) = record.observation_value("er_status") else {
            return Ok(RuleResult::not_applicable(def, "N/A: ER status not recorded"));
        };
        if !record.observation_is("er_status", "positive") {
            return Ok(RuleResult::not_applicable(def, "N/A: Patient is ER-negative"));
        }

        if let Some(therapy) = first_endocrine_therapy(record) {
            return Ok(RuleResult::compliant(
                def,
                format!("ER+ patient correctly prescribed {}", therapy.name),
            )
            .with_detail("therapy", therapy.name.as_str()));
        }

        let prescribed = record.medication_names();
        let prescribed: Value = if prescribed.is_empty() {
            json!("NONE")
        } else {
            json!(prescribed)
        };

        Ok(
            RuleResult::violation(def, "Patient ER+ but NO hormone therapy prescribed")
                .with_action(hormone_therapy_action(record))
                .affecting("medications")
                .with_detail("er_status", er_status)
                .with_detail("prescribed_therapies", prescribed),
        )
    }
}

/// First medication, in medication order, from any endocrine therapy class.
fn first_endocrine_therapy(record: &PatientRecord) -> Option<&Medication> {
    record.medications.iter().find(|m| {
        ENDOCRINE_CLASSES
            .iter()
            .any(|class| class.iter().any(|name| same_label(&m.name, name)))
    })
}

/// Endocrine therapy recommendation, narrowed when menopausal status is recorded.
fn hormone_therapy_action(record: &PatientRecord) -> &'static str {
    match record.observation_value("menopausal_status") {
        Some(status) if status.eq_ignore_ascii_case("premenopausal") => {
            "MUST prescribe: Tamoxifen (premenopausal)"
        }
        Some(status) if status.eq_ignore_ascii_case("postmenopausal") => {
            "MUST prescribe: Aromatase Inhibitor (Letrozole, Anastrozole or Exemestane)"
        }
        _ => "MUST prescribe: Tamoxifen (premenopausal) or Aromatase Inhibitor (postmenopausal)",
    }
}

/// R002: HER2 3+ tumours require HER2-directed therapy.
pub struct Her2TargetedTherapy;

const HER2_DEFINITION: RuleDefinition = RuleDefinition {
    id: "R002",
    name: "HER2+ → Herceptin Mandatory",
    description: "If HER2 3+, Trastuzumab (Herceptin) MUST be prescribed",
    severity: Severity::Critical,
};

impl Rule for Her2TargetedTherapy {
    fn definition(&self) -> &RuleDefinition {
        &HER2_DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        if record.observation_value("her2_status") != Some("3+") {
            return Ok(RuleResult::not_applicable(
                def,
                "N/A: Patient is HER2-negative or unknown",
            ));
        }

        match record.find_medication(HER2_THERAPIES) {
            Some(therapy) => Ok(RuleResult::compliant(
                def,
                format!("HER2+ patient correctly prescribed {}", therapy.name),
            )
            .with_detail("therapy", therapy.name.as_str())),
            None => Ok(RuleResult::violation(
                def,
                "Patient HER2 3+ but NO Herceptin (Trastuzumab) prescribed",
            )
            .with_action("MUST start Herceptin immediately - consider HER2-directed therapy")
            .affecting("medications")
            .with_detail("her2_status", "3+ (positive)")),
        }
    }
}

/// R010: PR status is informational only.
pub struct ProgesteroneReceptorStatus;

const PR_DEFINITION: RuleDefinition = RuleDefinition {
    id: "R010",
    name: "PR+ Positive → Hormone Response Expected",
    description: "PR+ patients typically respond better to hormone therapy",
    severity: Severity::Info,
};

impl Rule for ProgesteroneReceptorStatus {
    fn definition(&self) -> &RuleDefinition {
        &PR_DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        let result = match record.observation_value("pr_status") {
            Some(status) if status.eq_ignore_ascii_case("positive") => RuleResult::informational(
                def,
                "PR+ tumour: good response to hormone therapy expected",
            )
            .with_detail("pr_status", status),
            Some(status) => RuleResult::informational(
                def,
                "PR-negative tumour: reduced hormone therapy response possible",
            )
            .with_detail("pr_status", status),
            None => RuleResult::informational(def, "N/A: PR status not recorded"),
        };

        Ok(result)
    }
}
