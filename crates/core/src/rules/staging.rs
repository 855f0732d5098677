//! Staging workup rules for advanced disease: imaging (R008) and pathology (R009).

use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::{normalise_label, PatientRecord};
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity, Status};

/// A required staging study and the imaging labels that satisfy it.
struct RequiredStudy {
    label: &'static str,
    matches: fn(&str) -> bool,
}

fn is_pet_ct(kind: &str) -> bool {
    kind == "pet_ct" || kind == "petct"
}

fn is_bone_scan(kind: &str) -> bool {
    kind == "bone_scan"
}

fn is_liver_imaging(kind: &str) -> bool {
    kind.contains("liver") || kind.contains("hepatic")
}

const REQUIRED_STUDIES: [RequiredStudy; 3] = [
    RequiredStudy {
        label: "PET-CT",
        matches: is_pet_ct,
    },
    RequiredStudy {
        label: "Bone Scan",
        matches: is_bone_scan,
    },
    RequiredStudy {
        label: "Liver Imaging",
        matches: is_liver_imaging,
    },
];

/// R008: stage IV disease needs a complete metastatic imaging workup.
pub struct MetastaticStaging;

const METASTATIC_DEFINITION: RuleDefinition = RuleDefinition {
    id: "R008",
    name: "Metastatic → Complete Staging",
    description: "Stage IV MUST have PET-CT, Bone Scan, Liver Imaging",
    severity: Severity::Critical,
};

impl Rule for MetastaticStaging {
    fn definition(&self) -> &RuleDefinition {
        &METASTATIC_DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        let Some(stage) = record.stage() else {
            return Ok(RuleResult::not_applicable(
                def,
                format!("N/A: Stage {:?} not recognised", record.diagnosis.stage),
            ));
        };
        if !stage.is_metastatic() {
            return Ok(RuleResult::not_applicable(
                def,
                format!("N/A: Stage {stage} (rule applies to stage IV)"),
            ));
        }

        let recorded: Vec<String> = record
            .imaging
            .iter()
            .map(|study| normalise_label(&study.kind))
            .collect();
        let mut present = Vec::new();
        let mut missing = Vec::new();
        for study in &REQUIRED_STUDIES {
            if recorded.iter().any(|kind| (study.matches)(kind)) {
                present.push(study.label);
            } else {
                missing.push(study.label);
            }
        }

        if missing.is_empty() {
            return Ok(RuleResult::compliant(
                def,
                "Complete metastatic staging documented (PET-CT, bone scan, liver imaging)",
            ));
        }

        let result = if record.imaging.is_empty() {
            RuleResult::violation(def, "Stage IV with NO staging imaging documented")
        } else {
            RuleResult::new(
                def,
                Status::Warning,
                def.severity,
                format!("Incomplete metastatic staging: missing {}", missing.join(", ")),
            )
            .with_detail("present", present)
            .with_detail(
                "recorded",
                record
                    .imaging
                    .iter()
                    .map(|study| study.kind.as_str())
                    .collect::<Vec<_>>(),
            )
        };

        Ok(result
            .with_action(format!("MUST complete staging workup: {}", missing.join(", ")))
            .affecting("imaging")
            .with_detail("missing", missing))
    }
}

/// R009: stage III and IV disease needs a documented pathology report.
pub struct AdvancedStagePathology;

const PATHOLOGY_DEFINITION: RuleDefinition = RuleDefinition {
    id: "R009",
    name: "Stage III+ → Pathology Report",
    description: "Stage III or higher MUST have complete pathology report",
    severity: Severity::High,
};

impl Rule for AdvancedStagePathology {
    fn definition(&self) -> &RuleDefinition {
        &PATHOLOGY_DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        _ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();

        let Some(stage) = record.stage() else {
            return Ok(RuleResult::not_applicable(
                def,
                format!("N/A: Stage {:?} not recognised", record.diagnosis.stage),
            ));
        };
        if !stage.is_advanced() {
            return Ok(RuleResult::not_applicable(
                def,
                format!("N/A: Stage {stage} (rule applies to stage III and above)"),
            ));
        }

        if record.observation_value("pathology_report").is_some()
            || record.has_consultation(&["pathology_review"])
        {
            return Ok(RuleResult::compliant(
                def,
                format!("Pathology report documented for stage {stage}"),
            ));
        }

        Ok(RuleResult::violation(
            def,
            format!("Stage {stage} with NO complete pathology report documented"),
        )
        .with_action("MUST obtain complete pathology report (margins, nodes, receptor panel)")
        .affecting("observations")
        .with_detail("stage", stage.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{context, RecordBuilder};
    use serde_json::json;

    #[test]
    fn stage_iv_with_ct_only_warns_with_all_missing() {
        let record = RecordBuilder::new("P1").stage("IV").imaging("CT").build();

        let result = MetastaticStaging
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Warning);
        assert_eq!(
            result.detail("missing"),
            Some(&json!(["PET-CT", "Bone Scan", "Liver Imaging"]))
        );
        assert_eq!(result.detail("present"), Some(&json!([])));
        assert_eq!(result.detail("recorded"), Some(&json!(["CT"])));
    }

    #[test]
    fn stage_iv_without_imaging_is_critical_violation() {
        let record = RecordBuilder::new("P1").stage("IV").build();

        let result = MetastaticStaging
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Violation);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(
            result.detail("missing"),
            Some(&json!(["PET-CT", "Bone Scan", "Liver Imaging"]))
        );
    }

    #[test]
    fn partial_workup_lists_present_and_missing() {
        let record = RecordBuilder::new("P1")
            .stage("Stage IV")
            .imaging("PET/CT")
            .imaging("Liver MRI")
            .build();

        let result = MetastaticStaging
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Warning);
        assert_eq!(
            result.detail("present"),
            Some(&json!(["PET-CT", "Liver Imaging"]))
        );
        assert_eq!(result.detail("missing"), Some(&json!(["Bone Scan"])));
    }

    #[test]
    fn complete_workup_is_compliant() {
        let record = RecordBuilder::new("P1")
            .stage("IV")
            .imaging("PET-CT")
            .imaging("Bone Scan")
            .imaging("Hepatic ultrasound")
            .build();

        let result = MetastaticStaging
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Compliant);
        assert_eq!(result.severity, Severity::Critical);
    }

    #[test]
    fn non_metastatic_or_unknown_stage_is_not_applicable() {
        for stage in ["IIIC", "unknown"] {
            let record = RecordBuilder::new("P1").stage(stage).build();
            let result = MetastaticStaging
                .evaluate(&record, &context())
                .expect("evaluates");
            assert_eq!(result.status, Status::Compliant);
            assert_eq!(result.severity, Severity::Low);
        }
    }

    #[test]
    fn stage_iii_without_pathology_is_high_violation() {
        let record = RecordBuilder::new("P1").stage("IIIB").build();

        let result = AdvancedStagePathology
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Violation);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.affected_field.as_deref(), Some("observations"));
    }

    #[test]
    fn pathology_report_or_review_is_compliant() {
        let with_report = RecordBuilder::new("P1")
            .stage("IV")
            .observation("pathology_report", "Grade 3 IDC, margins clear")
            .build();
        let with_review = RecordBuilder::new("P2")
            .stage("IIIA")
            .consultation("Pathology_Review")
            .build();

        for record in [with_report, with_review] {
            let result = AdvancedStagePathology
                .evaluate(&record, &context())
                .expect("evaluates");
            assert_eq!(result.status, Status::Compliant);
        }
    }

    #[test]
    fn early_stage_is_not_applicable_for_pathology() {
        let record = RecordBuilder::new("P1").stage("IIA").build();

        let result = AdvancedStagePathology
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.severity, Severity::Low);
    }
}
