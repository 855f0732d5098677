//! Rule capability and the ordered rule registry.

use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::PatientRecord;
use crate::result::{RuleResult, Severity};
use crate::rules;
use crate::{OncologyError, OncologyResult};
use std::collections::HashSet;

/// Static metadata for a guideline rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleDefinition {
    /// Stable identifier such as `"R001"`.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Declared severity, copied onto results whenever the rule applies.
    pub severity: Severity,
}

/// A codified guideline that can be checked against a patient record.
///
/// Implementations must be pure: the same record and context always yield the same result, and
/// the record is never modified. Data problems local to the rule are reported as a
/// [`RuleError`]; the engine turns those into a placeholder result.
pub trait Rule: Send + Sync {
    fn definition(&self) -> &RuleDefinition;

    fn evaluate(
        &self,
        record: &PatientRecord,
        ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError>;
}

/// Ordered, immutable collection of rules. Iteration order is report order.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// The ten oncology guideline rules, R001 through R010.
    pub fn standard() -> Self {
        Self {
            rules: rules::standard_rules(),
        }
    }

    /// Build a registry from an explicit rule list, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`OncologyError::DuplicateRuleId`] if two rules share an id.
    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> OncologyResult<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            let id = rule.definition().id;
            if !seen.insert(id) {
                return Err(OncologyError::DuplicateRuleId(id.to_string()));
            }
        }
        Ok(Self { rules })
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.iter().find(|rule| rule.definition().id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn definitions(&self) -> impl Iterator<Item = &RuleDefinition> + '_ {
        self.iter().map(|rule| rule.definition())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.definitions().map(|d| d.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_lists_ten_rules_in_order() {
        let registry = RuleRegistry::standard();
        let ids: Vec<&str> = registry.definitions().map(|d| d.id).collect();
        assert_eq!(
            ids,
            ["R001", "R002", "R003", "R004", "R005", "R006", "R007", "R008", "R009", "R010"]
        );
    }

    #[test]
    fn lookup_by_id() {
        let registry = RuleRegistry::standard();
        let rule = registry.get("R004").expect("R004 registered");
        assert_eq!(rule.definition().severity, Severity::Medium);
        assert!(registry.get("R011").is_none());
    }

    #[test]
    fn declared_severities() {
        let registry = RuleRegistry::standard();
        let severities: Vec<Severity> = registry.definitions().map(|d| d.severity).collect();
        assert_eq!(
            severities,
            [
                Severity::Critical,
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::High,
                Severity::High,
                Severity::Medium,
                Severity::Critical,
                Severity::High,
                Severity::Info,
            ]
        );
    }

    #[test]
    fn rule_names_and_descriptions() {
        let registry = RuleRegistry::standard();
        let named: Vec<(&str, &str)> = registry
            .definitions()
            .filter(|d| ["R005", "R006", "R007", "R008", "R009"].contains(&d.id))
            .map(|d| (d.name, d.description))
            .collect();
        assert_eq!(
            named,
            [
                (
                    "Tamoxifen Interaction Check",
                    "Tamoxifen + CYP3A4 inhibitors = DANGEROUS interaction",
                ),
                (
                    "Anthracycline → Cardiac Monitoring",
                    "Patients on Anthracycline MUST have cardiac monitoring (ECHO/EF)",
                ),
                (
                    "Adjuvant Therapy Duration",
                    "Tamoxifen adjuvant should be minimum 5 years (or until 10 years)",
                ),
                (
                    "Metastatic → Complete Staging",
                    "Stage IV MUST have PET-CT, Bone Scan, Liver Imaging",
                ),
                (
                    "Stage III+ → Pathology Report",
                    "Stage III or higher MUST have complete pathology report",
                ),
            ]
        );
    }

    #[test]
    fn rejects_duplicate_rule_ids() {
        let mut rules = rules::standard_rules();
        rules.extend(rules::standard_rules().into_iter().take(1));
        let err = RuleRegistry::from_rules(rules).expect_err("should reject duplicate");
        assert!(matches!(err, OncologyError::DuplicateRuleId(id) if id == "R001"));
    }
}
