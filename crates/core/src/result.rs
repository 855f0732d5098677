//! Rule verdicts.
//!
//! [`Status`] and [`Severity`] are closed, machine-readable enumerations. They serialise as
//! upper-case tags (`"VIOLATION"`, `"CRITICAL"`); any icons or colours belong to whoever renders
//! them.

use crate::error::RuleError;
use crate::registry::RuleDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Severity class of a rule or result. Declaration order gives the total order
/// `Info < Low < Medium < High < Critical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Most severe first, the order reports list them in.
    pub const DESCENDING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// CRITICAL and HIGH: a violation at these levels makes the patient non-compliant.
    pub fn is_blocking(self) -> bool {
        self >= Severity::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one rule for one patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Compliant,
    Warning,
    Violation,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Compliant => "COMPLIANT",
            Status::Warning => "WARNING",
            Status::Violation => "VIOLATION",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule's verdict for one patient.
///
/// Built fresh per evaluation through the constructors below, which copy the rule's id, name
/// and declared severity from its [`RuleDefinition`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RuleResult {
    pub rule_id: String,
    pub rule_name: String,
    pub status: Status,
    pub severity: Severity,
    pub message: String,
    /// Remediation, present only for non-compliant outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_field: Option<String>,
}

impl RuleResult {
    pub fn new(
        definition: &RuleDefinition,
        status: Status,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: definition.id.to_string(),
            rule_name: definition.name.to_string(),
            status,
            severity,
            message: message.into(),
            action: None,
            details: None,
            affected_field: None,
        }
    }

    /// Rule applies and the required evidence is present.
    pub fn compliant(definition: &RuleDefinition, message: impl Into<String>) -> Self {
        Self::new(definition, Status::Compliant, definition.severity, message)
    }

    /// Triggering condition is absent or unknown; severity drops to LOW.
    pub fn not_applicable(definition: &RuleDefinition, message: impl Into<String>) -> Self {
        Self::new(definition, Status::Compliant, Severity::Low, message)
    }

    /// Purely informational outcome at INFO severity.
    pub fn informational(definition: &RuleDefinition, message: impl Into<String>) -> Self {
        Self::new(definition, Status::Compliant, Severity::Info, message)
    }

    pub fn warning(definition: &RuleDefinition, message: impl Into<String>) -> Self {
        Self::new(definition, Status::Warning, definition.severity, message)
    }

    pub fn violation(definition: &RuleDefinition, message: impl Into<String>) -> Self {
        Self::new(definition, Status::Violation, definition.severity, message)
    }

    /// Placeholder for a rule that could not be evaluated.
    ///
    /// Reported as INFO-severity COMPLIANT so the gap is visible in audits without counting
    /// toward the patient's overall status. The cause is kept under the `error` detail.
    pub fn evaluation_failed(definition: &RuleDefinition, error: &RuleError) -> Self {
        let result = Self::informational(
            definition,
            format!("Rule could not be evaluated: {error}"),
        )
        .with_detail("error", error.to_string());

        match error.field() {
            Some(field) => result.affecting(field),
            None => result,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn affecting(mut self, field: impl Into<String>) -> Self {
        self.affected_field = Some(field.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|details| details.get(key))
    }

    /// WARNING or VIOLATION.
    pub fn is_non_compliant(&self) -> bool {
        self.status != Status::Compliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: RuleDefinition = RuleDefinition {
        id: "R999",
        name: "Test rule",
        description: "Used by result tests",
        severity: Severity::High,
    };

    #[test]
    fn severity_order_is_total_and_descending_list_matches() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);

        let mut sorted = Severity::DESCENDING.to_vec();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, Severity::DESCENDING.to_vec());
    }

    #[test]
    fn tags_serialise_upper_case() {
        let json = serde_json::to_string(&(Status::Violation, Severity::Critical)).expect("json");
        assert_eq!(json, r#"["VIOLATION","CRITICAL"]"#);
    }

    #[test]
    fn constructors_copy_definition_metadata() {
        let result = RuleResult::violation(&DEFINITION, "missing evidence");
        assert_eq!(result.rule_id, "R999");
        assert_eq!(result.rule_name, "Test rule");
        assert_eq!(result.severity, Severity::High);

        let result = RuleResult::not_applicable(&DEFINITION, "N/A");
        assert_eq!(result.status, Status::Compliant);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let result = RuleResult::compliant(&DEFINITION, "ok");
        let json = serde_json::to_value(&result).expect("json");
        assert!(json.get("action").is_none());
        assert!(json.get("details").is_none());
        assert!(json.get("affected_field").is_none());
    }

    #[test]
    fn evaluation_failure_is_info_placeholder_naming_field() {
        let error = RuleError::MalformedDate {
            field: "medications[Fluconazole].start_date".into(),
            value: "soon".into(),
        };
        let result = RuleResult::evaluation_failed(&DEFINITION, &error);
        assert_eq!(result.status, Status::Compliant);
        assert_eq!(result.severity, Severity::Info);
        assert_eq!(
            result.affected_field.as_deref(),
            Some("medications[Fluconazole].start_date")
        );
        assert!(result.message.contains("soon"));
        assert!(result.action.is_none());
    }
}
