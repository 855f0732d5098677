use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OncologyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("duplicate patient id in record source: {0}")]
    DuplicatePatientId(String),
    #[error("duplicate rule id in registry: {0}")]
    DuplicateRuleId(String),
    #[error("failed to read records file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported records file format: {0}")]
    UnsupportedFormat(String),
    #[error("translation error: {0}")]
    Translation(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type OncologyResult<T> = std::result::Result<T, OncologyError>;

/// Failure local to a single rule evaluation.
///
/// These never abort a batch: the engine converts them into a placeholder result for the
/// affected rule and carries on with the rest of the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("malformed date in {field}: {value:?}")]
    MalformedDate { field: String, value: String },
    #[error("{field} ends before it starts")]
    InvertedPeriod { field: String },
    #[error("evaluator failed: {0}")]
    Internal(String),
}

impl RuleError {
    /// Name of the record field implicated by the failure, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            RuleError::MalformedDate { field, .. } | RuleError::InvertedPeriod { field } => {
                Some(field)
            }
            RuleError::Internal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_names_implicated_field() {
        let malformed = RuleError::MalformedDate {
            field: "medications[Tamoxifen].start_date".into(),
            value: "".into(),
        };
        assert_eq!(malformed.field(), Some("medications[Tamoxifen].start_date"));
        assert_eq!(
            malformed.to_string(),
            "malformed date in medications[Tamoxifen].start_date: \"\""
        );

        let inverted = RuleError::InvertedPeriod { field: "medications[Letrozole]".into() };
        assert_eq!(inverted.field(), Some("medications[Letrozole]"));

        assert_eq!(RuleError::Internal("boom".into()).field(), None);
    }
}
