//! Validated identifier types shared across the oncology crates.

/// Errors that can occur when creating a [`PatientId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatientIdError {
    #[error("patient id cannot be blank")]
    Blank,
    #[error("patient id {0:?} contains control characters")]
    ControlCharacter(String),
}

/// Medical record number identifying a patient within a record source.
///
/// Surrounding whitespace is trimmed on construction, so `" BC-2025-001 "` and `"BC-2025-001"`
/// name the same patient. Blank ids and ids containing control characters are rejected.
/// Deserialisation goes through the same check.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatientId(String);

impl PatientId {
    pub fn new(input: impl AsRef<str>) -> Result<Self, PatientIdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PatientIdError::Blank);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(PatientIdError::ControlCharacter(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PatientId {
    type Error = PatientIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let id = PatientId::new("  BC-2025-001 ").expect("valid id");
        assert_eq!(id.as_str(), "BC-2025-001");
    }

    #[test]
    fn rejects_blank_and_control_characters() {
        assert_eq!(PatientId::new("   "), Err(PatientIdError::Blank));
        assert!(matches!(
            PatientId::new("BC-\u{7}1"),
            Err(PatientIdError::ControlCharacter(_))
        ));
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let id: PatientId = serde_json::from_str("\" BC-9 \"").expect("deserialise");
        assert_eq!(id.as_str(), "BC-9");
        assert_eq!(serde_json::to_string(&id).expect("serialise"), "\"BC-9\"");
    }

    #[test]
    fn deserialize_rejects_blank_string() {
        let err = serde_json::from_str::<PatientId>("\"\"").expect_err("should reject blank");
        assert!(err.to_string().contains("cannot be blank"));
    }
}
