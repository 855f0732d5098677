//! Input validation utilities.
//!
//! Records are validated once, when they enter a record source. Evaluators can then assume the
//! structural invariants checked here and only deal with clinical content. Dates are not checked
//! here: a blank or malformed date is reported by the rules that need it.

use crate::record::PatientRecord;
use crate::{OncologyError, OncologyResult};
use std::collections::HashSet;

/// Validates that a single record has usable names for every list entry.
///
/// Checks that:
/// - every medication has a non-blank name
/// - every consultation and imaging study has a non-blank type
///
/// # Arguments
///
/// * `record` - The patient record to check.
///
/// # Errors
///
/// Returns an `OncologyError::InvalidInput` naming the offending field.
pub fn validate_record(record: &PatientRecord) -> OncologyResult<()> {
    let id = record.id.as_str();

    for (index, medication) in record.medications.iter().enumerate() {
        if medication.name.trim().is_empty() {
            return Err(OncologyError::InvalidInput(format!(
                "{id}: medications[{index}].name cannot be empty"
            )));
        }
    }

    for (section, kinds) in [
        (
            "consultations",
            record
                .consultations
                .iter()
                .map(|c| c.kind.as_str())
                .collect::<Vec<_>>(),
        ),
        (
            "imaging",
            record.imaging.iter().map(|i| i.kind.as_str()).collect(),
        ),
    ] {
        if let Some(index) = kinds.iter().position(|kind| kind.trim().is_empty()) {
            return Err(OncologyError::InvalidInput(format!(
                "{id}: {section}[{index}].type cannot be empty"
            )));
        }
    }

    Ok(())
}

/// Validates a batch of records: each record individually, then id uniqueness.
///
/// # Errors
///
/// Returns the first `OncologyError::InvalidInput` from [`validate_record`], or
/// `OncologyError::DuplicatePatientId` for the first repeated id.
pub fn validate_records(records: &[PatientRecord]) -> OncologyResult<()> {
    let mut seen = HashSet::new();
    for record in records {
        validate_record(record)?;
        if !seen.insert(record.id.as_str()) {
            return Err(OncologyError::DuplicatePatientId(record.id.to_string()));
        }
    }
    Ok(())
}
