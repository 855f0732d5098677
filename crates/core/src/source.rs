//! Record source port and the in-memory adapter.
//!
//! The engine never reaches for a global patient table. Callers construct a [`RecordSource`]
//! per run (seeded demonstration data, or records loaded from a file) and pass it in.

use crate::record::PatientRecord;
use crate::validation::validate_records;
use crate::{seed, wire, OncologyResult};
use std::path::Path;

/// Read-only access to patient records.
pub trait RecordSource: Send + Sync {
    /// Fetch one record by id. `Ok(None)` means the id is not present.
    fn get(&self, id: &str) -> OncologyResult<Option<PatientRecord>>;

    /// All records, in source order.
    fn list_all(&self) -> OncologyResult<Vec<PatientRecord>>;
}

/// Validated, immutable set of records held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryRecordSource {
    records: Vec<PatientRecord>,
}

impl InMemoryRecordSource {
    /// Create a source from already-translated records.
    ///
    /// # Errors
    ///
    /// Returns `OncologyError::InvalidInput` for a malformed record and
    /// `OncologyError::DuplicatePatientId` when two records share an id.
    pub fn new(records: Vec<PatientRecord>) -> OncologyResult<Self> {
        validate_records(&records)?;
        Ok(Self { records })
    }

    /// The four demonstration patients.
    pub fn demo() -> OncologyResult<Self> {
        Self::new(seed::demo_records()?)
    }

    /// Load and validate records from a YAML or JSON file.
    pub fn from_path(path: &Path) -> OncologyResult<Self> {
        let source = Self::new(wire::load_records(path)?)?;
        tracing::info!(
            "Loaded {} patient records from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    /// Use `path` when given, otherwise the demonstration set.
    pub fn from_optional_path(path: Option<&Path>) -> OncologyResult<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::demo(),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for InMemoryRecordSource {
    fn get(&self, id: &str) -> OncologyResult<Option<PatientRecord>> {
        let id = id.trim();
        Ok(self.records.iter().find(|r| r.id.as_str() == id).cloned())
    }

    fn list_all(&self) -> OncologyResult<Vec<PatientRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::RecordBuilder;
    use crate::OncologyError;
    use std::io::Write;

    #[test]
    fn demo_source_holds_four_patients_in_order() {
        let source = InMemoryRecordSource::demo().expect("demo");
        let ids: Vec<&str> = source.ids().collect();
        assert_eq!(ids, ["BC-2025-001", "BC-2025-042", "BC-2025-089", "BC-2025-156"]);
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let source = InMemoryRecordSource::demo().expect("demo");
        assert!(source.get("BC-2025-999").expect("get").is_none());
        let record = source.get(" BC-2025-089 ").expect("get").expect("present");
        assert_eq!(record.demographics.age, 38);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = InMemoryRecordSource::new(vec![
            RecordBuilder::new("P1").build(),
            RecordBuilder::new("P1").build(),
        ])
        .expect_err("should reject");
        assert!(matches!(err, OncologyError::DuplicatePatientId(_)));
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("temp file");
        write!(
            file,
            r#"{{"patients": [{{"id": "X-1", "age": 44, "gender": "female",
                "diagnosis": {{"code": "c", "name": "n", "stage": "I", "status": "active",
                               "date": "2024-01-01"}}}}]}}"#
        )
        .expect("write");

        let source = InMemoryRecordSource::from_path(file.path()).expect("load");
        assert_eq!(source.ids().collect::<Vec<_>>(), ["X-1"]);
    }

    #[test]
    fn duplicate_ids_in_file_are_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        let patient = "  - id: X-1\n    age: 44\n    gender: female\n    diagnosis:\n      code: c\n      name: n\n      stage: I\n      status: active\n      date: \"2024-01-01\"\n";
        write!(file, "patients:\n{patient}{patient}").expect("write");

        let err = InMemoryRecordSource::from_path(file.path()).expect_err("should reject");
        assert!(matches!(err, OncologyError::DuplicatePatientId(id) if id == "X-1"));
    }
}
