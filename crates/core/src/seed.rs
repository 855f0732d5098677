//! Demonstration patient set.

use crate::record::PatientRecord;
use crate::wire::parse_records_yaml;
use crate::OncologyResult;

const DEMO_PATIENTS_YAML: &str = include_str!("../data/demo_patients.yaml");

/// The four demonstration patients, parsed from the embedded YAML document.
pub fn demo_records() -> OncologyResult<Vec<PatientRecord>> {
    parse_records_yaml(DEMO_PATIENTS_YAML)
}
