//! Patient record wire models and translation helpers.
//!
//! Record files are YAML or JSON documents with a top-level `patients:` list. Each entry is
//! deserialised into a strict wire struct (`deny_unknown_fields`) and then translated into the
//! domain [`PatientRecord`]. Schema mismatches are reported with the path to the failing field,
//! e.g. `patients[2].medications[0].start_date`.
//!
//! Translation only checks shape. Semantic checks such as id uniqueness happen in
//! [`crate::validation`] when the records are handed to a record source.

use crate::record::{
    Consultation, Demographics, Diagnosis, ImagingStudy, Medication, Observation, PatientRecord,
};
use crate::{OncologyError, OncologyResult};
use onco_types::PatientId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Public parsing operations
// ============================================================================

/// Parse a YAML records document.
///
/// # Errors
///
/// Returns [`OncologyError::Translation`] if the YAML does not match the wire schema: unknown
/// keys, wrong types, missing required fields, or a blank patient id.
pub fn parse_records_yaml(yaml_text: &str) -> OncologyResult<Vec<PatientRecord>> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    let wire = serde_path_to_error::deserialize::<_, RecordsFileWire>(deserializer)
        .map_err(schema_mismatch)?;
    Ok(wire_to_domain(wire))
}

/// Parse a JSON records document. Same schema and errors as [`parse_records_yaml`].
pub fn parse_records_json(json_text: &str) -> OncologyResult<Vec<PatientRecord>> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    let wire = serde_path_to_error::deserialize::<_, RecordsFileWire>(&mut deserializer)
        .map_err(schema_mismatch)?;
    Ok(wire_to_domain(wire))
}

/// Load records from a file, choosing the parser from the extension
/// (`.yaml`/`.yml` or `.json`).
pub fn load_records(path: &Path) -> OncologyResult<Vec<PatientRecord>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> OncologyResult<Vec<PatientRecord>> = match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_records_yaml,
        Some("json") => parse_records_json,
        _ => {
            return Err(OncologyError::UnsupportedFormat(format!(
                "{} (expected .yaml, .yml or .json)",
                path.display()
            )))
        }
    };

    let text = std::fs::read_to_string(path).map_err(|source| OncologyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

fn schema_mismatch<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> OncologyError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    OncologyError::Translation(format!("Patient records schema mismatch at {path}: {source}"))
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordsFileWire {
    patients: Vec<PatientWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatientWire {
    #[serde(alias = "mrn")]
    id: PatientId,
    #[serde(default)]
    name: Option<String>,
    age: u32,
    gender: String,
    diagnosis: DiagnosisWire,
    #[serde(default)]
    observations: BTreeMap<String, ObservationWire>,
    #[serde(default)]
    medications: Vec<MedicationWire>,
    #[serde(default)]
    consultations: Vec<EventWire>,
    #[serde(default)]
    imaging: Vec<EventWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiagnosisWire {
    code: String,
    name: String,
    stage: String,
    status: String,
    date: String,
    #[serde(default)]
    metastatic_sites: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObservationWire {
    value: String,
    date: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MedicationWire {
    name: String,
    dose: String,
    frequency: String,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Consultations and imaging studies share the `{type, date}` shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventWire {
    #[serde(rename = "type")]
    kind: String,
    date: String,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: RecordsFileWire) -> Vec<PatientRecord> {
    wire.patients.into_iter().map(patient_to_domain).collect()
}

fn patient_to_domain(wire: PatientWire) -> PatientRecord {
    PatientRecord {
        id: wire.id,
        demographics: Demographics {
            name: wire.name,
            age: wire.age,
            gender: wire.gender,
        },
        diagnosis: Diagnosis {
            code: wire.diagnosis.code,
            name: wire.diagnosis.name,
            stage: wire.diagnosis.stage,
            status: wire.diagnosis.status,
            date: wire.diagnosis.date,
            metastatic_sites: wire.diagnosis.metastatic_sites,
        },
        observations: wire
            .observations
            .into_iter()
            .map(|(key, obs)| {
                (
                    key,
                    Observation {
                        value: obs.value,
                        date: obs.date,
                    },
                )
            })
            .collect(),
        medications: wire
            .medications
            .into_iter()
            .map(|m| Medication {
                name: m.name,
                dose: m.dose,
                frequency: m.frequency,
                start_date: m.start_date,
                end_date: m.end_date,
                reason: m.reason,
            })
            .collect(),
        consultations: wire
            .consultations
            .into_iter()
            .map(|c| Consultation {
                kind: c.kind,
                date: c.date,
            })
            .collect(),
        imaging: wire
            .imaging
            .into_iter()
            .map(|i| ImagingStudy {
                kind: i.kind,
                date: i.date,
            })
            .collect(),
    }
}
