//! Patient record model.
//!
//! A [`PatientRecord`] is the read-only input to every rule. Records are validated once at the
//! record-source boundary (see [`crate::validation`]); after that, evaluators only borrow them.
//!
//! Dates are kept as the ISO-8601 strings supplied by the source. They are parsed lazily by the
//! rules that need them, so a malformed date only affects those rules and surfaces as a
//! [`RuleError`] rather than rejecting the whole record.

use crate::constants::ISO_DATE_FORMAT;
use crate::error::RuleError;
use crate::stage::Stage;
use chrono::NaiveDate;
use onco_types::PatientId;
use std::collections::BTreeMap;

/// One patient's clinical facts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientRecord {
    /// Medical record number, unique within a source.
    pub id: PatientId,
    pub demographics: Demographics,
    pub diagnosis: Diagnosis,
    /// Biomarker name (e.g. `er_status`) to its latest observation. Absent means unknown.
    pub observations: BTreeMap<String, Observation>,
    pub medications: Vec<Medication>,
    pub consultations: Vec<Consultation>,
    pub imaging: Vec<ImagingStudy>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Demographics {
    pub name: Option<String>,
    pub age: u32,
    pub gender: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnosis {
    /// Coded terminology identifier (e.g. a SNOMED CT concept id).
    pub code: String,
    pub name: String,
    pub stage: String,
    pub status: String,
    pub date: String,
    pub metastatic_sites: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub value: String,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub dose: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consultation {
    pub kind: String,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagingStudy {
    pub kind: String,
    pub date: String,
}

/// Inclusive date range during which a medication is taken. `end == None` is open-ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePeriod {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl ActivePeriod {
    /// First day both periods are active, if they overlap at all.
    pub fn overlap_start(&self, other: &ActivePeriod) -> Option<NaiveDate> {
        let starts_before_other_ends = other.end.map_or(true, |end| self.start <= end);
        let other_starts_before_self_ends = self.end.map_or(true, |end| other.start <= end);

        (starts_before_other_ends && other_starts_before_self_ends)
            .then(|| self.start.max(other.start))
    }
}

/// Case- and whitespace-insensitive label comparison used for drug, consultation and imaging
/// names as well as observation values.
pub fn same_label(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Lower-case a free-text label and fold spaces, hyphens and slashes into underscores,
/// so `"PET-CT"`, `"pet ct"` and `"PET/CT"` all become `"pet_ct"`.
pub fn normalise_label(label: &str) -> String {
    label
        .trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '/' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Parse an ISO-8601 calendar date, reporting `field` on failure.
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, RuleError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|_| {
        RuleError::MalformedDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    })
}

impl PatientRecord {
    /// Trimmed value of an observation, or `None` when it is absent or blank.
    pub fn observation_value(&self, key: &str) -> Option<&str> {
        self.observations
            .get(key)
            .map(|observation| observation.value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Whether observation `key` is recorded with `expected` (case-insensitive).
    pub fn observation_is(&self, key: &str, expected: &str) -> bool {
        self.observation_value(key)
            .is_some_and(|value| same_label(value, expected))
    }

    /// Medications whose name matches any of `names`, in medication order.
    pub fn medications_named<'a>(
        &'a self,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a Medication> + 'a {
        self.medications
            .iter()
            .filter(move |m| names.iter().any(|name| same_label(&m.name, name)))
    }

    /// First medication whose name matches any of `names`.
    pub fn find_medication(&self, names: &[&str]) -> Option<&Medication> {
        self.medications
            .iter()
            .find(|m| names.iter().any(|name| same_label(&m.name, name)))
    }

    pub fn medication_names(&self) -> Vec<&str> {
        self.medications.iter().map(|m| m.name.as_str()).collect()
    }

    /// Whether a consultation of any of the given kinds is documented.
    pub fn has_consultation(&self, kinds: &[&str]) -> bool {
        self.consultations
            .iter()
            .any(|c| kinds.iter().any(|kind| same_label(&c.kind, kind)))
    }

    /// Parsed diagnosis stage, or `None` when the stage text is not recognised.
    pub fn stage(&self) -> Option<Stage> {
        self.diagnosis.stage.parse().ok()
    }
}

impl Medication {
    /// Parse the start and end dates into an [`ActivePeriod`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MalformedDate`] when either date does not parse and
    /// [`RuleError::InvertedPeriod`] when the end date precedes the start date.
    pub fn period(&self) -> Result<ActivePeriod, RuleError> {
        let start = parse_iso_date(
            &format!("medications[{}].start_date", self.name),
            &self.start_date,
        )?;
        let end = self
            .end_date
            .as_deref()
            .map(|end| parse_iso_date(&format!("medications[{}].end_date", self.name), end))
            .transpose()?;

        if end.is_some_and(|end| end < start) {
            return Err(RuleError::InvertedPeriod {
                field: format!("medications[{}]", self.name),
            });
        }

        Ok(ActivePeriod { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{medication, RecordBuilder};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).expect("valid date")
    }

    #[test]
    fn normalises_imaging_labels() {
        assert_eq!(normalise_label("PET-CT"), "pet_ct");
        assert_eq!(normalise_label(" PET/CT "), "pet_ct");
        assert_eq!(normalise_label("Bone  Scan"), "bone_scan");
        assert_eq!(normalise_label("liver_mri"), "liver_mri");
    }

    #[test]
    fn observation_lookup_ignores_case_and_blank_values() {
        let record = RecordBuilder::new("P1")
            .observation("er_status", "POSITIVE")
            .observation("pr_status", "  ")
            .build();

        assert!(record.observation_is("er_status", "positive"));
        assert_eq!(record.observation_value("pr_status"), None);
        assert_eq!(record.observation_value("her2_status"), None);
    }

    #[test]
    fn medication_lookup_preserves_order() {
        let record = RecordBuilder::new("P1")
            .medication(medication("Paclitaxel", "2025-01-01", None))
            .medication(medication("letrozole", "2025-02-01", None))
            .medication(medication("Tamoxifen", "2025-03-01", None))
            .build();

        let found = record
            .find_medication(&["Tamoxifen", "Letrozole"])
            .expect("hormone therapy");
        assert_eq!(found.name, "letrozole");
    }

    /// The match outlives the name list it was looked up with.
    fn first_named<'r>(record: &'r PatientRecord, wanted: &str) -> Option<&'r Medication> {
        let names = vec![wanted.to_string()];
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        record.find_medication(&names)
    }

    #[test]
    fn found_medication_borrows_from_record_only() {
        let record = RecordBuilder::new("P1").drug("Epirubicin").build();
        let found = first_named(&record, "epirubicin").expect("found");
        assert_eq!(found.name, "Epirubicin");
        assert!(first_named(&record, "Doxorubicin").is_none());
    }

    #[test]
    fn open_ended_periods_overlap_anything_after_start() {
        let open = ActivePeriod {
            start: date("2025-10-20"),
            end: None,
        };
        let closed = ActivePeriod {
            start: date("2025-10-28"),
            end: Some(date("2026-10-28")),
        };
        assert_eq!(closed.overlap_start(&open), Some(date("2025-10-28")));
        assert_eq!(open.overlap_start(&closed), Some(date("2025-10-28")));
    }

    #[test]
    fn disjoint_periods_do_not_overlap() {
        let first = ActivePeriod {
            start: date("2024-01-01"),
            end: Some(date("2024-06-30")),
        };
        let second = ActivePeriod {
            start: date("2024-07-01"),
            end: None,
        };
        assert_eq!(first.overlap_start(&second), None);
        assert_eq!(second.overlap_start(&first), None);
    }

    #[test]
    fn touching_periods_overlap_on_shared_day() {
        let first = ActivePeriod {
            start: date("2024-01-01"),
            end: Some(date("2024-06-30")),
        };
        let second = ActivePeriod {
            start: date("2024-06-30"),
            end: Some(date("2024-12-31")),
        };
        assert_eq!(first.overlap_start(&second), Some(date("2024-06-30")));
    }

    #[test]
    fn period_reports_malformed_dates_with_field() {
        let med = medication("Fluconazole", "2025-13-40", None);
        let err = med.period().expect_err("should reject date");
        match err {
            RuleError::MalformedDate { field, value } => {
                assert_eq!(field, "medications[Fluconazole].start_date");
                assert_eq!(value, "2025-13-40");
            }
            other => panic!("expected MalformedDate, got {other:?}"),
        }
    }

    #[test]
    fn period_rejects_end_before_start() {
        let med = medication("Tamoxifen", "2025-05-01", Some("2025-04-01"));
        let err = med.period().expect_err("should reject inverted period");
        assert!(matches!(err, RuleError::InvertedPeriod { .. }));
    }
}
