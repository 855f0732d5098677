//! Test-only record builders shared by the rule and engine tests.

use crate::config::AdjuvantPolicy;
use crate::engine::EvaluationContext;
use crate::record::{
    Consultation, Demographics, Diagnosis, ImagingStudy, Medication, Observation, PatientRecord,
};
use chrono::NaiveDate;
use onco_types::PatientId;
use std::collections::BTreeMap;

/// Evaluation context pinned to 2026-10-18 with the default 5-10 year adjuvant window.
pub fn context() -> EvaluationContext {
    context_as_of("2026-10-18")
}

pub fn context_as_of(date: &str) -> EvaluationContext {
    let as_of = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("test date");
    EvaluationContext::new(as_of, AdjuvantPolicy::default())
}

pub fn medication(name: &str, start_date: &str, end_date: Option<&str>) -> Medication {
    Medication {
        name: name.into(),
        dose: "20 mg".into(),
        frequency: "once daily".into(),
        start_date: start_date.into(),
        end_date: end_date.map(Into::into),
        reason: None,
    }
}

/// Builds a 55-year-old stage IIA record with no biomarkers, treatment or imaging, so each test
/// only states the facts it cares about.
pub struct RecordBuilder {
    record: PatientRecord,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: PatientRecord {
                id: PatientId::new(id).expect("test id"),
                demographics: Demographics {
                    name: None,
                    age: 55,
                    gender: "female".into(),
                },
                diagnosis: Diagnosis {
                    code: "254837009".into(),
                    name: "Invasive Ductal Carcinoma".into(),
                    stage: "IIA".into(),
                    status: "active".into(),
                    date: "2025-08-15".into(),
                    metastatic_sites: Vec::new(),
                },
                observations: BTreeMap::new(),
                medications: Vec::new(),
                consultations: Vec::new(),
                imaging: Vec::new(),
            },
        }
    }

    pub fn age(mut self, age: u32) -> Self {
        self.record.demographics.age = age;
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.record.diagnosis.stage = stage.into();
        self
    }

    pub fn observation(mut self, key: &str, value: &str) -> Self {
        self.record.observations.insert(
            key.into(),
            Observation {
                value: value.into(),
                date: "2025-10-28".into(),
            },
        );
        self
    }

    pub fn medication(mut self, medication: Medication) -> Self {
        self.record.medications.push(medication);
        self
    }

    /// Adds an open-ended medication starting on 2025-10-28.
    pub fn drug(self, name: &str) -> Self {
        self.medication(medication(name, "2025-10-28", None))
    }

    pub fn consultation(mut self, kind: &str) -> Self {
        self.record.consultations.push(Consultation {
            kind: kind.into(),
            date: "2025-10-20".into(),
        });
        self
    }

    pub fn imaging(mut self, kind: &str) -> Self {
        self.record.imaging.push(ImagingStudy {
            kind: kind.into(),
            date: "2025-10-20".into(),
        });
        self
    }

    pub fn build(self) -> PatientRecord {
        self.record
    }
}
