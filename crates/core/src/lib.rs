//! # Oncology Core
//!
//! Guideline compliance engine for breast cancer patient records.
//!
//! This crate contains the domain logic and its data boundary:
//! - Patient record model and strict YAML/JSON record files
//! - Ten codified guideline rules (R001..R010) behind the [`Rule`] trait
//! - The [`RuleEngine`], which runs the registry and isolates rule failures
//! - Per-patient summaries and population reports
//!
//! **No transport concerns**: argument parsing, terminal rendering and HTTP serving belong in
//! the `onco` CLI and the `onco-run` service.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod record;
pub mod registry;
pub mod result;
pub mod rules;
pub mod seed;
pub mod source;
pub mod stage;
pub mod summary;
pub mod validation;
pub mod wire;

#[cfg(test)]
mod fixtures;

pub use config::{resolve_core_config, AdjuvantPolicy, ConfigValues, CoreConfig};
pub use engine::{EvaluationContext, RuleEngine};
pub use error::{OncologyError, OncologyResult, RuleError};
pub use record::PatientRecord;
pub use registry::{Rule, RuleDefinition, RuleRegistry};
pub use result::{RuleResult, Severity, Status};
pub use source::{InMemoryRecordSource, RecordSource};
pub use stage::{Stage, StageGroup};
pub use summary::{
    build_report, summarize, ComplianceSummary, PatientEvaluation, PopulationReport, RuleTally,
    SeverityCounts, StatusCounts,
};
