//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the engine. Rules
//! never read the process environment or the wall clock themselves: the reference date and
//! the adjuvant-duration thresholds travel with the [`CoreConfig`], which keeps evaluation
//! deterministic across threads and test harnesses.

use crate::constants::{DEFAULT_ADJUVANT_MAX_YEARS, DEFAULT_ADJUVANT_MIN_YEARS, ISO_DATE_FORMAT};
use crate::{OncologyError, OncologyResult};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Accepted duration window for adjuvant Tamoxifen-class therapy, in whole years.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjuvantPolicy {
    min_years: u32,
    max_years: u32,
}

impl AdjuvantPolicy {
    /// Create a policy. `min_years` must be positive and strictly below `max_years`.
    pub fn new(min_years: u32, max_years: u32) -> OncologyResult<Self> {
        if min_years == 0 {
            return Err(OncologyError::Config(
                "adjuvant minimum duration must be at least one year".into(),
            ));
        }
        if min_years >= max_years {
            return Err(OncologyError::Config(format!(
                "adjuvant minimum duration ({min_years}y) must be below the maximum ({max_years}y)"
            )));
        }
        Ok(Self {
            min_years,
            max_years,
        })
    }

    pub fn min_years(&self) -> u32 {
        self.min_years
    }

    pub fn max_years(&self) -> u32 {
        self.max_years
    }
}

impl Default for AdjuvantPolicy {
    fn default() -> Self {
        Self {
            min_years: DEFAULT_ADJUVANT_MIN_YEARS,
            max_years: DEFAULT_ADJUVANT_MAX_YEARS,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_path: Option<PathBuf>,
    as_of: NaiveDate,
    adjuvant: AdjuvantPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(records_path: Option<PathBuf>, as_of: NaiveDate, adjuvant: AdjuvantPolicy) -> Self {
        Self {
            records_path,
            as_of,
            adjuvant,
        }
    }

    /// File to load patient records from; `None` selects the demonstration set.
    pub fn records_path(&self) -> Option<&Path> {
        self.records_path.as_deref()
    }

    /// Reference date treated as "today" by duration checks.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn adjuvant(&self) -> AdjuvantPolicy {
        self.adjuvant
    }
}

/// Raw, not yet validated configuration values as read from flags or the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigValues {
    pub records_path: Option<String>,
    pub as_of: Option<String>,
    pub adjuvant_min_years: Option<String>,
    pub adjuvant_max_years: Option<String>,
}

/// Build a [`CoreConfig`] from raw values.
///
/// `today` is used when no reference date is supplied. Empty or whitespace-only values are
/// treated as absent.
pub fn resolve_core_config(values: ConfigValues, today: NaiveDate) -> OncologyResult<CoreConfig> {
    let records_path = records_path_from_env_value(values.records_path);
    let as_of = as_of_from_env_value(values.as_of)?.unwrap_or(today);
    let adjuvant = AdjuvantPolicy::new(
        years_from_env_value("adjuvant minimum", values.adjuvant_min_years)?
            .unwrap_or(DEFAULT_ADJUVANT_MIN_YEARS),
        years_from_env_value("adjuvant maximum", values.adjuvant_max_years)?
            .unwrap_or(DEFAULT_ADJUVANT_MAX_YEARS),
    )?;

    Ok(CoreConfig::new(records_path, as_of, adjuvant))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the records path from an optional string value.
pub fn records_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(PathBuf::from)
}

/// Parse the reference date from an optional `YYYY-MM-DD` string.
pub fn as_of_from_env_value(value: Option<String>) -> OncologyResult<Option<NaiveDate>> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, ISO_DATE_FORMAT).map_err(|e| {
                OncologyError::Config(format!("reference date {v:?} is not YYYY-MM-DD: {e}"))
            })
        })
        .transpose()
}

/// Parse a whole number of years from an optional string value.
pub fn years_from_env_value(label: &str, value: Option<String>) -> OncologyResult<Option<u32>> {
    non_blank(value)
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                OncologyError::Config(format!("{label} years must be a whole number, got {v:?}"))
            })
        })
        .transpose()
}
