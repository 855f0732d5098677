//! Constants used throughout the oncology core crate.
//!
//! Environment variable names and defaults live here so that both binaries resolve
//! configuration the same way.

/// Optional path to a YAML or JSON patient records file.
pub const RECORDS_PATH_ENV: &str = "ONCO_RECORDS_PATH";

/// Reference date (`YYYY-MM-DD`) used as "today" by duration checks.
pub const AS_OF_ENV: &str = "ONCO_AS_OF";

/// Minimum adjuvant Tamoxifen duration in whole years.
pub const ADJUVANT_MIN_YEARS_ENV: &str = "ONCO_ADJUVANT_MIN_YEARS";

/// Maximum adjuvant Tamoxifen duration in whole years.
pub const ADJUVANT_MAX_YEARS_ENV: &str = "ONCO_ADJUVANT_MAX_YEARS";

/// Listen address for the REST service.
pub const REST_ADDR_ENV: &str = "ONCO_REST_ADDR";

/// Default listen address for the REST service.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default minimum adjuvant duration.
pub const DEFAULT_ADJUVANT_MIN_YEARS: u32 = 5;

/// Default maximum adjuvant duration.
pub const DEFAULT_ADJUVANT_MAX_YEARS: u32 = 10;

/// Patients younger than this should be offered a fertility preservation discussion.
pub const FERTILITY_AGE_THRESHOLD: u32 = 40;

/// Date format accepted for every date field in a patient record.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
