//! R007: adjuvant Tamoxifen-class therapy duration.
//!
//! All Tamoxifen-class entries are merged into a single course running from the earliest start
//! to the latest end. A course is still open when any entry has no end date or ends after the
//! reference date, in which case it is measured up to the reference date. Thresholds come from
//! the [`AdjuvantPolicy`](crate::config::AdjuvantPolicy) in the evaluation context and use
//! calendar-month arithmetic, so five years from 2020-02-29 is 2025-02-28.

use super::TAMOXIFEN_CLASS;
use crate::engine::EvaluationContext;
use crate::error::RuleError;
use crate::record::PatientRecord;
use crate::registry::{Rule, RuleDefinition};
use crate::result::{RuleResult, Severity};
use chrono::{Months, NaiveDate};

pub struct AdjuvantDuration;

const DEFINITION: RuleDefinition = RuleDefinition {
    id: "R007",
    name: "Adjuvant Therapy Duration",
    description: "Tamoxifen adjuvant should be minimum 5 years (or until 10 years)",
    severity: Severity::Medium,
};

struct Course {
    start: NaiveDate,
    end: NaiveDate,
    ongoing: bool,
}

fn merged_course(record: &PatientRecord, as_of: NaiveDate) -> Result<Option<Course>, RuleError> {
    let mut course: Option<Course> = None;

    for medication in record.medications_named(TAMOXIFEN_CLASS) {
        let period = medication.period()?;
        let ongoing = period.end.map_or(true, |end| end > as_of);
        let end = match period.end {
            Some(end) if !ongoing => end,
            _ => as_of,
        };

        course = Some(match course {
            None => Course {
                start: period.start,
                end,
                ongoing,
            },
            Some(current) => Course {
                start: current.start.min(period.start),
                end: current.end.max(end),
                ongoing: current.ongoing || ongoing,
            },
        });
    }

    Ok(course)
}

fn years_after(start: NaiveDate, years: u32) -> Result<NaiveDate, RuleError> {
    years
        .checked_mul(12)
        .and_then(|months| start.checked_add_months(Months::new(months)))
        .ok_or_else(|| RuleError::Internal(format!("{start} + {years} years is out of range")))
}

impl Rule for AdjuvantDuration {
    fn definition(&self) -> &RuleDefinition {
        &DEFINITION
    }

    fn evaluate(
        &self,
        record: &PatientRecord,
        ctx: &EvaluationContext,
    ) -> Result<RuleResult, RuleError> {
        let def = self.definition();
        let policy = ctx.adjuvant();

        let Some(course) = merged_course(record, ctx.as_of())? else {
            return Ok(RuleResult::not_applicable(
                def,
                "N/A: No Tamoxifen-class therapy prescribed",
            ));
        };

        let minimum = years_after(course.start, policy.min_years())?;
        let maximum = years_after(course.start, policy.max_years())?;
        let elapsed_days = (course.end - course.start).num_days().max(0);
        let elapsed_years = (elapsed_days as f64 / 365.25 * 10.0).round() / 10.0;
        let span = format!(
            "{elapsed_years:.1} years ({} to {})",
            course.start,
            if course.ongoing {
                "ongoing".to_string()
            } else {
                course.end.to_string()
            }
        );

        let result = if course.end > maximum {
            RuleResult::warning(
                def,
                format!(
                    "Tamoxifen therapy exceeds {} years: {span}",
                    policy.max_years()
                ),
            )
            .with_action("Review continuation of Tamoxifen beyond the recommended maximum")
            .affecting("medications")
        } else if course.end >= minimum {
            RuleResult::compliant(
                def,
                format!("Tamoxifen duration within recommended range: {span}"),
            )
        } else if course.ongoing {
            RuleResult::warning(
                def,
                format!(
                    "Tamoxifen therapy in progress, {} year minimum not yet reached: {span}",
                    policy.min_years()
                ),
            )
            .with_action(format!(
                "Continue Tamoxifen until at least {minimum} ({} years)",
                policy.min_years()
            ))
            .affecting("medications")
        } else {
            RuleResult::violation(
                def,
                format!(
                    "Tamoxifen stopped before the {} year minimum: {span}",
                    policy.min_years()
                ),
            )
            .with_action("Review early discontinuation and document the clinical reason")
            .affecting("medications")
        };

        Ok(result
            .with_detail("start", course.start.to_string())
            .with_detail("end", course.end.to_string())
            .with_detail("ongoing", course.ongoing)
            .with_detail("elapsed_days", elapsed_days)
            .with_detail("elapsed_years", elapsed_years)
            .with_detail("min_years", policy.min_years())
            .with_detail("max_years", policy.max_years()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdjuvantPolicy;
    use crate::fixtures::{context, context_as_of, medication, RecordBuilder};
    use crate::result::Status;
    use serde_json::json;

    fn tamoxifen(start: &str, end: Option<&str>) -> PatientRecord {
        RecordBuilder::new("P1")
            .medication(medication("Tamoxifen", start, end))
            .build()
    }

    #[test]
    fn ongoing_course_below_minimum_is_warning() {
        let record = tamoxifen("2025-10-28", Some("2026-10-28"));

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Warning);
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.detail("ongoing"), Some(&json!(true)));
        assert_eq!(result.detail("end"), Some(&json!("2026-10-18")));
    }

    #[test]
    fn stopped_course_below_minimum_is_violation() {
        let record = tamoxifen("2020-01-01", Some("2022-06-30"));

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Violation);
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.detail("ongoing"), Some(&json!(false)));
    }

    #[test]
    fn course_within_range_is_compliant() {
        let record = tamoxifen("2015-03-01", Some("2022-03-01"));

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Compliant);
        assert!(result.action.is_none());
    }

    #[test]
    fn exactly_five_calendar_years_is_compliant() {
        let record = tamoxifen("2020-02-29", Some("2025-02-28"));

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Compliant);
    }

    #[test]
    fn course_beyond_maximum_is_warning() {
        let record = tamoxifen("2010-01-01", None);

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Warning);
        assert!(result.message.contains("exceeds 10 years"));
    }

    #[test]
    fn brand_names_merge_into_one_course() {
        let record = RecordBuilder::new("P1")
            .medication(medication("Tamoxifen", "2017-01-01", Some("2019-12-31")))
            .medication(medication("Nolvadex", "2020-01-01", Some("2023-01-01")))
            .build();

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.status, Status::Compliant);
        assert_eq!(result.detail("start"), Some(&json!("2017-01-01")));
        assert_eq!(result.detail("end"), Some(&json!("2023-01-01")));
    }

    #[test]
    fn reference_date_and_policy_come_from_context() {
        let record = tamoxifen("2023-01-01", None);

        let early = AdjuvantDuration
            .evaluate(&record, &context_as_of("2024-01-01"))
            .expect("evaluates");
        assert_eq!(early.status, Status::Warning);

        let ctx = EvaluationContext::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).expect("date"),
            AdjuvantPolicy::new(2, 4).expect("policy"),
        );
        let result = AdjuvantDuration.evaluate(&record, &ctx).expect("evaluates");
        assert_eq!(result.status, Status::Compliant);
        assert_eq!(result.detail("min_years"), Some(&json!(2)));
    }

    #[test]
    fn no_tamoxifen_is_not_applicable() {
        let record = RecordBuilder::new("P1").drug("Letrozole").build();

        let result = AdjuvantDuration
            .evaluate(&record, &context())
            .expect("evaluates");
        assert_eq!(result.severity, Severity::Low);
    }
}
