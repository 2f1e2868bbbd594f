//! Weekly time-tracking aggregation for project reports.
//!
//! Closed card intervals are bucketed by the ISO (year, week) of their start,
//! summed per bucket, and folded into total / remaining / average hours.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minutes per hour (60.0).
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// A closed `{start, stop}` interval logged against a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: Timestamp,
    pub stop: Timestamp,
}

impl Interval {
    pub fn new(start: Timestamp, stop: Timestamp) -> Self {
        Self { start, stop }
    }

    /// Elapsed minutes, fractional. Inverted intervals count as zero.
    pub fn minutes(&self) -> f64 {
        let secs = (self.stop - self.start).num_seconds().max(0);
        secs as f64 / 60.0
    }

    /// ISO (year, week) bucket of the interval start.
    pub fn iso_week(&self) -> (i32, u32) {
        let week = self.start.iso_week();
        (week.year(), week.week())
    }
}

/// Hours logged in one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHours {
    pub year: i32,
    pub week: u32,
    pub hours: f64,
}

/// Aggregated time figures for a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeReport {
    pub total_hours_spent: f64,
    /// `None` when the project has no hour estimate.
    pub total_hours_left: Option<f64>,
    pub average_hours_per_week: f64,
    pub weeks: Vec<WeeklyHours>,
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reject a negative or non-finite hour estimate. `None` means unestimated.
pub fn check_estimate(estimated_hours: Option<f64>) -> Result<(), CoreError> {
    match estimated_hours {
        Some(hours) if !hours.is_finite() || hours < 0.0 => Err(CoreError::Validation(
            "estimatedHours must be a non-negative number".into(),
        )),
        _ => Ok(()),
    }
}

/// Build a [`TimeReport`] from every closed interval of a project's cards.
pub fn build_report<I>(intervals: I, estimated_hours: Option<f64>) -> TimeReport
where
    I: IntoIterator<Item = Interval>,
{
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for interval in intervals {
        *buckets.entry(interval.iso_week()).or_default() += interval.minutes();
    }

    let total_minutes: f64 = buckets.values().sum();
    let total_hours = total_minutes / MINUTES_PER_HOUR;

    let average_hours_per_week = if buckets.is_empty() {
        0.0
    } else {
        round_tenth(total_hours / buckets.len() as f64)
    };

    let weeks = buckets
        .into_iter()
        .map(|((year, week), minutes)| WeeklyHours {
            year,
            week,
            hours: round_tenth(minutes / MINUTES_PER_HOUR),
        })
        .collect();

    TimeReport {
        total_hours_spent: round_tenth(total_hours),
        total_hours_left: estimated_hours.map(|estimate| round_tenth(estimate - total_hours)),
        average_hours_per_week,
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn span(start: Timestamp, minutes: i64) -> Interval {
        Interval::new(start, start + Duration::minutes(minutes))
    }

    #[test]
    fn single_ninety_minute_interval() {
        let report = build_report([span(at(2024, 3, 4, 9, 0), 90)], Some(10.0));

        assert_eq!(report.total_hours_spent, 1.5);
        assert_eq!(report.total_hours_left, Some(8.5));
        assert_eq!(report.average_hours_per_week, 1.5);
        assert_eq!(report.weeks.len(), 1);
    }

    #[test]
    fn empty_log_keeps_full_estimate() {
        let report = build_report(Vec::new(), Some(12.0));

        assert_eq!(report.total_hours_spent, 0.0);
        assert_eq!(report.total_hours_left, Some(12.0));
        assert_eq!(report.average_hours_per_week, 0.0);
        assert!(report.weeks.is_empty());
    }

    #[test]
    fn missing_estimate_leaves_remaining_unset() {
        let report = build_report([span(at(2024, 3, 4, 9, 0), 30)], None);
        assert_eq!(report.total_hours_left, None);
        assert_eq!(report.total_hours_spent, 0.5);
    }

    #[test]
    fn average_divides_by_distinct_weeks() {
        // Two intervals in ISO week 10, one in week 11 of 2024.
        let report = build_report(
            [
                span(at(2024, 3, 4, 9, 0), 60),
                span(at(2024, 3, 6, 9, 0), 120),
                span(at(2024, 3, 12, 9, 0), 60),
            ],
            Some(3.0),
        );

        assert_eq!(report.total_hours_spent, 4.0);
        assert_eq!(report.total_hours_left, Some(-1.0));
        assert_eq!(report.average_hours_per_week, 2.0);
        assert_eq!(
            report.weeks,
            vec![
                WeeklyHours { year: 2024, week: 10, hours: 3.0 },
                WeeklyHours { year: 2024, week: 11, hours: 1.0 },
            ]
        );
    }

    #[test]
    fn iso_year_differs_from_calendar_year_at_boundary() {
        // 2024-12-30 falls in ISO week 1 of 2025.
        let interval = span(at(2024, 12, 30, 8, 0), 15);
        assert_eq!(interval.iso_week(), (2025, 1));
    }

    #[test]
    fn inverted_interval_counts_as_zero() {
        let start = at(2024, 5, 1, 12, 0);
        let interval = Interval::new(start, start - Duration::minutes(5));
        assert_eq!(interval.minutes(), 0.0);
    }

    #[test]
    fn estimate_must_be_non_negative() {
        assert!(check_estimate(None).is_ok());
        assert!(check_estimate(Some(0.0)).is_ok());
        assert!(check_estimate(Some(10.0)).is_ok());
        assert!(check_estimate(Some(-1.0)).is_err());
        assert!(check_estimate(Some(f64::NAN)).is_err());
    }

    #[test]
    fn totals_round_to_one_decimal() {
        // 20 minutes = 0.333.. hours.
        let report = build_report([span(at(2024, 1, 10, 10, 0), 20)], Some(1.0));
        assert_eq!(report.total_hours_spent, 0.3);
        assert_eq!(report.total_hours_left, Some(0.7));
    }
}
