//! Completeness analysis for eHYD series
//!
//! Compares the series against a synthetic calendar at the inferred
//! frequency, removes duplicate dates and measures missing values. Each
//! finding is contributed to a [`QualityLadder`] in pipeline order.

use super::ladder::QualityLadder;
use super::regularity::Regularity;
use crate::constants::quality::{
    LATEST_START_YEAR, MAX_DAILY_MISSING_RUN, MAX_MISSING_DATES, MAX_MISSING_FRACTION,
    MAX_MONTHLY_MISSING_RUN, MIN_SPAN_YEARS,
};
use crate::models::{DataErrorFlag, Frequency, Observation, QualityAssessment};
use chrono::{Datelike, NaiveDate};
use std::path::Path;
use tracing::{info, warn};

/// Deduplicate and assess a date-sorted series.
///
/// The series must hold at least one observation; [`classify_regularity`]
/// rejects shorter input before this stage runs.
///
/// [`classify_regularity`]: super::regularity::classify_regularity
pub fn analyze_gaps(
    mut series: Vec<Observation>,
    regularity: &Regularity,
    path: &Path,
) -> (Vec<Observation>, QualityAssessment) {
    let mut ladder = QualityLadder::new();
    ladder.record(regularity.flag());

    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => {
            return (
                series,
                QualityAssessment {
                    frequency: regularity.frequency,
                    data_error: ladder.finalize(),
                    expected_len: 0,
                    actual_len: 0,
                    duplicates_removed: 0,
                    missing_count: 0,
                    longest_missing_run: 0,
                },
            );
        }
    };

    let expected_len = expected_calendar_len(first, last, regularity.frequency);

    let mut duplicates_removed = 0;
    if expected_len != series.len() {
        let before = series.len();
        series.dedup_by_key(|observation| observation.date);
        duplicates_removed = before - series.len();
        info!(
            "{}: {} rows for {} calendar entries; removed {} duplicate dates keeping the first",
            path.display(),
            before,
            expected_len,
            duplicates_removed
        );
        ladder.record(Some(DataErrorFlag::DoubleMeasurement));
    }

    let missing_dates = expected_len.saturating_sub(series.len());
    if missing_dates > MAX_MISSING_DATES {
        warn!("{}: {} dates missing from the series", path.display(), missing_dates);
        ladder.record(Some(DataErrorFlag::GapData));
    }

    let missing = missing_count(&series);
    let longest_run = longest_missing_run(&series);

    let span_years = last.year() - first.year();
    if span_years < MIN_SPAN_YEARS || first.year() > LATEST_START_YEAR {
        warn!(
            "{}: series is very short ({} to {})",
            path.display(),
            first,
            last
        );
        ladder.record(Some(DataErrorFlag::ShortData));
    } else {
        ladder.record(missing_fraction_flag(missing, series.len()));
        ladder.record(missing_run_flag(longest_run, regularity.frequency));
    }

    let assessment = QualityAssessment {
        frequency: regularity.frequency,
        data_error: ladder.finalize(),
        expected_len,
        actual_len: series.len(),
        duplicates_removed,
        missing_count: missing,
        longest_missing_run: longest_run,
    };

    if assessment.data_error != DataErrorFlag::None {
        warn!("{}: data quality flag {}", path.display(), assessment.data_error);
    }

    (series, assessment)
}

fn missing_fraction_flag(missing: usize, total: usize) -> Option<DataErrorFlag> {
    let threshold = total as f64 * MAX_MISSING_FRACTION;
    (missing as f64 > threshold).then_some(DataErrorFlag::TenPercentGap)
}

fn missing_run_flag(longest_run: usize, frequency: Frequency) -> Option<DataErrorFlag> {
    match frequency {
        Frequency::Daily if longest_run > MAX_DAILY_MISSING_RUN => {
            Some(DataErrorFlag::DailyGap14)
        }
        Frequency::Monthly if longest_run > MAX_MONTHLY_MISSING_RUN => {
            Some(DataErrorFlag::MonthlyGap3)
        }
        _ => None,
    }
}

/// Number of entries in a complete calendar between `start` and `end`.
///
/// Daily calendars count every day; monthly calendars count month starts.
pub fn expected_calendar_len(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> usize {
    if end < start {
        return 0;
    }

    match frequency {
        Frequency::Daily => ((end - start).num_days() + 1) as usize,
        Frequency::Monthly => {
            let month_index = |date: NaiveDate| date.year() as i64 * 12 + date.month0() as i64;
            // The first month start on or after `start`
            let first = month_index(start) + i64::from(start.day() != 1);
            let last = month_index(end);
            (last - first + 1).max(0) as usize
        }
    }
}

/// Count of missing values
pub fn missing_count(series: &[Observation]) -> usize {
    series.iter().filter(|observation| observation.is_missing()).count()
}

/// Length of the longest run of consecutive missing values
pub fn longest_missing_run(series: &[Observation]) -> usize {
    series
        .iter()
        .fold((0usize, 0usize), |(longest, current), observation| {
            if observation.is_missing() {
                (longest.max(current + 1), current + 1)
            } else {
                (longest, 0)
            }
        })
        .0
}
