//! Test utilities for quality assessment testing
//!
//! Builders for synthetic daily and monthly series shared by the stage tests.

use chrono::{Days, Months, NaiveDate};
use std::path::PathBuf;

use crate::models::{Observation, QualityAssessment};


pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn test_path() -> PathBuf {
    PathBuf::from("test_station.csv")
}

/// Daily series with one measured value per day, valued by position
pub fn daily_series(start: NaiveDate, days: usize) -> Vec<Observation> {
    (0..days)
        .map(|offset| {
            Observation::new(
                start.checked_add_days(Days::new(offset as u64)).unwrap(),
                Some(offset as f64),
            )
        })
        .collect()
}

/// Monthly series dated on the first of each month
pub fn monthly_series(start: NaiveDate, months: usize) -> Vec<Observation> {
    (0..months)
        .map(|offset| {
            Observation::new(
                start.checked_add_months(Months::new(offset as u32)).unwrap(),
                Some(offset as f64),
            )
        })
        .collect()
}

/// Blank out `range` of a series
pub fn clear_values(series: &mut [Observation], range: std::ops::Range<usize>) {
    for observation in &mut series[range] {
        observation.value = None;
    }
}

/// Assess a series and return only the assessment
pub fn assess(series: Vec<Observation>) -> QualityAssessment {
    super::assess_series(series, &test_path()).unwrap().1
}
