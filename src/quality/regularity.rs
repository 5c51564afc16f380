//! Sampling frequency inference
//!
//! eHYD series are either daily or monthly, but some exports change their
//! interval part way through. The interval is probed at the head, the middle
//! and the tail of the series.

use crate::constants::quality::MONTHLY_MIN_INTERVAL_DAYS;
use crate::error::{EhydError, Result};
use crate::models::{DataErrorFlag, Frequency, Observation};
use std::path::Path;
use tracing::warn;

/// Outcome of interval probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regularity {
    pub frequency: Frequency,
    pub irregular: bool,
    /// Head, tail and middle intervals in days
    pub intervals: [i64; 3],
}

impl Regularity {
    /// Contribution to the quality ladder
    pub fn flag(&self) -> Option<DataErrorFlag> {
        match (self.irregular, self.frequency) {
            (false, _) => None,
            (true, Frequency::Daily) => Some(DataErrorFlag::IrregularDaily),
            (true, Frequency::Monthly) => Some(DataErrorFlag::IrregularMonthly),
        }
    }
}

/// Infer the nominal frequency of a date-sorted, not yet deduplicated series
pub fn classify_regularity(series: &[Observation], path: &Path) -> Result<Regularity> {
    let len = series.len();
    if len < 2 {
        return Err(EhydError::InsufficientData {
            path: path.to_path_buf(),
            rows: len,
        });
    }

    let interval = |later: usize| (series[later].date - series[later - 1].date).num_days();
    let intervals = [interval(1), interval(len - 1), interval(len / 2)];
    let shortest = intervals.iter().copied().min().unwrap_or_default();

    let (frequency, irregular) = if intervals.iter().all(|&days| days == 1) {
        (Frequency::Daily, false)
    } else if shortest > 1 {
        (Frequency::Monthly, shortest <= MONTHLY_MIN_INTERVAL_DAYS)
    } else {
        (Frequency::Daily, true)
    };

    if irregular {
        warn!(
            "{} has irregular measurement times (intervals {:?} days)",
            path.display(),
            intervals
        );
    }

    Ok(Regularity {
        frequency,
        irregular,
        intervals,
    })
}
