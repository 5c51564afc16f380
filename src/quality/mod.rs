//! Time-series quality assessment for eHYD series
//!
//! This module classifies how regular and how complete a station's series is
//! and condenses the findings into a single advisory [`DataErrorFlag`].
//!
//! # Architecture
//!
//! - [`regularity`] - Head/middle/tail interval probing to infer the sampling frequency
//! - [`gaps`] - Duplicate removal, calendar comparison, missing-value statistics
//! - [`ladder`] - Priority ladder that turns stage contributions into one flag
//! - [`interpolation`] - Optional linear filling of missing values
//!
//! # Pipeline
//!
//! 1. **Regularity**: infer Daily or Monthly from the date-sorted series
//! 2. **Gap analysis**: deduplicate and measure completeness against a synthetic calendar
//! 3. **Finalize**: the ladder reports the highest-priority contribution
//!
//! Interpolation, when requested, runs after the assessment and never changes
//! the reported flag.

pub mod gaps;
pub mod interpolation;
pub mod ladder;
pub mod regularity;

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::models::{Observation, QualityAssessment};
use std::path::Path;

pub use gaps::{analyze_gaps, expected_calendar_len, longest_missing_run, missing_count};
pub use interpolation::interpolate_linear;
pub use ladder::QualityLadder;
pub use regularity::{Regularity, classify_regularity};

/// Run regularity probing and gap analysis on a date-sorted series.
///
/// Returns the deduplicated series together with its assessment.
pub fn assess_series(
    series: Vec<Observation>,
    path: &Path,
) -> Result<(Vec<Observation>, QualityAssessment)> {
    let regularity = classify_regularity(&series, path)?;
    Ok(analyze_gaps(series, &regularity, path))
}
