//! Core data structures and types for eHYD processing.
//!
//! Defines station types, header metadata, coordinates, the advisory
//! quality flags and the observation type shared by every stage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Station types recognised in eHYD headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Datatype {
    Riverwater,
    Precipitation,
    Spring,
    Groundwater,
    #[default]
    Unknown,
}

impl Datatype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Datatype::Riverwater => "Riverwater",
            Datatype::Precipitation => "Precipitation",
            Datatype::Spring => "Spring",
            Datatype::Groundwater => "Groundwater",
            Datatype::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata extracted from the eHYD header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetadata {
    pub station_name: String,
    pub hzb: i64,
    pub hd_num: Option<String>,
    pub dbms_num: Option<String>,
    pub catchment_name: Option<String>,
    pub catchment_symbol: Option<String>,
    pub subcatchment: Option<String>,
    pub reg_name: Option<String>,
    pub province: Option<String>,
    pub operator: Option<String>,
    pub catchment_size: Option<String>,
    pub datatype: Datatype,
    pub elevation: Option<f64>,
    pub depth: Option<f64>,
    /// `elevation - depth`, rounded to centimeters
    pub computed_depth: Option<f64>,
}

/// Decimal-degree location of a station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Advisory flag about the station's recorded location.
///
/// Variants are ordered by priority, so combining two contributions is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaErrorFlag {
    #[default]
    None,
    StationMoved,
    MissingCoordinates,
}

impl MetaErrorFlag {
    /// Merge another stage's contribution, keeping the higher-priority flag
    pub fn combine(self, other: MetaErrorFlag) -> MetaErrorFlag {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaErrorFlag::None => "none",
            MetaErrorFlag::StationMoved => "station_moved",
            MetaErrorFlag::MissingCoordinates => "missing_coordinates",
        }
    }
}

impl fmt::Display for MetaErrorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved location block of the header
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StationLocation {
    pub coordinate: Option<Coordinate>,
    /// Meters between the oldest and newest recorded position
    pub movement_m: Option<f64>,
    /// Number of coordinate rows beyond the first
    pub relocations: usize,
    pub meta_error: MetaErrorFlag,
}

/// Where the data section starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBoundaries {
    /// Zero-based index of the `Werte:` line
    pub marker_line: usize,
    /// Zero-based index of the first data line
    pub data_start_line: usize,
}

/// Everything the header scan produces
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderScan {
    pub metadata: StationMetadata,
    pub location: StationLocation,
    pub boundaries: DataBoundaries,
}

/// Nominal sampling interval of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => f.write_str("Daily"),
            Frequency::Monthly => f.write_str("Monthly"),
        }
    }
}

/// Advisory flag about the completeness and regularity of the series.
///
/// Variants are declared from lowest to highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataErrorFlag {
    #[default]
    None,
    IrregularDaily,
    IrregularMonthly,
    #[serde(rename = "doublemeasurement")]
    DoubleMeasurement,
    #[serde(rename = "gapdata")]
    GapData,
    #[serde(rename = "shortdata")]
    ShortData,
    TenPercentGap,
    #[serde(rename = "daily_gap_14")]
    DailyGap14,
    #[serde(rename = "monthly_gap_3")]
    MonthlyGap3,
}

impl DataErrorFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataErrorFlag::None => "none",
            DataErrorFlag::IrregularDaily => "irregular_daily",
            DataErrorFlag::IrregularMonthly => "irregular_monthly",
            DataErrorFlag::DoubleMeasurement => "doublemeasurement",
            DataErrorFlag::GapData => "gapdata",
            DataErrorFlag::ShortData => "shortdata",
            DataErrorFlag::TenPercentGap => "ten_percent_gap",
            DataErrorFlag::DailyGap14 => "daily_gap_14",
            DataErrorFlag::MonthlyGap3 => "monthly_gap_3",
        }
    }
}

impl fmt::Display for DataErrorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single measurement; `None` marks a `Lücke` (missing) entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Result of the regularity and gap analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub frequency: Frequency,
    pub data_error: DataErrorFlag,
    /// Length of a complete calendar between the first and last date
    pub expected_len: usize,
    /// Rows after duplicate removal
    pub actual_len: usize,
    pub duplicates_removed: usize,
    pub missing_count: usize,
    pub longest_missing_run: usize,
}
