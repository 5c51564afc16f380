//! Application constants for the eHYD processor
//!
//! Marker tokens of the eHYD export header, quality thresholds and
//! default values used throughout the crate.

// =============================================================================
// Header Scanning
// =============================================================================

/// Maximum number of header lines examined for metadata markers.
///
/// Current eHYD exports carry around 34 header lines.
pub const HEADER_SCAN_LIMIT: usize = 40;

/// Rendered for a groundwater body name without a `[XXX]` catchment code.
pub const NOT_AVAILABLE: &str = "not available";

/// Header marker tokens. Matching is case and diacritic sensitive.
pub mod markers {
    pub const RIVERWATER: &str = "Gewässer";
    pub const PRECIPITATION: &str = "Niederschlag";
    pub const SPRING: &str = "Hauptquelle";
    pub const GROUNDWATER: &str = "Grundwasser";
    pub const AUTHORITY: &str = "Dienststelle";
    pub const PROVINCE: &str = "Bundesland";
    pub const OPERATOR: &str = "Messstellenbetreiber";
    pub const HZB_NUMBER: &str = "HZB-Nummer";
    pub const HD_NUMBER: &str = "HD-Nummer";
    pub const DBMS_NUMBER: &str = "DBMS-Nummer";
    pub const CATCHMENT_SIZE: &str = "Einzugsgebiet";
    pub const COORDINATES: &str = "Koordinaten";
    pub const COORDINATES_END: &str = "Exportzeitreihe";
    pub const MEASURING_POINT_ELEVATION: &str = "Messpunkthöhe:";
    pub const BOTTOM_LEVEL: &str = "Sohllage";
    pub const SPRING_ELEVATION: &str = "Geländehöhe-Hauptquelle";
    pub const GAUGE_DATUM: &str = "Pegelnullpunkt";
    pub const DATA_START: &str = "Werte:";
}

/// Offset from the `Koordinaten` marker to the first coordinate row.
pub const COORDINATE_ROW_OFFSET: usize = 2;

/// Offset from the `Pegelnullpunkt` marker to its elevation row.
pub const GAUGE_DATUM_ROW_OFFSET: usize = 2;

/// Latitude field value meaning "no coordinates recorded".
pub const MISSING_COORDINATE_SENTINEL: &str = "0";

// =============================================================================
// Data Section
// =============================================================================

/// Token used in the data section for an unmeasured value.
pub const MISSING_VALUE_TOKEN: &str = "Lücke";

/// Day-first date formats found in the first data column.
pub const DATE_TIME_FORMATS: &[&str] = &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];
pub const DATE_FORMAT: &str = "%d.%m.%Y";

// =============================================================================
// Quality Thresholds
// =============================================================================

pub mod quality {
    /// Smallest head/middle/tail interval (days) of a regular monthly series.
    pub const MONTHLY_MIN_INTERVAL_DAYS: i64 = 27;

    /// Calendar entries that may be absent before a series counts as gappy.
    pub const MAX_MISSING_DATES: usize = 4;

    /// Series spanning fewer calendar years are too short to classify.
    pub const MIN_SPAN_YEARS: i32 = 5;

    /// Series starting after this year are too short to classify.
    pub const LATEST_START_YEAR: i32 = 2010;

    /// Fraction of missing values above which a series is flagged.
    pub const MAX_MISSING_FRACTION: f64 = 0.10;

    /// Longest tolerated run of missing values in a daily series.
    pub const MAX_DAILY_MISSING_RUN: usize = 14;

    /// Longest tolerated run of missing values in a monthly series.
    pub const MAX_MONTHLY_MISSING_RUN: usize = 3;
}

// =============================================================================
// Geometry
// =============================================================================

/// Decimal places kept for decimal-degree coordinates.
pub const COORDINATE_DECIMALS: i32 = 8;

/// Decimal places kept for distances in meters and derived depths.
pub const METRIC_DECIMALS: i32 = 2;
