//! Degree/minute/second coordinate parsing and relocation distance.
//!
//! eHYD lists station positions as `label;DD MM SS;DD MM SS` rows with
//! longitude first. A latitude of `0` means the position was never recorded.

use crate::constants::{COORDINATE_DECIMALS, METRIC_DECIMALS, MISSING_COORDINATE_SENTINEL};
use crate::error::CoordinateError;
use crate::models::Coordinate;
use haversine::{Location as HaversineLocation, Units, distance};

/// Minimum width of a `DD MM SS` field
const DMS_FIELD_WIDTH: usize = 8;

/// Round to a fixed number of decimal places
pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Parse a coordinate row into decimal degrees.
///
/// Returns `Ok(None)` when the latitude field carries the missing-coordinate
/// sentinel.
pub fn parse_coordinate_line(line: &str) -> Result<Option<Coordinate>, CoordinateError> {
    let (first, last) = match (line.find(';'), line.rfind(';')) {
        (Some(first), Some(last)) if first < last => (first, last),
        _ => {
            return Err(CoordinateError::MissingFields {
                line: line.to_string(),
                expected: ';',
            });
        }
    };

    let raw_lon = line[first + 1..last].trim();
    let raw_lat = line[last + 1..].trim();

    if raw_lat == MISSING_COORDINATE_SENTINEL {
        return Ok(None);
    }

    let lon = parse_dms(raw_lon)?;
    let lat = parse_dms(raw_lat)?;
    Ok(Some(Coordinate { lat, lon }))
}

/// Convert a fixed-layout `DD MM SS` field to decimal degrees
pub fn parse_dms(field: &str) -> Result<f64, CoordinateError> {
    if field.chars().count() < DMS_FIELD_WIDTH {
        return Err(CoordinateError::TooShort {
            field: field.to_string(),
            min_len: DMS_FIELD_WIDTH,
        });
    }

    let degrees = dms_component(field, 0..2, "degrees")?;
    let minutes = dms_component(field, 3..5, "minutes")?;
    let seconds = dms_component(field, 6..8, "seconds")?;

    Ok(round_decimals(
        degrees + minutes / 60.0 + seconds / 3600.0,
        COORDINATE_DECIMALS,
    ))
}

fn dms_component(
    field: &str,
    range: std::ops::Range<usize>,
    component: &'static str,
) -> Result<f64, CoordinateError> {
    let non_numeric = |text: &str| CoordinateError::NonNumeric {
        field: field.to_string(),
        component,
        text: text.to_string(),
    };

    let text = field.get(range).ok_or_else(|| non_numeric(field))?;
    let digits = text.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(non_numeric(text));
    }

    digits
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| non_numeric(text))
}

/// Great-circle distance in meters between an old and a new position
pub fn station_movement_m(old: Coordinate, new: Coordinate) -> f64 {
    let km = distance(
        HaversineLocation {
            latitude: old.lat,
            longitude: old.lon,
        },
        HaversineLocation {
            latitude: new.lat,
            longitude: new.lon,
        },
        Units::Kilometers,
    );
    round_decimals(km * 1000.0, METRIC_DECIMALS)
}
