//! Error handling for eHYD processing operations.
//!
//! Every hard failure carries the path of the file being processed so a
//! batch driver can log it and move on. Advisory quality flags are not
//! errors and never appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to tokenize a degree/minute/second coordinate field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("coordinate line has no '{expected}' separated fields: {line:?}")]
    MissingFields { line: String, expected: char },

    #[error("DMS field {field:?} is shorter than {min_len} characters")]
    TooShort { field: String, min_len: usize },

    #[error("DMS {component} {text:?} in {field:?} is not numeric")]
    NonNumeric {
        field: String,
        component: &'static str,
        text: String,
    },
}

#[derive(Error, Debug)]
pub enum EhydError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File is empty: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Required header field '{field}' not found within the first {limit} lines of {path}")]
    MissingField {
        path: PathBuf,
        field: &'static str,
        limit: usize,
    },

    #[error("No 'Werte:' data marker within the first {limit} lines of {path}")]
    NoDataMarker { path: PathBuf, limit: usize },

    #[error("Invalid value for '{field}' in {path} (line {line}): {value:?}")]
    InvalidHeaderValue {
        path: PathBuf,
        field: &'static str,
        line: usize,
        value: String,
    },

    #[error("Coordinate block starting at line {line} of {path} is not terminated by 'Exportzeitreihe'")]
    UnterminatedCoordinates { path: PathBuf, line: usize },

    #[error("Malformed coordinate in {path} (line {line}): {source}")]
    MalformedCoordinate {
        path: PathBuf,
        line: usize,
        #[source]
        source: CoordinateError,
    },

    #[error("Invalid data row in {path} (line {line}): {reason}")]
    InvalidDataRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Not enough data in {path}: found {rows} rows, at least 2 are required")]
    InsufficientData { path: PathBuf, rows: usize },
}

pub type Result<T> = std::result::Result<T, EhydError>;
