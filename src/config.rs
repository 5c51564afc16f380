//! Configuration for reading a single eHYD export.
//!
//! Mirrors the reader's behavioural switches as native types: output
//! shape, optional CSV side effect, optional interpolation.

use crate::constants::HEADER_SCAN_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shape of the value returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// Flat key-value mapping (JSON object)
    #[default]
    Mapping,
    /// Data frame with the metadata attached as constant columns
    Table,
}

/// Reader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub output_type: OutputType,

    /// Write `<HZB>.csv` with `date;value` rows into `output_dir`
    pub write_csv: bool,

    /// Linearly fill interior missing values after quality assessment
    pub interpolate: bool,

    /// Directory for the CSV side effect
    pub output_dir: PathBuf,

    /// Number of header lines searched for markers
    pub header_scan_limit: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            output_type: OutputType::Mapping,
            write_csv: false,
            interpolate: false,
            output_dir: PathBuf::from("."),
            header_scan_limit: HEADER_SCAN_LIMIT,
        }
    }
}

impl ReaderConfig {
    /// Select the output shape
    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    /// Enable the CSV side effect
    pub fn with_write_csv(mut self, write_csv: bool) -> Self {
        self.write_csv = write_csv;
        self
    }

    /// Enable linear interpolation of missing values
    pub fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Set the directory the CSV side effect writes into
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Override the header scan budget
    pub fn with_header_scan_limit(mut self, limit: usize) -> Self {
        self.header_scan_limit = limit;
        self
    }
}
