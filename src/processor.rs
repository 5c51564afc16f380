//! Per-file processing pipeline.
//!
//! Orchestrates the complete eHYD read: decoding, header scan, data
//! ingestion, quality assessment, optional interpolation, record assembly
//! and the optional CSV side effect. Every file is processed independently.

use crate::config::{OutputType, ReaderConfig};
use crate::constants::quality::LATEST_START_YEAR;
use crate::error::Result;
use crate::header::parse_ehyd_header;
use crate::quality::{assess_series, interpolate_linear};
use crate::record::StationRecord;
use crate::series::ingest_series;
use crate::source::read_decoded_lines;

use chrono::Datelike;
use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Output in the shape selected by [`OutputType`]
#[derive(Debug, Clone)]
pub enum StationOutput {
    Mapping(Map<String, Value>),
    Table(DataFrame),
}

impl StationOutput {
    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            StationOutput::Mapping(mapping) => Some(mapping),
            StationOutput::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&DataFrame> {
        match self {
            StationOutput::Table(table) => Some(table),
            StationOutput::Mapping(_) => None,
        }
    }
}

/// Reader for eHYD station exports
#[derive(Debug, Clone, Default)]
pub struct EhydReader {
    config: ReaderConfig,
}

impl EhydReader {
    /// Create a reader with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the reader
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read a file into the configured output shape.
    ///
    /// Writes `<HZB>.csv` into the output directory first when enabled.
    pub fn process_file(&self, path: &Path) -> Result<StationOutput> {
        let record = self.read_record(path)?;
        self.finish(&record)
    }

    /// Apply the CSV side effect, if enabled, and render the record
    pub fn finish(&self, record: &StationRecord) -> Result<StationOutput> {
        if self.config.write_csv {
            record.write_csv(&self.config.output_dir)?;
        }

        self.render(record)
    }

    /// Read and assess a file without rendering it
    pub fn read_record(&self, path: &Path) -> Result<StationRecord> {
        let lines = read_decoded_lines(path)?;
        self.record_from_lines(&lines, path)
    }

    /// Assemble a record from already decoded lines.
    ///
    /// `path` is only used to label log messages and errors.
    pub fn record_from_lines(&self, lines: &[String], path: &Path) -> Result<StationRecord> {
        let scan = parse_ehyd_header(lines, path, self.config.header_scan_limit)?;

        let series = ingest_series(lines, scan.boundaries.data_start_line, path)?;
        let (mut series, quality) = assess_series(series, path)?;

        if self.config.interpolate {
            match series.first() {
                Some(first) if first.date.year() > LATEST_START_YEAR => {
                    debug!(
                        "{}: series starts after {}; not interpolating",
                        path.display(),
                        LATEST_START_YEAR
                    );
                }
                _ => {
                    let filled = interpolate_linear(&mut series);
                    debug!("{}: filled {} missing values", path.display(), filled);
                }
            }
        }

        info!(
            "Processed HZB {} ({}, {} rows): data {}, meta {}",
            scan.metadata.hzb,
            quality.frequency,
            series.len(),
            quality.data_error,
            scan.location.meta_error
        );

        Ok(StationRecord::new(scan.metadata, scan.location, series, quality))
    }

    /// Render a record in the configured shape
    pub fn render(&self, record: &StationRecord) -> Result<StationOutput> {
        match self.config.output_type {
            OutputType::Mapping => Ok(StationOutput::Mapping(record.to_mapping())),
            OutputType::Table => Ok(StationOutput::Table(record.to_table()?)),
        }
    }
}

/// Read one eHYD export with the given configuration
pub fn read_ehyd(path: &Path, config: &ReaderConfig) -> Result<StationOutput> {
    EhydReader::new().with_config(config.clone()).process_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataErrorFlag, MetaErrorFlag};
    use std::path::PathBuf;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn riverwater_export(rows: &[&str]) -> Vec<String> {
        let mut export = lines(
            "Messstelle:;Wien-Nussdorf\n\
             HZB-Nummer:;207241\n\
             Gewässer:;Donau\n\
             Koordinaten:\n\
             ;Länge;Breite\n\
             seit 01.01.1990;16 22 15;48 15 45\n\
             Exportzeitreihe:;Tagesmittel\n\
             Pegelnullpunkt:\n\
             ;Höhe\n\
             seit 01.01.1990;157,00\n\
             Werte:",
        );
        export.extend(rows.iter().map(|row| row.to_string()));
        export
    }

    #[test]
    fn test_record_from_lines() {
        let export = riverwater_export(&[
            "03.01.2000 00:00:00;   12,5   ;",
            "01.01.2000 00:00:00;   10,0   ;",
            "02.01.2000 00:00:00;   Lücke   ;",
        ]);
        let reader = EhydReader::new();

        let record = reader
            .record_from_lines(&export, &PathBuf::from("207241.csv"))
            .unwrap();

        assert_eq!(record.metadata.hzb, 207_241);
        assert_eq!(record.metadata.elevation, Some(157.0));
        assert_eq!(record.location.meta_error, MetaErrorFlag::None);
        assert_eq!(record.series.len(), 3);
        assert_eq!(record.series[0].value, Some(10.0));
        assert_eq!(record.series[1].value, None);
        assert_eq!(record.quality.data_error, DataErrorFlag::ShortData);
    }

    #[test]
    fn test_interpolation_keeps_flag() {
        let export = riverwater_export(&[
            "01.01.2000 00:00:00;10,0;",
            "02.01.2000 00:00:00;Lücke;",
            "03.01.2000 00:00:00;12,0;",
        ]);
        let path = PathBuf::from("207241.csv");

        let plain = EhydReader::new().record_from_lines(&export, &path).unwrap();
        let filled = EhydReader::new()
            .with_config(ReaderConfig::default().with_interpolation(true))
            .record_from_lines(&export, &path)
            .unwrap();

        assert_eq!(filled.series[1].value, Some(11.0));
        assert_eq!(filled.quality, plain.quality);
        assert_eq!(filled.quality.missing_count, 1);
    }

    #[test]
    fn test_recent_series_is_not_interpolated() {
        let export = riverwater_export(&[
            "01.01.2012 00:00:00;10,0;",
            "02.01.2012 00:00:00;Lücke;",
            "03.01.2012 00:00:00;12,0;",
            "04.01.2012 00:00:00;Lücke;",
        ]);
        let reader = EhydReader::new()
            .with_config(ReaderConfig::default().with_interpolation(true));

        let record = reader
            .record_from_lines(&export, &PathBuf::from("207241.csv"))
            .unwrap();

        assert_eq!(record.series[1].value, None);
        assert_eq!(record.series[3].value, None);
        assert_eq!(record.quality.data_error, DataErrorFlag::ShortData);
    }

    #[test]
    fn test_interpolation_fills_trailing_gap() {
        let export = riverwater_export(&[
            "01.01.2000 00:00:00;10,0;",
            "02.01.2000 00:00:00;12,0;",
            "03.01.2000 00:00:00;Lücke;",
        ]);
        let reader = EhydReader::new()
            .with_config(ReaderConfig::default().with_interpolation(true));

        let record = reader
            .record_from_lines(&export, &PathBuf::from("207241.csv"))
            .unwrap();

        assert_eq!(record.series[2].value, Some(12.0));
        assert_eq!(record.quality.missing_count, 1);
    }

    #[test]
    fn test_render_shapes() {
        let export = riverwater_export(&[
            "01.01.2000 00:00:00;10,0;",
            "02.01.2000 00:00:00;11,0;",
        ]);
        let path = PathBuf::from("207241.csv");
        let record = EhydReader::new().record_from_lines(&export, &path).unwrap();

        let mapping = EhydReader::new().render(&record).unwrap();
        assert!(mapping.as_mapping().is_some());

        let table = EhydReader::new()
            .with_config(ReaderConfig::default().with_output_type(OutputType::Table))
            .render(&record)
            .unwrap();
        assert_eq!(table.as_table().map(DataFrame::height), Some(2));
    }

    #[test]
    fn test_single_row_fails() {
        let export = riverwater_export(&["01.01.2000 00:00:00;10,0;"]);

        let result = EhydReader::new().record_from_lines(&export, &PathBuf::from("x.csv"));

        assert!(matches!(
            result,
            Err(crate::error::EhydError::InsufficientData { rows: 1, .. })
        ));
    }
}
