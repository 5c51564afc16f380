//! Data section ingestion.
//!
//! Turns the lines after the `Werte:` marker into date-sorted observations.
//! Rows look like `01.01.1990 00:00:00;   345,67   ;` with a decimal comma;
//! `Lücke` or an empty cell marks a missing value.

use crate::constants::{DATE_FORMAT, DATE_TIME_FORMATS, MISSING_VALUE_TOKEN};
use crate::error::{EhydError, Result};
use crate::models::Observation;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static ROW_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*;\s*").expect("row separator pattern is valid"));

/// Parse every data row from `start` onwards.
///
/// The result is stably sorted by date, so rows sharing a date keep their
/// file order. Time of day is discarded.
pub fn ingest_series(lines: &[String], start: usize, path: &Path) -> Result<Vec<Observation>> {
    let mut observations = Vec::with_capacity(lines.len().saturating_sub(start));

    for (index, line) in lines.iter().enumerate().skip(start) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = ROW_SEPARATOR.split(trimmed);
        let date_field = fields.next().unwrap_or_default();
        let value_field = fields.next().unwrap_or_default();

        let date = parse_date(date_field).ok_or_else(|| EhydError::InvalidDataRow {
            path: path.to_path_buf(),
            line: index + 1,
            reason: format!("unrecognised date {:?}", date_field),
        })?;

        let value = parse_value(value_field).map_err(|reason| EhydError::InvalidDataRow {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        })?;

        observations.push(Observation::new(date, value));
    }

    observations.sort_by_key(|observation| observation.date);

    debug!(
        "Ingested {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

/// Parse a day-first date, dropping any time of day
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|datetime| datetime.date())
        .or_else(|| NaiveDate::parse_from_str(text, DATE_FORMAT).ok())
}

/// Parse a decimal-comma value; `Lücke` and empty cells are missing
pub fn parse_value(text: &str) -> std::result::Result<Option<f64>, String> {
    let text = text.trim();
    if text.is_empty() || text == MISSING_VALUE_TOKEN {
        return Ok(None);
    }

    text.replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid value {:?} ({})", text, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lines(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|row| row.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("01.02.1990 00:00:00"), Some(date(1990, 2, 1)));
        assert_eq!(parse_date("01.02.1990 07:30"), Some(date(1990, 2, 1)));
        assert_eq!(parse_date(" 01.02.1990 "), Some(date(1990, 2, 1)));
        assert_eq!(parse_date("1990-02-01"), None);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("   345,67 "), Ok(Some(345.67)));
        assert_eq!(parse_value("-0,5"), Ok(Some(-0.5)));
        assert_eq!(parse_value("Lücke"), Ok(None));
        assert_eq!(parse_value("  "), Ok(None));
        assert!(parse_value("n/a").is_err());
    }

    #[test]
    fn test_ingest_series_sorts_and_skips_blank_lines() {
        let rows = lines(&[
            "Werte:",
            "03.01.2000 00:00:00;   3,0   ;",
            "",
            "01.01.2000 00:00:00;   1,0   ;",
            "02.01.2000 00:00:00;   Lücke   ;",
        ]);

        let series = ingest_series(&rows, 1, &PathBuf::from("test.csv")).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0], Observation::new(date(2000, 1, 1), Some(1.0)));
        assert_eq!(series[1], Observation::new(date(2000, 1, 2), None));
        assert_eq!(series[2], Observation::new(date(2000, 1, 3), Some(3.0)));
    }

    #[test]
    fn test_ingest_series_keeps_duplicate_order() {
        let rows = lines(&[
            "01.01.2000 07:00:00;1,0",
            "01.01.2000 19:00:00;2,0",
            "31.12.1999 00:00:00;0,5",
        ]);

        let series = ingest_series(&rows, 0, &PathBuf::from("test.csv")).unwrap();

        assert_eq!(series[0].value, Some(0.5));
        assert_eq!(series[1].value, Some(1.0));
        assert_eq!(series[2].value, Some(2.0));
    }

    #[test]
    fn test_ingest_series_reports_line_number() {
        let rows = lines(&["Werte:", "01.01.2000;1,0", "garbage;2,0"]);

        match ingest_series(&rows, 1, &PathBuf::from("test.csv")) {
            Err(EhydError::InvalidDataRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidDataRow, got {:?}", other),
        }
    }
}
