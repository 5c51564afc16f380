//! Final per-station record and its output shapes.
//!
//! A [`StationRecord`] is assembled once per file from the header scan and
//! the assessed series. It can be rendered as a JSON mapping, as a polars
//! table with the metadata attached as constant columns, or written out as
//! a `<HZB>.csv` file.

use crate::error::Result;
use crate::models::{Observation, QualityAssessment, StationLocation, StationMetadata};
use polars::prelude::*;
use serde_json::{Map, Value, json};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything known about one station after processing
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub metadata: StationMetadata,
    pub location: StationLocation,
    pub series: Vec<Observation>,
    pub quality: QualityAssessment,
}

impl StationRecord {
    pub fn new(
        metadata: StationMetadata,
        location: StationLocation,
        series: Vec<Observation>,
        quality: QualityAssessment,
    ) -> Self {
        Self {
            metadata,
            location,
            series,
            quality,
        }
    }

    pub fn lat(&self) -> Option<f64> {
        self.location.coordinate.map(|coordinate| coordinate.lat)
    }

    pub fn lon(&self) -> Option<f64> {
        self.location.coordinate.map(|coordinate| coordinate.lon)
    }

    /// Render the record as a JSON object; undefined values become `null`.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let metadata = &self.metadata;
        let mut mapping = Map::new();

        mapping.insert("DataError".into(), json!(self.quality.data_error.as_str()));
        mapping.insert("MetaError".into(), json!(self.location.meta_error.as_str()));
        mapping.insert("StationName".into(), json!(metadata.station_name));
        mapping.insert("CatchmentName".into(), json!(metadata.catchment_name));
        mapping.insert("CatchmentSymbol".into(), json!(metadata.catchment_symbol));
        mapping.insert("Subcatchment".into(), json!(metadata.subcatchment));
        mapping.insert("RegName".into(), json!(metadata.reg_name));
        mapping.insert("HZB".into(), json!(metadata.hzb));
        mapping.insert("HD_num".into(), json!(metadata.hd_num));
        mapping.insert("DBMS_num".into(), json!(metadata.dbms_num));
        mapping.insert("Province".into(), json!(metadata.province));
        mapping.insert("Operator".into(), json!(metadata.operator));
        mapping.insert("CatchmentSize".into(), json!(metadata.catchment_size));
        mapping.insert("Lat".into(), json!(self.lat()));
        mapping.insert("Lon".into(), json!(self.lon()));
        mapping.insert("Elevation".into(), json!(metadata.elevation));
        mapping.insert("Depth".into(), json!(metadata.depth));
        mapping.insert("ComputedDepth".into(), json!(metadata.computed_depth));
        mapping.insert("StationMovement".into(), json!(self.location.movement_m));
        mapping.insert("Datatype".into(), json!(metadata.datatype.as_str()));

        let series: Vec<Value> = self
            .series
            .iter()
            .map(|observation| {
                json!({
                    "date": observation.date.format("%Y-%m-%d").to_string(),
                    "value": observation.value,
                })
            })
            .collect();
        mapping.insert("TimeSeries".into(), Value::Array(series));

        mapping
    }

    /// `date` and `value` columns only
    fn series_frame(&self) -> Result<DataFrame> {
        let dates: Vec<_> = self.series.iter().map(|observation| observation.date).collect();
        let values: Vec<Option<f64>> =
            self.series.iter().map(|observation| observation.value).collect();

        let df = DataFrame::new(vec![
            Column::new("date".into(), dates),
            Column::new("value".into(), values),
        ])?;
        Ok(df)
    }

    /// Render the record as a table: one row per observation with every
    /// metadata field attached as a constant column.
    pub fn to_table(&self) -> Result<DataFrame> {
        let metadata = &self.metadata;

        let table = self
            .series_frame()?
            .lazy()
            .with_columns([
                lit(self.quality.data_error.as_str()).alias("DataError"),
                lit(self.location.meta_error.as_str()).alias("MetaError"),
                lit(metadata.station_name.clone()).alias("StationName"),
                optional_text(metadata.catchment_name.as_deref()).alias("CatchmentName"),
                optional_text(metadata.catchment_symbol.as_deref()).alias("CatchmentSymbol"),
                optional_text(metadata.subcatchment.as_deref()).alias("Subcatchment"),
                optional_text(metadata.reg_name.as_deref()).alias("RegName"),
                lit(metadata.hzb).alias("HZB"),
                optional_text(metadata.hd_num.as_deref()).alias("HD_num"),
                optional_text(metadata.dbms_num.as_deref()).alias("DBMS_num"),
                optional_text(metadata.province.as_deref()).alias("Province"),
                optional_text(metadata.operator.as_deref()).alias("Operator"),
                optional_text(metadata.catchment_size.as_deref()).alias("CatchmentSize"),
                optional_number(self.lat()).alias("Lat"),
                optional_number(self.lon()).alias("Lon"),
                optional_number(metadata.elevation).alias("Elevation"),
                optional_number(metadata.depth).alias("Depth"),
                optional_number(metadata.computed_depth).alias("ComputedDepth"),
                optional_number(self.location.movement_m).alias("StationMovement"),
                lit(metadata.datatype.as_str()).alias("Datatype"),
            ])
            .collect()?;

        debug!(
            "Built table for HZB {} with {} rows and {} columns",
            metadata.hzb,
            table.height(),
            table.width()
        );

        Ok(table)
    }

    /// Write `date;value` rows to `<dir>/<HZB>.csv`, returning the path
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let output_path = dir.join(format!("{}.csv", self.metadata.hzb));

        let mut df = self.series_frame()?;
        let mut file = File::create(&output_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b';')
            .finish(&mut df)?;

        info!("Wrote {} rows to {}", df.height(), output_path.display());

        Ok(output_path)
    }
}

fn optional_text(value: Option<&str>) -> Expr {
    match value {
        Some(text) => lit(text),
        None => lit(NULL).cast(DataType::String),
    }
}

fn optional_number(value: Option<f64>) -> Expr {
    match value {
        Some(number) => lit(number),
        None => lit(NULL).cast(DataType::Float64),
    }
}
