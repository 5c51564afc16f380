//! eHYD Processor Library
//!
//! A Rust library for reading hydrological station exports from eHYD, the
//! Austrian hydrographic service's data portal, into a single structured
//! record per station.
//!
//! This library provides tools for:
//! - Decoding Windows-1252 eHYD CSV exports
//! - Scanning the German-labelled header for station metadata
//! - Converting degree/minute/second coordinates and detecting station relocations
//! - Ingesting decimal-comma data rows with `Lücke` gaps
//! - Assessing regularity and completeness with advisory quality flags
//! - Rendering records as JSON mappings or polars tables, with optional CSV output

pub mod cli;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;
pub mod quality;
pub mod record;
pub mod series;
pub mod source;

// Re-export commonly used types
pub use config::{OutputType, ReaderConfig};
pub use error::{CoordinateError, EhydError, Result};
pub use models::{
    Coordinate, DataErrorFlag, Datatype, Frequency, MetaErrorFlag, Observation,
    QualityAssessment, StationLocation, StationMetadata,
};
pub use processor::{EhydReader, StationOutput, read_ehyd};
pub use record::StationRecord;
