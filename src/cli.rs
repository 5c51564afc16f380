//! Command-line interface components.

use crate::config::{OutputType, ReaderConfig};
use crate::constants::HEADER_SCAN_LIMIT;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "ehyd")]
#[command(about = "Read eHYD hydrological station exports and assess their data quality")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// eHYD export files to process
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Shape of the printed result
    #[arg(long, value_enum, default_value_t = OutputFormat::Mapping)]
    pub output_type: OutputFormat,

    /// Write <HZB>.csv with date;value rows for every station
    #[arg(long)]
    pub write_csv: bool,

    /// Linearly fill interior missing values
    #[arg(long)]
    pub interpolate: bool,

    /// Directory for CSV output
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of header lines searched for metadata
    #[arg(long, default_value_t = HEADER_SCAN_LIMIT)]
    pub header_scan_limit: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output shapes selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON object per station
    Mapping,
    /// Table with metadata columns
    Table,
}

impl From<OutputFormat> for OutputType {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Mapping => OutputType::Mapping,
            OutputFormat::Table => OutputType::Table,
        }
    }
}

impl Args {
    /// Reader configuration described by the flags
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::default()
            .with_output_type(self.output_type.into())
            .with_write_csv(self.write_csv)
            .with_interpolation(self.interpolate)
            .with_output_dir(&self.output_dir)
            .with_header_scan_limit(self.header_scan_limit)
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the flags.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ehyd_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
