use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use ehyd_processor::cli::{Args, setup_logging};
use ehyd_processor::{DataErrorFlag, EhydReader, MetaErrorFlag, StationOutput, StationRecord};
use std::path::Path;
use std::process;
use tracing::error;

fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args) {
        eprintln!("Failed to initialize logging: {:#}", error);
        process::exit(1);
    }

    let reader = EhydReader::new().with_config(args.reader_config());

    let mut processed = 0;
    let mut failed = 0;

    for path in &args.files {
        match run_file(&reader, path) {
            Ok(()) => processed += 1,
            Err(error) => {
                error!("{:#}", error);
                failed += 1;
            }
        }
    }

    eprintln!("\n{}", "Processing Summary".bright_green().bold());
    eprintln!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        processed.to_string().bright_white()
    );
    if failed > 0 {
        eprintln!(
            "  {} {}",
            "Files failed:".bright_red(),
            failed.to_string().bright_red().bold()
        );
        process::exit(1);
    }
}

/// Process one file, print its result to stdout and its summary to stderr
fn run_file(reader: &EhydReader, path: &Path) -> Result<()> {
    let record = reader
        .read_record(path)
        .with_context(|| format!("Failed to process {}", path.display()))?;
    let output = reader
        .finish(&record)
        .with_context(|| format!("Failed to write output for {}", path.display()))?;

    match output {
        StationOutput::Mapping(mapping) => {
            let json = serde_json::to_string_pretty(&mapping)
                .context("Failed to serialize station mapping")?;
            println!("{}", json);
        }
        StationOutput::Table(table) => println!("{}", table),
    }

    print_station_summary(&record);
    Ok(())
}

fn print_station_summary(record: &StationRecord) {
    let data_error = record.quality.data_error;
    let data = if data_error == DataErrorFlag::None {
        data_error.as_str().bright_green()
    } else {
        data_error.as_str().bright_yellow()
    };

    let meta_error = record.location.meta_error;
    let meta = if meta_error == MetaErrorFlag::None {
        meta_error.as_str().bright_green()
    } else {
        meta_error.as_str().bright_yellow()
    };

    eprintln!(
        "{} {} {} ({}, {} rows) {} {} {} {}",
        "✓".bright_green(),
        record.metadata.hzb.to_string().bright_white().bold(),
        record.metadata.station_name.bright_cyan(),
        record.quality.frequency,
        record.series.len(),
        "data:".bright_black(),
        data,
        "meta:".bright_black(),
        meta
    );
}
