//! `dds-sim`: Runs the bit-exact interpolation model over a phase sweep.
//!
//! **Outputs:**
//! - `<out>`: one line per swept phase:
//!   `phase, ideal, interpolated, raw, gradient, interp`
//! - an error summary (max and RMS error in LSB and dBFS) on stdout
//!
//! **Usage:**
//! ```text
//! dds-sim [--config <file> | --table-length N ...] [--step S] [--out <file>] [--json]
//! ```
//!
//! Defaults to the 26-bit simulation accumulator, swept exhaustively.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dds_clients::{describe, init_tracing, TableArgs};
use dds_tables::{DdsTables, ErrorSummary, PhaseSweep, TableConfig};
use tracing::info;

/// Simulate the DDS interpolator and write the validation file.
#[derive(Parser)]
#[command(name = "dds-sim", about = "Simulate the DDS interpolator over a phase sweep")]
struct Args {
    #[command(flatten)]
    table: TableArgs,

    /// Phase increment between evaluated samples.
    #[arg(long, default_value_t = 1)]
    step: u64,

    /// Validation output file.
    #[arg(long, default_value = "interpolation_results.csv")]
    out: PathBuf,

    /// Print the error summary as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = args.table.resolve(TableConfig::simulation())?;
    let tables = DdsTables::build(config).context("Failed to build lookup tables")?;

    let sweep = PhaseSweep::new(&tables, args.step);
    info!(samples = sweep.total(), step = args.step, "sweeping phases");
    let summary = write_sweep(sweep, &args.out)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize error summary")?;
        println!("{json}");
        return Ok(());
    }

    println!("DDS simulation: {}", describe(&config));
    println!("  Written: {}", args.out.display());
    println!("  Samples:                {}", summary.samples);
    println!(
        "  Raw max error:          {:.3} LSB ({:.1} dBFS)",
        summary.raw_max_error,
        summary.raw_max_error_dbfs()
    );
    println!(
        "  Interpolated max error: {:.3} LSB ({:.1} dBFS)",
        summary.interp_max_error,
        summary.interp_max_error_dbfs()
    );
    println!(
        "  Interpolated RMS error: {:.3} LSB ({:.1} dBFS)",
        summary.interp_rms_error,
        summary.interp_rms_error_dbfs()
    );
    if summary.overflow_count > 0 {
        println!(
            "  Outside {} bits:        {}",
            config.data_width(),
            summary.overflow_count
        );
    }

    Ok(())
}

/// Streams the sweep into a sibling temporary file and moves it over `path`
/// once complete; a failed run leaves no file behind.
fn write_sweep(sweep: PhaseSweep<'_>, path: &Path) -> Result<ErrorSummary> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = File::create(&tmp)
        .and_then(|file| sweep.write_csv(&mut BufWriter::new(file)))
        .and_then(|summary| fs::rename(&tmp, path).map(|()| summary));

    result.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        anyhow::Error::new(e).context(format!("Failed to write {}", path.display()))
    })
}
