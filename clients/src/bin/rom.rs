//! `dds-rom`: Builds the DDS lookup tables and writes them as VHDL ROMs.
//!
//! **Outputs:**
//! - `<out>/SINE_ROM.vhd`: unsigned sine samples
//! - `<out>/GRADIENT_ROM.vhd`: signed interpolation gradients
//!
//! **Usage:**
//! ```text
//! dds-rom [--config <file> | --table-length N ...] [--out <path>] [--sine] [--gradient]
//! ```
//!
//! Without `--sine` or `--gradient` both ROMs are written. A table whose
//! entries do not fit the ROM word is rejected and nothing is written.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dds_clients::{describe, init_tracing, TableArgs};
use dds_codegen::{generate, RomTargets};
use dds_tables::display::TableSummary;
use dds_tables::{DdsTables, TableConfig};

/// Generate the sine and gradient ROMs.
#[derive(Parser)]
#[command(name = "dds-rom", about = "Generate DDS sine and gradient ROMs as VHDL")]
struct Args {
    #[command(flatten)]
    table: TableArgs,

    /// Output directory for the generated VHDL files.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Write the sine ROM.
    #[arg(long)]
    sine: bool,

    /// Write the gradient ROM.
    #[arg(long)]
    gradient: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = args.table.resolve(TableConfig::generator())?;
    let tables = DdsTables::build(config).context("Failed to build lookup tables")?;

    let targets = if args.sine || args.gradient {
        RomTargets {
            sine: args.sine,
            gradient: args.gradient,
        }
    } else {
        RomTargets::ALL
    };

    println!("DDS tables: {}", describe(&config));
    println!("  Sine:     {}", TableSummary::of(tables.sine().values()));
    println!("  Gradient: {}", TableSummary::of(tables.gradient().values()));

    let report = generate(&tables, &args.out, targets)
        .with_context(|| format!("Failed to generate ROMs in {}", args.out.display()))?;
    for file in &report.files {
        println!("  Written: {}", args.out.join(file).display());
    }
    println!(
        "{} ROM(s), {} entries total.",
        report.rom_count, report.entry_count
    );

    Ok(())
}
