//! `dds-tables`: Prints the derived widths and contents of the DDS tables.
//!
//! **Usage:**
//! ```text
//! dds-tables [--config <file> | --table-length N ...] [--listing] [--per-line N] [--json]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::Parser;
use dds_clients::{describe, init_tracing, TableArgs};
use dds_tables::display::{format_listing, TableSummary};
use dds_tables::{DdsTables, TableConfig};
use serde_json::json;

/// Print DDS table summaries and listings.
#[derive(Parser)]
#[command(name = "dds-tables", about = "Print DDS table summaries and listings")]
struct Args {
    #[command(flatten)]
    table: TableArgs,

    /// Print every entry of both tables.
    #[arg(long)]
    listing: bool,

    /// Entries per listing line.
    #[arg(long, default_value_t = 16)]
    per_line: usize,

    /// Print the configuration and summaries as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = args.table.resolve(TableConfig::generator())?;
    let tables = DdsTables::build(config).context("Failed to build lookup tables")?;
    let sine = TableSummary::of(tables.sine().values());
    let gradient = TableSummary::of(tables.gradient().values());

    if args.json {
        let mut value = json!({
            "config": config,
            "address_width": config.address_width(),
            "lower_addr_bits": config.lower_addr_bits(),
            "truncation": config.truncation(),
            "sine": sine,
            "gradient": gradient,
            "gradient_fits": tables.gradient().fits_signed(config.data_width()),
        });
        if args.listing {
            value["sine_values"] = json!(tables.sine().values());
            value["gradient_values"] = json!(tables.gradient().values());
        }
        let text =
            serde_json::to_string_pretty(&value).context("Failed to serialize table summary")?;
        println!("{text}");
        return Ok(());
    }

    println!("DDS tables: {}", describe(&config));
    println!("  Truncation: {} bits", config.truncation());
    println!("  Sine:       {sine}");
    println!("  Gradient:   {gradient}");
    if !tables.gradient().fits_signed(config.data_width()) {
        println!(
            "  Gradients exceed {}-bit signed words; adjust gradient_shift.",
            config.data_width()
        );
    }

    if args.listing {
        println!();
        println!("Sine table:");
        println!("{}", format_listing(tables.sine().values(), args.per_line));
        println!();
        println!("Gradient table:");
        println!(
            "{}",
            format_listing(tables.gradient().values(), args.per_line)
        );
    }

    Ok(())
}
