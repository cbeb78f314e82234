//! `dds-conformance`: Validates the DDS tables, interpolation model and ROMs.
//!
//! Runs the complete conformance suite across:
//! - Table structure (lengths, range, wraparound, gradient width, determinism)
//! - Interpolation (zero-fraction term, addressing, error budget, overflow)
//! - Generated ROMs (entries, address patterns, literals, ports, artifacts)
//!
//! **Usage:**
//! ```text
//! dds-conformance [--config <file> | --table-length N ...] [--budget-lsb B] [--step S]
//!                 [--artifacts <path>] [--json]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use dds_clients::{describe, init_tracing, TableArgs};
use dds_conformance::{run_all, ConformanceOptions, SweepOptions};
use dds_tables::TableConfig;

/// Run the DDS conformance suite.
#[derive(Parser)]
#[command(
    name = "dds-conformance",
    about = "Validate DDS tables, interpolation error and generated ROMs"
)]
struct Args {
    #[command(flatten)]
    table: TableArgs,

    /// Largest acceptable interpolation error, in output LSBs.
    #[arg(long, default_value_t = SweepOptions::default().budget_lsb)]
    budget_lsb: f64,

    /// Phase increment of the interpolation sweep.
    #[arg(long, default_value_t = SweepOptions::default().step)]
    step: u64,

    /// Directory of previously generated ROMs to check for staleness.
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Print the report as JSON.
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
    let options = ConformanceOptions {
        sweep: SweepOptions {
            step: args.step,
            budget_lsb: args.budget_lsb,
        },
        artifacts: args.artifacts,
    };

    let report = run_all(config, &options)?;
    let tally = report.tally();

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize conformance report")?;
        println!("{json}");
    } else {
        println!("DDS Conformance Report");
        println!("======================");
        println!("{}", describe(&config));
        println!();

        for result in &report.results {
            println!(
                "[{}] {} - {}",
                result.severity.label(),
                result.validator,
                result.message
            );
            for detail in &result.details {
                println!("       {}", detail);
            }
        }

        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            tally.passed, tally.warned, tally.failed
        );
    }

    if tally.failed > 0 {
        eprintln!(
            "Conformance FAILED: {} check(s) did not pass.",
            tally.failed
        );
        process::exit(1);
    }

    if !args.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
