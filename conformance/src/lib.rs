//! DDS conformance suite.
//!
//! Builds the lookup tables for a configuration and checks everything the
//! hardware relies on:
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `tables` | table lengths, sine range, wraparound, gradient width, determinism |
//! | `interpolation` | zero-fraction term, address range, error budget, overflow |
//! | `rom/<ENTITY>` | entry count, address patterns, literal widths, ports, artifacts |
//!
//! # Entry Point
//!
//! ```no_run
//! use dds_conformance::{run_all, ConformanceOptions};
//! use dds_tables::TableConfig;
//!
//! let report = run_all(TableConfig::generator(), &ConformanceOptions::default())
//!     .expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

use anyhow::Context;
use dds_tables::{DdsTables, TableConfig};
use tracing::info;

pub use report::{ConformanceReport, Severity, Tally, TestResult};
pub use validators::interpolation::SweepOptions;

/// Settings for a full conformance run.
#[derive(Debug, Clone, Default)]
pub struct ConformanceOptions {
    /// Interpolation sweep step and error budget.
    pub sweep: SweepOptions,
    /// Directory holding previously generated ROM files to compare against.
    pub artifacts: Option<PathBuf>,
}

/// Runs all conformance validators for `config` and returns the aggregated
/// report.
///
/// Validators run in this order:
/// 1. Table structure
/// 2. Interpolation model and error budget
/// 3. Generated ROMs (and on-disk artifacts when given)
///
/// # Errors
///
/// Returns an error if the tables cannot be built for `config`, or if an
/// artifact exists but cannot be read.
pub fn run_all(
    config: TableConfig,
    options: &ConformanceOptions,
) -> anyhow::Result<ConformanceReport> {
    let tables = DdsTables::build(config).context("Failed to build lookup tables")?;
    let mut report = ConformanceReport::new();

    report.extend(validators::tables::validate(&tables));
    report.extend(validators::interpolation::validate(&tables, &options.sweep));
    report.extend(validators::rom::validate(
        &tables,
        options.artifacts.as_deref(),
    )?);

    let tally = report.tally();
    info!(
        passed = tally.passed,
        warned = tally.warned,
        failed = tally.failed,
        "Conformance run complete"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generator_configuration_passes() {
        let report = run_all(TableConfig::generator(), &ConformanceOptions::default()).unwrap();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "Conformance failures: {:#?}", failures);
    }

    #[test]
    fn every_validator_reports() {
        let report = run_all(TableConfig::generator(), &ConformanceOptions::default()).unwrap();
        for prefix in ["tables", "interpolation", "rom/SINE_ROM", "rom/GRADIENT_ROM"] {
            assert!(
                report.by_validator(prefix).next().is_some(),
                "no results from {prefix}"
            );
        }
    }

    #[test]
    fn simulation_gradients_exceed_the_rom_word() {
        let report = run_all(TableConfig::simulation(), &ConformanceOptions::default()).unwrap();
        assert!(!report.all_passed());
        assert!(report
            .by_validator("tables")
            .any(|r| r.is_failure() && r.message.contains("gradient_shift")));
    }
}
