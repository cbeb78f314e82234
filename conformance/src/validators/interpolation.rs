//! Interpolation validator.
//!
//! Runs the bit-exact interpolation model and judges it against the error
//! budget:
//! - a phase exactly on a table address produces no interpolation term
//! - every swept phase selects an address inside the table
//! - interpolation never does worse than the raw table
//! - the worst-case interpolation error stays within the LSB budget
//! - outputs beyond the data width are reported (not treated as failures)

use dds_tables::{DdsTables, ErrorSummary, InterpolationModel, PhaseSweep};
use tracing::debug;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "interpolation";

/// Sweep settings for the interpolation checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOptions {
    /// Phase increment between evaluated samples.
    pub step: u64,
    /// Largest acceptable |interpolated − ideal|, in output LSBs.
    pub budget_lsb: f64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            step: 1 << 12,
            budget_lsb: 3.0,
        }
    }
}

/// Validates the interpolation model over `tables`.
pub fn validate(tables: &DdsTables, options: &SweepOptions) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    check_zero_fraction(tables, &mut report);
    let summary = check_sweep(tables, options, &mut report);
    check_error_budget(&summary, options, &mut report);

    report
}

fn check_zero_fraction(tables: &DdsTables, report: &mut ConformanceReport) {
    let model = InterpolationModel::new(tables);
    let lower_bits = tables.config().lower_addr_bits();
    let violations: Vec<String> = (0..tables.config().table_length())
        .map(|address| (address as u64) << lower_bits)
        .map(|phase| (model.evaluate(phase), model.table_value(phase)))
        .filter(|(s, raw)| s.interp_term != 0 || s.value != i64::from(*raw))
        .map(|(s, _)| format!("address {}: interp term {}", s.table_address, s.interp_term))
        .collect();
    report.check(
        VALIDATOR,
        violations.is_empty(),
        "Zero fractional phase gives zero interpolation term at every address",
        format!("{} addresses interpolate with no fractional phase", violations.len()),
        violations,
    );
}

fn check_sweep(
    tables: &DdsTables,
    options: &SweepOptions,
    report: &mut ConformanceReport,
) -> ErrorSummary {
    let config = tables.config();
    let lower_bits = config.lower_addr_bits();
    let mut summary = ErrorSummary::new(config);
    let mut bad_addresses = Vec::new();

    for record in PhaseSweep::new(tables, options.step) {
        let s = &record.sample;
        if s.table_address >= config.table_length()
            || s.table_address as u64 != s.phase >> lower_bits
        {
            bad_addresses.push(format!("phase {}: address {}", s.phase, s.table_address));
        }
        summary.record(&record);
    }
    debug!(
        samples = summary.samples,
        interp_max_error = summary.interp_max_error,
        "interpolation sweep done"
    );

    report.check(
        VALIDATOR,
        bad_addresses.is_empty(),
        format!("{} swept phases address the table correctly", summary.samples),
        format!("{} phases selected a wrong address", bad_addresses.len()),
        bad_addresses,
    );

    if summary.overflow_count == 0 {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("No output beyond {} bits", config.data_width()),
        ));
    } else {
        report.push(TestResult::warn(
            VALIDATOR,
            format!(
                "{} of {} outputs fall outside {} bits (unclamped)",
                summary.overflow_count,
                summary.samples,
                config.data_width()
            ),
        ));
    }

    summary
}

fn check_error_budget(
    summary: &ErrorSummary,
    options: &SweepOptions,
    report: &mut ConformanceReport,
) {
    report.check(
        VALIDATOR,
        summary.interp_max_error <= summary.raw_max_error,
        format!(
            "Interpolation max error {:.3} LSB ({:.1} dBFS) beats raw table {:.3} LSB ({:.1} dBFS)",
            summary.interp_max_error,
            summary.interp_max_error_dbfs(),
            summary.raw_max_error,
            summary.raw_max_error_dbfs()
        ),
        format!(
            "Interpolation max error {:.3} LSB exceeds raw table {:.3} LSB",
            summary.interp_max_error, summary.raw_max_error
        ),
        Vec::new(),
    );

    report.check(
        VALIDATOR,
        summary.interp_max_error <= options.budget_lsb,
        format!(
            "Interpolation error within {} LSB budget (RMS {:.3} LSB, {:.1} dBFS)",
            options.budget_lsb,
            summary.interp_rms_error,
            summary.interp_rms_error_dbfs()
        ),
        format!(
            "Interpolation max error {:.3} LSB exceeds {} LSB budget",
            summary.interp_max_error, options.budget_lsb
        ),
        Vec::new(),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dds_tables::TableConfig;

    #[test]
    fn deployed_tables_meet_budget() {
        let tables = DdsTables::build(TableConfig::generator()).unwrap();
        let options = SweepOptions {
            step: (1 << 16) + 1,
            ..SweepOptions::default()
        };
        let report = validate(&tables, &options);
        assert!(report.all_passed(), "{:#?}", report.results);
    }

    #[test]
    fn tight_budget_fails() {
        let tables = DdsTables::build(TableConfig::generator()).unwrap();
        let options = SweepOptions {
            step: (1 << 16) + 1,
            budget_lsb: 0.0,
        };
        let report = validate(&tables, &options);
        assert_eq!(report.failure_count(), 1);
    }
}
