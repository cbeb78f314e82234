//! Table validator.
//!
//! Checks the shape and numeric range of the sine and gradient tables:
//! - both tables have `table_length` entries
//! - every sine entry is a valid unsigned `data_width`-bit code
//! - the last gradient is taken towards `sine[0]`
//! - every gradient fits a signed `data_width`-bit ROM word
//! - rebuilding from the same config gives identical tables

use dds_tables::table::signed_range;
use dds_tables::DdsTables;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "tables";

/// Validates a built table pair.
pub fn validate(tables: &DdsTables) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    check_lengths(tables, &mut report);
    check_sine_range(tables, &mut report);
    check_wraparound(tables, &mut report);
    check_gradient_width(tables, &mut report);
    check_rebuild(tables, &mut report);

    report
}

fn check_lengths(tables: &DdsTables, report: &mut ConformanceReport) {
    let expected = tables.config().table_length();
    let sine = tables.sine().len();
    let gradient = tables.gradient().len();
    report.check(
        VALIDATOR,
        sine == expected && gradient == expected,
        format!("Both tables have {expected} entries"),
        format!("Table lengths {sine}/{gradient}, expected {expected}"),
        Vec::new(),
    );
}

fn check_sine_range(tables: &DdsTables, report: &mut ConformanceReport) {
    let max = tables.config().max_code();
    let violations: Vec<String> = tables
        .sine()
        .values()
        .iter()
        .enumerate()
        .filter(|(_, v)| u64::from(**v) > max)
        .map(|(address, v)| format!("sine[{address}] = {v}"))
        .collect();
    report.check(
        VALIDATOR,
        violations.is_empty(),
        format!("Sine entries within [0, {max}]"),
        format!("{} sine entries exceed {max}", violations.len()),
        violations,
    );
}

fn check_wraparound(tables: &DdsTables, report: &mut ConformanceReport) {
    let config = tables.config();
    let last = config.table_length() - 1;
    let delta = i128::from(tables.sine()[0]) - i128::from(tables.sine()[last]);
    let (l, s) = (config.lower_addr_bits(), config.gradient_shift());
    let expected = if s >= l {
        delta << (s - l)
    } else {
        delta >> (l - s)
    };
    let actual = tables.gradient()[last];
    report.check(
        VALIDATOR,
        i128::from(actual) == expected,
        format!("gradient[{last}] wraps to sine[0]"),
        format!("gradient[{last}] = {actual}, expected {expected} from sine[0]"),
        Vec::new(),
    );
}

fn check_gradient_width(tables: &DdsTables, report: &mut ConformanceReport) {
    let bits = tables.config().data_width();
    let (min, max) = signed_range(bits);
    let violations: Vec<String> = tables
        .gradient()
        .values()
        .iter()
        .enumerate()
        .filter(|(_, g)| !(min..=max).contains(*g))
        .map(|(address, g)| format!("gradient[{address}] = {g}"))
        .collect();
    if violations.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!(
                "Gradients fit {bits}-bit signed words (max |g| = {})",
                tables.gradient().max_magnitude()
            ),
        ));
    } else {
        report.push(
            TestResult::fail(
                VALIDATOR,
                format!(
                    "{} gradients do not fit {bits}-bit signed words; check gradient_shift",
                    violations.len()
                ),
            )
            .with_details(violations),
        );
    }
}

fn check_rebuild(tables: &DdsTables, report: &mut ConformanceReport) {
    let identical = DdsTables::build(*tables.config())
        .map(|rebuilt| &rebuilt == tables)
        .unwrap_or(false);
    report.check(
        VALIDATOR,
        identical,
        "Rebuilding gives identical tables",
        "Rebuilding gave different tables",
        Vec::new(),
    );
}
