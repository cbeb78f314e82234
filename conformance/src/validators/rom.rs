//! Generated ROM validator.
//!
//! Parses the VHDL rendered for the sine and gradient tables and checks the
//! structural contract downstream synthesis relies on:
//! - one `when` arm per table entry, in address order, carrying the table value
//! - every address pattern is `address_bits` wide and unique
//! - every literal fits the declared data word
//! - the `others` fallback, both named processes and the four ports exist
//! - artifacts already on disk match a fresh rendering

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use dds_codegen::{
    gradient_rom, sine_rom, word_range, GenerateError, RomDescription, GRADIENT_ROM, SINE_ROM,
};
use dds_tables::DdsTables;
use regex::Regex;

use crate::report::{ConformanceReport, TestResult};

/// Validates the ROMs generated from `tables`, and the files in `artifacts`
/// if given.
///
/// # Errors
///
/// Returns an error if an artifact exists but cannot be read.
pub fn validate(tables: &DdsTables, artifacts: Option<&Path>) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let patterns = RomPatterns::new()?;

    let described = [
        (SINE_ROM, sine_rom(tables)),
        (GRADIENT_ROM, gradient_rom(tables)),
    ];
    for (entity, described) in described {
        let rom = match described {
            Ok(rom) => rom,
            Err(err @ GenerateError::ValueOutOfRange { .. }) => {
                report.push(TestResult::fail(
                    format!("rom/{entity}"),
                    format!("ROM cannot be generated: {err}"),
                ));
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let text = rom.render();
        let validator = format!("rom/{}", rom.entity_name());
        check_entries(&rom, &text, &patterns, &validator, &mut report);
        check_structure(&rom, &text, &validator, &mut report);
        if let Some(dir) = artifacts {
            check_artifact(&rom, &text, dir, &validator, &mut report)?;
        }
    }

    Ok(report)
}

/// Compiled patterns for the generated text.
struct RomPatterns {
    entry: Regex,
}

impl RomPatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            entry: Regex::new(
                r#"(?m)^\twhen "([01]+)" => DATA <= to_(unsigned|signed)\((-?\d+), (\d+)\);$"#,
            )
            .context("Failed to compile ROM entry pattern")?,
        })
    }
}

/// One parsed `when` arm.
struct Entry<'t> {
    pattern: &'t str,
    data_type: &'t str,
    value: Option<i64>,
    bits: Option<u32>,
}

fn check_entries(
    rom: &RomDescription,
    text: &str,
    patterns: &RomPatterns,
    validator: &str,
    report: &mut ConformanceReport,
) {
    let entries: Vec<Entry<'_>> = patterns
        .entry
        .captures_iter(text)
        .filter_map(|c| {
            Some(Entry {
                pattern: c.get(1)?.as_str(),
                data_type: c.get(2)?.as_str(),
                value: c.get(3)?.as_str().parse().ok(),
                bits: c.get(4)?.as_str().parse().ok(),
            })
        })
        .collect();

    let expected = rom.table_length();
    report.check(
        validator,
        entries.len() == expected,
        format!("{expected} table entries"),
        format!("{} table entries, expected {expected}", entries.len()),
        Vec::new(),
    );

    let width = rom.address_bits() as usize;
    let mut seen = HashSet::new();
    let mut bad_patterns = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let in_order = usize::from_str_radix(entry.pattern, 2).ok() == Some(index);
        if entry.pattern.len() != width || !seen.insert(entry.pattern) || !in_order {
            bad_patterns.push(format!("entry {index}: \"{}\"", entry.pattern));
        }
    }
    report.check(
        validator,
        bad_patterns.is_empty(),
        format!("Address patterns are unique, ordered and {width} bits wide"),
        format!("{} malformed address patterns", bad_patterns.len()),
        bad_patterns,
    );

    let data_type = rom.data_type().as_str();
    let (min, max) = word_range(rom.data_type(), rom.data_bits());
    let mut bad_values = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let value_ok = entry.value.is_some_and(|v| (min..=max).contains(&v));
        if entry.data_type != data_type || entry.bits != Some(rom.data_bits()) || !value_ok {
            bad_values.push(format!(
                "\"{}\" => {}({:?})",
                entry.pattern, entry.data_type, entry.value
            ));
        } else if entry.value != rom.values().get(index).copied() {
            bad_values.push(format!("\"{}\" does not match the table", entry.pattern));
        }
    }
    report.check(
        validator,
        bad_values.is_empty(),
        format!(
            "Literals are {data_type} {}-bit words matching the table",
            rom.data_bits()
        ),
        format!(
            "{} literals do not fit {data_type} {}-bit words",
            bad_values.len(),
            rom.data_bits()
        ),
        bad_values,
    );
}

fn check_structure(rom: &RomDescription, text: &str, validator: &str, report: &mut ConformanceReport) {
    let addr_hi = rom.address_bits() - 1;
    let data_hi = rom.data_bits() - 1;
    let ty = rom.data_type();
    let required = [
        format!("entity {} is", rom.entity_name()),
        "CLK      : in  std_logic;".to_string(),
        "RST      : in  std_logic;".to_string(),
        format!("ADDR_IN  : in  std_logic_vector({addr_hi} downto 0);"),
        format!("DATA_OUT : out std_logic_vector({data_hi} downto 0)"),
        "ROM_PROC : process(CLK) is".to_string(),
        "DATA_PROC : process(RST, CLK) is".to_string(),
        format!(
            "when others  => DATA <= to_{ty}({}, {});",
            rom.default_value(),
            rom.data_bits()
        ),
        "    DATA_OUT <= std_logic_vector(DATA);".to_string(),
        "    ADDR <= ADDR_IN;".to_string(),
    ];
    let missing: Vec<String> = required
        .iter()
        .filter(|line| !text.lines().any(|l| l == line.as_str()))
        .cloned()
        .collect();
    report.check(
        validator,
        missing.is_empty(),
        "Ports, processes and fallback present",
        format!("{} required lines missing", missing.len()),
        missing,
    );
}

fn check_artifact(
    rom: &RomDescription,
    text: &str,
    dir: &Path,
    validator: &str,
    report: &mut ConformanceReport,
) -> Result<()> {
    let path = dir.join(rom.file_name());
    if !path.exists() {
        report.push(TestResult::warn(
            validator,
            format!("{} not found in artifacts directory", rom.file_name()),
        ));
        return Ok(());
    }
    let on_disk = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    report.check(
        validator,
        on_disk == text,
        format!("{} is up to date", rom.file_name()),
        format!("{} is stale; regenerate it", rom.file_name()),
        Vec::new(),
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dds_tables::TableConfig;

    #[test]
    fn generated_roms_pass() {
        let tables = DdsTables::build(TableConfig::generator()).unwrap();
        let report = validate(&tables, None).unwrap();
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.by_validator("rom/SINE_ROM").count(), 4);
        assert_eq!(report.by_validator("rom/GRADIENT_ROM").count(), 4);
    }

    #[test]
    fn oversized_gradient_literals_fail() {
        let tables = DdsTables::build(TableConfig::simulation()).unwrap();
        let report = validate(&tables, None).unwrap();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].validator, "rom/GRADIENT_ROM");
        assert!(failures[0].message.contains("does not fit a 16-bit signed word"));
        // The sine ROM is still checked in full.
        assert_eq!(report.by_validator("rom/SINE_ROM").count(), 4);
    }
}
