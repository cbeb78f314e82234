//! DDS ROM generator.
//!
//! Renders the sine and gradient tables built by `dds-tables` as synchronous
//! VHDL read-only memories (see [`rom`] for the port and timing contract) and
//! writes them to an output directory. Rendering is deterministic: the same
//! tables always produce byte-identical files.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod emit;
pub mod error;
pub mod rom;

use std::fs;
use std::path::Path;

use dds_tables::DdsTables;
use tracing::info;

pub use error::GenerateError;
pub use rom::{word_range, DataType, RomDescription, RomOptions, READ_LATENCY_CYCLES};

/// Entity name of the sine ROM.
pub const SINE_ROM: &str = "SINE_ROM";

/// Entity name of the gradient ROM.
pub const GRADIENT_ROM: &str = "GRADIENT_ROM";

/// Which ROMs to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomTargets {
    /// Emit `SINE_ROM.vhd`.
    pub sine: bool,
    /// Emit `GRADIENT_ROM.vhd`.
    pub gradient: bool,
}

impl RomTargets {
    /// Both ROMs.
    pub const ALL: Self = Self {
        sine: true,
        gradient: true,
    };
}

impl Default for RomTargets {
    fn default() -> Self {
        Self::ALL
    }
}

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of ROMs written.
    pub rom_count: usize,
    /// Total table entries across all ROMs.
    pub entry_count: usize,
    /// Files written.
    pub files: Vec<String>,
}

/// Describes the sine table as an unsigned ROM of `data_width` bits.
///
/// # Errors
///
/// Returns an error only if the tables are empty, which [`DdsTables::build`]
/// never produces. Sine entries always fit the word.
pub fn sine_rom(tables: &DdsTables) -> Result<RomDescription, GenerateError> {
    let values = tables.sine().values().iter().map(|&v| i64::from(v)).collect();
    RomDescription::new(
        SINE_ROM,
        values,
        RomOptions {
            data_bits: tables.config().data_width(),
            data_type: DataType::Unsigned,
            ..RomOptions::default()
        },
    )
}

/// Describes the gradient table as a signed ROM of `data_width` bits.
///
/// # Errors
///
/// Returns [`GenerateError::ValueOutOfRange`] if a gradient does not fit a
/// signed `data_width`-bit word; lower `gradient_shift` in that case.
pub fn gradient_rom(tables: &DdsTables) -> Result<RomDescription, GenerateError> {
    RomDescription::new(
        GRADIENT_ROM,
        tables.gradient().values().to_vec(),
        RomOptions {
            data_bits: tables.config().data_width(),
            data_type: DataType::Signed,
            ..RomOptions::default()
        },
    )
}

/// Renders `rom` and writes it to `<out_dir>/<file_name>`.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the file cannot be written.
pub fn write_rom(rom: &RomDescription, out_dir: &Path) -> Result<(), GenerateError> {
    let path = out_dir.join(rom.file_name());
    emit::write_file(&path, &rom.render())?;
    info!(
        path = %path.display(),
        entries = rom.table_length(),
        address_bits = rom.address_bits(),
        "ROM written"
    );
    Ok(())
}

/// Generates the selected ROMs for `tables` into `out_dir`.
///
/// # Errors
///
/// Returns an error if a table does not fit its ROM word, if the output
/// directory cannot be created, or if any file cannot be written. Every ROM is
/// described before anything is written, so a rejected table leaves the
/// output directory untouched.
pub fn generate(
    tables: &DdsTables,
    out_dir: &Path,
    targets: RomTargets,
) -> Result<GenerationReport, GenerateError> {
    let mut roms = Vec::new();
    if targets.sine {
        roms.push(sine_rom(tables)?);
    }
    if targets.gradient {
        roms.push(gradient_rom(tables)?);
    }

    fs::create_dir_all(out_dir).map_err(|e| GenerateError::io(out_dir, e))?;

    let mut report = GenerationReport::default();
    for rom in &roms {
        write_rom(rom, out_dir)?;
        report.rom_count += 1;
        report.entry_count += rom.table_length();
        report.files.push(rom.file_name().to_string());
    }

    Ok(report)
}
