//! Shared command-line plumbing for the DDS client binaries.
//!
//! Every binary accepts the same table options: either a JSON configuration
//! file (`--config`) or individual overrides applied to a preset.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dds_tables::TableConfig;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Table configuration flags shared by all binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// JSON configuration file; conflicts with the individual flags.
    #[arg(
        long,
        conflicts_with_all = [
            "table_length",
            "phase_width",
            "data_width",
            "gradient_shift",
            "max_interp_bits",
        ]
    )]
    pub config: Option<PathBuf>,

    /// Number of table entries (power of two).
    #[arg(long)]
    pub table_length: Option<usize>,

    /// Width of the phase accumulator in bits.
    #[arg(long)]
    pub phase_width: Option<u32>,

    /// Width of the DAC and of every table word in bits.
    #[arg(long)]
    pub data_width: Option<u32>,

    /// Fixed-point scale of the gradient table.
    #[arg(long)]
    pub gradient_shift: Option<u32>,

    /// Width of the hardware multiplier's fractional-phase input.
    #[arg(long)]
    pub max_interp_bits: Option<u32>,
}

impl TableArgs {
    /// Resolves the flags against `preset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed,
    /// or if the resulting parameters are invalid.
    pub fn resolve(&self, preset: TableConfig) -> Result<TableConfig> {
        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config = TableConfig::from_json(&text)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            debug!(path = %path.display(), "configuration loaded");
            return Ok(config);
        }

        TableConfig::new(
            self.table_length.unwrap_or(preset.table_length()),
            self.phase_width.unwrap_or(preset.phase_width()),
            self.data_width.unwrap_or(preset.data_width()),
            self.gradient_shift.unwrap_or(preset.gradient_shift()),
            self.max_interp_bits.unwrap_or(preset.max_interp_bits()),
        )
        .context("Invalid table configuration")
    }
}

/// Installs the global `tracing` subscriber; `verbose` raises the level from
/// `WARN` to `INFO` (once) or `DEBUG` (twice or more).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

/// One-line description of a configuration for report headers.
pub fn describe(config: &TableConfig) -> String {
    format!(
        "{} entries, {}-bit phase ({} address + {} fractional), {}-bit data, gradient shift {}",
        config.table_length(),
        config.phase_width(),
        config.address_width(),
        config.lower_addr_bits(),
        config.data_width(),
        config.gradient_shift()
    )
}
