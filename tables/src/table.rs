//! Sine and gradient lookup tables.
//!
//! Both tables are built once from a [`TableConfig`] and never mutated. The
//! sine table holds one cycle of a DC-biased unsigned sine; the gradient table
//! holds the per-entry slope to the next sample, pre-scaled by
//! `2^gradient_shift` so the interpolator only needs an integer multiply and
//! a shift.

use std::f64::consts::TAU;
use std::ops::Index;

use tracing::debug;

use crate::config::TableConfig;
use crate::error::ConfigError;
use crate::quantize::floor_code;

/// Quantized sine samples, one per table address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SineTable {
    values: Vec<u32>,
}

impl SineTable {
    /// Table entries in address order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a table built from a valid config.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entry following `address`, wrapping from the last entry to the first.
    pub fn next_value(&self, address: usize) -> u32 {
        self.values[(address + 1) % self.values.len()]
    }
}

impl Index<usize> for SineTable {
    type Output = u32;

    fn index(&self, address: usize) -> &u32 {
        &self.values[address]
    }
}

/// Scaled per-entry slopes, one per table address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientTable {
    values: Vec<i64>,
}

impl GradientTable {
    /// Table entries in address order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a table built from a valid config.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest gradient magnitude in the table.
    pub fn max_magnitude(&self) -> u64 {
        self.values
            .iter()
            .map(|g| g.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// True if every entry fits a two's-complement word of `bits` width.
    pub fn fits_signed(&self, bits: u32) -> bool {
        let (min, max) = signed_range(bits);
        self.values.iter().all(|g| (min..=max).contains(g))
    }
}

impl Index<usize> for GradientTable {
    type Output = i64;

    fn index(&self, address: usize) -> &i64 {
        &self.values[address]
    }
}

/// Inclusive range of a two's-complement word of `bits` width.
pub fn signed_range(bits: u32) -> (i64, i64) {
    match bits {
        0 => (0, 0),
        b if b >= 64 => (i64::MIN, i64::MAX),
        _ => (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1),
    }
}

/// Samples `sin(2π·i/N)` at every address and quantizes it to `data_width`
/// bits.
pub fn build_sine_table(config: &TableConfig) -> SineTable {
    let length = config.table_length();
    let values = (0..length)
        .map(|i| {
            let phase = TAU * i as f64 / length as f64;
            floor_code(phase.sin(), config.data_width())
        })
        .collect();
    SineTable { values }
}

/// Derives the gradient table from consecutive sine entries.
///
/// `gradient[i] = floor((sine[i+1] - sine[i]) * 2^gradient_shift /
/// 2^lower_addr_bits)`, where the last entry uses `sine[0]` as its successor.
/// The scaling is a single exact shift of an integer difference, so no
/// precision is lost before the final floor.
///
/// # Errors
///
/// Returns [`ConfigError::GradientOverflow`] if a scaled gradient does not
/// fit in 64 bits.
pub fn build_gradient_table(
    sine: &SineTable,
    config: &TableConfig,
) -> Result<GradientTable, ConfigError> {
    let lower_bits = config.lower_addr_bits();
    let shift = config.gradient_shift();

    let values = (0..sine.len())
        .map(|address| {
            let delta = i128::from(sine.next_value(address)) - i128::from(sine[address]);
            let scaled = if shift >= lower_bits {
                delta << (shift - lower_bits)
            } else {
                // Arithmetic shift: floor, also for negative slopes.
                delta >> (lower_bits - shift)
            };
            i64::try_from(scaled).map_err(|_| ConfigError::GradientOverflow {
                address,
                gradient_shift: shift,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GradientTable { values })
}

/// The sine and gradient tables for one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsTables {
    config: TableConfig,
    sine: SineTable,
    gradient: GradientTable,
}

impl DdsTables {
    /// Builds both tables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GradientOverflow`] if the gradient shift is too
    /// large for the table's slopes.
    pub fn build(config: TableConfig) -> Result<Self, ConfigError> {
        debug!(
            table_length = config.table_length(),
            address_width = config.address_width(),
            lower_addr_bits = config.lower_addr_bits(),
            truncation = config.truncation(),
            "building DDS tables"
        );

        let sine = build_sine_table(&config);
        let gradient = build_gradient_table(&sine, &config)?;

        debug!(
            sine_min = sine.values().iter().min().copied().unwrap_or(0),
            sine_max = sine.values().iter().max().copied().unwrap_or(0),
            gradient_max_magnitude = gradient.max_magnitude(),
            "tables built"
        );

        Ok(Self {
            config,
            sine,
            gradient,
        })
    }

    /// Configuration the tables were built from.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The quantized sine table.
    pub fn sine(&self) -> &SineTable {
        &self.sine
    }

    /// The scaled gradient table.
    pub fn gradient(&self) -> &GradientTable {
        &self.gradient
    }
}
