//! Fixed-point quantization of DC-biased samples.

use crate::config::MAX_DATA_WIDTH;
use crate::error::ConfigError;

/// Reference level of a sample before quantization:
/// `(2^(dac_bits-1) - 1) * (1 + x)`.
///
/// This is the "ideal" amplitude the fixed-point model is compared against.
#[inline]
pub fn ideal_level(x: f64, dac_bits: u32) -> f64 {
    half_scale(dac_bits) as f64 * (1.0 + x)
}

/// Quantizes `x` in `[-1, 1]` to an unsigned `dac_bits`-bit code.
///
/// Computes `floor((2^(dac_bits-1) - 1) * (1 + x))`. The result lies in
/// `[0, 2 * (2^(dac_bits-1) - 1)]`. Truncation matches the one-sided bias of
/// the hardware and must not be replaced by rounding.
///
/// ```
/// use dds_tables::quantize::quantize;
///
/// assert_eq!(quantize(0.0, 16).unwrap(), 32767);
/// assert_eq!(quantize(1.0, 16).unwrap(), 65534);
/// assert_eq!(quantize(-1.0, 16).unwrap(), 0);
/// assert!(quantize(0.5, 0).is_err());
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::DataWidthOutOfRange`] unless `dac_bits` is in
/// `2..=32`.
#[inline]
pub fn quantize(x: f64, dac_bits: u32) -> Result<u32, ConfigError> {
    if !(2..=MAX_DATA_WIDTH).contains(&dac_bits) {
        return Err(ConfigError::DataWidthOutOfRange(dac_bits));
    }
    Ok(floor_code(x, dac_bits))
}

/// [`quantize`] for a width already validated by `TableConfig`.
#[inline]
pub(crate) fn floor_code(x: f64, dac_bits: u32) -> u32 {
    // `as` saturates: a sample a hair below -1 lands on 0, not a wrapped code.
    ideal_level(x, dac_bits).floor() as u32
}

#[inline]
fn half_scale(dac_bits: u32) -> u64 {
    1u64.checked_shl(dac_bits.saturating_sub(1)).map_or(u64::MAX, |top| top - 1)
}
