//! Table configuration and derived bit widths.
//!
//! A [`TableConfig`] is validated once, at construction, and is immutable
//! afterwards. Every component receives the same config value instead of
//! reading global constants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Widest phase accumulator the model supports.
pub const MAX_PHASE_WIDTH: u32 = 64;

/// Widest table entry the model supports.
pub const MAX_DATA_WIDTH: u32 = 32;

/// Largest gradient shift the model supports.
pub const MAX_GRADIENT_SHIFT: u32 = 64;

/// Validated parameters of a DDS lookup table pair.
///
/// ```
/// use dds_tables::TableConfig;
///
/// let config = TableConfig::new(1024, 32, 16, 29, 16).unwrap();
/// assert_eq!(config.address_width(), 10);
/// assert_eq!(config.lower_addr_bits(), 22);
/// assert_eq!(config.truncation(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTableConfig")]
pub struct TableConfig {
    table_length: usize,
    phase_width: u32,
    data_width: u32,
    gradient_shift: u32,
    max_interp_bits: u32,
}

/// Unvalidated field set, used as the serde intermediate.
#[derive(Deserialize)]
struct RawTableConfig {
    table_length: usize,
    phase_width: u32,
    data_width: u32,
    gradient_shift: u32,
    max_interp_bits: u32,
}

impl TryFrom<RawTableConfig> for TableConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTableConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.table_length,
            raw.phase_width,
            raw.data_width,
            raw.gradient_shift,
            raw.max_interp_bits,
        )
    }
}

impl TableConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the table length is not a power of two of
    /// at least 2, if the phase accumulator is too narrow to address the
    /// table, or if any width is outside the supported range.
    pub fn new(
        table_length: usize,
        phase_width: u32,
        data_width: u32,
        gradient_shift: u32,
        max_interp_bits: u32,
    ) -> Result<Self, ConfigError> {
        if table_length < 2 {
            return Err(ConfigError::TableTooShort(table_length));
        }
        if !table_length.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(table_length));
        }
        if phase_width > MAX_PHASE_WIDTH {
            return Err(ConfigError::PhaseWidthTooLarge(phase_width));
        }
        let address_width = table_length.trailing_zeros();
        if address_width > phase_width {
            return Err(ConfigError::AddressWiderThanPhase {
                address_width,
                phase_width,
            });
        }
        if !(2..=MAX_DATA_WIDTH).contains(&data_width) {
            return Err(ConfigError::DataWidthOutOfRange(data_width));
        }
        if gradient_shift > MAX_GRADIENT_SHIFT {
            return Err(ConfigError::GradientShiftTooLarge(gradient_shift));
        }

        Ok(Self {
            table_length,
            phase_width,
            data_width,
            gradient_shift,
            max_interp_bits,
        })
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the validation
    /// error for out-of-range parameters.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Configuration of the deployed hardware: 1024 entries, 32-bit
    /// accumulator, 16-bit data, gradients scaled by 2^29, 16 interpolation
    /// bits.
    #[must_use]
    pub const fn generator() -> Self {
        Self {
            table_length: 1024,
            phase_width: 32,
            data_width: 16,
            gradient_shift: 29,
            max_interp_bits: 16,
        }
    }

    /// Same tables as [`generator`](Self::generator), with the accumulator's
    /// 6 lowest bits dropped so an exhaustive sweep stays tractable.
    #[must_use]
    pub const fn simulation() -> Self {
        Self {
            phase_width: 26,
            ..Self::generator()
        }
    }

    /// Returns a copy with a different phase width, revalidated.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the new width cannot address the table.
    pub fn with_phase_width(&self, phase_width: u32) -> Result<Self, ConfigError> {
        Self::new(
            self.table_length,
            phase_width,
            self.data_width,
            self.gradient_shift,
            self.max_interp_bits,
        )
    }

    /// Number of table entries.
    pub const fn table_length(&self) -> usize {
        self.table_length
    }

    /// Width of the phase accumulator in bits.
    pub const fn phase_width(&self) -> u32 {
        self.phase_width
    }

    /// Width of one table entry in bits.
    pub const fn data_width(&self) -> u32 {
        self.data_width
    }

    /// Extra bits of precision carried by each gradient.
    pub const fn gradient_shift(&self) -> u32 {
        self.gradient_shift
    }

    /// Cap on the fractional-phase bits used by the multiplier.
    pub const fn max_interp_bits(&self) -> u32 {
        self.max_interp_bits
    }

    /// `log2(table_length)`.
    pub const fn address_width(&self) -> u32 {
        self.table_length.trailing_zeros()
    }

    /// Bits of the phase below the table address (fractional phase).
    pub const fn lower_addr_bits(&self) -> u32 {
        self.phase_width - self.address_width()
    }

    /// Mask selecting the fractional phase.
    pub const fn lower_addr_mask(&self) -> u64 {
        low_mask(self.lower_addr_bits())
    }

    /// Fractional-phase bits dropped before the multiply.
    pub const fn truncation(&self) -> u32 {
        self.lower_addr_bits().saturating_sub(self.max_interp_bits)
    }

    /// Mask selecting a full-width phase value.
    pub const fn phase_mask(&self) -> u64 {
        low_mask(self.phase_width)
    }

    /// Largest value an unsigned `data_width`-bit entry can hold.
    pub const fn max_code(&self) -> u64 {
        low_mask(self.data_width)
    }

    /// Offset of the DC-biased sine: `2^(data_width - 1) - 1`.
    pub const fn half_scale(&self) -> u64 {
        (1u64 << (self.data_width - 1)) - 1
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::generator()
    }
}

/// All-ones mask of `bits` width, saturating at 64 bits.
const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for config in [TableConfig::generator(), TableConfig::simulation()] {
            let rebuilt = TableConfig::new(
                config.table_length(),
                config.phase_width(),
                config.data_width(),
                config.gradient_shift(),
                config.max_interp_bits(),
            );
            assert_eq!(rebuilt.ok(), Some(config));
        }
    }

    #[test]
    fn derived_widths() {
        let config = TableConfig::simulation();
        assert_eq!(config.address_width(), 10);
        assert_eq!(config.lower_addr_bits(), 16);
        assert_eq!(config.lower_addr_mask(), 0xFFFF);
        assert_eq!(config.truncation(), 0);
        assert_eq!(config.phase_mask(), (1 << 26) - 1);
        assert_eq!(config.max_code(), 0xFFFF);
        assert_eq!(config.half_scale(), 32767);
    }

    #[test]
    fn rejects_short_table() {
        assert!(matches!(
            TableConfig::new(1, 32, 16, 29, 16),
            Err(ConfigError::TableTooShort(1))
        ));
        assert!(matches!(
            TableConfig::new(0, 32, 16, 29, 16),
            Err(ConfigError::TableTooShort(0))
        ));
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(matches!(
            TableConfig::new(1000, 32, 16, 29, 16),
            Err(ConfigError::NotPowerOfTwo(1000))
        ));
    }

    #[test]
    fn rejects_narrow_accumulator() {
        assert!(matches!(
            TableConfig::new(1024, 8, 16, 29, 16),
            Err(ConfigError::AddressWiderThanPhase {
                address_width: 10,
                phase_width: 8
            })
        ));
        // Equal widths leave no fractional phase but are still addressable.
        assert!(TableConfig::new(1024, 10, 16, 29, 16).is_ok());
    }

    #[test]
    fn rejects_widths_out_of_range() {
        assert!(matches!(
            TableConfig::new(1024, 65, 16, 29, 16),
            Err(ConfigError::PhaseWidthTooLarge(65))
        ));
        assert!(matches!(
            TableConfig::new(1024, 32, 1, 29, 16),
            Err(ConfigError::DataWidthOutOfRange(1))
        ));
        assert!(matches!(
            TableConfig::new(1024, 32, 33, 29, 16),
            Err(ConfigError::DataWidthOutOfRange(33))
        ));
        assert!(matches!(
            TableConfig::new(1024, 32, 16, 65, 16),
            Err(ConfigError::GradientShiftTooLarge(65))
        ));
    }

    #[test]
    fn phase_width_override_revalidates() {
        let wide = TableConfig::generator().with_phase_width(48).unwrap();
        assert_eq!(wide.lower_addr_bits(), 38);
        assert_eq!(wide.truncation(), 22);
        assert_eq!(wide.table_length(), 1024);
        assert!(matches!(
            TableConfig::generator().with_phase_width(8),
            Err(ConfigError::AddressWiderThanPhase {
                address_width: 10,
                phase_width: 8
            })
        ));
    }

    #[test]
    fn full_width_accumulator_masks() {
        let config = TableConfig::new(1024, 64, 16, 29, 16).unwrap();
        assert_eq!(config.phase_mask(), u64::MAX);
        assert_eq!(config.lower_addr_mask(), (1 << 54) - 1);
        assert_eq!(config.truncation(), 38);
    }

    #[test]
    fn json_round_trip_validates() {
        let config = TableConfig::from_json(
            r#"{"table_length":256,"phase_width":24,"data_width":12,"gradient_shift":20,"max_interp_bits":12}"#,
        )
        .unwrap();
        assert_eq!(config.table_length(), 256);
        assert_eq!(config.lower_addr_bits(), 16);

        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(TableConfig::from_json(&text).unwrap(), config);

        let err = TableConfig::from_json(
            r#"{"table_length":300,"phase_width":24,"data_width":12,"gradient_shift":20,"max_interp_bits":12}"#,
        );
        assert!(err.is_err());
    }
}
