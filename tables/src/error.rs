//! Error types for table configuration.

use thiserror::Error;

/// Errors detected while validating a [`TableConfig`](crate::TableConfig).
///
/// Every variant is fatal: the tables cannot be built from a configuration
/// that fails validation, and rebuilding from the same input fails the same
/// way.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The table needs at least two entries to interpolate between.
    #[error("Table length must be at least 2, got {0}")]
    TableTooShort(usize),

    /// Address width is only defined for power-of-two table lengths.
    #[error("Table length must be a power of two, got {0}")]
    NotPowerOfTwo(usize),

    /// The phase accumulator cannot address every table entry.
    #[error("Address width {address_width} exceeds phase width {phase_width}")]
    AddressWiderThanPhase {
        /// log2 of the table length
        address_width: u32,
        /// Width of the phase accumulator
        phase_width: u32,
    },

    /// Phase accumulator is wider than the 64-bit model.
    #[error("Phase width must be at most 64 bits, got {0}")]
    PhaseWidthTooLarge(u32),

    /// Table entries must be between 2 and 32 bits wide.
    #[error("Data width must be between 2 and 32 bits, got {0}")]
    DataWidthOutOfRange(u32),

    /// Gradient shift larger than the model supports.
    #[error("Gradient shift must be at most 64 bits, got {0}")]
    GradientShiftTooLarge(u32),

    /// A scaled gradient does not fit a 64-bit signed integer.
    #[error("Gradient at address {address} overflows 64 bits (shift {gradient_shift})")]
    GradientOverflow {
        /// Table address of the offending entry
        address: usize,
        /// Configured gradient shift
        gradient_shift: u32,
    },

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
