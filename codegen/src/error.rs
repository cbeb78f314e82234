//! Error types for ROM generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::rom::DataType;

/// Errors raised while describing or writing a ROM.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A ROM needs at least one entry for its address width to exist.
    #[error("Lookup table is empty")]
    EmptyTable,

    /// Entity name is not a VHDL basic identifier.
    #[error("Invalid VHDL entity name: {0:?}")]
    InvalidEntityName(String),

    /// Data width cannot hold any value or exceeds the model.
    #[error("Data width must be between 1 and 64 bits, got {0}")]
    DataBitsOutOfRange(u32),

    /// Unsigned ROMs cannot hold a negative fallback value.
    #[error("Default value {0} is negative for an unsigned ROM")]
    NegativeDefault(i64),

    /// A table entry does not fit the declared ROM word.
    #[error("Value {value} at address {address} does not fit a {data_bits}-bit {data_type} word")]
    ValueOutOfRange {
        /// Offending address
        address: usize,
        /// Offending entry
        value: i64,
        /// Declared word width
        data_bits: u32,
        /// Declared signedness
        data_type: DataType,
    },

    /// Output could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Destination that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// Create an Io error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
