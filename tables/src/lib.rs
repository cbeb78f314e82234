//! Lookup tables for a Direct Digital Synthesizer with linear interpolation.
//!
//! The hardware reads a quantized sine sample and a pre-scaled gradient from
//! two ROMs, both addressed by the top bits of a phase accumulator, and adds
//! `fraction × gradient` to the sample. This crate builds those two tables and
//! models the interpolator bit for bit, so the numeric error budget can be
//! checked before synthesis.
//!
//! # Entry Point
//!
//! ```
//! use dds_tables::{DdsTables, InterpolationModel, TableConfig};
//!
//! let tables = DdsTables::build(TableConfig::generator()).unwrap();
//! assert_eq!(tables.sine().len(), 1024);
//! assert_eq!(tables.gradient().len(), 1024);
//!
//! let model = InterpolationModel::new(&tables);
//! let sample = model.evaluate(0x4000_0000); // a quarter cycle
//! assert_eq!(sample.table_address, 256);
//! assert_eq!(sample.value, 65534);
//! ```
//!
//! # Validation
//!
//! ```
//! use dds_tables::{DdsTables, PhaseSweep, TableConfig};
//!
//! let tables = DdsTables::build(TableConfig::simulation()).unwrap();
//! let summary = PhaseSweep::new(&tables, 1 << 12).summarize();
//! assert!(summary.interp_max_error < summary.raw_max_error);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod display;
pub mod error;
pub mod interp;
pub mod quantize;
pub mod sweep;
pub mod table;

pub use config::TableConfig;
pub use error::ConfigError;
pub use interp::{InterpolatedSample, InterpolationModel, PhaseSplit};
pub use sweep::{ErrorSummary, PhaseSweep, SweepRecord};
pub use table::{build_gradient_table, build_sine_table, DdsTables, GradientTable, SineTable};
