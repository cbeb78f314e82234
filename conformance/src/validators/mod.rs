//! Validators for the table pair, the interpolation model and the generated
//! ROMs.

pub mod interpolation;
pub mod rom;
pub mod tables;
