//! Phase sweeps: validation records and error statistics.
//!
//! A sweep evaluates the interpolation model at evenly spaced phases and pairs
//! each output with the ideal (floating point) sine level. The records are
//! written as the comma separated validation file consumed by the plotting
//! and spectral analysis tools; [`ErrorSummary`] condenses them into the
//! numbers the error budget is judged on.

use std::f64::consts::TAU;
use std::io::{self, Write};

use serde::Serialize;
use tracing::debug;

use crate::interp::{InterpolatedSample, InterpolationModel};
use crate::quantize::ideal_level;
use crate::table::DdsTables;
use crate::TableConfig;

/// One row of the validation output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRecord {
    /// Reference amplitude at this phase, before quantization.
    pub ideal: f64,
    /// Simulated interpolator output.
    pub sample: InterpolatedSample,
}

impl SweepRecord {
    /// Writes the record as `phase, ideal, interpolated, raw, gradient, interp`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let s = &self.sample;
        writeln!(
            out,
            "{}, {:?}, {}, {}, {}, {}",
            s.phase, self.ideal, s.value, s.table_value, s.gradient, s.interp_term
        )
    }
}

/// Reference amplitude for `phase` in a `phase_width`-bit accumulator.
pub fn ideal_amplitude(config: &TableConfig, phase: u64) -> f64 {
    let cycle = (config.phase_width() as f64).exp2();
    ideal_level((TAU * phase as f64 / cycle).sin(), config.data_width())
}

/// Iterator over phases `0, step, 2·step, …` below `2^phase_width`.
#[derive(Debug, Clone)]
pub struct PhaseSweep<'a> {
    model: InterpolationModel<'a>,
    step: u64,
    next: Option<u64>,
}

impl<'a> PhaseSweep<'a> {
    /// Creates a sweep over `tables`. A `step` of 0 is treated as 1.
    pub fn new(tables: &'a DdsTables, step: u64) -> Self {
        Self {
            model: InterpolationModel::new(tables),
            step: step.max(1),
            next: Some(0),
        }
    }

    /// Number of records the sweep yields in total.
    pub fn total(&self) -> u64 {
        let span = u128::from(self.model.tables().config().phase_mask()) + 1;
        span.div_ceil(u128::from(self.step))
            .try_into()
            .unwrap_or(u64::MAX)
    }

    /// Writes every remaining record to `out` and returns their statistics.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_csv<W: Write>(self, out: &mut W) -> io::Result<ErrorSummary> {
        let mut summary = ErrorSummary::new(self.model.tables().config());
        for record in self {
            record.write_to(out)?;
            summary.record(&record);
        }
        out.flush()?;
        debug!(samples = summary.samples, "sweep written");
        Ok(summary)
    }

    /// Consumes the sweep, returning statistics only.
    pub fn summarize(self) -> ErrorSummary {
        let mut summary = ErrorSummary::new(self.model.tables().config());
        for record in self {
            summary.record(&record);
        }
        summary
    }
}

impl Iterator for PhaseSweep<'_> {
    type Item = SweepRecord;

    fn next(&mut self) -> Option<SweepRecord> {
        let phase = self.next?;
        let config = self.model.tables().config();
        self.next = phase
            .checked_add(self.step)
            .filter(|&p| p <= config.phase_mask());

        Some(SweepRecord {
            ideal: ideal_amplitude(config, phase),
            sample: self.model.evaluate(phase),
        })
    }
}

/// Aggregate error statistics of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    /// Number of records summarized.
    pub samples: u64,
    /// Largest |raw table value − ideal|.
    pub raw_max_error: f64,
    /// Largest |interpolated value − ideal|.
    pub interp_max_error: f64,
    /// Root mean square of interpolated value − ideal.
    pub interp_rms_error: f64,
    /// Interpolated values outside `[0, 2^data_width − 1]`.
    pub overflow_count: u64,
    /// Full-scale output level the dBFS figures are relative to.
    pub full_scale: f64,
    #[serde(skip)]
    data_width: u32,
    #[serde(skip)]
    sum_squares: f64,
}

impl ErrorSummary {
    /// An empty summary for tables built from `config`.
    pub fn new(config: &TableConfig) -> Self {
        Self {
            samples: 0,
            raw_max_error: 0.0,
            interp_max_error: 0.0,
            interp_rms_error: 0.0,
            overflow_count: 0,
            full_scale: 2.0 * config.half_scale() as f64,
            data_width: config.data_width(),
            sum_squares: 0.0,
        }
    }

    /// Folds one record into the statistics.
    pub fn record(&mut self, record: &SweepRecord) {
        let s = &record.sample;
        let raw_error = (f64::from(s.table_value) - record.ideal).abs();
        let interp_error = s.value as f64 - record.ideal;

        self.samples += 1;
        self.raw_max_error = self.raw_max_error.max(raw_error);
        self.interp_max_error = self.interp_max_error.max(interp_error.abs());
        self.sum_squares += interp_error * interp_error;
        self.interp_rms_error = (self.sum_squares / self.samples as f64).sqrt();
        if !s.fits(self.data_width) {
            self.overflow_count += 1;
        }
    }

    /// Raw table maximum error in dBFS.
    pub fn raw_max_error_dbfs(&self) -> f64 {
        to_dbfs(self.raw_max_error, self.full_scale)
    }

    /// Interpolated maximum error in dBFS.
    pub fn interp_max_error_dbfs(&self) -> f64 {
        to_dbfs(self.interp_max_error, self.full_scale)
    }

    /// Interpolated RMS error in dBFS.
    pub fn interp_rms_error_dbfs(&self) -> f64 {
        to_dbfs(self.interp_rms_error, self.full_scale)
    }
}

fn to_dbfs(error: f64, full_scale: f64) -> f64 {
    20.0 * (error / full_scale).log10()
}
