//! Bit-exact model of the hardware linear interpolator.
//!
//! Every stage below mirrors a stage of the FPGA datapath, and the order is
//! fixed: split the phase, drop the low fractional bits, multiply by the
//! gradient, rescale, shift out the gradient precision, add the table sample.
//! Only integer arithmetic is used; intermediates are 128 bits wide so no
//! accepted configuration can overflow them.

use crate::config::TableConfig;
use crate::table::DdsTables;

/// A phase value split into table address and fractional phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSplit {
    /// High `address_width` bits of the phase.
    pub table_address: usize,
    /// Low `lower_addr_bits` bits of the phase.
    pub lower_phase_address: u64,
}

impl PhaseSplit {
    /// Splits `phase`, first wrapping it to `phase_width` bits.
    pub fn new(config: &TableConfig, phase: u64) -> Self {
        let phase = phase & config.phase_mask();
        let lower_bits = config.lower_addr_bits();
        // lower_bits < 64 because the table has at least two entries.
        Self {
            table_address: (phase >> lower_bits) as usize,
            lower_phase_address: phase & config.lower_addr_mask(),
        }
    }
}

/// One simulated interpolator output with all of its intermediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolatedSample {
    /// Phase the sample was computed for, wrapped to `phase_width` bits.
    pub phase: u64,
    /// Table address selected by the phase.
    pub table_address: usize,
    /// Full fractional phase.
    pub lower_phase_address: u64,
    /// Fractional phase after dropping `truncation` low bits.
    pub truncated_lower_phase: u64,
    /// Raw (non-interpolated) sine table entry.
    pub table_value: u32,
    /// Gradient table entry used for the multiply.
    pub gradient: i64,
    /// Interpolation term added to the table entry.
    pub interp_term: i64,
    /// `table_value + interp_term`, unclamped.
    pub value: i64,
}

impl InterpolatedSample {
    /// True if the value is representable as an unsigned `data_width`-bit
    /// code.
    pub fn fits(&self, data_width: u32) -> bool {
        let max = if data_width >= 63 {
            i64::MAX
        } else {
            (1i64 << data_width) - 1
        };
        (0..=max).contains(&self.value)
    }
}

/// Evaluates the interpolator against a pair of built tables.
///
/// ```
/// use dds_tables::{DdsTables, InterpolationModel, TableConfig};
///
/// let tables = DdsTables::build(TableConfig::generator()).unwrap();
/// let model = InterpolationModel::new(&tables);
///
/// // Exactly on a table address there is no fractional phase.
/// let sample = model.evaluate(5 << 22);
/// assert_eq!(sample.table_address, 5);
/// assert_eq!(sample.interp_term, 0);
/// assert_eq!(sample.value, i64::from(tables.sine()[5]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InterpolationModel<'a> {
    tables: &'a DdsTables,
}

impl<'a> InterpolationModel<'a> {
    /// Creates a model over `tables`.
    pub fn new(tables: &'a DdsTables) -> Self {
        Self { tables }
    }

    /// The tables this model reads.
    pub fn tables(&self) -> &'a DdsTables {
        self.tables
    }

    /// Computes the interpolated output for one phase value.
    pub fn evaluate(&self, phase: u64) -> InterpolatedSample {
        let config = self.tables.config();

        // Stage 1: address / fractional phase.
        let split = PhaseSplit::new(config, phase);

        // Stage 2: keep only the top max_interp_bits of the fractional phase.
        let truncation = config.truncation();
        let truncated_lower_phase = split.lower_phase_address >> truncation;

        // Stage 3: multiply, restore the dropped scale, then shift out the
        // gradient precision. Arithmetic shift floors negative products.
        let gradient = self.tables.gradient()[split.table_address];
        let product = (i128::from(truncated_lower_phase) * i128::from(gradient)) << truncation;
        let interp_term = narrow(product >> config.gradient_shift());

        // Stage 4: add to the table sample. Codes outside the data width are
        // kept as-is.
        let table_value = self.tables.sine()[split.table_address];
        let value = i64::from(table_value).saturating_add(interp_term);

        InterpolatedSample {
            phase: phase & config.phase_mask(),
            table_address: split.table_address,
            lower_phase_address: split.lower_phase_address,
            truncated_lower_phase,
            table_value,
            gradient,
            interp_term,
            value,
        }
    }

    /// Raw table output for `phase`, without interpolation.
    pub fn table_value(&self, phase: u64) -> u32 {
        let split = PhaseSplit::new(self.tables.config(), phase);
        self.tables.sine()[split.table_address]
    }
}

/// Narrows a 128-bit intermediate to 64 bits.
///
/// The interpolation term of a table built by [`DdsTables::build`] is bounded
/// by one table step plus one fractional-phase quantum, so this only clamps
/// for degenerate shift combinations.
fn narrow(x: i128) -> i64 {
    x.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
