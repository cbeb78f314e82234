//! Property-based tests for table construction and the interpolation model.
//!
//! Configurations are drawn from the ranges the hardware family actually
//! uses; every property is checked against a freshly built table pair.

use dds_tables::{DdsTables, InterpolationModel, PhaseSplit, TableConfig};
use proptest::prelude::*;

/// Valid configurations: 4..=4096 entries, phase wider than the address.
fn any_config() -> impl Strategy<Value = TableConfig> {
    (2u32..=12, 0u32..=20, 8u32..=24, 0u32..=40, 4u32..=24).prop_filter_map(
        "gradient shift overflow",
        |(address_width, extra, data_width, shift, interp)| {
            let config =
                TableConfig::new(1 << address_width, address_width + extra, data_width, shift, interp)
                    .ok()?;
            DdsTables::build(config).ok().map(|_| config)
        },
    )
}

// =============================================================================
// Table Shape
// =============================================================================

proptest! {
    /// Both tables have exactly table_length entries.
    #[test]
    fn prop_table_lengths(config in any_config()) {
        let tables = DdsTables::build(config).unwrap();
        prop_assert_eq!(tables.sine().len(), config.table_length());
        prop_assert_eq!(tables.gradient().len(), config.table_length());
    }

    /// Every sine entry is a valid unsigned data_width-bit code.
    #[test]
    fn prop_sine_in_range(config in any_config()) {
        let tables = DdsTables::build(config).unwrap();
        for &v in tables.sine().values() {
            prop_assert!(u64::from(v) <= config.max_code());
        }
    }

    /// The last gradient is taken towards the first sine entry.
    #[test]
    fn prop_last_gradient_wraps(config in any_config()) {
        let tables = DdsTables::build(config).unwrap();
        let last = config.table_length() - 1;
        let delta = i128::from(tables.sine()[0]) - i128::from(tables.sine()[last]);
        let l = config.lower_addr_bits();
        let s = config.gradient_shift();
        let expected = if s >= l { delta << (s - l) } else { delta >> (l - s) };
        prop_assert_eq!(i128::from(tables.gradient()[last]), expected);
    }

    /// Building is a pure function of the config.
    #[test]
    fn prop_build_is_idempotent(config in any_config()) {
        prop_assert_eq!(DdsTables::build(config).unwrap(), DdsTables::build(config).unwrap());
    }
}

// =============================================================================
// Phase Decomposition
// =============================================================================

proptest! {
    /// The table address is the phase's top bits and is always in range.
    #[test]
    fn prop_address_is_top_bits(config in any_config(), raw in any::<u64>()) {
        let phase = raw & config.phase_mask();
        let split = PhaseSplit::new(&config, phase);
        prop_assert_eq!(split.table_address as u64, phase >> config.lower_addr_bits());
        prop_assert!(split.table_address < config.table_length());
        let rebuilt = ((split.table_address as u64) << config.lower_addr_bits()) | split.lower_phase_address;
        prop_assert_eq!(rebuilt, phase);
    }

    /// Phases beyond the accumulator width wrap instead of escaping the table.
    #[test]
    fn prop_out_of_range_phase_wraps(config in any_config(), raw in any::<u64>()) {
        let tables = DdsTables::build(config).unwrap();
        let model = InterpolationModel::new(&tables);
        let sample = model.evaluate(raw);
        prop_assert!(sample.table_address < config.table_length());
        prop_assert_eq!(sample, model.evaluate(raw & config.phase_mask()));
    }
}

// =============================================================================
// Interpolation Arithmetic
// =============================================================================

proptest! {
    /// No fractional phase means no interpolation term.
    #[test]
    fn prop_zero_fraction_zero_term(config in any_config(), address in any::<usize>()) {
        let tables = DdsTables::build(config).unwrap();
        let model = InterpolationModel::new(&tables);
        let address = address % config.table_length();
        let sample = model.evaluate((address as u64) << config.lower_addr_bits());
        prop_assert_eq!(sample.interp_term, 0);
        prop_assert_eq!(sample.value, i64::from(tables.sine()[address]));
    }

    /// One truncation quantum more fractional phase moves the term in the
    /// gradient's direction, never against it.
    #[test]
    fn prop_truncation_monotonic(config in any_config(), raw in any::<u64>()) {
        let tables = DdsTables::build(config).unwrap();
        let model = InterpolationModel::new(&tables);
        let quantum = 1u64 << config.truncation();
        let phase = raw & config.phase_mask();
        let split = PhaseSplit::new(&config, phase);
        prop_assume!(split.lower_phase_address + quantum <= config.lower_addr_mask());

        let a = model.evaluate(phase);
        let b = model.evaluate(phase + quantum);
        prop_assert_eq!(a.table_address, b.table_address);
        if a.gradient >= 0 {
            prop_assert!(b.interp_term >= a.interp_term);
        } else {
            prop_assert!(b.interp_term <= a.interp_term);
        }
    }
}

// =============================================================================
// Hand-Computed Vectors
// =============================================================================

/// Four entries, 4-bit phase: 2 fractional bits, no truncation, gradients
/// are the raw deltas because `gradient_shift == lower_addr_bits`.
#[test]
fn four_entry_vectors() {
    let tables = DdsTables::build(TableConfig::new(4, 4, 16, 2, 16).unwrap()).unwrap();
    let model = InterpolationModel::new(&tables);
    // (phase, interp_term, value); sine = [32767, 65534, 32767, 0].
    let vectors = [
        (0b00_01, 8191, 40958),   // floor(1 * 32767 / 4)
        (0b00_10, 16383, 49150),  // floor(2 * 32767 / 4)
        (0b00_11, 24575, 57342),  // floor(3 * 32767 / 4)
        (0b10_11, -24576, 8191),  // floor(3 * -32767 / 4) = floor(-24575.25)
        (0b11_10, 16383, 16383),  // climbing back towards sine[0]
    ];
    for (phase, term, value) in vectors {
        let sample = model.evaluate(phase);
        assert_eq!(sample.interp_term, term, "phase {phase:#06b}");
        assert_eq!(sample.value, value, "phase {phase:#06b}");
    }
}

/// Deployed configuration, half way between addresses 0 and 1.
#[test]
fn generator_midpoint_vector() {
    let tables = DdsTables::build(TableConfig::generator()).unwrap();
    // sine[1] = floor(32767 * (1 + sin(2π/1024))) = 32968, delta 201,
    // gradient = 201 << (29 - 22) = 25728.
    assert_eq!(tables.sine()[1], 32968);
    assert_eq!(tables.gradient()[0], 25728);

    // Fraction 2^21 truncates to 2^15; (2^15 * 25728 << 6) >> 29 = 100.5.
    let sample = InterpolationModel::new(&tables).evaluate(1 << 21);
    assert_eq!(sample.truncated_lower_phase, 1 << 15);
    assert_eq!(sample.interp_term, 100);
    assert_eq!(sample.value, 32867);
}
