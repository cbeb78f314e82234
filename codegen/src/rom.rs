//! Synchronous ROM description: one lookup table rendered as a VHDL entity.
//!
//! The generated entity has two processes:
//!
//! - `ROM_PROC` decodes the registered address with a `case` statement on
//!   every rising edge of `CLK`, one `when` arm per table entry and a
//!   `when others` fallback to the default value.
//! - `DATA_PROC` registers `ADDR_IN` and drives `DATA_OUT` from the decoded
//!   word. `RST` clears both registers.
//!
//! An address presented on `ADDR_IN` in cycle N is visible on `DATA_OUT` in
//! cycle N + [`READ_LATENCY_CYCLES`].

use std::fmt;

use dds_tables::table::signed_range;

use crate::emit::VhdlFile;
use crate::error::GenerateError;

/// Clock cycles from `ADDR_IN` to `DATA_OUT`.
pub const READ_LATENCY_CYCLES: u32 = 2;

/// Signedness of the stored words; selects the `numeric_std` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    /// `unsigned` words, converted with `to_unsigned`.
    #[default]
    Unsigned,
    /// `signed` words, converted with `to_signed`.
    Signed,
}

impl DataType {
    /// The `numeric_std` type name.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Unsigned => "unsigned",
            DataType::Signed => "signed",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering options with the usual 16-bit unsigned defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomOptions {
    /// Width of `DATA_OUT`.
    pub data_bits: u32,
    /// Signedness of the stored words.
    pub data_type: DataType,
    /// Value produced for addresses not in the table.
    pub default_value: i64,
    /// File name shown in the header; `<entity>.vhd` when absent.
    pub file_name: Option<String>,
}

impl Default for RomOptions {
    fn default() -> Self {
        Self {
            data_bits: 16,
            data_type: DataType::Unsigned,
            default_value: 0,
            file_name: None,
        }
    }
}

/// A validated lookup table ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomDescription {
    entity_name: String,
    file_name: String,
    values: Vec<i64>,
    address_bits: u32,
    data_bits: u32,
    data_type: DataType,
    default_value: i64,
}

impl RomDescription {
    /// Describes a ROM holding `values` at addresses `0..values.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::EmptyTable`] for an empty table,
    /// [`GenerateError::InvalidEntityName`] if `entity_name` is not a VHDL
    /// identifier, [`GenerateError::DataBitsOutOfRange`] for a data width
    /// outside `1..=64`, [`GenerateError::NegativeDefault`] for an unsigned
    /// ROM with a negative default, and [`GenerateError::ValueOutOfRange`]
    /// for an entry the declared word cannot hold.
    pub fn new(
        entity_name: &str,
        values: Vec<i64>,
        options: RomOptions,
    ) -> Result<Self, GenerateError> {
        if values.is_empty() {
            return Err(GenerateError::EmptyTable);
        }
        if !is_vhdl_identifier(entity_name) {
            return Err(GenerateError::InvalidEntityName(entity_name.to_string()));
        }
        if !(1..=64).contains(&options.data_bits) {
            return Err(GenerateError::DataBitsOutOfRange(options.data_bits));
        }
        if options.data_type == DataType::Unsigned && options.default_value < 0 {
            return Err(GenerateError::NegativeDefault(options.default_value));
        }
        let (min, max) = word_range(options.data_type, options.data_bits);
        if let Some((address, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(min..=max).contains(*v))
        {
            return Err(GenerateError::ValueOutOfRange {
                address,
                value,
                data_bits: options.data_bits,
                data_type: options.data_type,
            });
        }

        Ok(Self {
            entity_name: entity_name.to_string(),
            file_name: options
                .file_name
                .unwrap_or_else(|| format!("{entity_name}.vhd")),
            address_bits: address_bits(values.len()),
            values,
            data_bits: options.data_bits,
            data_type: options.data_type,
            default_value: options.default_value,
        })
    }

    /// Entity name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// File name the ROM is written to.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Stored words in address order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of table entries.
    pub fn table_length(&self) -> usize {
        self.values.len()
    }

    /// Width of `ADDR_IN`.
    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    /// Width of `DATA_OUT`.
    pub fn data_bits(&self) -> u32 {
        self.data_bits
    }

    /// Signedness of the stored words.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Value for addresses outside the table.
    pub fn default_value(&self) -> i64 {
        self.default_value
    }

    /// Renders the complete VHDL source.
    pub fn render(&self) -> String {
        let name = &self.entity_name;
        let addr_hi = self.address_bits - 1;
        let data_hi = self.data_bits - 1;
        let ty = self.data_type;

        let mut f = VhdlFile::new(&[
            format!("File: {}", self.file_name),
            String::new(),
            "Autogenerated by dds-codegen".to_string(),
            String::new(),
            format!("Lookup table length: {}", self.values.len()),
            format!("Number of address bits: {}", self.address_bits),
            format!("Number of data bits: {}", self.data_bits),
        ]);

        f.line("library ieee;");
        f.line("use ieee.std_logic_1164.all;");
        f.line("use ieee.numeric_std.all;");
        f.blank();
        f.line(&format!("entity {name} is"));
        f.line("port");
        f.line("(");
        f.line("CLK      : in  std_logic;");
        f.line("RST      : in  std_logic;");
        f.line(&format!(
            "ADDR_IN  : in  std_logic_vector({addr_hi} downto 0);"
        ));
        f.line(&format!(
            "DATA_OUT : out std_logic_vector({data_hi} downto 0)"
        ));
        f.line(");");
        f.line(&format!("end entity {name};"));
        f.blank();
        f.line(&format!("architecture RTL of {name} is"));
        f.blank();
        f.line(&format!(
            "signal ADDR : std_logic_vector({addr_hi} downto 0) := (others => '0');"
        ));
        f.line(&format!(
            "signal DATA : {ty}({data_hi} downto 0) := (others => '0');"
        ));
        f.blank();
        f.comment("tell the synthesis engine to use BRAM for inferred ROMs");
        f.line("attribute syn_romstyle : string;");
        f.line("attribute syn_romstyle of RTL : architecture is \"block_rom\";");
        f.blank();
        f.line("begin");
        f.blank();

        f.section("PROCESS TO READ FROM INFERRED ROM");
        f.line("ROM_PROC : process(CLK) is");
        f.line("begin");
        f.blank();
        f.line("if rising_edge(CLK) then");
        f.line("case ADDR is");
        for (address, value) in self.values.iter().enumerate() {
            f.line(&format!(
                "\twhen \"{}\" => DATA <= to_{ty}({value}, {});",
                address_pattern(address, self.address_bits),
                self.data_bits
            ));
        }
        f.line(&format!(
            "when others  => DATA <= to_{ty}({}, {});",
            self.default_value, self.data_bits
        ));
        f.line("end case;");
        f.line("end if;");
        f.line("end process;");
        f.blank();

        f.section("PROCESS TO REGISTER ADDRESS INPUT AND DATA OUTPUT ON CLOCK EDGE");
        f.line("DATA_PROC : process(RST, CLK) is");
        f.line("begin");
        f.blank();
        f.line("if RST='1' then");
        f.line("    DATA_OUT <= (others => '0');");
        f.line("    ADDR <= (others => '0');");
        f.line("elsif rising_edge(CLK) then");
        f.line("    DATA_OUT <= std_logic_vector(DATA);");
        f.line("    ADDR <= ADDR_IN;");
        f.line("end if;");
        f.blank();
        f.line("end process;");
        f.line("end architecture RTL;");

        f.finish()
    }
}

/// Inclusive range of a `bits`-wide word of the given signedness.
pub fn word_range(data_type: DataType, bits: u32) -> (i64, i64) {
    match data_type {
        DataType::Signed => signed_range(bits),
        DataType::Unsigned if bits >= 63 => (0, i64::MAX),
        DataType::Unsigned => (0, (1i64 << bits) - 1),
    }
}

/// `ceil(log2(length))`, at least 1 so a single-entry ROM still has a port.
pub fn address_bits(length: usize) -> u32 {
    if length <= 2 {
        1
    } else {
        usize::BITS - (length - 1).leading_zeros()
    }
}

/// Zero-padded binary literal of `address`, exactly `bits` characters wide.
pub fn address_pattern(address: usize, bits: u32) -> String {
    format!("{:0width$b}", address, width = bits as usize)
}

/// True for a VHDL basic identifier: a letter, then letters, digits and
/// single underscores, not ending in an underscore.
pub fn is_vhdl_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.contains("__")
        && !name.ends_with('_')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rom(values: Vec<i64>, options: RomOptions) -> RomDescription {
        RomDescription::new("TEST_ROM", values, options).unwrap()
    }

    #[test]
    fn address_width_is_ceil_log2() {
        assert_eq!(address_bits(1), 1);
        assert_eq!(address_bits(2), 1);
        assert_eq!(address_bits(3), 2);
        assert_eq!(address_bits(4), 2);
        assert_eq!(address_bits(5), 3);
        assert_eq!(address_bits(1024), 10);
        assert_eq!(address_bits(1025), 11);
    }

    #[test]
    fn patterns_are_fixed_width() {
        assert_eq!(address_pattern(0, 4), "0000");
        assert_eq!(address_pattern(5, 4), "0101");
        assert_eq!(address_pattern(1023, 10), "1111111111");
    }

    #[test]
    fn identifiers() {
        assert!(is_vhdl_identifier("SINE_ROM"));
        assert!(is_vhdl_identifier("rom2"));
        assert!(!is_vhdl_identifier(""));
        assert!(!is_vhdl_identifier("2ROM"));
        assert!(!is_vhdl_identifier("SINE__ROM"));
        assert!(!is_vhdl_identifier("ROM_"));
        assert!(!is_vhdl_identifier("SINE-ROM"));
    }

    #[test]
    fn rejects_invalid_descriptions() {
        assert!(matches!(
            RomDescription::new("R", vec![], RomOptions::default()),
            Err(GenerateError::EmptyTable)
        ));
        assert!(matches!(
            RomDescription::new("bad name", vec![1], RomOptions::default()),
            Err(GenerateError::InvalidEntityName(_))
        ));
        let zero_bits = RomOptions {
            data_bits: 0,
            ..RomOptions::default()
        };
        assert!(matches!(
            RomDescription::new("R", vec![1], zero_bits),
            Err(GenerateError::DataBitsOutOfRange(0))
        ));
        let negative = RomOptions {
            default_value: -1,
            ..RomOptions::default()
        };
        assert!(matches!(
            RomDescription::new("R", vec![1], negative),
            Err(GenerateError::NegativeDefault(-1))
        ));
    }

    #[test]
    fn word_ranges() {
        assert_eq!(word_range(DataType::Unsigned, 16), (0, 65535));
        assert_eq!(word_range(DataType::Signed, 16), (-32768, 32767));
        assert_eq!(word_range(DataType::Unsigned, 64), (0, i64::MAX));
        assert_eq!(word_range(DataType::Signed, 64), (i64::MIN, i64::MAX));
    }

    #[test]
    fn unsigned_entries_must_fit_the_word() {
        let negative = RomDescription::new("R", vec![-5, 10], RomOptions::default());
        assert!(matches!(
            negative,
            Err(GenerateError::ValueOutOfRange {
                address: 0,
                value: -5,
                ..
            })
        ));
        let wide = RomDescription::new("R", vec![0, 65535, 70000], RomOptions::default());
        assert!(matches!(
            wide,
            Err(GenerateError::ValueOutOfRange {
                address: 2,
                value: 70000,
                ..
            })
        ));
    }

    #[test]
    fn signed_entries_must_fit_the_word() {
        let options = RomOptions {
            data_type: DataType::Signed,
            ..RomOptions::default()
        };
        assert!(RomDescription::new("R", vec![-32768, 32767], options.clone()).is_ok());
        let err = RomDescription::new("R", vec![0, 32768], options.clone()).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::ValueOutOfRange {
                address: 1,
                value: 32768,
                ..
            }
        ));
        assert!(err.to_string().contains("16-bit signed"));
        assert!(matches!(
            RomDescription::new("R", vec![-32769], options),
            Err(GenerateError::ValueOutOfRange { address: 0, .. })
        ));
    }

    #[test]
    fn renders_entries_in_address_order() {
        let text = rom(vec![10, 20, 30, 40], RomOptions::default()).render();
        let entries: Vec<&str> = text.lines().filter(|l| l.starts_with("\twhen")).collect();
        assert_eq!(
            entries,
            vec![
                "\twhen \"00\" => DATA <= to_unsigned(10, 16);",
                "\twhen \"01\" => DATA <= to_unsigned(20, 16);",
                "\twhen \"10\" => DATA <= to_unsigned(30, 16);",
                "\twhen \"11\" => DATA <= to_unsigned(40, 16);",
            ]
        );
        assert!(text.contains("when others  => DATA <= to_unsigned(0, 16);"));
    }

    #[test]
    fn signed_rom_uses_signed_everywhere() {
        let options = RomOptions {
            data_type: DataType::Signed,
            default_value: -1,
            ..RomOptions::default()
        };
        let text = rom(vec![-5, 5], options).render();
        assert!(text.contains("signal DATA : signed(15 downto 0) := (others => '0');"));
        assert!(text.contains("\twhen \"0\" => DATA <= to_signed(-5, 16);"));
        assert!(text.contains("when others  => DATA <= to_signed(-1, 16);"));
        assert!(!text.contains("to_unsigned"));
    }

    #[test]
    fn header_and_ports() {
        let text = rom(vec![0; 8], RomOptions::default()).render();
        assert!(text.starts_with("-- ====="));
        assert!(text.contains("-- File: TEST_ROM.vhd"));
        assert!(text.contains("-- Lookup table length: 8"));
        assert!(text.contains("-- Number of address bits: 3"));
        assert!(text.contains("-- Number of data bits: 16"));
        assert!(text.contains("ADDR_IN  : in  std_logic_vector(2 downto 0);"));
        assert!(text.contains("DATA_OUT : out std_logic_vector(15 downto 0)"));
        assert!(text.contains("ROM_PROC : process(CLK) is"));
        assert!(text.contains("DATA_PROC : process(RST, CLK) is"));
        assert!(text.ends_with("end architecture RTL;"));
    }

    #[test]
    fn non_power_of_two_falls_through_to_others() {
        let text = rom(vec![1, 2, 3], RomOptions::default()).render();
        assert!(text.contains("\twhen \"10\" => DATA <= to_unsigned(3, 16);"));
        assert!(!text.contains("\"11\""));
        assert!(text.contains("when others"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = rom(vec![7; 16], RomOptions::default()).render();
        let b = rom(vec![7; 16], RomOptions::default()).render();
        assert_eq!(a, b);
    }
}
