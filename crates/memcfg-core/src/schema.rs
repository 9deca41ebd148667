//! Option-word bitfield schemas
//!
//! One schema per peripheral, describing every field of every option
//! word: position, width, allowed value domain, default and a
//! description used by the template emitter. Reserved bits are explicit
//! constant fields, so every bit of every word is covered by exactly one
//! field.

use core::fmt;

use crate::registry::Peripheral;

/// Allowed value domain of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Any value that fits the field width
    Any,
    /// Inclusive numeric range
    Range {
        /// Lowest allowed value
        min: u32,
        /// Highest allowed value
        max: u32,
    },
    /// Enumerated set of labelled values
    Enum(&'static [(u32, &'static str)]),
}

impl Domain {
    /// Check whether a value is inside the domain
    pub fn contains(&self, value: u32) -> bool {
        match self {
            Domain::Any => true,
            Domain::Range { min, max } => (*min..=*max).contains(&value),
            Domain::Enum(entries) => entries.iter().any(|(v, _)| *v == value),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Any => write!(f, "any value fitting the field width"),
            Domain::Range { min, max } => write!(f, "{min}..={max}"),
            Domain::Enum(entries) => {
                for (i, (value, label)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value} - {label}")?;
                }
                Ok(())
            }
        }
    }
}

/// Definition of a single bitfield within an option word
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Field name, unique within the schema
    pub name: &'static str,
    /// Index of the option word the field lives in
    pub word: usize,
    /// Bit offset within the word
    pub offset: u8,
    /// Field width in bits
    pub width: u8,
    /// Allowed value domain
    pub domain: Domain,
    /// Default value; `None` marks a required field
    pub default: Option<u32>,
    /// Constant field (reserved bits, tags); always encoded with
    /// `default` and never surfaced as a user setting
    pub constant: bool,
    /// Human-readable description for templates and saved files
    pub description: &'static str,
}

impl FieldDef {
    /// Bit mask of the field, right-aligned
    pub fn mask(&self) -> u32 {
        (((1u64) << self.width) - 1) as u32
    }

    /// Extract this field's value from its option word
    pub fn extract(&self, word: u32) -> u32 {
        (word >> self.offset) & self.mask()
    }
}

/// Complete option-word schema of one peripheral
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Peripheral this schema belongs to
    pub peripheral: Peripheral,
    /// Minimum number of option words (trailing words beyond this are
    /// optional, signalled by the `option_size` field where present)
    pub min_words: usize,
    /// Name of the field declaring how many additional words follow,
    /// for multi-word layouts
    pub size_field: Option<&'static str>,
    /// Field definitions per word, first word first
    pub words: &'static [&'static [FieldDef]],
}

impl Schema {
    /// Maximum number of option words
    pub fn max_words(&self) -> usize {
        self.words.len()
    }

    /// Iterate over all field definitions, word by word
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.words.iter().flat_map(|w| w.iter())
    }

    /// Find a field definition by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().find(|f| f.name == name)
    }
}

const PAD_COUNT: Domain = Domain::Enum(&[(0, "1 pad"), (2, "4 pads"), (3, "8 pads")]);

const FLEXSPI_NOR_WORD0: &[FieldDef] = &[
    FieldDef {
        name: "tag",
        word: 0,
        offset: 28,
        width: 4,
        domain: Domain::Any,
        default: Some(0xC),
        constant: true,
        description: "Option word tag, always 0xC",
    },
    FieldDef {
        name: "option_size",
        word: 0,
        offset: 24,
        width: 4,
        domain: Domain::Range { min: 0, max: 1 },
        default: Some(0),
        constant: false,
        description: "Number of additional option words that follow (0 or 1)",
    },
    FieldDef {
        name: "device_type",
        word: 0,
        offset: 20,
        width: 4,
        domain: Domain::Enum(&[
            (0, "quad_spi_sdr"),
            (1, "quad_spi_ddr"),
            (2, "hyper_flash_1v8"),
            (3, "hyper_flash_3v0"),
            (4, "macronix_octal_ddr"),
            (5, "macronix_octal_sdr"),
            (6, "micron_octal_ddr"),
            (7, "micron_octal_sdr"),
            (8, "adesto_octal_ddr"),
            (9, "adesto_octal_sdr"),
        ]),
        default: Some(0),
        constant: false,
        description: "Device detection type",
    },
    FieldDef {
        name: "query_pads",
        word: 0,
        offset: 16,
        width: 4,
        domain: PAD_COUNT,
        default: Some(0),
        constant: false,
        description: "Pads used for the initial device query",
    },
    FieldDef {
        name: "cmd_pads",
        word: 0,
        offset: 12,
        width: 4,
        domain: PAD_COUNT,
        default: Some(0),
        constant: false,
        description: "Pads used for commands after detection",
    },
    FieldDef {
        name: "quad_mode_setting",
        word: 0,
        offset: 8,
        width: 4,
        domain: Domain::Range { min: 0, max: 4 },
        default: Some(0),
        constant: false,
        description: "Quad enable method: 0 - not configured, 1 - SR1 bit 6, \
                      2 - SR2 bit 1, 3 - SR2 bit 7, 4 - SR2 bit 1 via command 0x31",
    },
    FieldDef {
        name: "misc_mode",
        word: 0,
        offset: 4,
        width: 4,
        domain: Domain::Range { min: 0, max: 7 },
        default: Some(0),
        constant: false,
        description: "Miscellaneous mode: 0 - disabled, 1 - 0-4-4 mode, \
                      2 - mode merged, 3 - data order swapped",
    },
    FieldDef {
        name: "max_freq",
        word: 0,
        offset: 0,
        width: 4,
        domain: Domain::Range { min: 0, max: 8 },
        default: None,
        constant: false,
        description: "Maximum interface frequency, chip specific: \
                      0 - 30 MHz, 1 - 50 MHz, 2 - 60 MHz, 3 - 75 MHz, 4 - 80 MHz, \
                      5 - 100 MHz, 6 - 120 MHz, 7 - 133 MHz, 8 - 166 MHz",
    },
];

const FLEXSPI_NOR_WORD1: &[FieldDef] = &[
    FieldDef {
        name: "flash_connection",
        word: 1,
        offset: 28,
        width: 4,
        domain: Domain::Range { min: 0, max: 3 },
        default: Some(0),
        constant: false,
        description: "Flash connection: 0 - port A single, 1 - parallel, \
                      2 - port B single, 3 - both ports",
    },
    FieldDef {
        name: "drive_strength",
        word: 1,
        offset: 24,
        width: 4,
        domain: Domain::Range { min: 0, max: 7 },
        default: Some(0),
        constant: false,
        description: "Pad drive strength, 0 keeps the silicon default",
    },
    FieldDef {
        name: "dqs_pinmux_group",
        word: 1,
        offset: 20,
        width: 4,
        domain: Domain::Range { min: 0, max: 15 },
        default: Some(0),
        constant: false,
        description: "DQS pinmux group selection",
    },
    FieldDef {
        name: "pinmux_group",
        word: 1,
        offset: 16,
        width: 4,
        domain: Domain::Range { min: 0, max: 15 },
        default: Some(0),
        constant: false,
        description: "Secondary pinmux group selection",
    },
    FieldDef {
        name: "status_override",
        word: 1,
        offset: 8,
        width: 8,
        domain: Domain::Range { min: 0, max: 255 },
        default: Some(0),
        constant: false,
        description: "Status register override value, 0 disables the override",
    },
    FieldDef {
        name: "dummy_cycles",
        word: 1,
        offset: 0,
        width: 8,
        domain: Domain::Range { min: 0, max: 255 },
        default: Some(0),
        constant: false,
        description: "Dummy cycle override, 0 keeps the chip default",
    },
];

const FLEXSPI_NAND_WORD0: &[FieldDef] = &[
    FieldDef {
        name: "tag",
        word: 0,
        offset: 28,
        width: 4,
        domain: Domain::Any,
        default: Some(0xC),
        constant: true,
        description: "Option word tag, always 0xC",
    },
    FieldDef {
        name: "option_size",
        word: 0,
        offset: 24,
        width: 4,
        domain: Domain::Range { min: 0, max: 1 },
        default: Some(1),
        constant: false,
        description: "Number of additional option words that follow (0 or 1)",
    },
    FieldDef {
        name: "reserved0",
        word: 0,
        offset: 20,
        width: 4,
        domain: Domain::Any,
        default: Some(0),
        constant: true,
        description: "Reserved, write as 0",
    },
    FieldDef {
        name: "flash_size",
        word: 0,
        offset: 16,
        width: 4,
        domain: Domain::Range { min: 1, max: 8 },
        default: None,
        constant: false,
        description: "Device density in Gbits",
    },
    FieldDef {
        name: "has_multiplanes",
        word: 0,
        offset: 12,
        width: 4,
        domain: Domain::Range { min: 0, max: 1 },
        default: Some(0),
        constant: false,
        description: "Multi-plane device: 0 - single plane, 1 - two planes",
    },
    FieldDef {
        name: "pages_per_block",
        word: 0,
        offset: 8,
        width: 4,
        domain: Domain::Enum(&[
            (0, "64 pages"),
            (1, "128 pages"),
            (2, "256 pages"),
            (3, "32 pages"),
        ]),
        default: Some(0),
        constant: false,
        description: "Pages per erase block",
    },
    FieldDef {
        name: "page_size",
        word: 0,
        offset: 4,
        width: 4,
        domain: Domain::Range { min: 1, max: 4 },
        default: Some(2),
        constant: false,
        description: "Page size in KiB",
    },
    FieldDef {
        name: "max_freq",
        word: 0,
        offset: 0,
        width: 4,
        domain: Domain::Range { min: 0, max: 8 },
        default: None,
        constant: false,
        description: "Maximum interface frequency, chip specific: \
                      0 - 30 MHz, 1 - 50 MHz, 2 - 60 MHz, 3 - 75 MHz, 4 - 80 MHz, \
                      5 - 100 MHz, 6 - 120 MHz, 7 - 133 MHz, 8 - 166 MHz",
    },
];

const FLEXSPI_NAND_WORD1: &[FieldDef] = &[
    FieldDef {
        name: "reserved1",
        word: 1,
        offset: 8,
        width: 24,
        domain: Domain::Any,
        default: Some(0),
        constant: true,
        description: "Reserved, write as 0",
    },
    FieldDef {
        name: "manufacturer_id",
        word: 1,
        offset: 0,
        width: 8,
        domain: Domain::Range { min: 0, max: 255 },
        default: None,
        constant: false,
        description: "JEDEC manufacturer ID byte used for device detection",
    },
];

const SD_WORD0: &[FieldDef] = &[
    FieldDef {
        name: "tag",
        word: 0,
        offset: 28,
        width: 4,
        domain: Domain::Any,
        default: Some(0xD),
        constant: true,
        description: "Option word tag, always 0xD",
    },
    FieldDef {
        name: "reserved0",
        word: 0,
        offset: 8,
        width: 20,
        domain: Domain::Any,
        default: Some(0),
        constant: true,
        description: "Reserved, write as 0",
    },
    FieldDef {
        name: "timing_interface",
        word: 0,
        offset: 4,
        width: 4,
        domain: Domain::Range { min: 0, max: 1 },
        default: Some(0),
        constant: false,
        description: "Timing mode: 0 - SDR12/SDR25, 1 - SDR50/SDR104",
    },
    FieldDef {
        name: "instance",
        word: 0,
        offset: 0,
        width: 4,
        domain: Domain::Range { min: 0, max: 3 },
        default: None,
        constant: false,
        description: "uSDHC peripheral instance the card is attached to",
    },
];

const MMC_WORD0: &[FieldDef] = &[
    FieldDef {
        name: "tag",
        word: 0,
        offset: 28,
        width: 4,
        domain: Domain::Any,
        default: Some(0xD),
        constant: true,
        description: "Option word tag, always 0xD",
    },
    FieldDef {
        name: "reserved0",
        word: 0,
        offset: 12,
        width: 16,
        domain: Domain::Any,
        default: Some(0),
        constant: true,
        description: "Reserved, write as 0",
    },
    FieldDef {
        name: "bus_width",
        word: 0,
        offset: 8,
        width: 4,
        domain: Domain::Range { min: 0, max: 2 },
        default: Some(0),
        constant: false,
        description: "Data bus width: 0 - 1 bit, 1 - 4 bits, 2 - 8 bits",
    },
    FieldDef {
        name: "timing_interface",
        word: 0,
        offset: 4,
        width: 4,
        domain: Domain::Range { min: 0, max: 1 },
        default: Some(0),
        constant: false,
        description: "Timing mode: 0 - legacy, 1 - high speed",
    },
    FieldDef {
        name: "instance",
        word: 0,
        offset: 0,
        width: 4,
        domain: Domain::Range { min: 0, max: 3 },
        default: None,
        constant: false,
        description: "uSDHC peripheral instance the device is attached to",
    },
];

const FLEXSPI_NOR: Schema = Schema {
    peripheral: Peripheral::FlexspiNor,
    min_words: 1,
    size_field: Some("option_size"),
    words: &[FLEXSPI_NOR_WORD0, FLEXSPI_NOR_WORD1],
};

const FLEXSPI_NAND: Schema = Schema {
    peripheral: Peripheral::FlexspiNand,
    min_words: 1,
    size_field: Some("option_size"),
    words: &[FLEXSPI_NAND_WORD0, FLEXSPI_NAND_WORD1],
};

const SD: Schema = Schema {
    peripheral: Peripheral::Sd,
    min_words: 1,
    size_field: None,
    words: &[SD_WORD0],
};

const MMC: Schema = Schema {
    peripheral: Peripheral::Mmc,
    min_words: 1,
    size_field: None,
    words: &[MMC_WORD0],
};

/// Get the option-word schema of a peripheral
pub fn for_peripheral(peripheral: Peripheral) -> &'static Schema {
    match peripheral {
        Peripheral::FlexspiNor => &FLEXSPI_NOR,
        Peripheral::FlexspiNand => &FLEXSPI_NAND,
        Peripheral::Sd => &SD,
        Peripheral::Mmc => &MMC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Peripheral;

    #[test]
    fn every_bit_covered_exactly_once() {
        for peripheral in Peripheral::ALL {
            let schema = for_peripheral(*peripheral);
            for (idx, word) in schema.words.iter().enumerate() {
                let mut seen: u32 = 0;
                for field in word.iter() {
                    assert_eq!(field.word, idx, "{}: wrong word index", field.name);
                    let bits = field.mask() << field.offset;
                    assert_eq!(
                        seen & bits,
                        0,
                        "{peripheral}: field {} overlaps",
                        field.name
                    );
                    seen |= bits;
                }
                assert_eq!(seen, u32::MAX, "{peripheral}: word {idx} has holes");
            }
        }
    }

    #[test]
    fn field_names_unique_within_schema() {
        for peripheral in Peripheral::ALL {
            let schema = for_peripheral(*peripheral);
            let names: Vec<_> = schema.fields().map(|f| f.name).collect();
            let mut dedup = names.clone();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(names.len(), dedup.len(), "{peripheral}: duplicate names");
        }
    }

    #[test]
    fn constants_carry_defaults() {
        for peripheral in Peripheral::ALL {
            for field in for_peripheral(*peripheral).fields() {
                if field.constant {
                    assert!(field.default.is_some(), "{}: constant without value", field.name);
                }
                if let Some(default) = field.default {
                    assert!(default <= field.mask(), "{}: default too wide", field.name);
                }
            }
        }
    }

    #[test]
    fn size_field_is_a_real_word0_field() {
        for peripheral in Peripheral::ALL {
            let schema = for_peripheral(*peripheral);
            let Some(name) = schema.size_field else {
                continue;
            };
            let field = schema.field(name).unwrap_or_else(|| panic!("{peripheral}: {name}"));
            assert_eq!(field.word, 0);
            assert!(!field.constant);
            assert!(field.default.is_some());
        }
    }

    #[test]
    fn domain_checks() {
        let schema = for_peripheral(Peripheral::FlexspiNor);
        let pads = schema.field("cmd_pads").unwrap();
        assert!(pads.domain.contains(0));
        assert!(pads.domain.contains(3));
        assert!(!pads.domain.contains(1));

        let freq = schema.field("max_freq").unwrap();
        assert!(freq.domain.contains(8));
        assert!(!freq.domain.contains(9));
    }

    #[test]
    fn extract_field_values() {
        let schema = for_peripheral(Peripheral::FlexspiNor);
        let quad = schema.field("quad_mode_setting").unwrap();
        assert_eq!(quad.extract(0xC000_0207), 2);
        let tag = schema.field("tag").unwrap();
        assert_eq!(tag.extract(0xC000_0207), 0xC);
    }
}
