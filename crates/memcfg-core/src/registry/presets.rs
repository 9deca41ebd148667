//! Known-good option word presets
//!
//! Regression-tested option words for concrete memory chips, keyed by
//! (peripheral, manufacturer, chip name, interface). These double as the
//! source for `parse --chip` and as round-trip fixtures for the codec.

use super::{MemInterface, Peripheral};

/// One known chip and its verified option words
#[derive(Debug, Clone, Copy)]
pub struct ChipPreset {
    /// Peripheral the chip attaches to
    pub peripheral: Peripheral,
    /// Chip manufacturer
    pub manufacturer: &'static str,
    /// Chip (or chip series) name
    pub chip_name: &'static str,
    /// Interface the option words are valid for
    pub interface: MemInterface,
    /// Verified option words
    pub option_words: &'static [u32],
}

const fn nor(
    manufacturer: &'static str,
    chip_name: &'static str,
    interface: MemInterface,
    option_words: &'static [u32],
) -> ChipPreset {
    ChipPreset {
        peripheral: Peripheral::FlexspiNor,
        manufacturer,
        chip_name,
        interface,
        option_words,
    }
}

const fn nand(
    manufacturer: &'static str,
    chip_name: &'static str,
    option_words: &'static [u32],
) -> ChipPreset {
    ChipPreset {
        peripheral: Peripheral::FlexspiNand,
        manufacturer,
        chip_name,
        interface: MemInterface::QuadSpi,
        option_words,
    }
}

/// The preset table
pub const PRESETS: &[ChipPreset] = &[
    // FlexSPI NOR
    nor("Winbond", "W25QxxxJV", MemInterface::QuadSpi, &[0xC000_0207]),
    nor("Macronix", "MX25UxxxxAC", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("Macronix", "MX25LxxxxG", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("ISSI", "IS25LPxxxA", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("ISSI", "IS25WPxxxA", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("Micron", "MT25QxxxABA", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("GigaDevice", "GD25QxxxC", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("GigaDevice", "GD25LBxxxE", MemInterface::QuadSpi, &[0xC000_0007]),
    nor("Adesto", "AT25SFxxxA", MemInterface::QuadSpi, &[0xC000_0007]),
    nor(
        "Macronix",
        "MX25UM51345G",
        MemInterface::OctalSpi,
        &[0xC040_3037],
    ),
    nor(
        "Micron",
        "MT35XUxxxABA",
        MemInterface::OctalSpi,
        &[0xC160_3007, 0x0000_0020],
    ),
    nor(
        "Adesto",
        "ATXP032",
        MemInterface::OctalSpi,
        &[0xC080_3007],
    ),
    nor(
        "Infineon",
        "S26HSxxxT",
        MemInterface::HyperBus,
        &[0xC023_3007],
    ),
    // FlexSPI NAND
    nand("Winbond", "W25N01G", &[0xC101_0026, 0x0000_00EF]),
    nand("Winbond", "W25N02K", &[0xC102_0026, 0x0000_00EF]),
    nand("Macronix", "MX35UF1G", &[0xC101_0026, 0x0000_00C2]),
    nand("Macronix", "MX35UF2G", &[0xC102_0026, 0x0000_00C2]),
    nand("Paragon", "PN26G01A", &[0xC101_0026, 0x0000_00A1]),
    nand("Paragon", "PN26G02A", &[0xC102_0026, 0x0000_00A1]),
    // uSDHC
    ChipPreset {
        peripheral: Peripheral::Sd,
        manufacturer: "generic",
        chip_name: "SD-card",
        interface: MemInterface::Sd,
        option_words: &[0xD000_0002],
    },
    ChipPreset {
        peripheral: Peripheral::Mmc,
        manufacturer: "generic",
        chip_name: "eMMC-card",
        interface: MemInterface::Mmc,
        option_words: &[0xD000_0003],
    },
];
