//! Family/peripheral registry
//!
//! Static, versioned database of chip families, their bootable memory
//! peripherals and known-good option word presets. The tables are
//! compiled in as `const` data and never mutated at runtime, so lookups
//! are safe from any thread.

mod families;
mod presets;

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};
use crate::schema::{self, Schema};

pub use families::{FamilyInfo, InstanceSelect, PeripheralCaps, FAMILIES};
pub use presets::{ChipPreset, PRESETS};

/// Microcontroller product line sharing a memory-configuration schema set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// i.MX RT101x
    Rt101x,
    /// i.MX RT105x
    Rt105x,
    /// i.MX RT106x
    Rt106x,
    /// i.MX RT116x
    Rt116x,
    /// i.MX RT117x
    Rt117x,
    /// i.MX RT118x
    Rt118x,
    /// i.MX RT5xx
    Rt5xx,
    /// i.MX RT6xx
    Rt6xx,
    /// LPC55S3x
    Lpc55s3x,
    /// MCX N9xx
    Mcxn9xx,
    /// RW61x
    Rw61x,
}

impl Family {
    /// All families known to the registry, in display order
    pub const ALL: &'static [Family] = &[
        Family::Rt101x,
        Family::Rt105x,
        Family::Rt106x,
        Family::Rt116x,
        Family::Rt117x,
        Family::Rt118x,
        Family::Rt5xx,
        Family::Rt6xx,
        Family::Lpc55s3x,
        Family::Mcxn9xx,
        Family::Rw61x,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Rt101x => "rt101x",
            Family::Rt105x => "rt105x",
            Family::Rt106x => "rt106x",
            Family::Rt116x => "rt116x",
            Family::Rt117x => "rt117x",
            Family::Rt118x => "rt118x",
            Family::Rt5xx => "rt5xx",
            Family::Rt6xx => "rt6xx",
            Family::Lpc55s3x => "lpc55s3x",
            Family::Mcxn9xx => "mcxn9xx",
            Family::Rw61x => "rw61x",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Family::ALL
            .iter()
            .copied()
            .find(|fam| fam.as_str() == s.to_lowercase())
            .ok_or_else(|| Error::UnknownFamily(s.to_string()))
    }
}

/// Bootable memory peripheral type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Peripheral {
    /// FlexSPI-attached serial NOR flash
    FlexspiNor,
    /// FlexSPI-attached serial NAND flash
    FlexspiNand,
    /// uSDHC-attached SD card
    Sd,
    /// uSDHC-attached eMMC
    Mmc,
}

impl Peripheral {
    /// All peripherals known to the registry
    pub const ALL: &'static [Peripheral] = &[
        Peripheral::FlexspiNor,
        Peripheral::FlexspiNand,
        Peripheral::Sd,
        Peripheral::Mmc,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Peripheral::FlexspiNor => "flexspi_nor",
            Peripheral::FlexspiNand => "flexspi_nand",
            Peripheral::Sd => "sd",
            Peripheral::Mmc => "mmc",
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Peripheral {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Peripheral::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s.to_lowercase())
            .ok_or_else(|| Error::UnknownPeripheral(s.to_string()))
    }
}

/// Electrical interface between the controller and the memory chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemInterface {
    /// Quad SPI (4 data pads)
    QuadSpi,
    /// Octal SPI (8 data pads)
    OctalSpi,
    /// HyperBus
    HyperBus,
    /// SD card bus
    Sd,
    /// eMMC bus
    Mmc,
}

impl MemInterface {
    /// All interfaces known to the registry
    pub const ALL: &'static [MemInterface] = &[
        MemInterface::QuadSpi,
        MemInterface::OctalSpi,
        MemInterface::HyperBus,
        MemInterface::Sd,
        MemInterface::Mmc,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            MemInterface::QuadSpi => "quad_spi",
            MemInterface::OctalSpi => "octal_spi",
            MemInterface::HyperBus => "hyper_bus",
            MemInterface::Sd => "sd",
            MemInterface::Mmc => "mmc",
        }
    }
}

impl fmt::Display for MemInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemInterface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MemInterface::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                Error::UnsupportedConfiguration(format!("unknown interface: {s}"))
            })
    }
}

/// Get the registry record for a family
pub fn family_info(family: Family) -> &'static FamilyInfo {
    // FAMILIES covers every Family variant; checked by a test below
    FAMILIES
        .iter()
        .find(|info| info.family == family)
        .expect("registry covers all families")
}

/// Get the capability record for a peripheral within a family
pub fn peripheral_caps(family: Family, peripheral: Peripheral) -> Result<&'static PeripheralCaps> {
    family_info(family)
        .peripherals
        .iter()
        .find(|caps| caps.peripheral == peripheral)
        .ok_or_else(|| Error::no_peripheral(family, peripheral))
}

/// Resolve the option-word schema for a family/peripheral pair
pub fn lookup_schema(family: Family, peripheral: Peripheral) -> Result<&'static Schema> {
    // Validates the combination; schemas themselves are per peripheral.
    peripheral_caps(family, peripheral)?;
    Ok(schema::for_peripheral(peripheral))
}

/// All families supported by the registry
pub fn supported_families() -> &'static [Family] {
    Family::ALL
}

/// Ordered list of peripheral instance indices for a family
pub fn peripheral_instances(family: Family, peripheral: Peripheral) -> Result<&'static [u32]> {
    Ok(peripheral_caps(family, peripheral)?.instances)
}

/// Known option word presets for a peripheral, regardless of family
pub fn presets_for(peripheral: Peripheral) -> impl Iterator<Item = &'static ChipPreset> {
    PRESETS.iter().filter(move |p| p.peripheral == peripheral)
}

/// Find a known chip preset by name and interface, for a given family
///
/// The chip name is matched case-insensitively. The preset's peripheral
/// must be available on the family.
pub fn find_preset(
    family: Family,
    chip_name: &str,
    interface: MemInterface,
) -> Result<&'static ChipPreset> {
    let wanted = chip_name.to_lowercase();
    PRESETS
        .iter()
        .filter(|p| p.chip_name.to_lowercase() == wanted && p.interface == interface)
        .find(|p| peripheral_caps(family, p.peripheral).is_ok())
        .ok_or_else(|| {
            Error::UnsupportedConfiguration(format!(
                "no known option words for chip '{chip_name}' over {interface} on {family}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_has_a_registry_record() {
        for family in Family::ALL {
            let info = family_info(*family);
            assert_eq!(info.family, *family);
            assert!(!info.peripherals.is_empty());
        }
    }

    #[test]
    fn family_name_round_trip() {
        for family in Family::ALL {
            assert_eq!(family.as_str().parse::<Family>().unwrap(), *family);
        }
        assert!(matches!(
            "rt999x".parse::<Family>(),
            Err(Error::UnknownFamily(_))
        ));
    }

    #[test]
    fn peripheral_name_round_trip() {
        for p in Peripheral::ALL {
            assert_eq!(p.as_str().parse::<Peripheral>().unwrap(), *p);
        }
        assert!(matches!(
            "flexbus".parse::<Peripheral>(),
            Err(Error::UnknownPeripheral(_))
        ));
    }

    #[test]
    fn schema_lookup_respects_family_support() {
        assert!(lookup_schema(Family::Rt118x, Peripheral::FlexspiNand).is_ok());
        assert!(matches!(
            lookup_schema(Family::Lpc55s3x, Peripheral::FlexspiNand),
            Err(Error::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn known_chip_lookup() {
        let preset = find_preset(Family::Rt118x, "W25QxxxJV", MemInterface::QuadSpi).unwrap();
        assert_eq!(preset.peripheral, Peripheral::FlexspiNor);
        assert_eq!(preset.option_words, &[0xC000_0207]);

        let preset = find_preset(Family::Rt118x, "w25n01g", MemInterface::QuadSpi).unwrap();
        assert_eq!(preset.peripheral, Peripheral::FlexspiNand);
        assert_eq!(preset.option_words, &[0xC101_0026, 0x0000_00EF]);

        // lpc55s3x has no NAND peripheral, so the NAND preset must not match
        assert!(find_preset(Family::Lpc55s3x, "W25N01G", MemInterface::QuadSpi).is_err());
    }

    #[test]
    fn scratch_addresses_are_family_specific() {
        assert_eq!(family_info(Family::Rt118x).scratch_address, 0x1FFE_0000);
        assert_eq!(family_info(Family::Rt5xx).scratch_address, 0x0010_C000);
    }

    #[test]
    fn instances_listed_in_order() {
        let instances = peripheral_instances(Family::Rt118x, Peripheral::FlexspiNor).unwrap();
        assert_eq!(instances, &[1, 2]);
    }
}
