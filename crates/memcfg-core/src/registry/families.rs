//! Static per-family capability tables
//!
//! Everything the blhost script generator varies on lives here as data:
//! scratch addresses, blhost memory IDs, FCB read-back support and the
//! instance selection mechanism. Adding a chip family is a data-only
//! change.

use super::{Family, Peripheral};

/// How a peripheral instance is selected before configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSelect {
    /// Write `magic | instance` to the scratch address and run
    /// configure-memory once before loading option words
    SwitchWord(u32),
    /// The instance is carried inside the option word itself, in the
    /// named schema field
    OptionField(&'static str),
}

/// Capability record for one peripheral within a family
#[derive(Debug, Clone, Copy)]
pub struct PeripheralCaps {
    /// The peripheral this record describes
    pub peripheral: Peripheral,
    /// Ordered list of usable instance indices
    pub instances: &'static [u32],
    /// blhost memory identifier used by configure-memory
    pub mem_id: u32,
    /// Whether the applied FCB can be read back after configuration
    pub fcb_readback: bool,
    /// Instance selection mechanism
    pub instance_select: InstanceSelect,
}

/// Registry record for one chip family
#[derive(Debug, Clone, Copy)]
pub struct FamilyInfo {
    /// The family this record describes
    pub family: Family,
    /// RAM scratch address the option words are staged at
    pub scratch_address: u32,
    /// Address the FCB is read back from where supported
    pub fcb_read_address: u32,
    /// Peripherals available on this family
    pub peripherals: &'static [PeripheralCaps],
}

/// FlexSPI instance switch magic, shared by all FlexSPI-capable families
const FLEXSPI_SWITCH: InstanceSelect = InstanceSelect::SwitchWord(0xCF90_0000);

const fn flexspi_nor(instances: &'static [u32]) -> PeripheralCaps {
    PeripheralCaps {
        peripheral: Peripheral::FlexspiNor,
        instances,
        mem_id: 0x9,
        fcb_readback: true,
        instance_select: FLEXSPI_SWITCH,
    }
}

const fn flexspi_nand(instances: &'static [u32]) -> PeripheralCaps {
    PeripheralCaps {
        peripheral: Peripheral::FlexspiNand,
        instances,
        mem_id: 0x101,
        fcb_readback: false,
        instance_select: FLEXSPI_SWITCH,
    }
}

const fn sd(instances: &'static [u32]) -> PeripheralCaps {
    PeripheralCaps {
        peripheral: Peripheral::Sd,
        instances,
        mem_id: 0x120,
        fcb_readback: false,
        instance_select: InstanceSelect::OptionField("instance"),
    }
}

const fn mmc(instances: &'static [u32]) -> PeripheralCaps {
    PeripheralCaps {
        peripheral: Peripheral::Mmc,
        instances,
        mem_id: 0x121,
        fcb_readback: false,
        instance_select: InstanceSelect::OptionField("instance"),
    }
}

/// The family registry
pub const FAMILIES: &[FamilyInfo] = &[
    FamilyInfo {
        family: Family::Rt101x,
        scratch_address: 0x0000_2000,
        fcb_read_address: 0x6000_0400,
        peripherals: &[flexspi_nor(&[1])],
    },
    FamilyInfo {
        family: Family::Rt105x,
        scratch_address: 0x0000_2000,
        fcb_read_address: 0x6000_0400,
        peripherals: &[flexspi_nor(&[1]), sd(&[1, 2]), mmc(&[1, 2])],
    },
    FamilyInfo {
        family: Family::Rt106x,
        scratch_address: 0x0000_2000,
        fcb_read_address: 0x6000_0400,
        peripherals: &[
            flexspi_nor(&[1, 2]),
            flexspi_nand(&[1, 2]),
            sd(&[1, 2]),
            mmc(&[1, 2]),
        ],
    },
    FamilyInfo {
        family: Family::Rt116x,
        scratch_address: 0x2024_0000,
        fcb_read_address: 0x3000_0400,
        peripherals: &[
            flexspi_nor(&[1, 2]),
            flexspi_nand(&[1, 2]),
            sd(&[1, 2]),
            mmc(&[1, 2]),
        ],
    },
    FamilyInfo {
        family: Family::Rt117x,
        scratch_address: 0x2024_0000,
        fcb_read_address: 0x3000_0400,
        peripherals: &[
            flexspi_nor(&[1, 2]),
            flexspi_nand(&[1, 2]),
            sd(&[1, 2]),
            mmc(&[1, 2]),
        ],
    },
    FamilyInfo {
        family: Family::Rt118x,
        scratch_address: 0x1FFE_0000,
        fcb_read_address: 0x2800_0400,
        peripherals: &[
            flexspi_nor(&[1, 2]),
            flexspi_nand(&[1, 2]),
            sd(&[1, 2]),
            mmc(&[1, 2]),
        ],
    },
    FamilyInfo {
        family: Family::Rt5xx,
        scratch_address: 0x0010_C000,
        fcb_read_address: 0x0800_0400,
        peripherals: &[flexspi_nor(&[0]), sd(&[0, 1]), mmc(&[0, 1])],
    },
    FamilyInfo {
        family: Family::Rt6xx,
        scratch_address: 0x0010_C000,
        fcb_read_address: 0x0800_0400,
        peripherals: &[flexspi_nor(&[0]), sd(&[0, 1]), mmc(&[0, 1])],
    },
    FamilyInfo {
        family: Family::Lpc55s3x,
        scratch_address: 0x2000_8000,
        fcb_read_address: 0x0800_0400,
        peripherals: &[flexspi_nor(&[0])],
    },
    FamilyInfo {
        family: Family::Mcxn9xx,
        scratch_address: 0x2000_8000,
        fcb_read_address: 0x8000_0400,
        peripherals: &[flexspi_nor(&[0])],
    },
    FamilyInfo {
        family: Family::Rw61x,
        scratch_address: 0x2000_1000,
        fcb_read_address: 0x0800_0400,
        peripherals: &[flexspi_nor(&[0])],
    },
];
