//! Blhost script generation
//!
//! Turns a [`MemoryConfig`] into the ordered blhost command sequence
//! that stages the option words in RAM, triggers the memory controller
//! configuration and, where the peripheral supports it, reads the
//! resulting FCB back. All per-family and per-peripheral variation
//! (scratch address, memory ID, read-back support, instance selection)
//! comes from the registry capability data.

use core::fmt;

use crate::config::MemoryConfig;
use crate::error::{Error, Result};
use crate::registry::{self, InstanceSelect};

/// Number of bytes read back for the FCB
const FCB_SIZE: u32 = 512;

/// Magic option word requesting an FCB read-back pass
const FCB_READBACK_WORD: u32 = 0xF000_000F;

/// One bootloader command (or comment line) of a generated script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlhostCmd {
    /// Write a 32-bit value to RAM
    FillMemory {
        /// Target address
        address: u32,
        /// Value to write
        value: u32,
    },
    /// Run memory controller configuration from staged option words
    ConfigureMemory {
        /// blhost memory identifier
        mem_id: u32,
        /// Address the option words were staged at
        address: u32,
    },
    /// Read memory content into a file
    ReadMemory {
        /// Source address
        address: u32,
        /// Number of bytes to read
        byte_count: u32,
        /// Destination file
        path: String,
    },
    /// Verbatim comment line, including the leading `#`
    Comment(String),
}

impl BlhostCmd {
    /// Build a regular `# `-prefixed comment
    fn note(text: impl fmt::Display) -> Self {
        BlhostCmd::Comment(format!("# {text}"))
    }
}

impl fmt::Display for BlhostCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlhostCmd::FillMemory { address, value } => {
                write!(f, "fill-memory 0x{address:08X} 4 0x{value:08X}")
            }
            BlhostCmd::ConfigureMemory { mem_id, address } => {
                write!(f, "configure-memory {mem_id} 0x{address:08X}")
            }
            BlhostCmd::ReadMemory {
                address,
                byte_count,
                path,
            } => {
                write!(f, "read-memory 0x{address:08X} {byte_count} {path}")
            }
            BlhostCmd::Comment(line) => f.write_str(line),
        }
    }
}

/// An ordered, immutable blhost command sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlhostScript {
    commands: Vec<BlhostCmd>,
}

impl BlhostScript {
    /// The commands of the script, in execution order
    pub fn commands(&self) -> &[BlhostCmd] {
        &self.commands
    }
}

impl fmt::Display for BlhostScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            writeln!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Generate the blhost script for a configuration
///
/// `instance` overrides any instance pinned in the configuration file;
/// `fcb_path` names the read-back artifact (default `fcb.bin`). Fails
/// with [`Error::UnsupportedOperation`] when the registry has no script
/// data for the target.
pub fn generate(
    config: &MemoryConfig,
    instance: Option<u32>,
    fcb_path: Option<&str>,
) -> Result<BlhostScript> {
    let info = registry::family_info(config.family);
    let caps = registry::peripheral_caps(config.family, config.peripheral).map_err(|_| {
        Error::UnsupportedOperation(format!(
            "no blhost script support for {} / {}",
            config.family, config.peripheral
        ))
    })?;
    let words = config.to_option_words()?;
    let scratch = info.scratch_address;
    log::debug!(
        "Generating blhost script for {} / {} ({} option word(s), scratch 0x{scratch:08X})",
        config.family,
        config.peripheral,
        words.len()
    );

    let mut commands = vec![BlhostCmd::note(format!(
        "Memory configuration script for {} / {}.",
        config.family, config.peripheral
    ))];
    if let Some(chip_name) = &config.chip_name {
        let manufacturer = config.manufacturer.as_deref().unwrap_or("unknown");
        match config.interface {
            Some(interface) => commands.push(BlhostCmd::note(format!(
                "Chip: {manufacturer} {chip_name} ({interface})."
            ))),
            None => commands.push(BlhostCmd::note(format!("Chip: {manufacturer} {chip_name}."))),
        }
    }

    if let Some(ix) = instance.or(config.instance) {
        if !caps.instances.contains(&ix) {
            return Err(Error::UnsupportedConfiguration(format!(
                "{} {} has no instance {ix} (available: {:?})",
                config.family, config.peripheral, caps.instances
            )));
        }
        match caps.instance_select {
            InstanceSelect::SwitchWord(magic) => {
                commands.push(BlhostCmd::note(format!(
                    "Switch to peripheral instance {ix}:"
                )));
                commands.push(BlhostCmd::FillMemory {
                    address: scratch,
                    value: magic | ix,
                });
                commands.push(BlhostCmd::ConfigureMemory {
                    mem_id: caps.mem_id,
                    address: scratch,
                });
            }
            InstanceSelect::OptionField(field) => {
                // The instance travels inside the option word; a
                // conflicting request cannot be honored.
                if config.get(field) != Some(ix) {
                    return Err(Error::UnsupportedOperation(format!(
                        "{} selects its instance through the '{field}' setting; \
                         set it in the configuration instead",
                        config.peripheral
                    )));
                }
            }
        }
    }

    commands.push(BlhostCmd::note("Configure memory:"));
    for (i, word) in words.iter().enumerate() {
        commands.push(BlhostCmd::FillMemory {
            address: scratch + 4 * i as u32,
            value: *word,
        });
    }
    commands.push(BlhostCmd::ConfigureMemory {
        mem_id: caps.mem_id,
        address: scratch,
    });

    if caps.fcb_readback {
        commands.push(BlhostCmd::note("Read the FCB back:"));
        commands.push(BlhostCmd::FillMemory {
            address: scratch,
            value: FCB_READBACK_WORD,
        });
        commands.push(BlhostCmd::ConfigureMemory {
            mem_id: caps.mem_id,
            address: scratch,
        });
        commands.push(BlhostCmd::ReadMemory {
            address: info.fcb_read_address,
            byte_count: FCB_SIZE,
            path: fcb_path.unwrap_or("fcb.bin").to_string(),
        });
    } else {
        commands.push(BlhostCmd::Comment(
            "#FCB read back is supported just only for FlexSPI NOR memory.".to_string(),
        ));
    }

    Ok(BlhostScript { commands })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Family, MemInterface, Peripheral};

    fn script_text(
        family: Family,
        chip: &str,
        interface: MemInterface,
        instance: Option<u32>,
    ) -> String {
        let config = MemoryConfig::from_preset(family, chip, interface).unwrap();
        generate(&config, instance, None).unwrap().to_string()
    }

    #[test]
    fn nor_script_with_instance_and_readback() {
        let text = script_text(Family::Rt118x, "W25QxxxJV", MemInterface::QuadSpi, Some(1));
        let expected = [
            "fill-memory 0x1FFE0000 4 0xCF900001",
            "configure-memory 9 0x1FFE0000",
            "fill-memory 0x1FFE0000 4 0xC0000207",
            "configure-memory 9 0x1FFE0000",
            "fill-memory 0x1FFE0000 4 0xF000000F",
            "read-memory 0x28000400 512 fcb.bin",
        ];
        let mut rest = text.as_str();
        for line in expected {
            let pos = rest.find(line).unwrap_or_else(|| panic!("missing: {line}"));
            rest = &rest[pos + line.len()..];
        }
    }

    #[test]
    fn nand_script_skips_readback() {
        let text = script_text(Family::Rt118x, "W25N01G", MemInterface::QuadSpi, Some(2));
        let expected = [
            "fill-memory 0x1FFE0000 4 0xCF900002",
            "configure-memory 257 0x1FFE0000",
            "fill-memory 0x1FFE0000 4 0xC1010026",
            "fill-memory 0x1FFE0004 4 0x000000EF",
            "configure-memory 257 0x1FFE0000",
            "#FCB read back is supported just only for",
        ];
        let mut rest = text.as_str();
        for line in expected {
            let pos = rest.find(line).unwrap_or_else(|| panic!("missing: {line}"));
            rest = &rest[pos + line.len()..];
        }
        assert!(!text.contains("read-memory"));
    }

    #[test]
    fn rt5xx_uses_its_own_scratch_address() {
        let text = script_text(Family::Rt5xx, "W25QxxxJV", MemInterface::QuadSpi, Some(0));
        assert!(text.contains("fill-memory 0x0010C000 4 0xCF900000"));
        assert!(text.contains("fill-memory 0x0010C000 4 0xC0000207"));
        assert!(text.contains("configure-memory 9 0x0010C000"));
        assert!(text.trim_end().ends_with("read-memory 0x08000400 512 fcb.bin"));
    }

    #[test]
    fn readback_emitted_without_explicit_instance() {
        let text = script_text(Family::Rt5xx, "W25QxxxJV", MemInterface::QuadSpi, None);
        assert!(!text.contains("0xCF900000"));
        assert!(text.trim_end().ends_with("read-memory 0x08000400 512 fcb.bin"));
    }

    #[test]
    fn fcb_path_is_forwarded() {
        let config =
            MemoryConfig::from_preset(Family::Rt118x, "W25QxxxJV", MemInterface::QuadSpi).unwrap();
        let script = generate(&config, None, Some("out/fcb.bin")).unwrap();
        assert!(script.to_string().contains("read-memory 0x28000400 512 out/fcb.bin"));
    }

    #[test]
    fn unknown_instance_is_rejected() {
        let config =
            MemoryConfig::from_preset(Family::Rt118x, "W25QxxxJV", MemInterface::QuadSpi).unwrap();
        assert!(matches!(
            generate(&config, Some(5), None),
            Err(Error::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn sd_instance_lives_in_the_option_word() {
        let config = MemoryConfig::from_option_words(
            Family::Rt118x,
            Peripheral::Sd,
            None,
            &[0xD000_0002],
        )
        .unwrap();
        // matching request is fine, it is already encoded
        let script = generate(&config, Some(2), None).unwrap();
        assert!(script.to_string().contains("configure-memory 288 0x1FFE0000"));
        // conflicting request cannot be honored
        assert!(matches!(
            generate(&config, Some(1), None),
            Err(Error::UnsupportedOperation(_))
        ));
    }
}
