//! Memory configuration model
//!
//! The structured, human-editable representation of a memory
//! configuration and its TOML persistence. A configuration references
//! its schema by (family, peripheral) and resolves it through the
//! registry at encode/decode time; it never caches the schema.

use std::fs;
use std::path::Path;

use crate::codec::{self, Setting};
use crate::error::{Error, Result};
use crate::registry::{self, Family, MemInterface, Peripheral};

/// A memory configuration for one peripheral of one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Chip family
    pub family: Family,
    /// Target peripheral
    pub peripheral: Peripheral,
    /// Electrical interface, when known
    pub interface: Option<MemInterface>,
    /// Peripheral instance, when pinned in the file
    pub instance: Option<u32>,
    /// Chip manufacturer, free text
    pub manufacturer: Option<String>,
    /// Chip name, free text
    pub chip_name: Option<String>,
    /// Named field values, in schema order when produced by decode
    pub settings: Vec<Setting>,
}

/// Raw TOML shape of a persisted configuration
#[derive(Debug, serde::Deserialize)]
struct TomlConfigFile {
    family: String,
    peripheral: String,
    interface: Option<String>,
    instance: Option<u32>,
    manufacturer: Option<String>,
    chip_name: Option<String>,
    #[serde(default)]
    settings: toml::Table,
}

impl MemoryConfig {
    /// Create an empty configuration, validating the combination
    pub fn new(
        family: Family,
        peripheral: Peripheral,
        interface: Option<MemInterface>,
    ) -> Result<Self> {
        // Fails with UnsupportedConfiguration when the family lacks the
        // peripheral.
        registry::lookup_schema(family, peripheral)?;
        Ok(MemoryConfig {
            family,
            peripheral,
            interface,
            instance: None,
            manufacturer: None,
            chip_name: None,
            settings: Vec::new(),
        })
    }

    /// Build a configuration by decoding raw option words
    pub fn from_option_words(
        family: Family,
        peripheral: Peripheral,
        interface: Option<MemInterface>,
        words: &[u32],
    ) -> Result<Self> {
        let schema = registry::lookup_schema(family, peripheral)?;
        let settings = codec::decode(schema, words)?;
        let mut config = MemoryConfig::new(family, peripheral, interface)?;
        config.settings = settings;
        Ok(config)
    }

    /// Build a configuration from a known chip preset
    pub fn from_preset(family: Family, chip_name: &str, interface: MemInterface) -> Result<Self> {
        let preset = registry::find_preset(family, chip_name, interface)?;
        let mut config = MemoryConfig::from_option_words(
            family,
            preset.peripheral,
            Some(interface),
            preset.option_words,
        )?;
        config.manufacturer = Some(preset.manufacturer.to_string());
        config.chip_name = Some(preset.chip_name.to_string());
        Ok(config)
    }

    /// Encode the configuration back into raw option words
    pub fn to_option_words(&self) -> Result<Vec<u32>> {
        let schema = registry::lookup_schema(self.family, self.peripheral)?;
        codec::encode(schema, &self.settings)
    }

    /// Get a named setting
    pub fn get(&self, name: &str) -> Option<u32> {
        self.settings
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value)
    }

    /// Assign a named setting, replacing any previous value
    ///
    /// The name must exist in the schema; the value itself is validated
    /// at encode time together with all others.
    pub fn set(&mut self, name: &str, value: u32) -> Result<()> {
        let schema = registry::lookup_schema(self.family, self.peripheral)?;
        if schema.field(name).is_none() {
            return Err(Error::ConfigFormat(format!(
                "unknown setting '{name}' for {}",
                self.peripheral
            )));
        }
        match self.settings.iter_mut().find(|s| s.name == name) {
            Some(setting) => setting.value = value,
            None => self.settings.push(Setting::new(name, value)),
        }
        Ok(())
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TomlConfigFile =
            toml::from_str(content).map_err(|e| Error::ConfigFormat(e.to_string()))?;

        let family: Family = file.family.parse()?;
        let peripheral: Peripheral = file.peripheral.parse()?;
        let interface = match &file.interface {
            Some(name) => Some(name.parse::<MemInterface>()?),
            None => None,
        };
        let schema = registry::lookup_schema(family, peripheral)?;

        let mut settings = Vec::new();
        for (name, value) in &file.settings {
            if schema.field(name).is_none() {
                return Err(Error::ConfigFormat(format!(
                    "unknown setting '{name}' for {peripheral}"
                )));
            }
            settings.push(Setting::new(name.clone(), toml_value_as_u32(name, value)?));
        }

        if let Some(instance) = file.instance {
            let instances = registry::peripheral_instances(family, peripheral)?;
            if !instances.contains(&instance) {
                return Err(Error::UnsupportedConfiguration(format!(
                    "{family} {peripheral} has no instance {instance} (available: {instances:?})"
                )));
            }
        }

        Ok(MemoryConfig {
            family,
            peripheral,
            interface,
            instance: file.instance,
            manufacturer: file.manufacturer,
            chip_name: file.chip_name,
            settings,
        })
    }

    /// Render the configuration as annotated TOML
    ///
    /// Field descriptions are emitted as comments above each value, and
    /// settings are written in schema order, so a save/load cycle keeps
    /// values exact and ordering stable.
    pub fn to_toml_string(&self) -> Result<String> {
        let schema = registry::lookup_schema(self.family, self.peripheral)?;

        let mut out = String::new();
        out.push_str(&format!(
            "# Memory configuration for {} / {}.\n",
            self.family, self.peripheral
        ));
        out.push_str(&format!("family = \"{}\"\n", self.family));
        out.push_str(&format!("peripheral = \"{}\"\n", self.peripheral));
        if let Some(interface) = self.interface {
            out.push_str(&format!("interface = \"{interface}\"\n"));
        }
        if let Some(instance) = self.instance {
            out.push_str(&format!("instance = {instance}\n"));
        }
        if let Some(manufacturer) = &self.manufacturer {
            out.push_str(&format!("manufacturer = \"{manufacturer}\"\n"));
        }
        if let Some(chip_name) = &self.chip_name {
            out.push_str(&format!("chip_name = \"{chip_name}\"\n"));
        }
        out.push_str("\n[settings]\n");

        for field in schema.fields() {
            let Some(value) = self.get(field.name) else {
                continue;
            };
            out.push_str(&format!("# {}\n", field.description));
            out.push_str(&format!("# Allowed: {}.\n", field.domain));
            if field.width > 4 {
                out.push_str(&format!("{} = 0x{:X}\n", field.name, value));
            } else {
                out.push_str(&format!("{} = {}\n", field.name, value));
            }
        }
        Ok(out)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        log::debug!("Loading configuration from {}", path.as_ref().display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save the configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Accept TOML integers as well as "0x.." strings
fn toml_value_as_u32(name: &str, value: &toml::Value) -> Result<u32> {
    match value {
        toml::Value::Integer(n) => u32::try_from(*n).map_err(|_| {
            Error::ConfigFormat(format!("setting '{name}' does not fit in 32 bits: {n}"))
        }),
        toml::Value::String(s) => {
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s);
            let radix = if digits.len() == s.len() { 10 } else { 16 };
            u32::from_str_radix(digits, radix).map_err(|_| {
                Error::ConfigFormat(format!("setting '{name}' is not a number: {s}"))
            })
        }
        other => Err(Error::ConfigFormat(format!(
            "setting '{name}' must be a number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_combination() {
        assert!(MemoryConfig::new(Family::Rt118x, Peripheral::FlexspiNand, None).is_ok());
        assert!(matches!(
            MemoryConfig::new(Family::Rw61x, Peripheral::Sd, None),
            Err(Error::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn decode_then_encode_is_stable() {
        let config = MemoryConfig::from_option_words(
            Family::Rt118x,
            Peripheral::FlexspiNor,
            None,
            &[0xC102_0026],
        )
        .unwrap();
        assert_eq!(config.to_option_words().unwrap(), vec![0xC102_0026]);

        let config = MemoryConfig::from_option_words(
            Family::Lpc55s3x,
            Peripheral::FlexspiNor,
            None,
            &[0xC100_0007, 0x0000_0001],
        )
        .unwrap();
        assert_eq!(
            config.to_option_words().unwrap(),
            vec![0xC100_0007, 0x0000_0001]
        );
    }

    #[test]
    fn preset_carries_chip_metadata() {
        let config =
            MemoryConfig::from_preset(Family::Rt5xx, "W25QxxxJV", MemInterface::QuadSpi).unwrap();
        assert_eq!(config.peripheral, Peripheral::FlexspiNor);
        assert_eq!(config.manufacturer.as_deref(), Some("Winbond"));
        assert_eq!(config.chip_name.as_deref(), Some("W25QxxxJV"));
        assert_eq!(config.to_option_words().unwrap(), vec![0xC000_0207]);
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let config = MemoryConfig::from_option_words(
            Family::Rt118x,
            Peripheral::FlexspiNand,
            Some(MemInterface::QuadSpi),
            &[0xC101_0026, 0x0000_00EF],
        )
        .unwrap();
        let text = config.to_toml_string().unwrap();
        let reloaded = MemoryConfig::from_toml_str(&text).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(
            reloaded.to_option_words().unwrap(),
            vec![0xC101_0026, 0x0000_00EF]
        );
    }

    #[test]
    fn save_emits_field_comments() {
        let config = MemoryConfig::from_option_words(
            Family::Rt118x,
            Peripheral::Sd,
            None,
            &[0xD000_0002],
        )
        .unwrap();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("# uSDHC peripheral instance"));
        assert!(text.contains("instance = 2"));
    }

    #[test]
    fn hand_written_file_with_hex_strings() {
        let text = r#"
family = "rt118x"
peripheral = "flexspi_nand"
interface = "quad_spi"

[settings]
option_size = 1
flash_size = 1
page_size = 2
max_freq = 6
manufacturer_id = "0xEF"
"#;
        let config = MemoryConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config.to_option_words().unwrap(),
            vec![0xC101_0026, 0x0000_00EF]
        );
    }

    #[test]
    fn unknown_setting_is_rejected() {
        let text = r#"
family = "rt118x"
peripheral = "sd"

[settings]
instance = 1
voltage = 3
"#;
        assert!(matches!(
            MemoryConfig::from_toml_str(text),
            Err(Error::ConfigFormat(_))
        ));
    }

    #[test]
    fn bad_instance_is_rejected() {
        let text = r#"
family = "rt5xx"
peripheral = "flexspi_nor"
instance = 7

[settings]
max_freq = 7
"#;
        assert!(matches!(
            MemoryConfig::from_toml_str(text),
            Err(Error::UnsupportedConfiguration(_))
        ));
    }
}
