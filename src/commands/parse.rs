//! Parse command implementation

use std::path::Path;

use memcfg_core::registry::{Family, MemInterface, Peripheral};
use memcfg_core::{Error, MemoryConfig, Result};

/// Parse raw option words or a known chip into a configuration file
pub fn run(
    family: &str,
    peripheral: Option<&str>,
    words: &[u32],
    chip: Option<&str>,
    interface: Option<&str>,
    output: &Path,
) -> Result<()> {
    let family: Family = family.parse()?;
    let interface = match interface {
        Some(name) => Some(name.parse::<MemInterface>()?),
        None => None,
    };

    let config = match (chip, words.is_empty()) {
        (Some(chip), _) => {
            let interface = interface.ok_or_else(|| {
                Error::UnsupportedConfiguration(
                    "--chip requires --interface to pick the option words".to_string(),
                )
            })?;
            MemoryConfig::from_preset(family, chip, interface)?
        }
        (None, false) => {
            let peripheral: Peripheral = peripheral
                .ok_or_else(|| {
                    Error::UnsupportedConfiguration(
                        "--word requires --peripheral to pick the schema".to_string(),
                    )
                })?
                .parse()?;
            MemoryConfig::from_option_words(family, peripheral, interface, words)?
        }
        (None, true) => {
            return Err(Error::UnsupportedConfiguration(
                "nothing to parse, pass either --word or --chip".to_string(),
            ))
        }
    };

    config.save(output)?;
    log::info!(
        "Parsed {} / {} configuration into {}",
        config.family,
        config.peripheral,
        output.display()
    );
    println!("Configuration written to {}", output.display());
    Ok(())
}
