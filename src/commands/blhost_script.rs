//! Blhost-script command implementation

use std::path::Path;

use memcfg_core::{script, MemoryConfig, Result};

/// Generate the blhost script for a configuration file
pub fn run(config: &Path, instance: Option<u32>, fcb: Option<&Path>) -> Result<()> {
    let config = MemoryConfig::load(config)?;
    let fcb = fcb.map(|p| p.to_string_lossy().into_owned());

    let script = script::generate(&config, instance, fcb.as_deref())?;
    print!("{}", script);
    Ok(())
}
