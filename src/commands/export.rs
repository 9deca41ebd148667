//! Export command implementation

use std::path::Path;

use memcfg_core::{MemoryConfig, Result};

/// Export a configuration file back into raw option words
pub fn run(config: &Path) -> Result<()> {
    let config = MemoryConfig::load(config)?;
    let words = config.to_option_words()?;

    log::debug!(
        "Exporting {} option word(s) for {} / {}",
        words.len(),
        config.family,
        config.peripheral
    );
    for (i, word) in words.iter().enumerate() {
        println!("Opt{}: 0x{:08X}", i, word);
    }
    Ok(())
}
