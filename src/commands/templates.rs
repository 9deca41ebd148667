//! Get-templates command implementation

use std::fs;
use std::path::Path;

use memcfg_core::registry::Family;
use memcfg_core::{template, Result};

/// Write one annotated template per peripheral of a family
pub fn run(family: &str, output: &Path) -> Result<()> {
    let family: Family = family.parse()?;

    fs::create_dir_all(output)?;
    for (peripheral, text) in template::emit_all(family)? {
        let path = output.join(format!("{}_{}.toml", family, peripheral));
        fs::write(&path, text)?;
        println!("Template written to {}", path.display());
    }
    Ok(())
}
