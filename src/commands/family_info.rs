//! Family-info command implementation

use memcfg_core::registry::{self, Family, Peripheral};
use memcfg_core::Result;

/// List families, peripherals and known chips from the registry
pub fn run(family: Option<&str>, peripheral: Option<&str>) -> Result<()> {
    let family_filter = match family {
        Some(name) => Some(name.parse::<Family>()?),
        None => None,
    };
    let peripheral_filter = match peripheral {
        Some(name) => Some(name.parse::<Peripheral>()?),
        None => None,
    };

    for family in registry::supported_families() {
        if family_filter.is_some_and(|f| f != *family) {
            continue;
        }
        println!("Family: {}", family);

        let info = registry::family_info(*family);
        for caps in info.peripherals {
            if peripheral_filter.is_some_and(|p| p != caps.peripheral) {
                continue;
            }
            let instances: Vec<String> =
                caps.instances.iter().map(|i| i.to_string()).collect();
            println!(
                "  Peripheral: {} (memory ID {}, instances: {})",
                caps.peripheral,
                caps.mem_id,
                instances.join(", ")
            );

            for preset in registry::presets_for(caps.peripheral) {
                let words: Vec<String> = preset
                    .option_words
                    .iter()
                    .enumerate()
                    .map(|(i, w)| format!("Opt{}: 0x{:08X}", i, w))
                    .collect();
                println!(
                    "    {} {} ({}): {}",
                    preset.manufacturer,
                    preset.chip_name,
                    preset.interface,
                    words.join(", ")
                );
            }
        }
    }
    Ok(())
}
