//! Configuration template emitter
//!
//! Renders annotated TOML skeletons from registry schema metadata, one
//! per peripheral, listing every field with its description, allowed
//! domain and default. Purely derived from registry state, so the output
//! is deterministic.

use crate::error::Result;
use crate::registry::{self, Family, MemInterface, Peripheral};
use crate::schema::Domain;

/// Example interface written into the skeleton per peripheral
fn example_interface(peripheral: Peripheral) -> MemInterface {
    match peripheral {
        Peripheral::FlexspiNor | Peripheral::FlexspiNand => MemInterface::QuadSpi,
        Peripheral::Sd => MemInterface::Sd,
        Peripheral::Mmc => MemInterface::Mmc,
    }
}

/// Placeholder value for fields without a default
fn placeholder(domain: &Domain) -> u32 {
    match domain {
        Domain::Any => 0,
        Domain::Range { min, .. } => *min,
        Domain::Enum(entries) => entries.first().map(|(v, _)| *v).unwrap_or(0),
    }
}

/// Render the annotated template for one family/peripheral pair
pub fn emit_template(family: Family, peripheral: Peripheral) -> Result<String> {
    let schema = registry::lookup_schema(family, peripheral)?;

    let mut out = String::new();
    out.push_str(&format!(
        "# Memory configuration template for {family} / {peripheral}.\n"
    ));
    out.push_str("# Fill in the settings below, then run 'memcfg export' on this file.\n");
    out.push_str(&format!("family = \"{family}\"\n"));
    out.push_str(&format!("peripheral = \"{peripheral}\"\n"));
    out.push_str(&format!(
        "interface = \"{}\"\n",
        example_interface(peripheral)
    ));
    out.push_str("# chip_name = \"\"\n");
    out.push_str("# manufacturer = \"\"\n");
    out.push_str("\n[settings]\n");

    for field in schema.fields() {
        if field.constant {
            continue;
        }
        out.push_str(&format!("# {}\n", field.description));
        match field.default {
            Some(default) => {
                out.push_str(&format!(
                    "# Allowed: {}. Default: {default}.\n",
                    field.domain
                ));
                // The skeleton lists every word's fields, so the size
                // field must declare all of them
                let value = if schema.size_field == Some(field.name) {
                    (schema.max_words() - schema.min_words) as u32
                } else {
                    default
                };
                out.push_str(&format!("{} = {value}\n", field.name));
            }
            None => {
                out.push_str(&format!(
                    "# Allowed: {}. Required, no default.\n",
                    field.domain
                ));
                out.push_str(&format!(
                    "{} = {}\n",
                    field.name,
                    placeholder(&field.domain)
                ));
            }
        }
    }
    Ok(out)
}

/// Render the templates for every peripheral of a family
pub fn emit_all(family: Family) -> Result<Vec<(Peripheral, String)>> {
    let mut templates = Vec::new();
    for caps in registry::family_info(family).peripherals {
        templates.push((caps.peripheral, emit_template(family, caps.peripheral)?));
    }
    Ok(templates)
}
