//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "memcfg")]
#[command(author, version, about = "Memory configuration tool for NXP bootable external memories", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse raw option words (or a known chip) into a configuration file
    Parse {
        /// Chip family (see family-info for the supported list)
        #[arg(short, long)]
        family: String,

        /// Peripheral type (required with --word)
        #[arg(short, long)]
        peripheral: Option<String>,

        /// Raw option word, repeatable (hex or decimal)
        #[arg(short, long = "word", value_parser = parse_hex_u32)]
        word: Vec<u32>,

        /// Known chip name to take the option words from
        #[arg(short = 'm', long)]
        chip: Option<String>,

        /// Interface the chip is attached over (required with --chip)
        #[arg(short, long)]
        interface: Option<String>,

        /// Output configuration file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export a configuration file back into raw option words
    Export {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List supported families, peripherals and known chips
    FamilyInfo {
        /// Restrict the listing to one family
        #[arg(short, long)]
        family: Option<String>,

        /// Restrict the listing to one peripheral
        #[arg(short, long)]
        peripheral: Option<String>,
    },

    /// Write annotated configuration templates for a family
    GetTemplates {
        /// Chip family
        #[arg(short, long)]
        family: String,

        /// Output directory for the template files
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate the blhost script applying a configuration
    BlhostScript {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,

        /// Peripheral instance to configure
        #[arg(short = 'x', long, alias = "ix")]
        instance: Option<u32>,

        /// Output path for the FCB read back on target (default fcb.bin)
        #[arg(long)]
        fcb: Option<PathBuf>,
    },
}
