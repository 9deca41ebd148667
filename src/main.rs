//! memcfg - Memory configuration tool for NXP bootable external memories
//!
//! Translates between human-readable configuration files and the packed
//! 32-bit option words used to bootstrap flash/SD memory controllers,
//! and emits the blhost scripts that apply them on target.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let result = match cli.command {
        Commands::Parse {
            family,
            peripheral,
            word,
            chip,
            interface,
            output,
        } => commands::parse::run(
            &family,
            peripheral.as_deref(),
            &word,
            chip.as_deref(),
            interface.as_deref(),
            &output,
        ),
        Commands::Export { config } => commands::export::run(&config),
        Commands::FamilyInfo { family, peripheral } => {
            commands::family_info::run(family.as_deref(), peripheral.as_deref())
        }
        Commands::GetTemplates { family, output } => {
            commands::templates::run(&family, &output)
        }
        Commands::BlhostScript {
            config,
            instance,
            fcb,
        } => commands::blhost_script::run(&config, instance, fcb.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
