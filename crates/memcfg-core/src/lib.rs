//! memcfg-core - Memory configuration library for NXP bootable memories
//!
//! This crate maps between human-editable memory configurations and the
//! packed 32-bit option words understood by the boot ROM, and generates
//! the blhost command scripts that apply them on target.
//!
//! # Example
//!
//! ```
//! use memcfg_core::registry::{Family, MemInterface};
//! use memcfg_core::{script, MemoryConfig};
//!
//! let config =
//!     MemoryConfig::from_preset(Family::Rt118x, "W25QxxxJV", MemInterface::QuadSpi).unwrap();
//! assert_eq!(config.to_option_words().unwrap(), vec![0xC0000207]);
//!
//! let blhost = script::generate(&config, Some(1), None).unwrap();
//! print!("{blhost}");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod schema;
pub mod script;
pub mod template;

pub use codec::Setting;
pub use config::MemoryConfig;
pub use error::{Error, Result};
