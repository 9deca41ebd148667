//! Command implementations

pub mod blhost_script;
pub mod export;
pub mod family_info;
pub mod parse;
pub mod templates;
