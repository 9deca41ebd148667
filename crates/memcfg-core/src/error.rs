//! Error types for memcfg-core

use crate::registry::{Family, Peripheral};

/// Core error type
///
/// All operations either fully succeed or fail with one of these
/// variants; no partial results are ever returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Chip family is not present in the registry
    #[error("unknown chip family: {0}")]
    UnknownFamily(String),

    /// Peripheral name is not recognized at all
    #[error("unknown peripheral: {0}")]
    UnknownPeripheral(String),

    /// The family/peripheral/interface combination is not in the registry
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// Supplied option word count does not match the schema
    #[error(
        "{peripheral} takes {min}..={max} option words, got {actual}"
    )]
    WordCountMismatch {
        /// Peripheral whose schema was applied
        peripheral: Peripheral,
        /// Minimum word count accepted by the schema
        min: usize,
        /// Maximum word count accepted by the schema
        max: usize,
        /// Word count actually supplied
        actual: usize,
    },

    /// A required field with no default is missing from the configuration
    #[error("missing required setting '{field}' for {peripheral}")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
        /// Peripheral whose schema requires the field
        peripheral: Peripheral,
    },

    /// A field value violates its declared domain
    #[error("setting '{field}' = {value} is out of range (allowed: {allowed})")]
    FieldValueOutOfRange {
        /// Name of the offending field
        field: String,
        /// The rejected value
        value: u32,
        /// Human-readable description of the allowed domain
        allowed: String,
    },

    /// Script generation was requested for an unsupported target
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Configuration file is malformed
    #[error("invalid configuration file: {0}")]
    ConfigFormat(String),

    /// I/O error at the configuration file boundary
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an unsupported family/peripheral registry miss
    pub(crate) fn no_peripheral(family: Family, peripheral: Peripheral) -> Self {
        Error::UnsupportedConfiguration(format!(
            "family {family} has no {peripheral} peripheral"
        ))
    }
}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
