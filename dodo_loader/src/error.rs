//! Loader setup errors.
//!
//! These cover configuration and descriptor construction only. Validation
//! outcomes are [`Status`](dodo::Status) values, not errors.

use dodo_common::config::ConfigError;
use thiserror::Error;

use crate::descriptor::MAX_NAME_LEN;
use crate::memory::MAX_RESERVED_REGIONS;

#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    /// A descriptor listed a flag name that does not exist.
    #[error("unknown module flag '{0}'")]
    UnknownFlag(String),

    /// A module name does not fit the fixed-capacity name buffer.
    #[error("module name '{0}' exceeds {max} bytes", max = MAX_NAME_LEN)]
    NameTooLong(String),

    /// More reserved regions than the fixed-capacity memory map holds.
    #[error("too many reserved regions (max {max})", max = MAX_RESERVED_REGIONS)]
    TooManyRegions,

    /// Loading or validating the configuration file failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
