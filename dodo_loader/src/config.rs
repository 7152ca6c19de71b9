//! Loader configuration.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "dodo-loader"
//!
//! [limits]
//! max_size = 4194304
//! page_alignment = 4096
//!
//! [[reserved]]
//! start = 0x0
//! len = 0x1000
//!
//! [[modules]]
//! name = "StorageCtl"
//! size = 65536
//! load_address = 0x200000
//! flags = ["signed"]
//! ```

use dodo_common::config::{ConfigError, SharedConfig};
use serde::Deserialize;

use crate::descriptor::{DescriptorSpec, ModuleDescriptor};
use crate::error::LoaderError;
use crate::memory::{MAX_RESERVED_REGIONS, Region, ReservedRegions};

/// Default largest accepted module, 4 MiB.
pub const DEFAULT_MAX_SIZE: usize = 4 * 1024 * 1024;

/// Default page size.
pub const DEFAULT_PAGE_ALIGNMENT: usize = 4096;

/// Size and placement rules every module must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadLimits {
    pub max_size: usize,
    pub min_size: usize,
    pub page_alignment: usize,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            min_size: 1,
            page_alignment: DEFAULT_PAGE_ALIGNMENT,
        }
    }
}

impl LoadLimits {
    /// Reject limits the validation chain would treat as a fatal loader fault.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_alignment.is_power_of_two() {
            return Err(ConfigError::ValidationError(format!(
                "page_alignment {} is not a power of two",
                self.page_alignment
            )));
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::ValidationError(format!(
                "min_size {} exceeds max_size {}",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}

/// Root of `loader.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub limits: LoadLimits,
    #[serde(default)]
    pub reserved: Vec<Region>,
    #[serde(default)]
    pub modules: Vec<DescriptorSpec>,
}

impl LoaderConfig {
    /// Configuration used when no file is given.
    ///
    /// Covers one accepted module and one rejection per recoverable check,
    /// including the classic misaligned `NetworkCard` at `0x1235` and a
    /// module aimed at the reserved zero page.
    pub fn builtin() -> Self {
        let spec = |name: Option<&str>, size, load_address, flags: &[&str]| DescriptorSpec {
            name: name.and_then(|n| n.try_into().ok()),
            size,
            load_address,
            flags: flags.iter().map(|f| f.to_string()).collect(),
        };

        Self {
            shared: SharedConfig::with_service_name("dodo-loader"),
            limits: LoadLimits::default(),
            reserved: vec![Region::new(0x0, 0x1000)],
            modules: vec![
                spec(Some("StorageCtl"), 64 * 1024, 0x20_0000, &["signed", "executable"]),
                spec(Some("NetworkCard"), 1024, 0x1235, &["signed", "executable"]),
                spec(None, 2048, 0x40_0000, &["signed"]),
                spec(Some("GpuFirmware"), 8 * 1024 * 1024, 0x80_0000, &["signed"]),
                spec(Some("UnsignedBlob"), 4096, 0x30_0000, &["relocatable"]),
                spec(Some("BootSector"), 512, 0x0, &["signed"]),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.limits.validate()?;
        if self.reserved.len() > MAX_RESERVED_REGIONS {
            return Err(ConfigError::ValidationError(format!(
                "{} reserved regions, at most {MAX_RESERVED_REGIONS} allowed",
                self.reserved.len()
            )));
        }
        Ok(())
    }

    pub fn memory_map(&self) -> Result<ReservedRegions, LoaderError> {
        ReservedRegions::from_regions(self.reserved.iter().copied())
    }

    pub fn descriptors(&self) -> Result<Vec<ModuleDescriptor>, LoaderError> {
        self.modules.iter().map(ModuleDescriptor::try_from).collect()
    }
}
