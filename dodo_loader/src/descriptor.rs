//! Module descriptors as handed to the loader by untrusted code.

use std::fmt;

use bitflags::bitflags;
use serde::Deserialize;

use crate::error::LoaderError;

/// Capacity of a module name in bytes.
pub const MAX_NAME_LEN: usize = 64;

/// Fixed-capacity module name.
pub type ModuleName = heapless::String<MAX_NAME_LEN>;

bitflags! {
    /// Attributes claimed by a module image.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModuleFlags: u8 {
        /// Image carries a verified signature.
        const SIGNED = 0x01;
        /// Image contains executable sections.
        const EXECUTABLE = 0x02;
        /// Image may be placed at any page-aligned address.
        const RELOCATABLE = 0x04;
    }
}

impl ModuleFlags {
    /// Parse flag names as written in config files (`"SIGNED"`, `"signed"`).
    pub fn from_names<'a, I>(names: I) -> Result<Self, LoaderError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().try_fold(Self::empty(), |acc, name| {
            Self::from_name(&name.to_ascii_uppercase())
                .map(|flag| acc | flag)
                .ok_or_else(|| LoaderError::UnknownFlag(name.to_string()))
        })
    }
}

/// What a module claims about itself.
///
/// Nothing here is trusted until [`validate_and_load`](crate::validate_and_load)
/// accepts it. A missing name is representable on purpose: descriptors come
/// from outside and the loader must reject them, not fail to parse them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: Option<ModuleName>,
    pub size: usize,
    pub load_address: usize,
    pub flags: ModuleFlags,
}

impl ModuleDescriptor {
    pub fn new(
        name: Option<&str>,
        size: usize,
        load_address: usize,
        flags: ModuleFlags,
    ) -> Result<Self, LoaderError> {
        let name = name
            .map(|n| ModuleName::try_from(n).map_err(|_| LoaderError::NameTooLong(n.to_string())))
            .transpose()?;
        Ok(Self {
            name,
            size,
            load_address,
            flags,
        })
    }

    /// Name for log lines; `<unnamed>` when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes @ {:#x}, {:?})",
            self.display_name(),
            self.size,
            self.load_address,
            self.flags
        )
    }
}

/// A descriptor as written in `[[modules]]` of `loader.toml`.
///
/// ```toml
/// [[modules]]
/// name = "NetworkCard"
/// size = 1024
/// load_address = 0x1235
/// flags = ["signed", "executable"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptorSpec {
    /// Parsed straight into the fixed-capacity buffer; longer names are a
    /// parse error.
    #[serde(default)]
    pub name: Option<ModuleName>,
    pub size: usize,
    pub load_address: usize,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl TryFrom<&DescriptorSpec> for ModuleDescriptor {
    type Error = LoaderError;

    fn try_from(spec: &DescriptorSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            name: spec.name.clone(),
            size: spec.size,
            load_address: spec.load_address,
            flags: ModuleFlags::from_names(spec.flags.iter().map(String::as_str))?,
        })
    }
}
