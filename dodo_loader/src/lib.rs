//! # Dodo Module Loader
//!
//! Validates untrusted module descriptors before they are mapped. Every
//! step is a Dodo check, so rejection reasons come back as a
//! [`Status`](dodo::Status) and a corrupt memory map halts the process
//! through the panic hook; a descriptor that merely hits a reserved window
//! is rejected like any other.
//!
//! ## Validation Chain
//!
//! 1. Descriptor present: `NullPointer`
//! 2. Name present: `NullPointer`
//! 3. Size within `[min_size, max_size]`: `OutOfRange`
//! 4. Page alignment is a power of two: fatal
//! 5. Load address page-aligned: `Misaligned`
//! 6. Signed: `PreconditionFailed`
//! 7. Target clear of reserved windows: `OutOfRange`
//! 8. Memory map agrees the region is available: fatal
//!
//! The first failing step ends the chain.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod memory;
pub mod validate;

pub use config::{LoadLimits, LoaderConfig};
pub use descriptor::{ModuleDescriptor, ModuleFlags, ModuleName};
pub use error::LoaderError;
pub use memory::{AlwaysAvailable, MemoryMap, Region, ReservedRegions};
pub use validate::validate_and_load;
