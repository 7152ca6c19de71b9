//! The loader's view of physical memory.

use serde::Deserialize;

use crate::error::LoaderError;

/// Reserved regions held by [`ReservedRegions`].
pub const MAX_RESERVED_REGIONS: usize = 16;

/// The loader's view of which ranges may be mapped.
///
/// Two questions with different owners. [`is_reserved`](MemoryMap::is_reserved)
/// is asked about untrusted input: a descriptor aimed at a reserved window is
/// rejected like any other bad descriptor. [`is_region_available`](MemoryMap::is_region_available)
/// is asked only after that check passed; `false` there means the map
/// contradicts itself, and validation halts.
pub trait MemoryMap {
    /// True if `[addr, addr + size)` touches a window no module may occupy.
    fn is_reserved(&self, _addr: usize, _size: usize) -> bool {
        false
    }

    fn is_region_available(&self, addr: usize, size: usize) -> bool;
}

/// Every region is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl MemoryMap for AlwaysAvailable {
    fn is_region_available(&self, _addr: usize, _size: usize) -> bool {
        true
    }
}

/// Half-open address range `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Region {
    pub start: usize,
    pub len: usize,
}

impl Region {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end, saturating at the top of the address space.
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub const fn overlaps(&self, other: &Region) -> bool {
        self.len != 0 && other.len != 0 && self.start < other.end() && other.start < self.end()
    }
}

/// A fixed list of regions that must never be mapped over.
#[derive(Debug, Clone, Default)]
pub struct ReservedRegions {
    regions: heapless::Vec<Region, MAX_RESERVED_REGIONS>,
}

impl ReservedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, region: Region) -> Result<(), LoaderError> {
        self.regions
            .push(region)
            .map_err(|_| LoaderError::TooManyRegions)
    }

    pub fn from_regions<I>(regions: I) -> Result<Self, LoaderError>
    where
        I: IntoIterator<Item = Region>,
    {
        let mut map = Self::new();
        for region in regions {
            map.reserve(region)?;
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl MemoryMap for ReservedRegions {
    fn is_reserved(&self, addr: usize, size: usize) -> bool {
        let wanted = Region::new(addr, size);
        self.regions.iter().any(|r| r.overlaps(&wanted))
    }

    fn is_region_available(&self, addr: usize, size: usize) -> bool {
        !self.is_reserved(addr, size)
    }
}
