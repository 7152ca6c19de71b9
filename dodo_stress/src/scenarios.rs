//! Call sites shaped like real callers of the check primitives.

use dodo::{
    Code, Policy, Status, check_aligned, check_not_null, check_range, ensure, fallback_or,
    invariant, require, try_status,
};

/// A market data tick.
#[derive(Debug, Clone, Copy)]
pub struct MarketData {
    pub price: f64,
    pub volume: u32,
}

impl MarketData {
    pub const VALID: Self = Self {
        price: 150.25,
        volume: 1000,
    };
    pub const ZERO_PRICE: Self = Self {
        price: 0.0,
        volume: 1000,
    };
}

/// Two chained preconditions on a tick.
#[inline(never)]
pub fn nested_logic(policy: &Policy, md: &MarketData) -> Status {
    try_status!(require!(policy; md.price > 0.0, Code::PreconditionFailed));
    try_status!(require!(policy; md.volume > 0, Code::PreconditionFailed));
    Status::ok_status()
}

/// Notional value of a tick, checked on the way out.
#[inline(never)]
pub fn notional(policy: &Policy, md: &MarketData, out: &mut f64) -> Status {
    try_status!(nested_logic(policy, md));
    *out = md.price * f64::from(md.volume);
    ensure!(policy; out.is_finite() && *out > 0.0, Code::PostconditionFailed)
}

/// Alignment required of DMA buffers.
pub const DMA_ALIGNMENT: usize = 64;

/// A DMA-capable buffer.
#[repr(align(64))]
pub struct DmaBuffer(pub [u8; 256]);

impl DmaBuffer {
    pub const fn new() -> Self {
        Self([0; 256])
    }
}

impl Default for DmaBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(never)]
pub fn dma_check(policy: &Policy, buffer: *const u8) -> Status {
    check_aligned!(policy; buffer, DMA_ALIGNMENT, Code::Misaligned)
}

/// Highest raw reading a sensor may report.
pub const SENSOR_MAX: i32 = 1024;

/// Presence, then bounds, on a sensor reading.
#[inline(never)]
pub fn sensor_limits(policy: &Policy, sensor: Option<&i32>) -> Status {
    let Some(&value) = sensor else {
        return check_not_null!(policy; sensor, Code::NullPointer);
    };
    check_range!(policy; value, 0, SENSOR_MAX, Code::OutOfRange)
}

/// Fetch over a link, or serve from cache when the link is down.
#[inline(never)]
pub fn fetch_or_cached(policy: &Policy, link_up: bool, cache_hits: &mut u64) -> Status {
    let fetched = require!(policy; link_up, Code::ExternalFault);
    fallback_or(fetched, || {
        *cache_hits += 1;
        Status::ok_status()
    })
}

/// Consistency guard over a shared structure. Never returns if `corrupted`.
#[inline(never)]
pub fn corruption_guard(policy: &Policy, corrupted: bool) -> Status {
    invariant!(policy; !corrupted, Code::InvariantBroken);
    Status::ok_status()
}
