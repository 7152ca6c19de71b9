//! Cycle-count micro benchmarks.
//!
//! On x86_64 the counter is the TSC, fenced with `lfence` on both sides so
//! the measured loop cannot drift across the reads. Elsewhere it is
//! monotonic nanoseconds since the first read.

use std::hint::black_box;

use dodo::{Code, FailureContext, Policy, Status};
use serde::Serialize;
use tracing::debug;

use crate::config::StressConfig;
use crate::scenarios::{
    DmaBuffer, MarketData, dma_check, fetch_or_cached, nested_logic, sensor_limits,
};

/// Unit of [`BenchResult::total_cycles`].
#[cfg(target_arch = "x86_64")]
pub const COUNTER_UNIT: &str = "cycles";
#[cfg(not(target_arch = "x86_64"))]
pub const COUNTER_UNIT: &str = "ns";

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_counter() -> u64 {
    use core::arch::x86_64::{_mm_lfence, _rdtsc};
    // SAFETY: lfence and rdtsc are available on every x86_64 CPU.
    unsafe {
        _mm_lfence();
        let t = _rdtsc();
        _mm_lfence();
        t
    }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
fn read_counter() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let nanos = EPOCH.get_or_init(Instant::now).elapsed().as_nanos();
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub label: String,
    pub iterations: u64,
    pub total_cycles: u64,
    pub avg_cycles: f64,
    pub ok_count: u64,
    pub fail_count: u64,
    /// Folded status codes; keeps the loop body observable.
    pub sink: u64,
}

/// Call `f` `iterations` times and count cycles around the whole loop.
///
/// `f` receives the iteration index.
pub fn run_bench<F>(label: &str, iterations: u64, mut f: F) -> BenchResult
where
    F: FnMut(u64) -> Status,
{
    let mut ok_count = 0u64;
    let mut fail_count = 0u64;
    let mut sink = 0u64;

    let start = read_counter();
    for i in 0..iterations {
        let status = black_box(f(black_box(i)));
        if status.ok() {
            ok_count += 1;
        } else {
            fail_count += 1;
        }
        sink = sink.wrapping_add(u64::from(status.code().as_u16()));
    }
    let total_cycles = read_counter().saturating_sub(start);

    let avg_cycles = if iterations == 0 {
        0.0
    } else {
        total_cycles as f64 / iterations as f64
    };
    debug!(label, total_cycles, avg_cycles, "bench finished");

    BenchResult {
        label: label.to_string(),
        iterations,
        total_cycles,
        avg_cycles,
        ok_count,
        fail_count,
        sink: black_box(sink),
    }
}

fn quiet_fallback(ctx: &FailureContext) -> Status {
    Status::fail(ctx.code())
}

/// The benchmark set printed by the harness: a bare comparison baseline,
/// then each scenario on its passing and failing path.
pub fn standard_suite(config: &StressConfig) -> Vec<BenchResult> {
    let n = config.run.iterations;
    let policy = Policy::new().with_fallback_handler(quiet_fallback);
    let good = MarketData::VALID;
    let bad = MarketData::ZERO_PRICE;
    let buffer = DmaBuffer::new();
    let base = buffer.0.as_ptr();
    let reading = 500;
    let spike = 4096;
    let mut cache_hits = 0u64;

    let results = vec![
        run_bench("bare_comparison", n, |_| {
            let md = black_box(&good);
            if md.price > 0.0 && md.volume > 0 {
                Status::ok_status()
            } else {
                Status::fail(Code::PreconditionFailed)
            }
        }),
        run_bench("nested_require/pass", n, |_| {
            nested_logic(&policy, black_box(&good))
        }),
        run_bench("nested_require/fail", n, |_| {
            nested_logic(&policy, black_box(&bad))
        }),
        run_bench("sensor/pass", n, |_| {
            sensor_limits(&policy, black_box(Some(&reading)))
        }),
        run_bench("sensor/null", n, |_| sensor_limits(&policy, black_box(None))),
        run_bench("sensor/range", n, |_| {
            sensor_limits(&policy, black_box(Some(&spike)))
        }),
        run_bench("dma/aligned", n, |_| dma_check(&policy, black_box(base))),
        run_bench("dma/misaligned", n, |_| {
            dma_check(&policy, black_box(base.wrapping_add(8)))
        }),
        run_bench("fallback_or/link_down", n, |_| {
            fetch_or_cached(&policy, black_box(false), &mut cache_hits)
        }),
    ];

    debug!(cache_hits, "standard suite finished");
    results
}
