//! # Dodo Stress Harness
//!
//! Exercises the check primitives the way production callers use them and
//! measures what they cost.
//!
//! - [`scenarios`]: representative call sites (market data, DMA, sensors)
//! - [`hooks`]: recording, counting and exit-with-code policy hooks
//! - [`unit`]: the correctness suite, including a fork-based death test
//! - [`bench`]: cycle-count micro benchmarks
//! - [`report`]: table and JSON output

pub mod bench;
pub mod config;
pub mod error;
pub mod hooks;
pub mod report;
pub mod scenarios;
pub mod unit;

pub use bench::{BenchResult, run_bench, standard_suite};
pub use config::{RunSettings, StressConfig};
pub use error::StressError;
pub use report::StressReport;
pub use unit::{Outcome, UnitCheck, UnitReport, run_unit_checks};
