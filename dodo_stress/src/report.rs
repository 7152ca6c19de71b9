//! Harness output.

use std::fmt;

use serde::Serialize;

use crate::bench::{BenchResult, COUNTER_UNIT};
use crate::error::StressError;
use crate::unit::{Outcome, UnitReport};

/// Everything one harness run produced.
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    pub service_name: String,
    /// Whether checks captured call sites in this build.
    pub capture_profile: &'static str,
    pub counter_unit: &'static str,
    pub unit: UnitReport,
    pub benches: Vec<BenchResult>,
}

impl StressReport {
    pub fn new(service_name: &str, unit: UnitReport, benches: Vec<BenchResult>) -> Self {
        let capture_profile = if dodo::call_site!().is_unknown() {
            "reduced"
        } else {
            "full"
        };
        Self {
            service_name: service_name.to_string(),
            capture_profile,
            counter_unit: COUNTER_UNIT,
            unit,
            benches,
        }
    }

    pub fn to_json(&self) -> Result<String, StressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Aligned plain-text table.
impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} capture, counter in {})",
            self.service_name, self.capture_profile, self.counter_unit
        )?;
        writeln!(f)?;

        writeln!(f, "{:<20} {:<8} DETAIL", "CHECK", "RESULT")?;
        for check in &self.unit.checks {
            let result = match check.outcome {
                Outcome::Passed => "PASS",
                Outcome::Failed => "FAIL",
                Outcome::Skipped => "SKIP",
            };
            writeln!(
                f,
                "{:<20} {:<8} {}",
                check.name,
                result,
                check.detail.as_deref().unwrap_or("")
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:<24} {:>12} {:>14} {:>10} {:>12} {:>12}",
            "BENCH", "ITERATIONS", "TOTAL", "AVG", "OK", "FAIL"
        )?;
        for b in &self.benches {
            writeln!(
                f,
                "{:<24} {:>12} {:>14} {:>10.2} {:>12} {:>12}",
                b.label, b.iterations, b.total_cycles, b.avg_cycles, b.ok_count, b.fail_count
            )?;
        }
        Ok(())
    }
}
