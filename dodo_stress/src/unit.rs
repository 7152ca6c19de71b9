//! The correctness suite.
//!
//! Each check returns `Err(detail)` on the first mismatch. The suite never
//! stops early; every check gets a line in the [`UnitReport`].

use std::fmt::Debug;
use std::thread;

use dodo::{Code, FailureContext, Policy, Severity, Status, call_site, require, try_status};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StressConfig;
use crate::hooks::HookSession;
use crate::scenarios::{
    DmaBuffer, MarketData, SENSOR_MAX, corruption_guard, dma_check, fetch_or_cached,
    nested_logic, notional, sensor_limits,
};

type CheckResult = Result<(), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitCheck {
    pub name: &'static str,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnitReport {
    pub checks: Vec<UnitCheck>,
}

impl UnitReport {
    fn record(&mut self, name: &'static str, result: CheckResult) {
        let (outcome, detail) = match result {
            Ok(()) => {
                debug!(check = name, "passed");
                (Outcome::Passed, None)
            }
            Err(detail) => {
                warn!(check = name, %detail, "failed");
                (Outcome::Failed, Some(detail))
            }
        };
        self.checks.push(UnitCheck {
            name,
            outcome,
            detail,
        });
    }

    fn skip(&mut self, name: &'static str, why: &str) {
        info!(check = name, why, "skipped");
        self.checks.push(UnitCheck {
            name,
            outcome: Outcome::Skipped,
            detail: Some(why.to_string()),
        });
    }

    pub fn failed(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.outcome == Outcome::Failed)
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn get(&self, name: &str) -> Option<&UnitCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Run every correctness check.
///
/// Holds a [`HookSession`] for the whole run.
pub fn run_unit_checks(config: &StressConfig) -> UnitReport {
    let session = HookSession::begin();
    let mut report = UnitReport::default();

    report.record("require_ensure", check_require_ensure(&session));
    report.record("not_null", check_not_null(&session));
    report.record("range", check_range(&session));
    report.record("aligned", check_aligned(&session));
    report.record("try_propagation", check_propagation(&session));
    report.record("fallback_or", check_fallback_or(&session));
    report.record("capture_profile", check_capture_profile(&session));
    report.record(
        "threaded_dispatch",
        check_threaded(&session, config.run.threads, config.run.iters_per_thread),
    );

    if !config.run.death_test {
        report.skip("fatal_invariant", "disabled by configuration");
    } else if cfg!(unix) {
        report.record("fatal_invariant", check_fatal_invariant());
    } else {
        report.skip("fatal_invariant", "fork is unix-only");
    }

    info!(
        checks = report.checks.len(),
        failed = report.failed(),
        "Unit checks complete"
    );
    report
}

// ── Helpers ─────────────────────────────────────────────────────────

fn expect_eq<T: PartialEq + Debug>(what: &str, got: T, want: T) -> CheckResult {
    if got == want {
        Ok(())
    } else {
        Err(format!("{what}: expected {want:?}, got {got:?}"))
    }
}

fn expect_code(what: &str, status: Status, want: Code) -> CheckResult {
    expect_eq(what, status.code(), want)
}

fn last_context(session: &HookSession, what: &str) -> Result<FailureContext, String> {
    session
        .take_last()
        .ok_or_else(|| format!("{what}: fallback was not invoked"))
}

// ── Checks ──────────────────────────────────────────────────────────

fn check_require_ensure(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();

    expect_code("valid tick", nested_logic(&policy, &MarketData::VALID), Code::Ok)?;
    expect_eq("calls after valid tick", session.recorded(), 0)?;

    expect_code(
        "zero price",
        nested_logic(&policy, &MarketData::ZERO_PRICE),
        Code::PreconditionFailed,
    )?;
    expect_eq("calls after zero price", session.recorded(), 1)?;
    let ctx = last_context(session, "zero price")?;
    expect_eq("zero price severity", ctx.severity(), Severity::Recoverable)?;

    let overflow = MarketData {
        price: f64::MAX,
        volume: 2,
    };
    let mut value = 0.0;
    expect_code(
        "overflowing notional",
        notional(&policy, &overflow, &mut value),
        Code::PostconditionFailed,
    )
}

fn check_not_null(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();

    expect_code("present sensor", sensor_limits(&policy, Some(&500)), Code::Ok)?;
    expect_code("absent sensor", sensor_limits(&policy, None), Code::NullPointer)?;
    let ctx = last_context(session, "absent sensor")?;
    expect_eq("absent sensor code", ctx.code(), Code::NullPointer)?;
    expect_eq("absent sensor severity", ctx.severity(), Severity::Recoverable)
}

fn check_range(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();

    for (reading, want) in [
        (0, Code::Ok),
        (500, Code::Ok),
        (SENSOR_MAX, Code::Ok),
        (-1, Code::OutOfRange),
        (SENSOR_MAX + 1, Code::OutOfRange),
    ] {
        expect_code(
            &format!("reading {reading}"),
            sensor_limits(&policy, Some(&reading)),
            want,
        )?;
    }
    expect_eq("range fallback calls", session.recorded(), 2)
}

fn check_aligned(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();

    let buffer = DmaBuffer::new();
    let base = buffer.0.as_ptr();
    expect_code("aligned DMA buffer", dma_check(&policy, base), Code::Ok)?;
    expect_code(
        "offset DMA buffer",
        dma_check(&policy, base.wrapping_add(1)),
        Code::Misaligned,
    )?;
    expect_code(
        "0x1235 on 4 KiB",
        policy.aligned(0x1235usize, 4096, Code::Misaligned, || call_site!()),
        Code::Misaligned,
    )?;
    expect_code(
        "0x1000 on 4 KiB",
        policy.aligned(0x1000usize, 4096, Code::Misaligned, || call_site!()),
        Code::Ok,
    )
}

fn check_propagation(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();
    let mut second_ran = false;

    let mut chain = |policy: &Policy| -> Status {
        try_status!(require!(policy; false, Code::PreconditionFailed));
        second_ran = true;
        try_status!(require!(policy; false, Code::InternalFault));
        Status::ok_status()
    };

    expect_code("two-step chain", chain(&policy), Code::PreconditionFailed)?;
    expect_eq("second step ran", second_ran, false)?;
    expect_eq("chain fallback calls", session.recorded(), 1)
}

fn check_fallback_or(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();
    let mut cache_hits = 0;

    expect_code("link up", fetch_or_cached(&policy, true, &mut cache_hits), Code::Ok)?;
    expect_eq("cache hits with link up", cache_hits, 0)?;
    expect_code("link down", fetch_or_cached(&policy, false, &mut cache_hits), Code::Ok)?;
    expect_eq("cache hits with link down", cache_hits, 1)?;
    expect_eq("fallback calls", session.recorded(), 1)
}

fn check_capture_profile(session: &HookSession) -> CheckResult {
    session.reset();
    let policy = session.recording_policy();
    let reading = 4096;

    let _ = sensor_limits(&policy, Some(&reading));
    let ctx = last_context(session, "capture")?;

    if call_site!().is_unknown() {
        return expect_eq("reduced site", ctx.site().is_unknown(), true);
    }
    expect_eq("expression", ctx.expr(), Some("value"))?;
    expect_eq(
        "file",
        ctx.file().is_some_and(|f| f.ends_with("scenarios.rs")),
        true,
    )?;
    expect_eq("line recorded", ctx.line() > 0, true)?;
    expect_eq(
        "function",
        ctx.function().is_some_and(|f| f.ends_with("sensor_limits")),
        true,
    )
}

fn check_threaded(session: &HookSession, threads: usize, iters_per_thread: u64) -> CheckResult {
    session.reset();
    let policy = session.counting_policy();
    let policy = &policy;

    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(move || {
                for i in 0..iters_per_thread {
                    let _ = require!(policy; i == u64::MAX, Code::PreconditionFailed);
                }
            });
        }
    });

    let want = threads as u64 * iters_per_thread;
    expect_eq("dispatches across threads", session.counted(), want)
}

#[cfg(unix)]
fn check_fatal_invariant() -> CheckResult {
    use crate::hooks::exit_with_code;
    use nix::sys::wait::{WaitStatus, waitpid};
    use nix::unistd::{ForkResult, fork};

    const RESUMED: i32 = 111;

    // SAFETY: the child runs one check and `_exit`s without returning.
    let fork_result = unsafe { fork() }.map_err(|e| format!("fork: {e}"))?;
    match fork_result {
        ForkResult::Child => {
            let policy = Policy::new().with_panic_handler(exit_with_code);
            let _ = corruption_guard(&policy, true);
            unsafe { libc::_exit(RESUMED) }
        }
        ForkResult::Parent { child } => {
            let status = waitpid(child, None).map_err(|e| format!("waitpid: {e}"))?;
            let want = i32::from(Code::InvariantBroken.as_u16());
            match status {
                WaitStatus::Exited(_, code) if code == want => Ok(()),
                WaitStatus::Exited(_, RESUMED) => {
                    Err("thread resumed after a failed invariant".to_string())
                }
                other => Err(format!("child ended with {other:?}, expected exit {want}")),
            }
        }
    }
}

#[cfg(not(unix))]
fn check_fatal_invariant() -> CheckResult {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_failures() {
        let mut report = UnitReport::default();
        report.record("a", Ok(()));
        report.record("b", Err("boom".to_string()));
        report.skip("c", "not here");
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.get("c").map(|c| c.outcome), Some(Outcome::Skipped));
        assert_eq!(report.get("b").and_then(|c| c.detail.as_deref()), Some("boom"));
    }

    #[test]
    fn expect_eq_formats_mismatch() {
        let err = expect_eq("answer", 41, 42).unwrap_err();
        assert_eq!(err, "answer: expected 42, got 41");
    }

    #[test]
    fn suite_passes_without_death_test() {
        let mut config = StressConfig::builtin();
        config.run.death_test = false;
        config.run.threads = 2;
        config.run.iters_per_thread = 1000;

        let report = run_unit_checks(&config);
        assert!(report.all_passed(), "{:#?}", report.checks);
        assert_eq!(
            report.get("fatal_invariant").map(|c| c.outcome),
            Some(Outcome::Skipped)
        );
        assert_eq!(
            report.get("threaded_dispatch").map(|c| c.outcome),
            Some(Outcome::Passed)
        );
    }
}
