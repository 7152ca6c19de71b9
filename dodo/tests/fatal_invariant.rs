//! Integration test: fatal dispatch (death tests).
//!
//! A failing invariant must reach the panic hook exactly once and the
//! calling thread must never resume. Each case runs in a forked child so the
//! test runner survives; the parent inspects how the child ended.

#![cfg(unix)]

use nix::sys::signal::Signal;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, fork};

use dodo::{Code, FailureContext, Policy, Severity, invariant};

/// Exit code the child uses if execution resumes past the checked call.
const RESUMED: i32 = 111;

// ── Helpers ─────────────────────────────────────────────────────────

fn run_in_child(body: impl FnOnce()) -> WaitStatus {
    // SAFETY: the child only runs `body` and then `_exit`s; it never
    // returns into the test harness.
    match unsafe { fork() }.expect("fork failed") {
        ForkResult::Child => {
            body();
            unsafe { libc::_exit(RESUMED) }
        }
        ForkResult::Parent { child } => waitpid(child, None).expect("waitpid failed"),
    }
}

/// Panic hook: exit with the failing code, or 100 for a wrong severity.
fn exit_with_code(ctx: &FailureContext) {
    let code = if ctx.severity() == Severity::Fatal {
        i32::from(ctx.code().as_u16())
    } else {
        100
    };
    unsafe { libc::_exit(code) }
}

fn returning_hook(_ctx: &FailureContext) {}

fn unwinding_hook(_ctx: &FailureContext) {
    panic!("hook unwinds");
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn failing_invariant_reaches_panic_hook_and_never_resumes() {
    let status = run_in_child(|| {
        let policy = Policy::new().with_panic_handler(exit_with_code);
        let corruption = true;
        invariant!(policy; !corruption, Code::InvariantBroken);
    });
    assert!(
        matches!(status, WaitStatus::Exited(_, code) if code == Code::InvariantBroken.as_u16() as i32),
        "unexpected child status: {status:?}"
    );
}

#[test]
fn invariant_reports_caller_code() {
    let status = run_in_child(|| {
        let policy = Policy::new().with_panic_handler(exit_with_code);
        invariant!(policy; 1 + 1 == 3, Code::ExternalFault);
    });
    assert!(
        matches!(status, WaitStatus::Exited(_, code) if code == Code::ExternalFault.as_u16() as i32),
        "unexpected child status: {status:?}"
    );
}

#[test]
fn passing_invariant_continues() {
    let status = run_in_child(|| {
        let policy = Policy::new().with_panic_handler(exit_with_code);
        invariant!(policy; true, Code::InvariantBroken);
    });
    assert!(
        matches!(status, WaitStatus::Exited(_, RESUMED)),
        "unexpected child status: {status:?}"
    );
}

#[test]
fn returning_panic_hook_still_aborts() {
    let status = run_in_child(|| {
        let policy = Policy::new().with_panic_handler(returning_hook);
        invariant!(policy; false, Code::InvariantBroken);
    });
    assert!(
        matches!(status, WaitStatus::Signaled(_, Signal::SIGABRT, _)),
        "unexpected child status: {status:?}"
    );
}

#[test]
fn unwinding_panic_hook_still_aborts() {
    let status = run_in_child(|| {
        let policy = Policy::new().with_panic_handler(unwinding_hook);
        invariant!(policy; false, Code::InvariantBroken);
    });
    assert!(
        matches!(status, WaitStatus::Signaled(_, Signal::SIGABRT, _)),
        "unexpected child status: {status:?}"
    );
}

#[test]
fn default_panic_hook_aborts() {
    let status = run_in_child(|| {
        invariant!(false, Code::InvariantBroken);
    });
    assert!(
        matches!(status, WaitStatus::Signaled(_, Signal::SIGABRT, _)),
        "unexpected child status: {status:?}"
    );
}
