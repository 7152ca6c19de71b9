//! Policy hooks that observe dispatch.
//!
//! Hooks are plain `fn` pointers, so their observations live in statics.
//! A [`HookSession`] serializes every user of those statics and resets them
//! on entry; hold one for as long as a recording or counting policy is in
//! use.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dodo::{FailureContext, Policy, Status};

static SESSION: Mutex<()> = Mutex::new(());
static RECORDED: AtomicU64 = AtomicU64::new(0);
static LAST: Mutex<Option<FailureContext>> = Mutex::new(None);
static COUNTED: AtomicU64 = AtomicU64::new(0);

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fallback: count the call, keep a copy of the context, report its code.
pub fn recording_fallback(ctx: &FailureContext) -> Status {
    RECORDED.fetch_add(1, Ordering::Relaxed);
    *lock(&LAST) = Some(*ctx);
    Status::fail(ctx.code())
}

/// Fallback: count the call and report its code. Lock-free, for threads.
pub fn counting_fallback(ctx: &FailureContext) -> Status {
    COUNTED.fetch_add(1, Ordering::Relaxed);
    Status::fail(ctx.code())
}

/// Panic hook: terminate immediately with the failing code as exit status.
///
/// Skips destructors and atexit handlers, so a forked child can report back
/// without touching state shared with its parent.
pub fn exit_with_code(ctx: &FailureContext) {
    let code = i32::from(ctx.code().as_u16());
    #[cfg(unix)]
    unsafe {
        libc::_exit(code);
    }
    #[cfg(not(unix))]
    std::process::exit(code);
}

/// Exclusive access to the recording and counting statics.
pub struct HookSession {
    _guard: MutexGuard<'static, ()>,
}

impl HookSession {
    /// Wait for any other session to end, then start from zero.
    pub fn begin() -> Self {
        let session = Self {
            _guard: lock(&SESSION),
        };
        session.reset();
        session
    }

    pub fn reset(&self) {
        RECORDED.store(0, Ordering::Relaxed);
        COUNTED.store(0, Ordering::Relaxed);
        *lock(&LAST) = None;
    }

    pub fn recording_policy(&self) -> Policy {
        Policy::new().with_fallback_handler(recording_fallback)
    }

    pub fn counting_policy(&self) -> Policy {
        Policy::new().with_fallback_handler(counting_fallback)
    }

    /// Calls to [`recording_fallback`] since the last reset.
    pub fn recorded(&self) -> u64 {
        RECORDED.load(Ordering::Relaxed)
    }

    /// Calls to [`counting_fallback`] since the last reset.
    pub fn counted(&self) -> u64 {
        COUNTED.load(Ordering::Relaxed)
    }

    /// The most recent recorded context, clearing it.
    pub fn take_last(&self) -> Option<FailureContext> {
        lock(&LAST).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodo::{Code, Severity, check_range, require};

    #[test]
    fn recording_policy_counts_and_snapshots() {
        let session = HookSession::begin();
        let policy = session.recording_policy();

        assert!(require!(policy; true, Code::PreconditionFailed).ok());
        assert_eq!(session.recorded(), 0);
        assert!(session.take_last().is_none());

        let s = check_range!(policy; 99, 0, 10, Code::OutOfRange);
        assert_eq!(s.code(), Code::OutOfRange);
        assert_eq!(session.recorded(), 1);

        let ctx = session.take_last().unwrap();
        assert_eq!(ctx.code(), Code::OutOfRange);
        assert_eq!(ctx.severity(), Severity::Recoverable);
        assert!(session.take_last().is_none());
    }

    #[test]
    fn counting_policy_only_counts() {
        let session = HookSession::begin();
        let policy = session.counting_policy();
        for _ in 0..10 {
            let _ = require!(policy; false, Code::Timeout);
        }
        assert_eq!(session.counted(), 10);
        assert_eq!(session.recorded(), 0);

        session.reset();
        assert_eq!(session.counted(), 0);
    }
}
