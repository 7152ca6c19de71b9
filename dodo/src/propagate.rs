//! Early return and call-site-local recovery.

use crate::status::Status;

/// Pass a status through unchanged.
///
/// Every [`try_status!`](crate::try_status) early return goes through here,
/// so a breakpoint or tracepoint on this one function sees every
/// propagated failure.
#[cold]
#[inline(never)]
pub fn propagate(status: Status) -> Status {
    status
}

/// Substitute local recovery for a failed status.
///
/// `Ok` is returned unchanged and `action` does not run. Otherwise `action`
/// runs once and its status is returned. `action` must not panic; any
/// failure inside it belongs in the status it returns.
#[inline(always)]
pub fn fallback_or<F>(status: Status, action: F) -> Status
where
    F: FnOnce() -> Status,
{
    if status.ok() { status } else { action() }
}

/// Return the status from the enclosing function if it is not Ok.
///
/// ```rust
/// use dodo::{Code, Status, require, try_status};
///
/// fn two_steps(first: bool) -> Status {
///     try_status!(require!(first, Code::PreconditionFailed));
///     try_status!(require!(false, Code::InternalFault));
///     Status::ok_status()
/// }
///
/// assert_eq!(two_steps(false).code(), Code::PreconditionFailed);
/// assert_eq!(two_steps(true).code(), Code::InternalFault);
/// ```
#[macro_export]
macro_rules! try_status {
    ($status:expr $(,)?) => {{
        let status: $crate::Status = $status;
        if !status.ok() {
            return $crate::propagate(status);
        }
    }};
}
