//! Policy hooks that report failures through `tracing`.
//!
//! The core never logs. Binaries that want every failed check in their logs
//! install these hooks at startup:
//!
//! ```rust
//! use dodo_common::hooks::logging_policy;
//!
//! let policy = logging_policy();
//! # let _ = policy;
//! ```
//!
//! Reduced-capture builds log the code and severity only; the site fields
//! show up as `-`.

use dodo::{FailureContext, Policy, Severity, Status};
use tracing::{error, warn};

const ELIDED: &str = "-";

/// Emit one event for a failed check: WARN for recoverable, ERROR for fatal.
pub fn log_failure(ctx: &FailureContext) {
    let expr = ctx.expr().unwrap_or(ELIDED);
    let file = ctx.file().unwrap_or(ELIDED);
    let function = ctx.function().unwrap_or(ELIDED);

    match ctx.severity() {
        Severity::Recoverable => warn!(
            code = %ctx.code(),
            expr,
            file,
            line = ctx.line(),
            function,
            "check failed"
        ),
        Severity::Fatal => error!(
            code = %ctx.code(),
            expr,
            file,
            line = ctx.line(),
            function,
            "invariant violated, halting"
        ),
    }
}

/// Fallback hook: log, then report the failure's own code.
pub fn tracing_fallback(ctx: &FailureContext) -> Status {
    log_failure(ctx);
    Status::fail(ctx.code())
}

/// Panic hook: log, then abort.
pub fn tracing_panic(ctx: &FailureContext) {
    log_failure(ctx);
    std::process::abort()
}

/// A policy with both logging hooks installed.
pub const fn logging_policy() -> Policy {
    Policy::new()
        .with_panic_handler(tracing_panic)
        .with_fallback_handler(tracing_fallback)
}
