//! Policy hooks and the two cold dispatch endpoints.
//!
//! A [`Policy`] holds the panic hook (fatal failures) and the fallback hook
//! (recoverable failures). It is configured through `&mut self` during
//! startup and then shared by reference. Once a `&Policy` is handed to worker
//! threads it can no longer be mutated.
//!
//! ```rust
//! use dodo::{FailureContext, Policy, Status};
//!
//! fn reject(ctx: &FailureContext) -> Status {
//!     Status::fail(ctx.code())
//! }
//!
//! let mut policy = Policy::new();
//! policy.set_fallback_handler(Some(reject));
//! let policy = &policy; // frozen from here on
//! # let _ = policy;
//! ```

use std::process;

use static_assertions::assert_impl_all;

use crate::failure::FailureContext;
use crate::status::Status;

/// Fatal hook. Must not return; if it does, [`Policy::fail_fast`] aborts.
pub type PanicFn = fn(&FailureContext);

/// Recoverable hook. Its return value is handed back to the failing caller.
pub type FallbackFn = fn(&FailureContext) -> Status;

/// Built-in panic hook: abort the process immediately.
pub fn default_panic(_ctx: &FailureContext) {
    process::abort()
}

/// Built-in fallback hook: report the failure's own code.
pub fn default_fallback(ctx: &FailureContext) -> Status {
    Status::fail(ctx.code())
}

/// Aborts if dropped during an unwind out of a hook.
struct AbortOnUnwind;

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        process::abort()
    }
}

/// The two failure hooks used by every check primitive.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    panic: PanicFn,
    fallback: FallbackFn,
}

assert_impl_all!(Policy: Copy, Send, Sync);

impl Default for Policy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Policy {
    /// [`default_panic`] and [`default_fallback`].
    pub const DEFAULT: Self = Self {
        panic: default_panic,
        fallback: default_fallback,
    };

    /// A policy with the built-in hooks.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Builder form of [`Policy::set_panic_handler`].
    #[inline]
    pub const fn with_panic_handler(mut self, hook: PanicFn) -> Self {
        self.panic = hook;
        self
    }

    /// Builder form of [`Policy::set_fallback_handler`].
    #[inline]
    pub const fn with_fallback_handler(mut self, hook: FallbackFn) -> Self {
        self.fallback = hook;
        self
    }

    /// Install the fatal hook. `None` restores [`default_panic`].
    pub fn set_panic_handler(&mut self, hook: Option<PanicFn>) {
        self.panic = hook.unwrap_or(default_panic);
    }

    /// Install the recoverable hook. `None` restores [`default_fallback`].
    pub fn set_fallback_handler(&mut self, hook: Option<FallbackFn>) {
        self.fallback = hook.unwrap_or(default_fallback);
    }

    #[inline]
    pub const fn panic_handler(&self) -> PanicFn {
        self.panic
    }

    #[inline]
    pub const fn fallback_handler(&self) -> FallbackFn {
        self.fallback
    }

    /// Fatal endpoint: run the panic hook, then abort. Never returns, even if
    /// the hook returns or unwinds.
    #[cold]
    #[inline(never)]
    pub fn fail_fast(&self, ctx: &FailureContext) -> ! {
        let _guard = AbortOnUnwind;
        (self.panic)(ctx);
        process::abort()
    }

    /// Recoverable endpoint: run the fallback hook and return its status
    /// verbatim. An unwind out of the hook aborts.
    #[cold]
    #[inline(never)]
    pub fn fail_recoverable(&self, ctx: &FailureContext) -> Status {
        let guard = AbortOnUnwind;
        let status = (self.fallback)(ctx);
        core::mem::forget(guard);
        status
    }
}
