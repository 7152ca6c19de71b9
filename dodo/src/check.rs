//! Check primitives.
//!
//! Every primitive takes an already-evaluated value, the [`Code`] to report
//! and a closure producing the [`CallSite`]. The success branch returns
//! immediately; the failure branch lives in a `#[cold]` out-of-line function
//! that evaluates the site closure, builds the [`FailureContext`] with the
//! primitive's own [`Severity`] and dispatches it. The site closure is never
//! called on success.
//!
//! | Primitive | Passes when | Severity |
//! |-----------|-------------|----------|
//! | `require` | `cond` | Recoverable |
//! | `ensure` | `cond` | Recoverable |
//! | `invariant` | `cond` | Fatal |
//! | `not_null` | value is present | Recoverable |
//! | `range` | `lo <= v && v <= hi` | Recoverable |
//! | `aligned` | `addr & (align - 1) == 0` | Recoverable |
//!
//! Most code calls these through the capture macros ([`require!`](crate::require)
//! and friends), which fill in the site.

use core::ptr::NonNull;

use crate::failure::{CallSite, FailureContext};
use crate::policy::Policy;
use crate::status::{Code, Severity, Status};

/// A value that can be absent.
pub trait Nullable {
    /// True if the value is absent.
    fn is_null(&self) -> bool;
}

impl<T> Nullable for Option<T> {
    #[inline(always)]
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T> Nullable for *const T {
    #[inline(always)]
    fn is_null(&self) -> bool {
        <*const T>::is_null(*self)
    }
}

impl<T> Nullable for *mut T {
    #[inline(always)]
    fn is_null(&self) -> bool {
        <*mut T>::is_null(*self)
    }
}

impl<T> Nullable for NonNull<T> {
    #[inline(always)]
    fn is_null(&self) -> bool {
        false
    }
}

/// Something with a numeric address.
pub trait Address {
    fn address(&self) -> usize;
}

impl Address for usize {
    #[inline(always)]
    fn address(&self) -> usize {
        *self
    }
}

impl<T> Address for *const T {
    #[inline(always)]
    fn address(&self) -> usize {
        self.addr()
    }
}

impl<T> Address for *mut T {
    #[inline(always)]
    fn address(&self) -> usize {
        self.addr()
    }
}

impl<T> Address for NonNull<T> {
    #[inline(always)]
    fn address(&self) -> usize {
        self.as_ptr().addr()
    }
}

impl<T> Address for &T {
    #[inline(always)]
    fn address(&self) -> usize {
        (*self as *const T).addr()
    }
}

impl Policy {
    /// Precondition. Recoverable.
    #[inline(always)]
    pub fn require<S>(&self, cond: bool, code: Code, site: S) -> Status
    where
        S: FnOnce() -> CallSite,
    {
        if cond {
            Status::ok_status()
        } else {
            self.reject(code, site)
        }
    }

    /// Postcondition. Recoverable.
    #[inline(always)]
    pub fn ensure<S>(&self, cond: bool, code: Code, site: S) -> Status
    where
        S: FnOnce() -> CallSite,
    {
        if cond {
            Status::ok_status()
        } else {
            self.reject(code, site)
        }
    }

    /// Internal consistency. Fatal: on failure the panic hook runs and the
    /// calling thread never resumes.
    #[inline(always)]
    pub fn invariant<S>(&self, cond: bool, code: Code, site: S)
    where
        S: FnOnce() -> CallSite,
    {
        if !cond {
            self.halt(code, site)
        }
    }

    /// Presence check. Recoverable.
    #[inline(always)]
    pub fn not_null<N, S>(&self, value: &N, code: Code, site: S) -> Status
    where
        N: Nullable + ?Sized,
        S: FnOnce() -> CallSite,
    {
        if !value.is_null() {
            Status::ok_status()
        } else {
            self.reject(code, site)
        }
    }

    /// Inclusive bounds check, `lo <= v <= hi`. Recoverable.
    ///
    /// Half-open ranges must be expressed by adjusting a bound.
    #[inline(always)]
    pub fn range<T, S>(&self, v: T, lo: T, hi: T, code: Code, site: S) -> Status
    where
        T: PartialOrd,
        S: FnOnce() -> CallSite,
    {
        if v >= lo && v <= hi {
            Status::ok_status()
        } else {
            self.reject(code, site)
        }
    }

    /// Alignment check. Recoverable.
    ///
    /// `align` must be a non-zero power of two. This is not checked in
    /// release builds; guard a computed alignment with
    /// [`invariant`](Policy::invariant) first.
    #[inline(always)]
    pub fn aligned<A, S>(&self, addr: A, align: usize, code: Code, site: S) -> Status
    where
        A: Address,
        S: FnOnce() -> CallSite,
    {
        debug_assert!(align.is_power_of_two(), "alignment {align} is not a power of two");
        if addr.address() & align.wrapping_sub(1) == 0 {
            Status::ok_status()
        } else {
            self.reject(code, site)
        }
    }

    #[cold]
    #[inline(never)]
    fn reject<S>(&self, code: Code, site: S) -> Status
    where
        S: FnOnce() -> CallSite,
    {
        self.fail_recoverable(&FailureContext::new(code, Severity::Recoverable, site()))
    }

    #[cold]
    #[inline(never)]
    fn halt<S>(&self, code: Code, site: S) -> !
    where
        S: FnOnce() -> CallSite,
    {
        self.fail_fast(&FailureContext::new(code, Severity::Fatal, site()))
    }
}
