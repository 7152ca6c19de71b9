//! Failure taxonomy and the result value returned by every fallible operation.
//!
//! [`Code`] is a closed, `u16`-backed reason set. [`Severity`] says which
//! policy hook handles a failure. [`Status`] wraps a `Code`, fits in a single
//! register and is `#[must_use]`, so dropping one on the floor is a compiler
//! warning.

use core::fmt;

use static_assertions::{assert_impl_all, assert_not_impl_any, const_assert_eq};

/// Reason a check failed (or [`Code::Ok`] if it did not).
///
/// Discriminants are stable: the death-test handler in the stress harness
/// uses them as process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u16)]
pub enum Code {
    /// No failure.
    #[default]
    Ok = 0,
    /// Caller-supplied input violated a precondition.
    PreconditionFailed = 1,
    /// An operation's result violated its postcondition.
    PostconditionFailed = 2,
    /// Internal consistency was lost.
    InvariantBroken = 3,
    /// A required value was absent.
    NullPointer = 4,
    /// A value fell outside its inclusive bounds.
    OutOfRange = 5,
    /// An address was not aligned to the required boundary.
    Misaligned = 6,
    /// Arithmetic overflow.
    Overflow = 7,
    /// A deadline passed. Timing itself is the caller's business.
    Timeout = 8,
    /// A collaborator outside this process reported a fault.
    ExternalFault = 9,
    /// A fault inside this process not covered by the other codes.
    InternalFault = 10,
}

impl Code {
    /// Every code, in discriminant order.
    pub const ALL: [Code; 11] = [
        Code::Ok,
        Code::PreconditionFailed,
        Code::PostconditionFailed,
        Code::InvariantBroken,
        Code::NullPointer,
        Code::OutOfRange,
        Code::Misaligned,
        Code::Overflow,
        Code::Timeout,
        Code::ExternalFault,
        Code::InternalFault,
    ];

    /// Raw discriminant.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Convert from a raw discriminant. Returns `None` for unknown values.
    #[inline]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::PreconditionFailed),
            2 => Some(Self::PostconditionFailed),
            3 => Some(Self::InvariantBroken),
            4 => Some(Self::NullPointer),
            5 => Some(Self::OutOfRange),
            6 => Some(Self::Misaligned),
            7 => Some(Self::Overflow),
            8 => Some(Self::Timeout),
            9 => Some(Self::ExternalFault),
            10 => Some(Self::InternalFault),
            _ => None,
        }
    }

    /// Stable snake_case name, suitable for logs and metrics labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::PreconditionFailed => "precondition_failed",
            Self::PostconditionFailed => "postcondition_failed",
            Self::InvariantBroken => "invariant_broken",
            Self::NullPointer => "null_pointer",
            Self::OutOfRange => "out_of_range",
            Self::Misaligned => "misaligned",
            Self::Overflow => "overflow",
            Self::Timeout => "timeout",
            Self::ExternalFault => "external_fault",
            Self::InternalFault => "internal_fault",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which policy hook receives a failure.
///
/// Decided by the primitive that raised it, never by the [`Code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Routed to the fallback hook; the caller gets a [`Status`] back.
    #[default]
    Recoverable = 0,
    /// Routed to the panic hook; the process halts.
    Fatal = 1,
}

impl Severity {
    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a fallible operation.
///
/// Only [`Status::ok_status`] and [`Status::fail`] produce one.
#[must_use = "a Status reports whether a check passed and must be inspected"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Status {
    code: Code,
}

const_assert_eq!(core::mem::size_of::<Code>(), 2);
const_assert_eq!(core::mem::size_of::<Severity>(), 1);
const_assert_eq!(core::mem::size_of::<Status>(), 2);
assert_impl_all!(Status: Copy, Send, Sync);
assert_not_impl_any!(Status: Default);

impl Status {
    /// The success value.
    #[inline(always)]
    pub const fn ok_status() -> Self {
        Self { code: Code::Ok }
    }

    /// A status carrying `code`. `fail(Code::Ok)` is indistinguishable from
    /// [`Status::ok_status`].
    #[inline(always)]
    pub const fn fail(code: Code) -> Self {
        Self { code }
    }

    /// True iff the code is [`Code::Ok`].
    #[inline(always)]
    pub const fn ok(self) -> bool {
        matches!(self.code, Code::Ok)
    }

    /// The carried code.
    #[inline(always)]
    pub const fn code(self) -> Code {
        self.code
    }

    /// Bridge into `?`-based error handling at an API boundary.
    #[inline]
    pub const fn into_result(self) -> Result<(), Fault> {
        if self.ok() {
            Ok(())
        } else {
            Err(Fault { code: self.code })
        }
    }
}

/// A non-Ok [`Status`] expressed as a `std::error::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("check failed: {code}")]
pub struct Fault {
    code: Code,
}

impl Fault {
    /// The failing code. Never [`Code::Ok`].
    #[inline]
    pub const fn code(&self) -> Code {
        self.code
    }
}

impl From<Fault> for Status {
    fn from(fault: Fault) -> Self {
        Status::fail(fault.code)
    }
}
