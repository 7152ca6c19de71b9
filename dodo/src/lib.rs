//! # Dodo
//!
//! Runtime contract checks for latency-sensitive, safety-critical code.
//! Preconditions, postconditions and invariants are written inline; a passing
//! check is a single predicted branch, and everything that happens after a
//! failure is routed through two policy hooks held by a [`Policy`] handle.
//!
//! ## Architecture
//!
//! 1. **[`Code`] / [`Severity`] / [`Status`]**: closed failure taxonomy and
//!    the 2-byte result value every fallible operation returns.
//! 2. **[`FailureContext`]**: diagnostic record, built only on the cold path.
//! 3. **[`Policy`]**: panic hook (fatal, never returns) and fallback hook
//!    (recoverable, returns a [`Status`]).
//! 4. **Check primitives**: `require`, `ensure`, `invariant`, `not_null`,
//!    `range`, `aligned`, plus the capture macros wrapping them.
//! 5. **Propagation**: [`propagate`], [`try_status!`] and [`fallback_or`].
//!
//! ## Usage
//!
//! ```rust
//! use dodo::{Code, Policy, Status, check_range, require, try_status};
//!
//! fn set_speed(policy: &Policy, rpm: u32) -> Status {
//!     try_status!(require!(policy; rpm != 0, Code::PreconditionFailed));
//!     check_range!(policy; rpm, 1, 12_000, Code::OutOfRange)
//! }
//!
//! let policy = Policy::new();
//! assert!(set_speed(&policy, 3_000).ok());
//! assert_eq!(set_speed(&policy, 20_000).code(), Code::OutOfRange);
//! ```
//!
//! ## Capture Profiles
//!
//! By default every failing call site records the checked expression, file,
//! line and enclosing function. Enabling the `reduced-capture` feature drops
//! all of that text from the binary; code and severity are always kept.
//!
//! ## Zero-Allocation Guarantee
//!
//! Nothing in this crate allocates. Hooks are plain function pointers and the
//! failure record is a stack value of `&'static str`s and integers.

pub mod capture;
pub mod check;
pub mod failure;
pub mod policy;
pub mod propagate;
pub mod status;

pub use check::{Address, Nullable};
pub use failure::{CallSite, FailureContext};
pub use policy::{FallbackFn, PanicFn, Policy, default_fallback, default_panic};
pub use propagate::{fallback_or, propagate};
pub use status::{Code, Fault, Severity, Status};
