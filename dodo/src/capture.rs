//! Call-site capture and the checking macros.
//!
//! Each checking macro comes in two forms:
//!
//! ```rust
//! # use dodo::{Code, Policy, require};
//! # let policy = Policy::new();
//! # let x = 1;
//! let _ = require!(policy; x > 0, Code::PreconditionFailed); // explicit policy
//! let _ = require!(x > 0, Code::PreconditionFailed);         // Policy::DEFAULT
//! ```
//!
//! The policy expression may be a `Policy`, a `&Policy` or anything that
//! auto-derefs to one.
//!
//! ## Profiles
//!
//! Without the `reduced-capture` feature, [`call_site!`](crate::call_site)
//! records `stringify!(expr)`, `file!()`, `line!()` and
//! [`function_name!`](crate::function_name). With it, every site is
//! [`CallSite::UNKNOWN`](crate::CallSite::UNKNOWN) and none of that text is
//! expanded. The feature is evaluated here, in this crate, so downstream
//! crates get the profile `dodo` was built with.
//!
//! `file!()` and `line!()` resolve to the outermost macro invocation, i.e.
//! the line the user wrote the check on.

/// Path of the enclosing function, e.g. `my_crate::motor::spin`.
///
/// Closure frames are stripped, so a check inside a closure reports the
/// function that contains it.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __dodo_here() {}
        fn __dodo_type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = __dodo_type_name_of(__dodo_here);
        let name = match name.strip_suffix("::__dodo_here") {
            Some(stripped) => stripped,
            None => name,
        };
        name.trim_end_matches("::{{closure}}")
    }};
}

/// Capture the current call site, optionally with the checked expression.
#[cfg(not(feature = "reduced-capture"))]
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(
            ::core::option::Option::None,
            ::core::option::Option::Some(::core::file!()),
            ::core::line!(),
            ::core::option::Option::Some($crate::function_name!()),
        )
    };
    ($expr:expr) => {
        $crate::CallSite::new(
            ::core::option::Option::Some(::core::stringify!($expr)),
            ::core::option::Option::Some(::core::file!()),
            ::core::line!(),
            ::core::option::Option::Some($crate::function_name!()),
        )
    };
}

/// Capture the current call site, optionally with the checked expression.
#[cfg(feature = "reduced-capture")]
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::UNKNOWN
    };
    ($expr:expr) => {
        $crate::CallSite::UNKNOWN
    };
}

/// Precondition check. Evaluates to a [`Status`](crate::Status).
#[macro_export]
macro_rules! require {
    ($policy:expr; $cond:expr, $code:expr $(,)?) => {
        ($policy).require($cond, $code, || $crate::call_site!($cond))
    };
    ($cond:expr, $code:expr $(,)?) => {
        $crate::require!($crate::Policy::DEFAULT; $cond, $code)
    };
}

/// Postcondition check. Evaluates to a [`Status`](crate::Status).
#[macro_export]
macro_rules! ensure {
    ($policy:expr; $cond:expr, $code:expr $(,)?) => {
        ($policy).ensure($cond, $code, || $crate::call_site!($cond))
    };
    ($cond:expr, $code:expr $(,)?) => {
        $crate::ensure!($crate::Policy::DEFAULT; $cond, $code)
    };
}

/// Fatal consistency check. Evaluates to `()`; never returns on failure.
#[macro_export]
macro_rules! invariant {
    ($policy:expr; $cond:expr, $code:expr $(,)?) => {
        ($policy).invariant($cond, $code, || $crate::call_site!($cond))
    };
    ($cond:expr, $code:expr $(,)?) => {
        $crate::invariant!($crate::Policy::DEFAULT; $cond, $code)
    };
}

/// Presence check on an `Option` or raw pointer.
#[macro_export]
macro_rules! check_not_null {
    ($policy:expr; $value:expr, $code:expr $(,)?) => {
        ($policy).not_null(&$value, $code, || $crate::call_site!($value))
    };
    ($value:expr, $code:expr $(,)?) => {
        $crate::check_not_null!($crate::Policy::DEFAULT; $value, $code)
    };
}

/// Inclusive bounds check, `lo <= v <= hi`.
#[macro_export]
macro_rules! check_range {
    ($policy:expr; $v:expr, $lo:expr, $hi:expr, $code:expr $(,)?) => {
        ($policy).range($v, $lo, $hi, $code, || $crate::call_site!($v))
    };
    ($v:expr, $lo:expr, $hi:expr, $code:expr $(,)?) => {
        $crate::check_range!($crate::Policy::DEFAULT; $v, $lo, $hi, $code)
    };
}

/// Alignment check on an address or pointer. `align` must be a power of two.
#[macro_export]
macro_rules! check_aligned {
    ($policy:expr; $addr:expr, $align:expr, $code:expr $(,)?) => {
        ($policy).aligned($addr, $align, $code, || $crate::call_site!($addr))
    };
    ($addr:expr, $align:expr, $code:expr $(,)?) => {
        $crate::check_aligned!($crate::Policy::DEFAULT; $addr, $align, $code)
    };
}
