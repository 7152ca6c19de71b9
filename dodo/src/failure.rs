//! Cold-path diagnostic record for one failed check.
//!
//! A [`FailureContext`] is only ever built on the failure branch of a check
//! primitive, passed by reference to a policy hook and dropped when the hook
//! returns. Its positional part, [`CallSite`], is empty in the
//! `reduced-capture` profile.

use core::fmt;

use static_assertions::assert_impl_all;

use crate::status::{Code, Severity};

/// Where a check was written.
///
/// Populated by [`call_site!`](crate::call_site) from `stringify!`, `file!`,
/// `line!` and [`function_name!`](crate::function_name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallSite {
    expr: Option<&'static str>,
    file: Option<&'static str>,
    line: u32,
    function: Option<&'static str>,
}

impl CallSite {
    /// No positional information. Every site in the reduced profile.
    pub const UNKNOWN: Self = Self {
        expr: None,
        file: None,
        line: 0,
        function: None,
    };

    /// Build a site from already-captured parts.
    #[inline]
    pub const fn new(
        expr: Option<&'static str>,
        file: Option<&'static str>,
        line: u32,
        function: Option<&'static str>,
    ) -> Self {
        Self {
            expr,
            file,
            line,
            function,
        }
    }

    /// Source text of the checked expression.
    #[inline]
    pub const fn expr(&self) -> Option<&'static str> {
        self.expr
    }

    /// Source file.
    #[inline]
    pub const fn file(&self) -> Option<&'static str> {
        self.file
    }

    /// 1-based line, or 0 if unknown.
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Path of the enclosing function.
    #[inline]
    pub const fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// True when no textual or positional field is set.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.expr.is_none() && self.file.is_none() && self.line == 0 && self.function.is_none()
    }
}

/// What failed and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FailureContext {
    code: Code,
    severity: Severity,
    site: CallSite,
}

assert_impl_all!(FailureContext: Copy, Send, Sync);
assert_impl_all!(CallSite: Copy, Send, Sync);

impl FailureContext {
    /// Assemble a record. Check primitives call this on their failure branch
    /// with the severity they own.
    #[inline]
    pub const fn new(code: Code, severity: Severity, site: CallSite) -> Self {
        Self {
            code,
            severity,
            site,
        }
    }

    #[inline]
    pub const fn code(&self) -> Code {
        self.code
    }

    #[inline]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    #[inline]
    pub const fn site(&self) -> &CallSite {
        &self.site
    }

    #[inline]
    pub const fn expr(&self) -> Option<&'static str> {
        self.site.expr
    }

    #[inline]
    pub const fn file(&self) -> Option<&'static str> {
        self.site.file
    }

    #[inline]
    pub const fn line(&self) -> u32 {
        self.site.line
    }

    #[inline]
    pub const fn function(&self) -> Option<&'static str> {
        self.site.function
    }
}

/// `code (severity) `expr` at file:line in function`, omitting unknown parts.
impl fmt::Display for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.severity)?;
        if let Some(expr) = self.site.expr {
            write!(f, " `{expr}`")?;
        }
        if let Some(file) = self.site.file {
            write!(f, " at {file}:{}", self.site.line)?;
        }
        if let Some(function) = self.site.function {
            write!(f, " in {function}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_site_is_empty() {
        let site = CallSite::UNKNOWN;
        assert!(site.is_unknown());
        assert_eq!(site, CallSite::default());
        assert_eq!(site.line(), 0);
    }

    #[test]
    fn context_exposes_site_fields() {
        let site = CallSite::new(Some("x > 0"), Some("src/motor.rs"), 42, Some("motor::spin"));
        let ctx = FailureContext::new(Code::PreconditionFailed, Severity::Recoverable, site);

        assert_eq!(ctx.code(), Code::PreconditionFailed);
        assert_eq!(ctx.severity(), Severity::Recoverable);
        assert_eq!(ctx.expr(), Some("x > 0"));
        assert_eq!(ctx.file(), Some("src/motor.rs"));
        assert_eq!(ctx.line(), 42);
        assert_eq!(ctx.function(), Some("motor::spin"));
        assert!(!ctx.site().is_unknown());
    }

    #[test]
    fn display_full_site() {
        let site = CallSite::new(Some("x > 0"), Some("src/motor.rs"), 42, Some("motor::spin"));
        let ctx = FailureContext::new(Code::OutOfRange, Severity::Recoverable, site);
        assert_eq!(
            ctx.to_string(),
            "out_of_range (recoverable) `x > 0` at src/motor.rs:42 in motor::spin"
        );
    }

    #[test]
    fn display_reduced_site() {
        let ctx = FailureContext::new(Code::InvariantBroken, Severity::Fatal, CallSite::UNKNOWN);
        assert_eq!(ctx.to_string(), "invariant_broken (fatal)");
    }
}
