//! Prelude module for common re-exports.
//!
//! ```rust
//! use dodo_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::logging::setup_tracing;

// ─── Policy hooks ───────────────────────────────────────────────────
pub use crate::hooks::{logging_policy, tracing_fallback, tracing_panic};

// ─── Core ───────────────────────────────────────────────────────────
pub use dodo::{Code, FailureContext, Policy, Severity, Status};
