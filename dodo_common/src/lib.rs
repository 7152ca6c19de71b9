//! Dodo Common Library
//!
//! Ambient pieces shared by the Dodo binaries. The `dodo` core itself never
//! logs or reads files; everything here sits on the host side of the policy
//! hooks.
//!
//! # Module Structure
//!
//! - [`config`] - TOML configuration loading traits and types
//! - [`logging`] - `tracing` subscriber setup
//! - [`hooks`] - policy hooks that report failures through `tracing`
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod hooks;
pub mod logging;
pub mod prelude;
