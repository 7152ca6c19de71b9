//! `tracing` subscriber setup shared by the Dodo binaries.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` directives are honoured; `level` is added on top. `json`
/// switches from the compact human format to one JSON object per line.
/// Call once, from `main`.
pub fn setup_tracing(level: Level, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

/// Pick the effective level: `--verbose` forces DEBUG, otherwise the
/// configured one.
pub fn effective_level(configured: crate::config::LogLevel, verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        configured.into()
    }
}
