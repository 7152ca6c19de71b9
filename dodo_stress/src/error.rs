//! Harness errors.

use dodo_common::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StressError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON report serialization failed.
    #[error("Failed to render report: {0}")]
    Report(#[from] serde_json::Error),

    /// At least one correctness check failed; the report has the details.
    #[error("{failed} of {total} unit checks failed")]
    UnitChecksFailed { failed: usize, total: usize },
}
