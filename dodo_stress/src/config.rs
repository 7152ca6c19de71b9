//! Harness configuration.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "dodo-stress"
//!
//! [run]
//! iterations = 1000000
//! threads = 4
//! iters_per_thread = 10000
//! death_test = true
//! ```

use dodo_common::config::{ConfigError, SharedConfig};
use serde::{Deserialize, Serialize};

/// Knobs for one harness run. Every field can be overridden from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Iterations per benchmark.
    pub iterations: u64,
    /// Threads in the concurrent dispatch check.
    pub threads: usize,
    /// Failing checks each of those threads performs.
    pub iters_per_thread: u64,
    /// Run the fork-based fatal-invariant check.
    pub death_test: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            iterations: 1_000_000,
            threads: 4,
            iters_per_thread: 10_000,
            death_test: true,
        }
    }
}

/// Root of `stress.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StressConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub run: RunSettings,
}

impl StressConfig {
    /// Configuration used when no file is given.
    pub fn builtin() -> Self {
        Self {
            shared: SharedConfig::with_service_name("dodo-stress"),
            run: RunSettings::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.run.iterations == 0 {
            return Err(ConfigError::ValidationError(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.run.threads == 0 {
            return Err(ConfigError::ValidationError(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodo_common::config::ConfigLoader;

    #[test]
    fn builtin_is_valid() {
        let config = StressConfig::builtin();
        assert!(config.validate().is_ok());
        assert_eq!(config.run, RunSettings::default());
    }

    #[test]
    fn partial_run_section_keeps_defaults() {
        let config = StressConfig::from_toml(
            "[shared]\nservice_name = \"s\"\n[run]\nthreads = 8\ndeath_test = false\n",
        )
        .unwrap();
        assert_eq!(config.run.threads, 8);
        assert!(!config.run.death_test);
        assert_eq!(config.run.iterations, RunSettings::default().iterations);
    }

    #[test]
    fn zero_threads_is_rejected() {
        let mut config = StressConfig::builtin();
        config.run.threads = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let mut config = StressConfig::builtin();
        config.run.iterations = 0;
        assert!(config.validate().is_err());
    }
}
