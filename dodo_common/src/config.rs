//! TOML configuration shared by `dodo-loader` and `dodo-stress`.
//!
//! Both binaries accept an optional `--config` file. Its root holds a
//! `[shared]` table ([`SharedConfig`]) next to the binary's own sections
//! (`[limits]` and `[[modules]]` for the loader, `[run]` for the harness).
//! Any `Deserialize` root picks up [`ConfigLoader`] for free.
//!
//! ```rust,no_run
//! use dodo_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct HarnessFile {
//!     shared: SharedConfig,
//!     run: toml::Table,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let file = HarnessFile::load(Path::new("config/stress.toml"))?;
//!     file.shared.validate()?;
//!     println!("{} runs {} knobs", file.shared.service_name, file.run.len());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a Dodo config file could not be used.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("no config file at {}", .0.display())]
    FileNotFound(PathBuf),

    /// Unreadable file, bad TOML, or a table of the wrong shape.
    #[error("cannot parse config: {0}")]
    ParseError(String),

    /// Parsed, but a value is out of bounds (empty service name, zero
    /// limits, overlapping reserved windows, ...).
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// `log_level` in `[shared]`, written in lowercase.
///
/// `--verbose` on either binary overrides it with `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    /// Per-descriptor verdicts and the run summary.
    #[default]
    Info,
    /// Failed checks reported through the logging hooks.
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// The `[shared]` table.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "dodo-loader"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Names the binary in log output and in the stress report header.
    pub service_name: String,
}

impl SharedConfig {
    /// `[shared]` for a binary started without `--config`.
    pub fn with_service_name(service_name: &str) -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: service_name.to_string(),
        }
    }

    /// Rejects a blank `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shared.service_name must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads a config root from disk or from TOML text.
///
/// A missing file is [`ConfigError::FileNotFound`] so callers can tell it
/// apart from a file that exists but does not parse.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::ParseError(format!("{}: {e}", path.display()))
            }
        })?;

        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize)]
    struct HarnessFile {
        shared: SharedConfig,
        run: RunSection,
    }

    #[derive(Debug, Deserialize)]
    struct RunSection {
        iterations: u64,
        death_test: bool,
    }

    #[test]
    fn harness_style_file_loads_shared_and_run_tables() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
log_level = "warn"
service_name = "dodo-stress"

[run]
iterations = 5000
death_test = false
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = HarnessFile::load(file.path()).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Warn);
        assert_eq!(config.shared.service_name, "dodo-stress");
        assert_eq!(config.run.iterations, 5000);
        assert!(!config.run.death_test);
    }

    #[test]
    fn omitted_log_level_means_info() {
        let config = HarnessFile::from_toml(
            "[shared]\nservice_name = \"dodo-loader\"\n[run]\niterations = 1\ndeath_test = true\n",
        )
        .unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Info);
        assert_eq!(tracing::Level::from(config.shared.log_level), tracing::Level::INFO);
    }

    #[test]
    fn every_level_name_maps_onto_tracing() {
        #[derive(Debug, Deserialize)]
        struct Shared {
            shared: SharedConfig,
        }

        for (text, level) in [
            ("trace", tracing::Level::TRACE),
            ("debug", tracing::Level::DEBUG),
            ("info", tracing::Level::INFO),
            ("warn", tracing::Level::WARN),
            ("error", tracing::Level::ERROR),
        ] {
            let toml = format!("[shared]\nservice_name = \"dodo\"\nlog_level = \"{text}\"\n");
            let parsed = Shared::from_toml(&toml).unwrap();
            assert_eq!(tracing::Level::from(parsed.shared.log_level), level, "{text}");
        }
    }

    #[test]
    fn uppercase_level_is_a_parse_error() {
        let result = HarnessFile::from_toml(
            "[shared]\nservice_name = \"dodo\"\nlog_level = \"WARN\"\n[run]\niterations = 1\ndeath_test = true\n",
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn blank_service_name_fails_validation() {
        assert!(SharedConfig::with_service_name("dodo-loader").validate().is_ok());

        for name in ["", "   "] {
            let result = SharedConfig::with_service_name(name).validate();
            assert!(
                matches!(result, Err(ConfigError::ValidationError(ref m)) if m.contains("service_name")),
                "{name:?}"
            );
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = Path::new("/nonexistent/dodo/stress.toml");
        let err = HarnessFile::load(path).unwrap_err();

        assert!(matches!(err, ConfigError::FileNotFound(ref p) if p == path));
        assert!(err.to_string().contains("/nonexistent/dodo/stress.toml"));
    }

    #[test]
    fn truncated_table_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[shared\nservice_name = \"dodo-stress\"").unwrap();

        let result = HarnessFile::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn missing_run_table_is_a_parse_error() {
        let result = HarnessFile::from_toml("[shared]\nservice_name = \"dodo-stress\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
