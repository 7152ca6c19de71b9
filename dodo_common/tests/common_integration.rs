//! Integration test: config loading plus the logging policy, as a binary
//! wires them together at startup.

use std::io::Write;

use dodo::{Code, check_not_null, check_range, require};
use dodo_common::logging::effective_level;
use dodo_common::prelude::*;
use serde::Deserialize;
use tempfile::NamedTempFile;

#[derive(Debug, Deserialize)]
struct ToolConfig {
    shared: SharedConfig,
    threshold: u32,
}

#[test]
fn config_and_logging_policy_together() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"threshold = 10

[shared]
log_level = "error"
service_name = "dodo-tool"
"#
    )
    .unwrap();
    file.flush().unwrap();

    let config = ToolConfig::load(file.path()).unwrap();
    config.shared.validate().unwrap();
    assert_eq!(
        effective_level(config.shared.log_level, false),
        tracing::Level::ERROR
    );

    // No subscriber installed: the hooks still return the failing code.
    let policy = logging_policy();
    assert!(require!(policy; config.threshold == 10, Code::PreconditionFailed).ok());
    assert_eq!(
        check_range!(policy; 11, 0, config.threshold, Code::OutOfRange).code(),
        Code::OutOfRange
    );
    let missing: Option<&u32> = None;
    assert_eq!(
        check_not_null!(policy; missing, Code::NullPointer).code(),
        Code::NullPointer
    );
}

#[test]
fn missing_config_file_is_reported() {
    let result = ToolConfig::load(std::path::Path::new("/nonexistent/dodo/tool.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}
