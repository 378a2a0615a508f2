// tests/config_errors.rs

mod common;
use crate::common::builders::ConfigFileBuilder;

use std::io::Write;

use blocktask::config::{load_and_validate, resolve, ConfigFile};
use blocktask::errors::TaskError;
use blocktask::types::SandboxMode;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_yields_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.scheduler.target_fps, 60);
    assert_eq!(cfg.compiler.optimization_level, 1);
    assert_eq!(cfg.compiler.debug_level, 1);
    assert_eq!(cfg.compiler.chunk_name, "ScriptChunk");
    assert_eq!(
        cfg.compiler.mutable_globals,
        vec!["game", "workspace", "script", "shared", "plugin"]
    );
    assert_eq!(cfg.sandbox.mode, SandboxMode::Strict);
    assert!(cfg.console.enabled);
    assert_eq!(cfg.console.history_limit, 2000);
}

#[test]
fn sections_override_defaults() {
    let file = write_config(
        r#"
[scheduler]
target_fps = 30

[compiler]
optimization_level = 2
mutable_globals = ["game"]

[sandbox]
mode = "environment"

[console]
enabled = false
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.scheduler.target_fps, 30);
    assert_eq!(cfg.compiler.optimization_level, 2);
    assert_eq!(cfg.compiler.mutable_globals, vec!["game"]);
    assert_eq!(cfg.sandbox.mode, SandboxMode::Environment);
    assert!(!cfg.console.enabled);
}

#[test]
fn low_target_fps_returns_config_error() {
    let file = write_config("[scheduler]\ntarget_fps = 5\n");

    match load_and_validate(file.path()) {
        Err(TaskError::ConfigError(msg)) => {
            assert!(msg.contains("target_fps"));
            assert!(msg.contains("5"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn bad_mutable_global_returns_config_error() {
    let file = write_config("[compiler]\nmutable_globals = [\"game\", \"not valid\"]\n");

    match load_and_validate(file.path()) {
        Err(TaskError::ConfigError(msg)) => {
            assert!(msg.contains("not a valid identifier"));
            assert!(msg.contains("not valid"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn out_of_range_levels_are_rejected() {
    let raw = ConfigFileBuilder::new().optimization_level(3).raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(TaskError::ConfigError(_))
    ));

    let mut raw = ConfigFileBuilder::new().raw();
    raw.compiler.debug_level = 9;
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(TaskError::ConfigError(_))
    ));
}

#[test]
fn zero_history_limit_is_rejected() {
    let raw = ConfigFileBuilder::new().history_limit(0).raw();
    match ConfigFile::try_from(raw) {
        Err(TaskError::ConfigError(msg)) => assert!(msg.contains("history_limit")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unknown_sandbox_mode_is_a_toml_error() {
    let file = write_config("[sandbox]\nmode = \"loose\"\n");

    match load_and_validate(file.path()) {
        Err(TaskError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn explicit_missing_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    match resolve(Some(&missing)) {
        Err(TaskError::IoError(_)) => {}
        other => panic!("Expected IoError, got: {:?}", other),
    }
}
