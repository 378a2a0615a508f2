// src/config/validate.rs

use crate::config::model::{ConfigFile, MIN_TARGET_FPS, RawConfigFile};
use crate::errors::{Result, TaskError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TaskError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_scheduler(cfg)?;
    validate_compiler(cfg)?;
    validate_console(cfg)?;
    Ok(())
}

fn validate_scheduler(cfg: &RawConfigFile) -> Result<()> {
    if cfg.scheduler.target_fps < MIN_TARGET_FPS {
        return Err(TaskError::ConfigError(format!(
            "[scheduler].target_fps must be >= {} (got {})",
            MIN_TARGET_FPS, cfg.scheduler.target_fps
        )));
    }
    Ok(())
}

fn validate_compiler(cfg: &RawConfigFile) -> Result<()> {
    let compiler = &cfg.compiler;

    if compiler.optimization_level > 2 {
        return Err(TaskError::ConfigError(format!(
            "[compiler].optimization_level must be 0, 1 or 2 (got {})",
            compiler.optimization_level
        )));
    }

    if compiler.debug_level > 2 {
        return Err(TaskError::ConfigError(format!(
            "[compiler].debug_level must be 0, 1 or 2 (got {})",
            compiler.debug_level
        )));
    }

    if compiler.chunk_name.trim().is_empty() {
        return Err(TaskError::ConfigError(
            "[compiler].chunk_name must not be empty".to_string(),
        ));
    }

    for name in &compiler.mutable_globals {
        if !is_identifier(name) {
            return Err(TaskError::ConfigError(format!(
                "[compiler].mutable_globals contains '{}', which is not a valid identifier",
                name
            )));
        }
    }

    Ok(())
}

fn validate_console(cfg: &RawConfigFile) -> Result<()> {
    if cfg.console.history_limit == 0 {
        return Err(TaskError::ConfigError(
            "[console].history_limit must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
