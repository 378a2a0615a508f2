// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("attempted to use task.wait outside of a running task")]
    NotInTaskContext,

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Lua error: {0}")]
    Lua(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// mlua errors are `!Send` without its `send` feature; only the message is kept.
impl From<mlua::Error> for TaskError {
    fn from(err: mlua::Error) -> Self {
        TaskError::Lua(crate::sched::thread::lua_message(&err))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskError>;
