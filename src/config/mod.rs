// src/config/mod.rs

//! Configuration loading and validation for blocktask.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate value ranges before anything is built from it (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve};
pub use model::{
    CompilerSection, ConfigFile, ConsoleSection, RawConfigFile, SandboxSection, SchedulerSection,
};
