// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; range checks happen in
/// [`load_and_validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration to use at startup.
///
/// - An explicit path must exist and be valid.
/// - Without one, [`default_config_path`] is used if present.
/// - Otherwise built-in defaults apply.
pub fn resolve(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let fallback = default_config_path();
    if fallback.is_file() {
        debug!(path = %fallback.display(), "using default config file");
        load_and_validate(&fallback)
    } else {
        debug!("no config file found; using built-in defaults");
        Ok(ConfigFile::default())
    }
}

/// `BlockTask.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("BlockTask.toml")
}
