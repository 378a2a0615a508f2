#![allow(dead_code)]

use blocktask::config::{ConfigFile, RawConfigFile};
use blocktask::types::SandboxMode;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Console echo is off by default so test output stays clean.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.console.echo = false;
        config.console.enabled = false;
        Self { config }
    }

    pub fn target_fps(mut self, fps: u32) -> Self {
        self.config.scheduler.target_fps = fps;
        self
    }

    pub fn sandbox(mut self, mode: SandboxMode) -> Self {
        self.config.sandbox.mode = mode;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.console.history_limit = limit;
        self
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.config.console.echo = echo;
        self
    }

    pub fn mutable_global(mut self, name: &str) -> Self {
        self.config.compiler.mutable_globals.push(name.to_string());
        self
    }

    pub fn optimization_level(mut self, level: u8) -> Self {
        self.config.compiler.optimization_level = level;
        self
    }

    /// The raw (unvalidated) config, for validation tests.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
