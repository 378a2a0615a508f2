// src/config/model.rs

use serde::Deserialize;

use crate::types::SandboxMode;

/// Globals scripts are allowed to rebind. The compiler will not fold or
/// cache lookups of these names.
pub const DEFAULT_MUTABLE_GLOBALS: &[&str] = &["game", "workspace", "script", "shared", "plugin"];

/// Lowest frame rate accepted from config, the CLI, or the console.
pub const MIN_TARGET_FPS: u32 = 10;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [scheduler]
/// target_fps = 60
///
/// [compiler]
/// optimization_level = 1
/// debug_level = 1
/// mutable_globals = ["game", "workspace", "script", "shared", "plugin"]
///
/// [sandbox]
/// mode = "strict"
///
/// [console]
/// history_limit = 2000
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub compiler: CompilerSection,

    #[serde(default)]
    pub sandbox: SandboxSection,

    #[serde(default)]
    pub console: ConsoleSection,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or `Default`), so every
/// `ConfigFile` in circulation has passed validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub scheduler: SchedulerSection,
    pub compiler: CompilerSection,
    pub sandbox: SandboxSection,
    pub console: ConsoleSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            scheduler: raw.scheduler,
            compiler: raw.compiler,
            sandbox: raw.sandbox,
            console: raw.console,
        }
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Frames (scheduler steps) per second driven by the host loop.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_target_fps() -> u32 {
    60
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

/// `[compiler]` section: options handed to the Luau compiler for every
/// script started with `run`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerSection {
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,

    #[serde(default = "default_debug_level")]
    pub debug_level: u8,

    #[serde(default = "default_mutable_globals")]
    pub mutable_globals: Vec<String>,

    /// Chunk name reported in error messages and tracebacks.
    #[serde(default = "default_chunk_name")]
    pub chunk_name: String,
}

fn default_optimization_level() -> u8 {
    1
}

fn default_debug_level() -> u8 {
    1
}

fn default_mutable_globals() -> Vec<String> {
    DEFAULT_MUTABLE_GLOBALS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_chunk_name() -> String {
    "ScriptChunk".to_string()
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            optimization_level: default_optimization_level(),
            debug_level: default_debug_level(),
            mutable_globals: default_mutable_globals(),
            chunk_name: default_chunk_name(),
        }
    }
}

/// `[sandbox]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SandboxSection {
    /// `"strict"` (default) or `"environment"`.
    #[serde(default)]
    pub mode: SandboxMode,
}

/// `[console]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleSection {
    /// Read commands from stdin while running.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of log lines kept; the oldest are dropped first.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Print each log line to stdout as it is recorded.
    #[serde(default = "default_true")]
    pub echo: bool,
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    2000
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            enabled: true,
            history_limit: default_history_limit(),
            echo: true,
        }
    }
}
