// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `blocktask`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "blocktask",
    version,
    about = "Run Luau scripts as cooperatively scheduled tasks.",
    long_about = None
)]
pub struct CliArgs {
    /// Script to start as the first task.
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// Default: `BlockTask.toml` in the current working directory, if it
    /// exists; otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override `[scheduler].target_fps`.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Exit as soon as no tasks remain.
    #[arg(long)]
    pub once: bool,

    /// Do not read console commands from stdin.
    #[arg(long)]
    pub no_console: bool,

    /// Compile SCRIPT and report errors, but don't run anything.
    #[arg(long, requires = "script")]
    pub check: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BLOCKTASK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
