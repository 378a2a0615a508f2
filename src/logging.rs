// src/logging.rs

//! Diagnostics for the host process.
//!
//! Console output (script `print`/`warn`, command replies) goes to stdout
//! through [`crate::console::ConsoleLog`]; everything here goes to stderr.
//!
//! Filter resolution:
//! 1. `--log-level` applies to the `blocktask` targets only
//! 2. otherwise `BLOCKTASK_LOG`, read as full `EnvFilter` directives
//!    (e.g. `blocktask::sched=trace,info`)
//! 3. otherwise [`DEFAULT_DIRECTIVES`]

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "BLOCKTASK_LOG";

/// Our own targets at `info`, dependencies only when they warn.
pub const DEFAULT_DIRECTIVES: &str = "blocktask=info,warn";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(format!("blocktask={},warn", level.directive()))?,
        None => match EnvFilter::try_from_env(LOG_ENV) {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(DEFAULT_DIRECTIVES)?,
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
