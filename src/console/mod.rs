// src/console/mod.rs

//! Text console: command parsing, a bounded log, and the stdin reader.
//!
//! - [`log`] keeps the timestamped history shown to the user.
//! - [`input`] forwards stdin lines to the runtime as events.
//!
//! Commands are parsed here into a closed [`ConsoleCommand`]; executing them
//! needs the scheduler and the world, so that happens in
//! [`crate::engine::Host::exec_console`].

pub mod bindings;
pub mod input;
pub mod log;

use std::path::PathBuf;

pub use log::{ConsoleLog, LogEntry, LogKind};

use crate::config::model::MIN_TARGET_FPS;
use crate::types::TaskId;

pub const HELP_LINES: &[&str] = &[
    "Commands:",
    "- help: show this message",
    "- max_fps <int>: set the maximum fps",
    "- clear: clear console output",
    "- luatasks: get number of tasks running",
    "- instances: get number of instances in the world",
    "- run <path>: execute a lua script file",
    "- stop <id|all>: ask a running task to stop",
    "- anything else: execute text as lua script",
];

/// Which tasks a `stop` command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTarget {
    One(TaskId),
    All,
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Clear,
    LuaTasks,
    Instances,
    MaxFps(u32),
    RunFile(PathBuf),
    Stop(StopTarget),
    /// Anything that is not a command is executed as a script.
    Script(String),
    /// A recognised command with bad arguments; the message explains why.
    Invalid(String),
    Empty,
}

/// Parse one line of console input.
pub fn parse_command(line: &str) -> ConsoleCommand {
    let text = line.trim();
    if text.is_empty() {
        return ConsoleCommand::Empty;
    }

    let (cmd, rest) = match text.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (text, ""),
    };

    match cmd {
        "help" => ConsoleCommand::Help,
        "clear" => ConsoleCommand::Clear,
        "luatasks" => ConsoleCommand::LuaTasks,
        "instances" => ConsoleCommand::Instances,
        "max_fps" => parse_max_fps(rest),
        "run" if rest.is_empty() => ConsoleCommand::Invalid("usage: run <path>".to_string()),
        "run" => ConsoleCommand::RunFile(PathBuf::from(rest)),
        "stop" => parse_stop(rest),
        _ => ConsoleCommand::Script(line.to_string()),
    }
}

fn parse_max_fps(arg: &str) -> ConsoleCommand {
    let digits = arg.strip_prefix(['-', '+']).unwrap_or(arg);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return ConsoleCommand::Invalid("Invalid fps value: not a number".to_string());
    }

    match arg.parse::<i64>() {
        Ok(fps) if fps < i64::from(MIN_TARGET_FPS) => {
            ConsoleCommand::Invalid(format!("FPS must be at least {MIN_TARGET_FPS}"))
        }
        Ok(fps) => match u32::try_from(fps) {
            Ok(fps) => ConsoleCommand::MaxFps(fps),
            Err(_) => ConsoleCommand::Invalid("Invalid fps value: out of range".to_string()),
        },
        Err(_) => ConsoleCommand::Invalid("Invalid fps value: out of range".to_string()),
    }
}

fn parse_stop(arg: &str) -> ConsoleCommand {
    match arg {
        "" => ConsoleCommand::Invalid("usage: stop <id|all>".to_string()),
        "all" => ConsoleCommand::Stop(StopTarget::All),
        id => match id.parse::<TaskId>() {
            Ok(id) => ConsoleCommand::Stop(StopTarget::One(id)),
            Err(e) => ConsoleCommand::Invalid(e),
        },
    }
}
