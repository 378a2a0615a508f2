// src/engine/mod.rs

//! Host engine for blocktask.
//!
//! The synchronous core lives in [`host`]: it owns the Lua state, the task
//! scheduler, the world, and the console log, and knows how to run one frame
//! or one console command. The async/IO shell is implemented in
//! [`runtime`]: it ticks frames on a timer and feeds console input and
//! shutdown signals into the core.

/// Runtime options used by the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit once no tasks remain after a frame (used for `--once`).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the console reader and signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A line typed into the console.
    ConsoleLine(String),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod host;
pub mod runtime;

pub use host::Host;
pub use runtime::Runtime;
