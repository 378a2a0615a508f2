// src/sched/mod.rs

//! Cooperative script-task scheduling.
//!
//! - [`thread`] wraps one Luau coroutine together with its scheduling
//!   metadata (wake time, sleep start, finished / stop flags).
//! - [`compile`] turns source text into bytecode with fixed compiler options.
//! - [`scheduler`] owns the live task collection: creation (`run`, `spawn`),
//!   the in-task suspend point (`wait`), and the per-frame `step`.
//! - [`step`] defines the report type returned by a step.
//! - [`bindings`] installs the script-facing `task` library.

pub mod bindings;
pub mod compile;
pub mod scheduler;
pub mod step;
pub mod thread;

pub use compile::ScriptCompiler;
pub use scheduler::Scheduler;
pub use step::StepReport;
pub use thread::{Task, TaskSnapshot};
