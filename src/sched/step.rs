// src/sched/step.rs

//! Result type for a scheduler step.

use crate::types::TaskId;

/// Structured result of a single scheduler step.
///
/// The frame loop mostly ignores this apart from forwarding failures to the
/// console; tests use it to make assertions about what a step did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Tasks that were resumed in this step, in resume order.
    pub resumed: Vec<TaskId>,
    /// Tasks that ran to completion.
    pub completed: Vec<TaskId>,
    /// Tasks whose script raised an error, with the engine's message.
    pub failed: Vec<(TaskId, String)>,
    /// Tasks that ended because a stop was requested.
    pub stopped: Vec<TaskId>,
    /// Number of finished tasks removed by the sweep.
    pub swept: usize,
}

impl StepReport {
    /// Whether anything at all happened.
    pub fn is_empty(&self) -> bool {
        self.resumed.is_empty() && self.stopped.is_empty() && self.swept == 0
    }
}
