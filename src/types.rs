use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Non-owning handle to a scheduled task.
///
/// Handing out a `TaskId` never extends the lifetime of the task itself;
/// the scheduler is the sole owner. Looking up an id whose task has already
/// been swept simply finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| format!("invalid task id: {s} (expected e.g. \"3\" or \"#3\")"))
    }
}

/// How a task entered the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrigin {
    /// Compiled from source text via `Scheduler::run`.
    Script,
    /// Created from an existing callable via `task.spawn`.
    Spawned,
}

/// Which level of global sandboxing to apply to the master state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxMode {
    /// Each task gets a private environment; shared globals and libraries
    /// are frozen once bindings are installed.
    Strict,
    /// Each task gets a private environment; shared tables stay writable.
    Environment,
}

impl Default for SandboxMode {
    fn default() -> Self {
        SandboxMode::Strict
    }
}

impl FromStr for SandboxMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(SandboxMode::Strict),
            "environment" => Ok(SandboxMode::Environment),
            other => Err(format!(
                "invalid sandbox mode: {other} (expected \"strict\" or \"environment\")"
            )),
        }
    }
}
