// src/sched/thread.rs

//! Logical thread wrapper: one Luau coroutine plus scheduling metadata.

use mlua::{Function, Lua, MultiValue, Table, Thread, ThreadStatus};

use crate::types::{TaskId, TaskOrigin};

/// A scheduled unit of cooperative execution.
///
/// The coroutine handle is owned exclusively by this value and is released
/// (its registry reference dropped) when the task is removed from the
/// schedule. Nothing else ever holds a clone beyond the duration of a single
/// resume.
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    origin: TaskOrigin,
    thread: Thread,
    /// Absolute time before which the task must not be resumed.
    pub(crate) wake_time: f64,
    /// Absolute time of the most recent suspension.
    pub(crate) sleep_start_time: f64,
    /// Cooperative cancellation request.
    pub(crate) should_stop: bool,
    finished: bool,
}

impl Task {
    /// Create a coroutine for `entry` and sandbox it.
    ///
    /// The coroutine is only reachable through the returned task; it is not
    /// left on the master state's stack.
    pub fn new(
        lua: &Lua,
        id: TaskId,
        origin: TaskOrigin,
        entry: Function,
        now: f64,
    ) -> mlua::Result<Self> {
        let thread = lua.create_thread(entry)?;
        thread.sandbox()?;

        Ok(Self {
            id,
            origin,
            thread,
            wake_time: now,
            sleep_start_time: now,
            should_stop: false,
            finished: false,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn origin(&self) -> TaskOrigin {
        self.origin
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Finished is write-once; there is no way back.
    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
    }

    /// Whether `current` is this task's coroutine.
    pub(crate) fn runs_on(&self, current: &Thread) -> bool {
        &self.thread == current
    }

    pub(crate) fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id,
            origin: self.origin,
            wake_time: self.wake_time,
            sleep_start_time: self.sleep_start_time,
            should_stop: self.should_stop,
            finished: self.finished,
        }
    }
}

/// Read-only copy of a task's scheduling metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub origin: TaskOrigin,
    pub wake_time: f64,
    pub sleep_start_time: f64,
    pub should_stop: bool,
    pub finished: bool,
}

/// What happened when a coroutine was resumed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResumeOutcome {
    Yielded,
    Completed,
    Errored(String),
}

/// Resume `thread`, delivering `elapsed` as the single resume value.
pub(crate) fn resume(thread: &Thread, elapsed: f64) -> ResumeOutcome {
    match thread.resume::<MultiValue>(elapsed) {
        Ok(_) => match thread.status() {
            ThreadStatus::Resumable => ResumeOutcome::Yielded,
            _ => ResumeOutcome::Completed,
        },
        Err(err) => ResumeOutcome::Errored(lua_message(&err)),
    }
}

/// Build a private global environment for one script.
///
/// Reads fall through to `shared`; writes land in the new table, so a script
/// rebinding a global never leaks into the master state or other scripts.
pub(crate) fn sandbox_environment(lua: &Lua, shared: &Table) -> mlua::Result<Table> {
    let env = lua.create_table()?;
    let meta = lua.create_table()?;
    meta.raw_set("__index", shared.clone())?;
    meta.set_readonly(true);
    env.set_metatable(Some(meta));
    Ok(env)
}

/// The engine-reported message of a Lua error, without mlua's wrapping.
pub fn lua_message(err: &mlua::Error) -> String {
    match err {
        mlua::Error::RuntimeError(msg) => msg.clone(),
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::CallbackError { cause, .. } => lua_message(cause),
        mlua::Error::WithContext { context, cause } => {
            format!("{context}: {}", lua_message(cause))
        }
        other => other.to_string(),
    }
}
