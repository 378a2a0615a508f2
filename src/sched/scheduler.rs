// src/sched/scheduler.rs

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use mlua::{ChunkMode, Lua, Table, Thread, Value};
use tracing::{debug, error, info, trace, warn};

use crate::clock::Clock;
use crate::errors::{Result, TaskError};
use crate::sched::bindings;
use crate::sched::compile::ScriptCompiler;
use crate::sched::step::StepReport;
use crate::sched::thread::{self, ResumeOutcome, Task, TaskSnapshot};
use crate::types::{TaskId, TaskOrigin};

/// State shared between the scheduler and the script-facing callbacks.
///
/// The callbacks installed into Lua (`task.spawn`, `task.wait`) hold a weak
/// reference to this; the `RefCell` is never borrowed across a resume, so a
/// running task can append to the collection or update its own wake time.
pub(crate) struct SchedulerState {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<u64>,
    clock: Rc<dyn Clock>,
}

impl SchedulerState {
    fn allocate_id(&self) -> TaskId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        TaskId(id)
    }

    fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Register a callable as a new task, eligible from the next step.
    pub(crate) fn spawn(&self, lua: &Lua, value: Value) -> Result<TaskId> {
        let entry = match value {
            Value::Function(f) => f,
            other => {
                return Err(TaskError::InvalidArgument(format!(
                    "task.spawn expects a function, got {}",
                    other.type_name()
                )));
            }
        };

        let id = self.allocate_id();
        let task = Task::new(lua, id, TaskOrigin::Spawned, entry, self.now())?;
        self.tasks.borrow_mut().push(task);

        debug!(task = %id, "spawned task");
        Ok(id)
    }

    /// Bookkeeping half of `task.wait`, run before the calling coroutine
    /// yields.
    ///
    /// If a stop was requested the task is marked finished here; the caller
    /// still yields, and a finished task is never resumed again.
    pub(crate) fn prepare_wait(&self, current: Option<&Thread>, delay: f64) -> Result<()> {
        let delay = if delay.is_nan() || delay < 0.0 { 0.0 } else { delay };
        let now = self.now();

        let mut tasks = self.tasks.borrow_mut();
        let found = match current {
            Some(current) => tasks.iter_mut().find(|t| t.runs_on(current)),
            None => None,
        };
        let task = found.ok_or(TaskError::NotInTaskContext)?;

        task.sleep_start_time = now;
        task.wake_time = now + delay;

        if task.should_stop {
            task.mark_finished();
            debug!(task = %task.id(), "stop requested; terminating at wait");
            return Ok(());
        }

        trace!(task = %task.id(), delay, wake_time = task.wake_time, "task suspended");
        Ok(())
    }
}

impl fmt::Debug for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerState")
            .field("tasks", &self.tasks.borrow().len())
            .field("next_id", &self.next_id.get())
            .field("clock", &self.clock)
            .finish()
    }
}

/// Owns every live task and advances them once per frame.
///
/// It is responsible for:
/// - compiling and registering scripts (`run`)
/// - registering callables handed over by running scripts (`spawn`)
/// - resuming each eligible task exactly once per `step`
/// - sweeping finished tasks
///
/// Tasks are addressed from outside only through [`TaskId`]s. Clones share
/// the same task collection.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: Rc<SchedulerState>,
    compiler: ScriptCompiler,
    /// Globals that script environments read through to.
    shared_globals: Table,
}

impl Scheduler {
    /// Create a scheduler bound to `lua` and install the `task` library into
    /// its globals.
    ///
    /// Install before the master state's globals are frozen.
    pub fn new(lua: &Lua, compiler: ScriptCompiler, clock: Rc<dyn Clock>) -> Result<Self> {
        let state = Rc::new(SchedulerState {
            tasks: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            clock,
        });

        bindings::install(lua, Rc::downgrade(&state))?;

        Ok(Self {
            state,
            compiler,
            shared_globals: lua.globals(),
        })
    }

    pub fn compiler(&self) -> &ScriptCompiler {
        &self.compiler
    }

    /// Compile `source` and register it as a new task.
    ///
    /// No script code runs here; the task is resumed by the next `step`.
    pub fn run(&self, lua: &Lua, source: &str) -> Result<TaskId> {
        let bytecode = self.compiler.compile(source)?;
        self.run_bytecode(lua, &bytecode)
    }

    /// Register already compiled bytecode as a new task.
    ///
    /// Bytecode the engine rejects yields [`TaskError::Load`].
    pub fn run_bytecode(&self, lua: &Lua, bytecode: &[u8]) -> Result<TaskId> {
        let env = thread::sandbox_environment(lua, &self.shared_globals)?;
        let entry = lua
            .load(bytecode)
            .set_name(self.compiler.chunk_name())
            .set_mode(ChunkMode::Binary)
            .set_environment(env)
            .into_function()
            .map_err(|e| {
                let msg = thread::lua_message(&e);
                error!(error = %msg, "error loading script");
                TaskError::Load(msg)
            })?;

        let id = self.state.allocate_id();
        let task = Task::new(lua, id, TaskOrigin::Script, entry, self.state.now())?;
        self.state.tasks.borrow_mut().push(task);

        info!(task = %id, "script scheduled");
        Ok(id)
    }

    /// Register an existing callable as a new task.
    pub fn spawn(&self, lua: &Lua, value: Value) -> Result<TaskId> {
        self.state.spawn(lua, value)
    }

    /// Ask a task to stop at its next suspension or scheduling point.
    ///
    /// Returns `false` if the task is unknown or already finished. A task
    /// that never waits and never returns cannot be stopped this way.
    pub fn request_stop(&self, id: TaskId) -> bool {
        let mut tasks = self.state.tasks.borrow_mut();
        match tasks.iter_mut().find(|t| t.id() == id) {
            Some(task) if !task.is_finished() => {
                task.should_stop = true;
                debug!(task = %id, "stop requested");
                true
            }
            _ => false,
        }
    }

    /// Request a stop for every live task. Returns how many were flagged.
    pub fn request_stop_all(&self) -> usize {
        let mut tasks = self.state.tasks.borrow_mut();
        let mut flagged = 0;
        for task in tasks.iter_mut().filter(|t| !t.is_finished()) {
            task.should_stop = true;
            flagged += 1;
        }
        debug!(flagged, "stop requested for all tasks");
        flagged
    }

    /// Number of tasks in the collection, including finished ones that
    /// have not been swept yet.
    pub fn live_task_count(&self) -> usize {
        self.state.tasks.borrow().len()
    }

    /// Ids of every task in the collection, in collection order.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.state.tasks.borrow().iter().map(Task::id).collect()
    }

    /// Read-only view of a task's metadata, if it is still in the collection.
    pub fn task_state(&self, id: TaskId) -> Option<TaskSnapshot> {
        self.state
            .tasks
            .borrow()
            .iter()
            .find(|t| t.id() == id)
            .map(Task::snapshot)
    }

    /// One full frame: resume every eligible task once, then sweep.
    pub fn step(&self) -> StepReport {
        let mut report = self.resume_eligible();
        report.swept = self.sweep();
        report
    }

    /// Resume phase of [`step`](Self::step), without the sweep.
    ///
    /// Only tasks present when this call starts are visited; anything
    /// spawned while it runs waits for the next call.
    ///
    /// A pending stop request finishes a suspended task on the next call,
    /// without waiting for its wake time and without resuming it.
    pub fn resume_eligible(&self) -> StepReport {
        let now = self.state.now();
        let mut report = StepReport::default();

        let prefix = self.state.tasks.borrow().len();

        for index in 0..prefix {
            let (id, co, elapsed) = {
                let mut tasks = self.state.tasks.borrow_mut();
                let task = &mut tasks[index];

                if task.is_finished() {
                    continue;
                }

                if task.should_stop {
                    task.mark_finished();
                    debug!(task = %task.id(), "stop requested while suspended; finishing");
                    report.stopped.push(task.id());
                    continue;
                }

                if now < task.wake_time {
                    continue;
                }

                (task.id(), task.thread().clone(), now - task.sleep_start_time)
            };

            trace!(task = %id, elapsed, "resuming task");
            report.resumed.push(id);
            let outcome = thread::resume(&co, elapsed);

            let mut tasks = self.state.tasks.borrow_mut();
            let task = &mut tasks[index];

            match outcome {
                ResumeOutcome::Yielded => {
                    if task.should_stop {
                        task.mark_finished();
                        debug!(task = %id, "task suspended with a stop pending; finishing");
                        report.stopped.push(id);
                    }
                }
                ResumeOutcome::Completed => {
                    task.mark_finished();
                    debug!(task = %id, "task completed");
                    report.completed.push(id);
                }
                ResumeOutcome::Errored(msg) => {
                    task.mark_finished();
                    warn!(task = %id, error = %msg, "task raised an error");
                    report.failed.push((id, msg));
                }
            }
        }

        report
    }

    /// Remove finished tasks, releasing their coroutines. Returns how many
    /// were removed.
    pub fn sweep(&self) -> usize {
        let mut tasks = self.state.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| !t.is_finished());
        let swept = before - tasks.len();
        if swept > 0 {
            trace!(swept, remaining = tasks.len(), "swept finished tasks");
        }
        swept
    }
}
