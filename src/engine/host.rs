// src/engine/host.rs

//! Synchronous host core.
//!
//! This replaces what would otherwise be process-wide globals (the master
//! Lua state, the task list, the instance list) with one owned value. It has
//! no channels and no Tokio types, so it can be driven directly in tests.

use std::cell::{Ref, RefCell};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use mlua::Lua;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::ConfigFile;
use crate::console::{self, ConsoleCommand, ConsoleLog, LogKind, StopTarget, HELP_LINES};
use crate::errors::Result;
use crate::sched::{Scheduler, ScriptCompiler, StepReport};
use crate::types::{SandboxMode, TaskId};
use crate::world::{self, World};

/// Owns the scripting engine and everything scripts can touch.
///
/// Field order matters: the scheduler (and the coroutines it owns) is
/// dropped before the Lua state.
#[derive(Debug)]
pub struct Host {
    scheduler: Scheduler,
    world: Rc<World>,
    console: Rc<RefCell<ConsoleLog>>,
    target_fps: u32,
    lua: Lua,
}

impl Host {
    /// Build a host from validated configuration.
    ///
    /// - creates the master Lua state
    /// - installs `print`/`warn`, `Instance`/`Vector3`/`Color3`, and `task`
    /// - inserts the baseplate
    /// - freezes shared globals when the sandbox mode is strict
    pub fn new(cfg: &ConfigFile, clock: Rc<dyn Clock>) -> Result<Self> {
        let lua = Lua::new();

        let console = Rc::new(RefCell::new(ConsoleLog::new(
            cfg.console.history_limit,
            cfg.console.echo,
        )));
        let world = Rc::new(World::new());
        world.insert_baseplate();

        console::bindings::install(&lua, Rc::clone(&console))?;
        world::bindings::install(&lua, Rc::clone(&world))?;

        let compiler = ScriptCompiler::from_config(&cfg.compiler);
        let scheduler = Scheduler::new(&lua, compiler, clock)?;

        match cfg.sandbox.mode {
            SandboxMode::Strict => {
                lua.sandbox(true)?;
                debug!("shared globals frozen (strict sandbox)");
            }
            SandboxMode::Environment => {
                debug!("shared globals left writable (environment sandbox)");
            }
        }

        info!(
            target_fps = cfg.scheduler.target_fps,
            sandbox = ?cfg.sandbox.mode,
            "host initialised"
        );

        Ok(Self {
            scheduler,
            world,
            console,
            target_fps: cfg.scheduler.target_fps,
            lua,
        })
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn console(&self) -> Ref<'_, ConsoleLog> {
        self.console.borrow()
    }

    /// Append a line to the console log.
    pub fn log(&self, kind: LogKind, text: impl Into<String>) {
        self.console.borrow_mut().push(kind, text);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn live_task_count(&self) -> usize {
        self.scheduler.live_task_count()
    }

    /// Compile `source` and schedule it; it first runs on the next frame.
    pub fn run_script(&self, source: &str) -> Result<TaskId> {
        self.scheduler.run(&self.lua, source)
    }

    /// Read a script file and schedule it.
    pub fn run_file(&self, path: &Path) -> Result<TaskId> {
        let source = fs::read_to_string(path)?;
        self.run_script(&source)
    }

    /// Ask a task to stop cooperatively.
    pub fn request_stop(&self, id: TaskId) -> bool {
        self.scheduler.request_stop(id)
    }

    /// Advance one frame: step the scheduler, surface script errors on the
    /// console, and drop destroyed instances.
    pub fn frame(&mut self) -> StepReport {
        let report = self.scheduler.step();

        if !report.failed.is_empty() {
            let mut console = self.console.borrow_mut();
            for (id, msg) in &report.failed {
                console.error(format!("Lua error in task {id}: {msg}"));
            }
        }

        let pruned = self.world.prune();
        if pruned > 0 {
            debug!(pruned, "removed destroyed instances");
        }

        report
    }

    /// Execute one line of console input.
    pub fn exec_console(&mut self, line: &str) {
        let command = console::parse_command(line);
        if command == ConsoleCommand::Empty {
            return;
        }

        self.console
            .borrow_mut()
            .push(LogKind::Command, format!("$ {}", line.trim()));

        match command {
            ConsoleCommand::Help => {
                let mut console = self.console.borrow_mut();
                for line in HELP_LINES {
                    console.log(*line);
                }
            }
            ConsoleCommand::Clear => self.console.borrow_mut().clear(),
            ConsoleCommand::LuaTasks => {
                let count = self.live_task_count();
                self.console.borrow_mut().log(count.to_string());
            }
            ConsoleCommand::Instances => {
                let count = self.world.instance_count();
                self.console.borrow_mut().log(count.to_string());
            }
            ConsoleCommand::MaxFps(fps) => {
                self.target_fps = fps;
                self.console
                    .borrow_mut()
                    .log(format!("Changed max fps to {fps}"));
            }
            ConsoleCommand::RunFile(path) => match self.run_file(&path) {
                Ok(id) => self
                    .console
                    .borrow_mut()
                    .log(format!("Started {} as task {id}", path.display())),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "console run failed");
                    self.console
                        .borrow_mut()
                        .error(format!("Failed to run {}: {e}", path.display()));
                }
            },
            ConsoleCommand::Stop(StopTarget::One(id)) => {
                if self.request_stop(id) {
                    self.console
                        .borrow_mut()
                        .log(format!("Stop requested for task {id}"));
                } else {
                    self.console
                        .borrow_mut()
                        .warn(format!("No running task {id}"));
                }
            }
            ConsoleCommand::Stop(StopTarget::All) => {
                let flagged = self.scheduler.request_stop_all();
                self.console
                    .borrow_mut()
                    .log(format!("Stop requested for {flagged} task(s)"));
            }
            ConsoleCommand::Script(source) => {
                if let Err(e) = self.run_script(&source) {
                    debug!(error = %e, "console script rejected");
                    self.console
                        .borrow_mut()
                        .error(format!("Failed to execute lua script: {e}"));
                }
            }
            ConsoleCommand::Invalid(msg) => self.console.borrow_mut().error(msg),
            ConsoleCommand::Empty => {}
        }
    }
}
