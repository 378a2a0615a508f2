#![allow(dead_code)]

use std::rc::Rc;

use blocktask::clock::ManualClock;
use blocktask::config::ConfigFile;
use blocktask::engine::Host;
use blocktask::errors::Result;
use blocktask::sched::{Scheduler, ScriptCompiler, StepReport, TaskSnapshot};
use blocktask::types::TaskId;
use mlua::{FromLua, Lua, Table};

/// A bare scheduler over a fresh Lua state and a hand-driven clock.
///
/// Scripts report back through the global `results` table:
///
/// ```lua
/// results.ran = true
/// ```
///
/// No sandbox is applied to the master state, so `results` stays writable.
pub struct SchedulerHarness {
    scheduler: Scheduler,
    clock: ManualClock,
    lua: Lua,
}

impl SchedulerHarness {
    pub fn new() -> Self {
        let lua = Lua::new();
        let results = lua.create_table().expect("create results table");
        lua.globals().set("results", results).expect("install results table");

        let clock = ManualClock::new();
        let scheduler = Scheduler::new(&lua, ScriptCompiler::default(), Rc::new(clock.clone()))
            .expect("create scheduler");

        Self {
            scheduler,
            clock,
            lua,
        }
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn try_run(&self, source: &str) -> Result<TaskId> {
        self.scheduler.run(&self.lua, source)
    }

    pub fn run(&self, source: &str) -> TaskId {
        self.try_run(source).expect("script should compile and load")
    }

    /// Set the clock to `seconds` and run one full step.
    pub fn step_at(&self, seconds: f64) -> StepReport {
        self.clock.set(seconds);
        self.scheduler.step()
    }

    pub fn state(&self, id: TaskId) -> Option<TaskSnapshot> {
        self.scheduler.task_state(id)
    }

    pub fn results_table(&self) -> Table {
        self.lua.globals().get("results").expect("results table present")
    }

    /// Read `results[key]`.
    pub fn result<T: FromLua>(&self, key: &str) -> T {
        self.results_table().get(key).expect("result readable")
    }
}

impl Default for SchedulerHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a host driven by a manual clock.
pub fn host_with_clock(cfg: &ConfigFile) -> (Host, ManualClock) {
    let clock = ManualClock::new();
    let host = Host::new(cfg, Rc::new(clock.clone())).expect("create host");
    (host, clock)
}
