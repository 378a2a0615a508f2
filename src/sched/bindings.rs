// src/sched/bindings.rs

//! Script-facing `task` library.
//!
//! ```lua
//! task.spawn(function() ... end)   -- run a callable as its own task
//! local dt = task.wait(0.5)        -- suspend; returns the elapsed seconds
//! ```
//!
//! `task.wait` is a small Lua closure around a native bookkeeping callback:
//! the callback records sleep/wake times and checks the stop flag, then the
//! closure yields the calling coroutine. The values the scheduler resumes
//! with become `task.wait`'s return values.

use std::rc::Weak;

use mlua::{Function, Lua, Value};

use crate::errors::TaskError;
use crate::sched::scheduler::SchedulerState;

const WAIT_SHIM: &str = r#"
local prepare, running, yield = ...
return function(delay)
    prepare(running(), delay)
    return yield()
end
"#;

/// Install the `task` global.
pub(crate) fn install(lua: &Lua, state: Weak<SchedulerState>) -> mlua::Result<()> {
    let globals = lua.globals();
    let coroutine: mlua::Table = globals.get("coroutine")?;
    let running: Function = coroutine.get("running")?;
    let yield_fn: Function = coroutine.get("yield")?;

    let spawn_state = state.clone();
    let spawn = lua.create_function(move |lua, value: Value| {
        let state = upgrade(&spawn_state)?;
        state.spawn(lua, value).map_err(mlua::Error::external)?;
        Ok(())
    })?;

    let prepare = lua.create_function(move |_, (current, delay): (Value, Option<f64>)| {
        let state = upgrade(&state)?;
        let current = match current {
            Value::Thread(thread) => Some(thread),
            _ => None,
        };
        state
            .prepare_wait(current.as_ref(), delay.unwrap_or(0.0))
            .map_err(mlua::Error::external)
    })?;

    let wait: Function = lua
        .load(WAIT_SHIM)
        .set_name("task.wait")
        .call((prepare, running, yield_fn))?;

    let task = lua.create_table()?;
    task.set("spawn", spawn)?;
    task.set("wait", wait)?;
    globals.set("task", task)?;

    Ok(())
}

fn upgrade(state: &Weak<SchedulerState>) -> mlua::Result<std::rc::Rc<SchedulerState>> {
    state
        .upgrade()
        .ok_or_else(|| mlua::Error::external(TaskError::Runtime("scheduler has shut down".to_string())))
}
