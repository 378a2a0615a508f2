// src/console/bindings.rs

//! Route script `print` / `warn` output into the console log.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Function, Lua, Value, Variadic};
use tracing::{info, warn};

use super::{ConsoleLog, LogKind};

/// Replace the global `print` and `warn` with versions that write to `log`.
pub fn install(lua: &Lua, log: Rc<RefCell<ConsoleLog>>) -> mlua::Result<()> {
    let globals = lua.globals();
    let tostring: Function = globals.get("tostring")?;

    let print_log = Rc::clone(&log);
    let print_tostring = tostring.clone();
    let print = lua.create_function(move |_, args: Variadic<Value>| {
        let line = join_args(&print_tostring, args)?;
        info!(target: "blocktask::script", "{line}");
        print_log.borrow_mut().push(LogKind::Normal, line);
        Ok(())
    })?;

    let warn_fn = lua.create_function(move |_, args: Variadic<Value>| {
        let line = join_args(&tostring, args)?;
        warn!(target: "blocktask::script", "{line}");
        log.borrow_mut().push(LogKind::Warning, line);
        Ok(())
    })?;

    globals.set("print", print)?;
    globals.set("warn", warn_fn)?;
    Ok(())
}

fn join_args(tostring: &Function, args: Variadic<Value>) -> mlua::Result<String> {
    let mut parts = Vec::with_capacity(args.len());
    for value in args {
        parts.push(tostring.call::<String>(value)?);
    }
    Ok(parts.join("\t"))
}
