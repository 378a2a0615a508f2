// src/world/bindings.rs

//! Script-facing constructors: `Instance`, `Vector3`, `Color3`.

use std::rc::Rc;

use mlua::Lua;
use tracing::debug;

use super::{Color3, InstanceClass, Part, Vector3, World};

/// Install `Instance`, `Vector3` and `Color3` into the globals of `lua`.
pub fn install(lua: &Lua, world: Rc<World>) -> mlua::Result<()> {
    let globals = lua.globals();

    let instance = lua.create_table()?;
    instance.set(
        "new",
        lua.create_function(move |_, class_name: String| {
            let class = class_name
                .parse::<InstanceClass>()
                .map_err(mlua::Error::runtime)?;
            let handle = match class {
                InstanceClass::Part => world.insert(Part::default()),
            };
            debug!(class = %class, "instance created");
            Ok(handle)
        })?,
    )?;
    globals.set("Instance", instance)?;

    let vector3 = lua.create_table()?;
    vector3.set(
        "new",
        lua.create_function(|_, (x, y, z): (Option<f64>, Option<f64>, Option<f64>)| {
            Ok(Vector3::new(
                x.unwrap_or(0.0),
                y.unwrap_or(0.0),
                z.unwrap_or(0.0),
            ))
        })?,
    )?;
    vector3.set("zero", Vector3::default())?;
    vector3.set("one", Vector3::new(1.0, 1.0, 1.0))?;
    globals.set("Vector3", vector3)?;

    let color3 = lua.create_table()?;
    color3.set(
        "new",
        lua.create_function(|_, (r, g, b): (Option<f64>, Option<f64>, Option<f64>)| {
            Ok(Color3::new(
                r.unwrap_or(0.0),
                g.unwrap_or(0.0),
                b.unwrap_or(0.0),
            ))
        })?,
    )?;
    color3.set(
        "fromRGB",
        lua.create_function(|_, (r, g, b): (f64, f64, f64)| {
            let channel = |v: f64| v.clamp(0.0, 255.0).round() as u8;
            Ok(Color3::from_rgb(channel(r), channel(g), channel(b)))
        })?,
    )?;
    globals.set("Color3", color3)?;

    Ok(())
}
