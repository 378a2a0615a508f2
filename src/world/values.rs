// src/world/values.rs

//! Value types shared by scripts and the world: `Vector3` and `Color3`.

use std::fmt;

use mlua::{FromLua, Lua, MetaMethod, UserData, UserDataFields, UserDataMethods, Value};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

impl FromLua for Vector3 {
    fn from_lua(value: Value, _: &Lua) -> mlua::Result<Self> {
        match value {
            Value::UserData(ud) => Ok(*ud.borrow::<Vector3>()?),
            other => Err(mlua::Error::runtime(format!(
                "expected Vector3, got {}",
                other.type_name()
            ))),
        }
    }
}

impl UserData for Vector3 {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("X", |_, this| Ok(this.x));
        fields.add_field_method_get("Y", |_, this| Ok(this.y));
        fields.add_field_method_get("Z", |_, this| Ok(this.z));
        fields.add_field_method_get("Magnitude", |_, this| Ok(this.magnitude()));
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| Ok(this.to_string()));
        methods.add_meta_function(MetaMethod::Add, |_, (a, b): (Vector3, Vector3)| Ok(a + b));
        methods.add_meta_function(MetaMethod::Sub, |_, (a, b): (Vector3, Vector3)| Ok(a - b));
        methods.add_meta_method(MetaMethod::Unm, |_, this, ()| Ok(this.scale(-1.0)));
        methods.add_meta_function(MetaMethod::Eq, |_, (a, b): (Vector3, Vector3)| Ok(a == b));
        methods.add_meta_function(MetaMethod::Mul, |lua, (a, b): (Value, Value)| {
            match (scalar(&a), scalar(&b)) {
                (Some(k), _) => Ok(Vector3::from_lua(b, lua)?.scale(k)),
                (_, Some(k)) => Ok(Vector3::from_lua(a, lua)?.scale(k)),
                (None, None) => {
                    let (a, b) = (Vector3::from_lua(a, lua)?, Vector3::from_lua(b, lua)?);
                    Ok(Vector3::new(a.x * b.x, a.y * b.y, a.z * b.z))
                }
            }
        });
    }
}

/// Whole numbers arrive as `Integer`, everything else as `Number`.
fn scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Number(n) => Some(*n),
        _ => None,
    }
}

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color3 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color3 {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0)
    }

    /// Components as 8-bit channels.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let channel = |v: f64| (v * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

impl fmt::Display for Color3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

impl FromLua for Color3 {
    fn from_lua(value: Value, _: &Lua) -> mlua::Result<Self> {
        match value {
            Value::UserData(ud) => Ok(*ud.borrow::<Color3>()?),
            other => Err(mlua::Error::runtime(format!(
                "expected Color3, got {}",
                other.type_name()
            ))),
        }
    }
}

impl UserData for Color3 {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("R", |_, this| Ok(this.r));
        fields.add_field_method_get("G", |_, this| Ok(this.g));
        fields.add_field_method_get("B", |_, this| Ok(this.b));
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| Ok(this.to_string()));
        methods.add_meta_function(MetaMethod::Eq, |_, (a, b): (Color3, Color3)| Ok(a == b));
    }
}
