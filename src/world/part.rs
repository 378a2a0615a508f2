// src/world/part.rs

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use mlua::{MetaMethod, UserData, UserDataFields, UserDataMethods};

use super::values::{Color3, Vector3};
use super::InstanceClass;

/// Geometry a renderer should use for a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartShape {
    #[default]
    Block,
    Ball,
    Cylinder,
}

impl PartShape {
    pub fn name(self) -> &'static str {
        match self {
            PartShape::Block => "Block",
            PartShape::Ball => "Ball",
            PartShape::Cylinder => "Cylinder",
        }
    }
}

impl FromStr for PartShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Block" => Ok(PartShape::Block),
            "Ball" => Ok(PartShape::Ball),
            "Cylinder" => Ok(PartShape::Cylinder),
            other => Err(format!(
                "invalid Shape '{other}' (expected \"Block\", \"Ball\" or \"Cylinder\")"
            )),
        }
    }
}

/// A physical block in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub position: Vector3,
    pub size: Vector3,
    pub color: Color3,
    pub transparency: f64,
    pub anchored: bool,
    pub shape: PartShape,
    pub(crate) destroyed: bool,
}

impl Default for Part {
    fn default() -> Self {
        Self {
            name: InstanceClass::Part.name().to_string(),
            position: Vector3::default(),
            size: Vector3::new(4.0, 1.0, 2.0),
            color: Color3::from_rgb(163, 162, 165),
            transparency: 0.0,
            anchored: false,
            shape: PartShape::Block,
            destroyed: false,
        }
    }
}

impl Part {
    pub fn class(&self) -> InstanceClass {
        InstanceClass::Part
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Script-side reference to a part owned by the world.
#[derive(Clone)]
pub struct PartHandle(Rc<RefCell<Part>>);

impl PartHandle {
    pub(crate) fn new(shared: Rc<RefCell<Part>>) -> Self {
        Self(shared)
    }

    /// Copy of the current part data.
    pub fn get(&self) -> Part {
        self.0.borrow().clone()
    }
}

impl fmt::Debug for PartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PartHandle").field(&self.0.borrow().name).finish()
    }
}

impl UserData for PartHandle {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("ClassName", |_, this| {
            Ok(this.0.borrow().class().name())
        });

        fields.add_field_method_get("Name", |_, this| Ok(this.0.borrow().name.clone()));
        fields.add_field_method_set("Name", |_, this, name: String| {
            this.0.borrow_mut().name = name;
            Ok(())
        });

        fields.add_field_method_get("Position", |_, this| Ok(this.0.borrow().position));
        fields.add_field_method_set("Position", |_, this, v: Vector3| {
            this.0.borrow_mut().position = v;
            Ok(())
        });

        fields.add_field_method_get("Size", |_, this| Ok(this.0.borrow().size));
        fields.add_field_method_set("Size", |_, this, v: Vector3| {
            this.0.borrow_mut().size = v;
            Ok(())
        });

        fields.add_field_method_get("Color", |_, this| Ok(this.0.borrow().color));
        fields.add_field_method_set("Color", |_, this, c: Color3| {
            this.0.borrow_mut().color = c;
            Ok(())
        });

        fields.add_field_method_get("Transparency", |_, this| {
            Ok(this.0.borrow().transparency)
        });
        fields.add_field_method_set("Transparency", |_, this, t: f64| {
            this.0.borrow_mut().transparency = t.clamp(0.0, 1.0);
            Ok(())
        });

        fields.add_field_method_get("Anchored", |_, this| Ok(this.0.borrow().anchored));
        fields.add_field_method_set("Anchored", |_, this, a: bool| {
            this.0.borrow_mut().anchored = a;
            Ok(())
        });

        fields.add_field_method_get("Shape", |_, this| Ok(this.0.borrow().shape.name()));
        fields.add_field_method_set("Shape", |_, this, s: String| {
            let shape = s.parse::<PartShape>().map_err(mlua::Error::runtime)?;
            this.0.borrow_mut().shape = shape;
            Ok(())
        });
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("Destroy", |_, this, ()| {
            this.0.borrow_mut().destroyed = true;
            Ok(())
        });

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(this.0.borrow().name.clone())
        });
    }
}
