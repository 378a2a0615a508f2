// src/world/mod.rs

//! Scene data model exposed to scripts.
//!
//! The world owns the list of instances created either by the host (the
//! baseplate) or by scripts through `Instance.new`. Rendering is someone
//! else's concern; this module only keeps the data.

pub mod bindings;
pub mod part;
pub mod values;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

pub use part::{Part, PartHandle, PartShape};
pub use values::{Color3, Vector3};

/// Every class `Instance.new` knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceClass {
    Part,
}

impl InstanceClass {
    pub fn name(self) -> &'static str {
        match self {
            InstanceClass::Part => "Part",
        }
    }
}

impl fmt::Display for InstanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstanceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Part" => Ok(InstanceClass::Part),
            other => Err(format!("Unknown instance type '{other}'")),
        }
    }
}

/// Owner of all instances in the scene.
#[derive(Debug, Default)]
pub struct World {
    parts: RefCell<Vec<Rc<RefCell<Part>>>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part and return the shared handle scripts will see.
    pub fn insert(&self, part: Part) -> PartHandle {
        let shared = Rc::new(RefCell::new(part));
        self.parts.borrow_mut().push(Rc::clone(&shared));
        PartHandle::new(shared)
    }

    /// Instances that have not been destroyed.
    pub fn instance_count(&self) -> usize {
        self.parts
            .borrow()
            .iter()
            .filter(|p| !p.borrow().is_destroyed())
            .count()
    }

    /// Copy of every live part, in creation order.
    pub fn parts(&self) -> Vec<Part> {
        self.parts
            .borrow()
            .iter()
            .map(|p| p.borrow().clone())
            .filter(|p| !p.is_destroyed())
            .collect()
    }

    /// Drop destroyed parts. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let mut parts = self.parts.borrow_mut();
        let before = parts.len();
        parts.retain(|p| !p.borrow().is_destroyed());
        before - parts.len()
    }

    /// Insert the default floor every scene starts with.
    pub fn insert_baseplate(&self) -> PartHandle {
        self.insert(Part {
            name: "Baseplate".to_string(),
            position: Vector3::new(0.0, -8.0, 0.0),
            size: Vector3::new(2048.0, 16.0, 2048.0),
            color: Color3::from_rgb(92, 92, 92),
            anchored: true,
            ..Part::default()
        })
    }
}
