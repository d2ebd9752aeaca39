//! Simulation-side types the plugin runtime hands to extensions
//!
//! The stepping loop, physics and rendering live outside this crate. What is
//! kept here is the narrow surface extensions are constructed against: the
//! [`Simulation`] they receive and the traits for each extension kind.

pub mod extension;

pub use extension::{Initializer, Loader, Module, Object, Program};

use serde_yaml::Value;
use std::collections::BTreeMap;

/// Floating point type used by the simulation (and baked into the plugin ABI)
#[cfg(feature = "real-f32")]
pub type Real = f32;

/// Floating point type used by the simulation (and baked into the plugin ABI)
#[cfg(not(feature = "real-f32"))]
pub type Real = f64;

/// Object type declared by a plugin or a simulation file
///
/// A declared type refers to an object extension (`base`) with a preset
/// configuration, so simulation files can spawn `"cell.yeast"` without
/// repeating parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub base: String,
    pub config: Value,
}

/// Simulation state visible to plugins during setup
#[derive(Debug, Clone)]
pub struct Simulation {
    name: String,
    time_step: Real,
    parameters: BTreeMap<String, Real>,
    object_types: Vec<ObjectType>,
}

impl Simulation {
    /// Create an empty simulation with a one second time step
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_step: 1.0,
            parameters: BTreeMap::new(),
            object_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn time_step(&self) -> Real {
        self.time_step
    }

    pub fn set_time_step(&mut self, time_step: Real) {
        self.time_step = time_step;
    }

    /// Get a named simulation parameter
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<Real> {
        self.parameters.get(name).copied()
    }

    /// Set a named simulation parameter, replacing any previous value
    pub fn set_parameter(&mut self, name: impl Into<String>, value: Real) {
        self.parameters.insert(name.into(), value);
    }

    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, Real> {
        &self.parameters
    }

    /// Declare an object type; a later declaration with the same name wins
    pub fn add_object_type(&mut self, object_type: ObjectType) {
        self.object_types.retain(|t| t.name != object_type.name);
        self.object_types.push(object_type);
    }

    /// Remove every object type built on `base`
    pub fn remove_object_types_of(&mut self, base: &str) {
        self.object_types.retain(|t| t.base != base);
    }

    #[must_use]
    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn object_types(&self) -> &[ObjectType] {
        &self.object_types
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new("simulation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters() {
        let mut simulation = Simulation::new("test");
        assert_eq!(simulation.parameter("gravity"), None);

        simulation.set_parameter("gravity", 9.81);
        simulation.set_parameter("gravity", 1.0);
        assert_eq!(simulation.parameter("gravity"), Some(1.0));
        assert_eq!(simulation.parameters().len(), 1);
    }

    #[test]
    fn test_object_type_redeclaration() {
        let mut simulation = Simulation::default();
        simulation.add_object_type(ObjectType {
            name: "yeast".to_string(),
            base: "cell".to_string(),
            config: Value::Null,
        });
        simulation.add_object_type(ObjectType {
            name: "yeast".to_string(),
            base: "cell.yeast".to_string(),
            config: Value::Null,
        });

        assert_eq!(simulation.object_types().len(), 1);
        assert_eq!(simulation.object_type("yeast").unwrap().base, "cell.yeast");

        simulation.remove_object_types_of("cell.yeast");
        assert!(simulation.object_types().is_empty());
    }
}
