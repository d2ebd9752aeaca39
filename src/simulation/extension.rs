/// Extension traits implemented by plugins
use super::{Real, Simulation};
use anyhow::Result;
use serde_yaml::Value;

/// Runs once while a simulation is being set up
pub trait Initializer {
    /// Apply the initializer to the simulation
    fn call(&self, simulation: &mut Simulation) -> Result<()>;
}

/// Simulation-wide behaviour updated every step (diffusion, streamlines, ...)
pub trait Module {
    /// Configure the module from its simulation file section
    fn load_config(&mut self, _config: &Value) -> Result<()> {
        Ok(())
    }

    /// Current configuration, used when saving a simulation
    fn store_config(&self) -> Value {
        Value::Null
    }

    /// Advance the module by `dt`
    fn update(&mut self, dt: Real) -> Result<()>;
}

/// Simulation object (cell, obstacle, ...)
pub trait Object {
    /// Name the object was registered under
    fn type_name(&self) -> &str;

    fn load_config(&mut self, _config: &Value) -> Result<()> {
        Ok(())
    }

    fn store_config(&self) -> Value {
        Value::Null
    }

    /// Advance the object by `dt`
    fn update(&mut self, _dt: Real) -> Result<()> {
        Ok(())
    }
}

/// Per-object behaviour attached to objects by name
pub trait Program {
    fn call(&mut self, object: &mut dyn Object, dt: Real) -> Result<()>;
}

/// Reads and writes simulation descriptions in one file format
///
/// Loaders are registered under the file extension they handle (`"yaml"`,
/// `"xml"`), and are resolved before any plugin has been imported.
pub trait Loader {
    /// Build a simulation from the description in `source`
    fn read(&self, source: &str) -> Result<Simulation>;

    /// Serialize a simulation back to this format
    fn write(&self, simulation: &Simulation) -> Result<String>;
}
