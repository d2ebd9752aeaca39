/// Plugin API definitions
use super::library::Library;
use super::record::RepositoryRecord;
use crate::simulation::Simulation;
use serde_yaml::Value;
use std::fmt;
use std::sync::Arc;

/// Entry point every plugin implements
///
/// The manager calls `on_load` once, right after the plugin's record is
/// created, and `on_unload` once before the record is removed. `on_import`
/// and `on_remove` run when a simulation opts into (or out of) the plugin.
pub trait Api {
    /// Register the plugin's extensions
    fn on_load(&self, record: &mut RepositoryRecord);

    /// Undo `on_load`
    fn on_unload(&self, record: &mut RepositoryRecord);

    /// Plugin imported into a simulation, with its configuration section
    fn on_import(&self, _simulation: &mut Simulation, _config: &Value) {}

    /// Plugin removed from a simulation
    fn on_remove(&self, _simulation: &mut Simulation) {}

    /// Configuration to write back when the simulation is saved
    fn store_config(&self, _simulation: &Simulation) -> Value {
        Value::Null
    }
}

/// Owned plugin instance as it crosses the library boundary
///
/// The exported `create` symbol returns a thin pointer to one of these.
pub type ApiBox = Box<dyn Api>;

/// Signature of the exported `create` symbol
pub type CreateFn = unsafe extern "C" fn() -> *mut ApiBox;

/// A plugin produced by a loader: its name and its API instance
///
/// Plugins backed by a shared library hold a reference to it, so the code
/// behind `api` stays mapped for as long as the plugin exists, whoever owns
/// the loader.
pub struct Plugin {
    name: String,
    // Dropped before `library`
    api: ApiBox,
    library: Option<Arc<Library>>,
}

impl Plugin {
    /// Plugin whose code is part of the running executable
    #[must_use]
    pub fn new(name: impl Into<String>, api: ApiBox) -> Self {
        Self {
            name: name.into(),
            api,
            library: None,
        }
    }

    /// Plugin whose API instance was created by code in `library`
    #[must_use]
    pub fn with_library(name: impl Into<String>, api: ApiBox, library: Arc<Library>) -> Self {
        Self {
            name: name.into(),
            api,
            library: Some(library),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn api(&self) -> &dyn Api {
        self.api.as_ref()
    }

    /// Library the plugin was loaded from, `None` for in-process plugins
    #[must_use]
    pub fn library(&self) -> Option<&Library> {
        self.library.as_deref()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("library", &self.library().map(Library::path))
            .finish()
    }
}
