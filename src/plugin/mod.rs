//! Native plugin system
//!
//! Plugins are shared libraries named `<prefix>cece-<name><suffix>` that
//! export two symbols:
//!
//! - `get_config`: the [`PluginConfig`] the plugin was built with. It is
//!   checked against [`PluginConfig::HOST`] before anything else in the
//!   library is touched.
//! - `create`: a new [`Api`] instance, owned by the host from then on.
//!
//! [`define_plugin!`](crate::define_plugin) generates both.
//!
//! # Lifecycle
//!
//! 1. A [`Manager`] gets loaders and directories in any order; every
//!    combination is scanned once.
//! 2. Each plugin found gets a [`RepositoryRecord`] and fills it from
//!    [`Api::on_load`].
//! 3. A simulation's [`Context`] imports the plugins it wants and creates
//!    extensions by name, seeing only what its imported plugins registered.
//! 4. Dropping the manager runs [`Api::on_unload`] for every plugin, removes
//!    the records, and finally unloads the libraries.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
mod export;
pub mod factory;
pub mod library;
pub mod loader;
pub mod manager;
pub mod record;
pub mod repository;

pub use api::{Api, ApiBox, CreateFn, Plugin};
pub use config::{GetConfigFn, PluginConfig, API_VERSION};
pub use context::Context;
pub use error::{ConfigMismatch, ExtensionKind, PluginError, Result};
pub use factory::{Factory, FactoryRegistry};
pub use library::Library;
pub use loader::{PluginLoader, SharedLibraryLoader};
pub use manager::{Manager, PLUGIN_PATH_ENV};
pub use record::RepositoryRecord;
pub use repository::Repository;
