//! Per-simulation view over the plugin manager
//!
//! A plugin being loaded only makes its extensions available to the
//! process. A simulation has to import a plugin before its extensions take
//! part in name resolution; this keeps two plugins that happen to use the
//! same extension name from clashing unless a simulation imports both.

use super::api::Api;
use super::error::{ExtensionKind, PluginError, Result};
use super::manager::Manager;
use super::record::RepositoryRecord;
use crate::simulation::{Initializer, Loader, Module, Object, Program, Simulation};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Resolution scope of one simulation
///
/// Extensions created through a context borrow the manager for `'a`, so the
/// manager (and the plugin code it keeps resident) outlives all of them.
pub struct Context<'a> {
    manager: &'a Manager,
    imported: BTreeSet<String>,
}

impl<'a> Context<'a> {
    /// Create a context with no imported plugins
    #[must_use]
    pub fn new(manager: &'a Manager) -> Self {
        Self {
            manager,
            imported: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn manager(&self) -> &'a Manager {
        self.manager
    }

    /// Import a loaded plugin into this context
    ///
    /// Importing an already imported plugin returns its API again and
    /// changes nothing.
    ///
    /// # Errors
    /// Returns [`PluginError::PluginNotLoaded`] if the manager has no such plugin.
    pub fn import_plugin(&mut self, name: &str) -> Result<&'a dyn Api> {
        let api = self
            .manager
            .api(name)
            .ok_or_else(|| PluginError::PluginNotLoaded(name.to_string()))?;

        if self.imported.insert(name.to_string()) {
            debug!("Plugin '{}' imported", name);
        }

        Ok(api)
    }

    /// Import a plugin and run its `on_import` hook against `simulation`
    ///
    /// The hook runs only on the first import.
    ///
    /// # Errors
    /// Returns [`PluginError::PluginNotLoaded`] if the manager has no such plugin.
    pub fn import_plugin_into(
        &mut self,
        name: &str,
        simulation: &mut Simulation,
        config: &Value,
    ) -> Result<&'a dyn Api> {
        let newly_imported = !self.is_imported(name);
        let api = self.import_plugin(name)?;

        if newly_imported {
            api.on_import(simulation, config);
        }

        Ok(api)
    }

    /// Stop resolving extensions from `name`
    ///
    /// Returns the plugin's API if it was imported. The plugin stays loaded.
    pub fn remove_plugin(&mut self, name: &str) -> Option<&'a dyn Api> {
        if !self.imported.remove(name) {
            return None;
        }

        debug!("Plugin '{}' removed", name);
        self.manager.api(name)
    }

    /// Remove a plugin and run its `on_remove` hook against `simulation`
    pub fn remove_plugin_from(
        &mut self,
        name: &str,
        simulation: &mut Simulation,
    ) -> Option<&'a dyn Api> {
        let api = self.remove_plugin(name)?;
        api.on_remove(simulation);
        Some(api)
    }

    #[must_use]
    pub fn is_imported(&self, name: &str) -> bool {
        self.imported.contains(name)
    }

    /// Imported plugin names, sorted
    pub fn imported_plugins(&self) -> impl Iterator<Item = &str> {
        self.imported.iter().map(String::as_str)
    }

    /// Configuration of every imported plugin, keyed by plugin name
    ///
    /// Plugins with nothing to store (`Value::Null`) are left out.
    #[must_use]
    pub fn store_config(&self, simulation: &Simulation) -> Mapping {
        let mut mapping = Mapping::new();

        for name in &self.imported {
            if let Some(api) = self.manager.api(name) {
                let config = api.store_config(simulation);
                if !config.is_null() {
                    mapping.insert(Value::String(name.clone()), config);
                }
            }
        }

        mapping
    }

    /// Create an initializer from the imported plugins
    ///
    /// # Errors
    /// See [`Context::resolve`].
    pub fn create_initializer(&self, name: &str) -> Result<Box<dyn Initializer + 'a>> {
        let record = self.resolve(ExtensionKind::Initializer, name)?;
        Ok(record.create_initializer(name)?)
    }

    /// Create a module from the imported plugins
    ///
    /// # Errors
    /// See [`Context::resolve`].
    pub fn create_module(
        &self,
        name: &str,
        simulation: &Simulation,
    ) -> Result<Box<dyn Module + 'a>> {
        let record = self.resolve(ExtensionKind::Module, name)?;
        Ok(record.create_module(name, simulation)?)
    }

    /// Create a simulation object from the imported plugins
    ///
    /// # Errors
    /// See [`Context::resolve`].
    pub fn create_object(
        &self,
        name: &str,
        simulation: &Simulation,
    ) -> Result<Box<dyn Object + 'a>> {
        let record = self.resolve(ExtensionKind::Object, name)?;
        Ok(record.create_object(name, simulation)?)
    }

    /// Create a program from the imported plugins
    ///
    /// # Errors
    /// See [`Context::resolve`].
    pub fn create_program(&self, name: &str) -> Result<Box<dyn Program + 'a>> {
        let record = self.resolve(ExtensionKind::Program, name)?;
        Ok(record.create_program(name)?)
    }

    /// Create a simulation loader from any loaded plugin
    ///
    /// Loaders are needed to read the simulation file that lists the imports,
    /// so every loaded plugin is searched, not just imported ones. Plugins are
    /// searched by name and the first match wins; other plugins offering the
    /// same loader are reported in a warning.
    ///
    /// # Errors
    /// Returns [`PluginError::ExtensionNotFound`] if no loaded plugin has the loader.
    pub fn create_loader(&self, name: &str) -> Result<Box<dyn Loader + 'a>> {
        let providers = self.providers(ExtensionKind::Loader, name, |_| true);

        let Some((plugin, record)) = providers.first() else {
            return Err(PluginError::ExtensionNotFound {
                kind: ExtensionKind::Loader,
                name: name.to_string(),
            });
        };

        if providers.len() > 1 {
            let others: Vec<&str> = providers[1..].iter().map(|(p, _)| *p).collect();
            warn!(
                "Loader '{}' is also provided by {}; using plugin '{}'",
                name,
                others.join(", "),
                plugin
            );
        }

        Ok(record.create_loader(name)?)
    }

    /// Find the single imported plugin offering `name` for `kind`
    ///
    /// # Errors
    /// - [`PluginError::AmbiguousExtension`] if several imported plugins offer it.
    /// - [`PluginError::ExtensionNotImported`] if none does; its hints list the
    ///   loaded plugins that offer it but are not imported.
    pub fn resolve(&self, kind: ExtensionKind, name: &str) -> Result<&'a RepositoryRecord> {
        let candidates = self.providers(kind, name, |plugin| self.imported.contains(plugin));

        match candidates.as_slice() {
            [(_, record)] => Ok(*record),
            [] => {
                let hints = self
                    .providers(kind, name, |_| true)
                    .into_iter()
                    .map(|(plugin, _)| plugin.to_string())
                    .collect();

                Err(PluginError::ExtensionNotImported {
                    kind,
                    name: name.to_string(),
                    hints,
                })
            }
            _ => Err(PluginError::AmbiguousExtension {
                kind,
                name: name.to_string(),
                plugins: candidates
                    .iter()
                    .map(|(plugin, _)| (*plugin).to_string())
                    .collect(),
            }),
        }
    }

    fn providers<F>(
        &self,
        kind: ExtensionKind,
        name: &str,
        filter: F,
    ) -> Vec<(&'a str, &'a RepositoryRecord)>
    where
        F: Fn(&str) -> bool,
    {
        self.manager
            .repository()
            .records()
            .filter(|(plugin, record)| filter(plugin) && record.is_registered(kind, name))
            .collect()
    }
}
