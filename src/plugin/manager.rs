use super::api::{Api, Plugin};
use super::error::Result;
use super::loader::PluginLoader;
use super::repository::Repository;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable with extra plugin directories (platform path list)
pub const PLUGIN_PATH_ENV: &str = "CECE_PLUGIN_PATH";

/// Owner of every plugin resident in the process
///
/// Loaders and directories can be added in any order: a new loader scans
/// every known directory and a new directory is scanned by every known
/// loader, so the final set of plugins does not depend on the order.
///
/// Field order matters for teardown. Records hold factories from the plugin
/// libraries but no reference to them, so they are released before the
/// plugins (see [`Manager::unload_all`]); the loaders go last.
pub struct Manager {
    repository: Repository,
    plugins: Vec<Plugin>,
    loaders: Vec<Box<dyn PluginLoader>>,
    directories: Vec<PathBuf>,
}

impl Manager {
    /// Create a manager with no loaders, directories or plugins
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: Repository::new(),
            plugins: Vec::new(),
            loaders: Vec::new(),
            directories: Vec::new(),
        }
    }

    /// Standard plugin search directories
    ///
    /// Entries of `CECE_PLUGIN_PATH` come first, then `plugins` next to the
    /// executable and `../lib/cece/plugins` relative to it.
    #[must_use]
    pub fn default_directories() -> Vec<PathBuf> {
        let mut directories: Vec<PathBuf> = env::var_os(PLUGIN_PATH_ENV)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        if let Some(exe_dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            directories.push(exe_dir.join("plugins"));
            directories.push(exe_dir.join("..").join("lib").join("cece").join("plugins"));
        }

        directories
    }

    /// Add a plugin loader and scan every known directory with it
    ///
    /// # Errors
    /// Returns [`PluginError::DuplicatePlugin`](super::PluginError::DuplicatePlugin)
    /// if the loader produces a plugin whose name is already loaded.
    pub fn add_loader(&mut self, mut loader: Box<dyn PluginLoader>) -> Result<()> {
        debug!("Adding plugin loader '{}'", loader.name());

        let mut found = Vec::new();
        for directory in &self.directories {
            found.extend(loader.load_plugins(directory));
        }
        self.loaders.push(loader);

        self.add_plugins(found)
    }

    /// Add a plugin directory and scan it with every known loader
    ///
    /// Existing directories are compared by canonical path, so adding a
    /// directory that is already known under any spelling does nothing.
    ///
    /// # Errors
    /// Returns [`PluginError::DuplicatePlugin`](super::PluginError::DuplicatePlugin)
    /// if the directory contains a plugin whose name is already loaded.
    pub fn add_directory(&mut self, directory: impl Into<PathBuf>) -> Result<()> {
        let directory = directory.into();
        let directory = fs::canonicalize(&directory).unwrap_or(directory);

        if self.directories.contains(&directory) {
            debug!("Plugin directory {} already added", directory.display());
            return Ok(());
        }

        debug!("Adding plugin directory {}", directory.display());

        let mut found = Vec::new();
        for loader in &mut self.loaders {
            found.extend(loader.load_plugins(&directory));
        }
        self.directories.push(directory);

        self.add_plugins(found)
    }

    /// Add several directories in order
    ///
    /// # Errors
    /// Stops at the first directory that fails to add.
    pub fn add_directories<I, P>(&mut self, directories: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for directory in directories {
            self.add_directory(directory)?;
        }
        Ok(())
    }

    fn add_plugins(&mut self, plugins: Vec<Plugin>) -> Result<()> {
        let mut plugins = plugins.into_iter();

        while let Some(plugin) = plugins.next() {
            if let Err(e) = self.add_plugin(plugin) {
                for discarded in plugins {
                    warn!("Plugin '{}' discarded: {}", discarded.name(), e);
                }
                return Err(e);
            }
        }

        Ok(())
    }

    /// Register a plugin and let it populate its repository record
    ///
    /// Loaders call this for every plugin they produce; in-process plugins
    /// can be added directly.
    ///
    /// # Errors
    /// Returns [`PluginError::DuplicatePlugin`](super::PluginError::DuplicatePlugin)
    /// if a plugin with the same name is already loaded.
    pub fn add_plugin(&mut self, plugin: Plugin) -> Result<()> {
        let record = self.repository.create_record(plugin.name())?;
        plugin.api().on_load(record);

        info!("Plugin '{}' loaded", plugin.name());
        self.plugins.push(plugin);

        Ok(())
    }

    /// Unload every plugin, most recently loaded first
    ///
    /// Each plugin sees `on_unload` while its record still exists, then the
    /// record is removed and the API instance dropped. Libraries stay
    /// resident until the manager itself is dropped.
    pub fn unload_all(&mut self) {
        while let Some(plugin) = self.plugins.pop() {
            if let Ok(record) = self.repository.get_mut(plugin.name()) {
                plugin.api().on_unload(record);
            }
            self.repository.remove_record(plugin.name());

            debug!("Plugin '{}' unloaded", plugin.name());
        }

        // Anything left was not created through `add_plugin`
        self.repository.clear();
    }

    /// Names of loaded plugins in load order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(Plugin::name).collect()
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.name() == name)
    }

    /// API of a loaded plugin, `None` if no such plugin is loaded
    #[must_use]
    pub fn api(&self, name: &str) -> Option<&dyn Api> {
        self.plugins
            .iter()
            .find(|plugin| plugin.name() == name)
            .map(Plugin::api)
    }

    #[must_use]
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    #[must_use]
    pub fn loaders(&self) -> &[Box<dyn PluginLoader>] {
        &self.loaders
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        // Plugin code must still be resident for `on_unload`; loaders drop after this
        self.unload_all();
    }
}
