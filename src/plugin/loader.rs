use super::api::{ApiBox, CreateFn, Plugin};
use super::config::{GetConfigFn, PluginConfig};
use super::error::{PluginError, Result};
use super::library::{self, Library};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Strategy that discovers and loads plugins from a directory
pub trait PluginLoader {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Load every plugin this loader recognizes in `directory`
    ///
    /// A missing directory yields no plugins. Files that fail to load are
    /// reported and skipped; they never abort the scan.
    fn load_plugins(&mut self, directory: &Path) -> Vec<Plugin>;
}

/// Loader for native shared-library plugins (`libcece-<name>.so`)
///
/// Every opened library is shared between the loader and the plugins it
/// produced. A library is unloaded once the loader and all of those plugins
/// are gone.
pub struct SharedLibraryLoader {
    host: PluginConfig,
    libraries: Vec<Arc<Library>>,
}

impl SharedLibraryLoader {
    /// Create a loader validating plugins against this build's configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_host_config(PluginConfig::HOST)
    }

    /// Create a loader validating plugins against `host`
    #[must_use]
    pub fn with_host_config(host: PluginConfig) -> Self {
        Self {
            host,
            libraries: Vec::new(),
        }
    }

    /// Number of libraries kept resident
    #[must_use]
    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }

    /// Open, validate and instantiate a single plugin library
    ///
    /// # Safety
    /// The file is opened and its exported symbols are called. It must be a
    /// plugin built against this crate; the configuration handshake only
    /// catches build mismatches, not arbitrary native code.
    ///
    /// # Errors
    /// Returns [`PluginError::LoadFailure`] if the library cannot be opened and
    /// [`PluginError::InvalidPlugin`] if it fails validation or creation.
    pub unsafe fn load_library(&mut self, path: &Path, name: &str) -> Result<Plugin> {
        let library = Arc::new(Library::open(path)?);
        let api = self.create_api(&library)?;

        self.libraries.push(Arc::clone(&library));
        info!("Loaded plugin '{}' from {}", name, path.display());

        Ok(Plugin::with_library(name, api, library))
    }

    unsafe fn create_api(&self, library: &Library) -> Result<ApiBox> {
        let invalid = |reason: String| PluginError::InvalidPlugin {
            path: library.path().to_path_buf(),
            reason,
        };

        let get_config = library
            .symbol::<GetConfigFn>("get_config")
            .ok_or_else(|| invalid("missing 'get_config' symbol".to_string()))?;

        let config = get_config();
        if config.is_null() {
            return Err(invalid("'get_config' returned null".to_string()));
        }

        // Nothing else in the library is trusted until this passes
        (*config)
            .check_compatible(&self.host)
            .map_err(|e| invalid(e.to_string()))?;

        let create = library
            .symbol::<CreateFn>("create")
            .ok_or_else(|| invalid("missing 'create' symbol".to_string()))?;

        let api = create();
        if api.is_null() {
            return Err(invalid("'create' returned null".to_string()));
        }

        Ok(*Box::from_raw(api))
    }
}

impl PluginLoader for SharedLibraryLoader {
    fn name(&self) -> &str {
        "shared-library"
    }

    fn load_plugins(&mut self, directory: &Path) -> Vec<Plugin> {
        let mut plugins = Vec::new();

        if !directory.is_dir() {
            debug!("Plugin directory {} does not exist", directory.display());
            return plugins;
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read plugin directory {}: {}", directory.display(), e);
                return plugins;
            }
        };

        // Sort for a stable load order across platforms
        let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();

        for path in paths {
            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(library::plugin_name_from) else {
                continue;
            };
            let name = name.to_string();

            // Safety: the file follows the plugin naming convention and is
            // validated through `get_config` before anything else is called
            match unsafe { self.load_library(&path, &name) } {
                Ok(plugin) => plugins.push(plugin),
                Err(e) => warn!("Skipping plugin: {}", e),
            }
        }

        plugins
    }
}

impl Default for SharedLibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::library::file_name_for;

    #[test]
    fn test_loader_creation() {
        let loader = SharedLibraryLoader::new();
        assert_eq!(loader.library_count(), 0);
        assert_eq!(loader.name(), "shared-library");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let mut loader = SharedLibraryLoader::new();
        let plugins = loader.load_plugins(Path::new("/nonexistent/cece/plugins"));
        assert!(plugins.is_empty());
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "plugins live here").unwrap();
        fs::write(dir.path().join("libother.so"), "not ours").unwrap();
        fs::create_dir(dir.path().join(file_name_for("directory"))).unwrap();

        let mut loader = SharedLibraryLoader::new();
        assert!(loader.load_plugins(dir.path()).is_empty());
        assert_eq!(loader.library_count(), 0);
    }

    #[test]
    fn test_broken_plugins_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(file_name_for("broken")), b"\x7fELF garbage").unwrap();
        fs::write(dir.path().join(file_name_for("empty")), b"").unwrap();

        let mut loader = SharedLibraryLoader::new();
        let plugins = loader.load_plugins(dir.path());

        assert!(plugins.is_empty());
        assert_eq!(loader.library_count(), 0);
    }

    #[test]
    fn test_load_library_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name_for("broken"));
        fs::write(&path, b"garbage").unwrap();

        let mut loader = SharedLibraryLoader::new();
        match unsafe { loader.load_library(&path, "broken") } {
            Err(PluginError::LoadFailure { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected LoadFailure, got {other:?}"),
        }
    }
}
