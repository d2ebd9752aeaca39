use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Extra directories scanned for plugin libraries
    #[serde(default)]
    pub directories: Vec<PathBuf>,

    /// Also scan `CECE_PLUGIN_PATH` and the directories next to the executable
    #[serde(default = "default_true")]
    pub use_default_directories: bool,

    /// Plugins imported into a new simulation context
    #[serde(default)]
    pub import: Vec<String>,

    /// Per-plugin configuration passed to the plugin when it is imported
    #[serde(default)]
    pub config: Mapping,
}

fn default_true() -> bool {
    true
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            use_default_directories: true,
            import: Vec::new(),
            config: Mapping::new(),
        }
    }
}

impl PluginsConfig {
    /// Configuration section for `plugin`, `Value::Null` if there is none
    #[must_use]
    pub fn config_for(&self, plugin: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.config.get(plugin).unwrap_or(&NULL)
    }

    /// Directories to scan, configured ones first
    #[must_use]
    pub fn search_directories(&self) -> Vec<PathBuf> {
        let mut directories = self.directories.clone();
        if self.use_default_directories {
            directories.extend(crate::plugin::Manager::default_directories());
        }
        directories
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config =
            serde_yaml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path.as_ref(), contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get default configuration path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;

        Ok(home.join(".cece").join("config.yaml"))
    }
}
