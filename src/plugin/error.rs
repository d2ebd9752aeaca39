//! Error types for plugin loading and extension resolution

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the plugin runtime
pub type Result<T> = std::result::Result<T, PluginError>;

/// Kind of extension a plugin can register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    Loader,
    Initializer,
    Module,
    Object,
    Program,
}

impl ExtensionKind {
    pub const ALL: [ExtensionKind; 5] = [
        ExtensionKind::Loader,
        ExtensionKind::Initializer,
        ExtensionKind::Module,
        ExtensionKind::Object,
        ExtensionKind::Program,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExtensionKind::Loader => "loader",
            ExtensionKind::Initializer => "initializer",
            ExtensionKind::Module => "module",
            ExtensionKind::Object => "object",
            ExtensionKind::Program => "program",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the plugin runtime
///
/// Every variant carries the structured data a front-end needs to build an
/// actionable message (which file, which plugin, which extension).
#[derive(Debug, Error)]
pub enum PluginError {
    /// The operating system refused to open a library
    #[error("failed to load library '{}': {reason}", path.display())]
    LoadFailure { path: PathBuf, reason: String },

    /// A library was opened but is not a usable plugin
    #[error("invalid plugin '{}': {reason}", path.display())]
    InvalidPlugin { path: PathBuf, reason: String },

    /// A plugin with the same name is already loaded
    #[error("plugin '{0}' is already loaded")]
    DuplicatePlugin(String),

    /// No repository record exists for the plugin
    #[error("no repository record for plugin '{0}'")]
    RecordNotFound(String),

    /// A registry has no factory under the requested name
    #[error("{kind} '{name}' is not registered")]
    ExtensionNotFound { kind: ExtensionKind, name: String },

    /// The plugin was never loaded by the manager
    #[error("plugin '{0}' not found")]
    PluginNotLoaded(String),

    /// More than one imported plugin offers the same extension
    #[error("{kind} '{name}' is ambiguous, provided by plugins: {}", plugins.join(", "))]
    AmbiguousExtension {
        kind: ExtensionKind,
        name: String,
        plugins: Vec<String>,
    },

    /// No imported plugin offers the extension; `hints` lists loaded plugins that do
    #[error("{kind} '{name}' not found in imported plugins{}", format_hints(hints))]
    ExtensionNotImported {
        kind: ExtensionKind,
        name: String,
        hints: Vec<String>,
    },
}

fn format_hints(hints: &[String]) -> String {
    if hints.is_empty() {
        String::new()
    } else {
        format!(" (did you mean to import: {}?)", hints.join(", "))
    }
}

/// Field of the ABI handshake that did not match the host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigMismatch {
    #[error("API version mismatch: host {host}, plugin {plugin}")]
    ApiVersion { host: i32, plugin: i32 },

    #[error("real type size mismatch: host {host} bytes, plugin {plugin} bytes")]
    RealSize { host: i32, plugin: i32 },

    #[error("render support mismatch: host {host}, plugin {plugin}")]
    RenderEnabled { host: i32, plugin: i32 },

    #[error("thread safety mismatch: host {host}, plugin {plugin}")]
    ThreadSafe { host: i32, plugin: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_plugins() {
        let err = PluginError::AmbiguousExtension {
            kind: ExtensionKind::Module,
            name: "x".to_string(),
            plugins: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "module 'x' is ambiguous, provided by plugins: a, b"
        );
    }

    #[test]
    fn test_not_imported_message() {
        let err = PluginError::ExtensionNotImported {
            kind: ExtensionKind::Program,
            name: "p".to_string(),
            hints: vec![],
        };
        assert_eq!(err.to_string(), "program 'p' not found in imported plugins");

        let err = PluginError::ExtensionNotImported {
            kind: ExtensionKind::Program,
            name: "p".to_string(),
            hints: vec!["A".to_string()],
        };
        assert!(err.to_string().ends_with("(did you mean to import: A?)"));
    }
}
