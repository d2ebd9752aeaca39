//! Owned handle to a loaded shared library
//!
//! This is the only place that knows how each platform opens libraries and
//! how plugin files are named there. Everything else works with
//! [`Library`] and plain file names.

use super::error::{PluginError, Result};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

type LibResult<T> = std::result::Result<T, libloading::Error>;

/// File name prefix of a plugin library (`lib` on Unix, empty on Windows)
pub const FILE_PREFIX: &str = std::env::consts::DLL_PREFIX;

/// File name extension of a plugin library, including the dot
pub const FILE_SUFFIX: &str = std::env::consts::DLL_SUFFIX;

/// Marker between the platform prefix and the plugin name
pub const NAME_MARKER: &str = "cece-";

/// Plugin library file name for `name` on this platform (`libcece-foo.so`)
#[must_use]
pub fn file_name_for(name: &str) -> String {
    format!("{FILE_PREFIX}{NAME_MARKER}{name}{FILE_SUFFIX}")
}

/// Extract the plugin name from a library file name
///
/// Returns `None` unless the file name is exactly
/// `<prefix>cece-<name><suffix>` with a non-empty name.
#[must_use]
pub fn plugin_name_from(file_name: &OsStr) -> Option<&str> {
    let name = file_name
        .to_str()?
        .strip_prefix(FILE_PREFIX)?
        .strip_prefix(NAME_MARKER)?
        .strip_suffix(FILE_SUFFIX)?;

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// A shared library kept resident until the handle is dropped
pub struct Library {
    // Always `Some` until `drop` takes it to close explicitly
    inner: Option<libloading::Library>,
    path: PathBuf,
}

impl Library {
    /// Open the library at `path`
    ///
    /// # Safety
    /// Opening a library runs its initialization routines. The file must be
    /// a library whose initializers are sound to run in this process.
    ///
    /// # Errors
    /// Returns [`PluginError::LoadFailure`] if the platform loader fails.
    pub unsafe fn open(path: &Path) -> Result<Self> {
        let inner = Self::open_platform(path).map_err(|e| PluginError::LoadFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!("Opened library: {}", path.display());

        Ok(Self {
            inner: Some(inner),
            path: path.to_path_buf(),
        })
    }

    #[cfg(unix)]
    unsafe fn open_platform(path: &Path) -> LibResult<libloading::Library> {
        use libloading::os::unix::{Library, RTLD_LOCAL, RTLD_NOW};

        // Resolve everything up front so missing symbols fail here, not mid-simulation
        Library::open(Some(path), RTLD_NOW | RTLD_LOCAL).map(Into::into)
    }

    #[cfg(windows)]
    unsafe fn open_platform(path: &Path) -> LibResult<libloading::Library> {
        libloading::os::windows::Library::new(path).map(Into::into)
    }

    /// Resolve an exported symbol by name
    ///
    /// Returns `None` if the library does not export `name`.
    ///
    /// # Safety
    /// `T` must match the actual type of the exported symbol.
    #[must_use]
    pub unsafe fn symbol<T>(&self, name: &str) -> Option<libloading::Symbol<'_, T>> {
        let library = self.inner.as_ref()?;
        match library.get::<T>(name.as_bytes()) {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                debug!("Symbol '{}' not found in {}: {}", name, self.path.display(), e);
                None
            }
        }
    }

    /// Path the library was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library").field("path", &self.path).finish()
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        if let Some(library) = self.inner.take() {
            debug!("Unloading library: {}", self.path.display());

            // Nothing can be done about a failed unload; report and move on
            if let Err(e) = library.close() {
                warn!("Failed to unload library {}: {}", self.path.display(), e);
            }
        }
    }
}
