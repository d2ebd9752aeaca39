//! ABI handshake between the host and a plugin library
//!
//! `get_config` is the only symbol trusted before validation, so the struct
//! is plain `#[repr(C)]` data: four 32-bit fields in a fixed order. Booleans
//! travel as `i32` to keep the layout identical across compilers, and every
//! field is compared by value.

use super::error::ConfigMismatch;
use crate::simulation::Real;

/// Plugin API version; bump on any change to `Api` or the extension traits
pub const API_VERSION: i32 = 1;

/// Build configuration a plugin was compiled against
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginConfig {
    pub api_version: i32,
    pub real_size: i32,
    pub render_enabled: i32,
    pub thread_safe: i32,
}

impl PluginConfig {
    /// Configuration of this build of the crate
    pub const HOST: PluginConfig = PluginConfig {
        api_version: API_VERSION,
        real_size: std::mem::size_of::<Real>() as i32,
        render_enabled: cfg!(feature = "render") as i32,
        thread_safe: cfg!(feature = "thread-safe") as i32,
    };

    #[must_use]
    pub fn is_render_enabled(&self) -> bool {
        self.render_enabled != 0
    }

    #[must_use]
    pub fn is_thread_safe(&self) -> bool {
        self.thread_safe != 0
    }

    /// Check that a plugin's configuration matches `host` exactly
    ///
    /// # Errors
    /// Returns the first field that differs.
    pub fn check_compatible(&self, host: &PluginConfig) -> Result<(), ConfigMismatch> {
        if self.api_version != host.api_version {
            return Err(ConfigMismatch::ApiVersion {
                host: host.api_version,
                plugin: self.api_version,
            });
        }

        if self.real_size != host.real_size {
            return Err(ConfigMismatch::RealSize {
                host: host.real_size,
                plugin: self.real_size,
            });
        }

        if self.render_enabled != host.render_enabled {
            return Err(ConfigMismatch::RenderEnabled {
                host: host.render_enabled,
                plugin: self.render_enabled,
            });
        }

        if self.thread_safe != host.thread_safe {
            return Err(ConfigMismatch::ThreadSafe {
                host: host.thread_safe,
                plugin: self.thread_safe,
            });
        }

        Ok(())
    }
}

/// Signature of the exported `get_config` symbol
pub type GetConfigFn = unsafe extern "C" fn() -> *const PluginConfig;
