/// Export the symbols the shared-library loader looks for
///
/// Expands to `get_config`, returning this crate's build configuration, and
/// `create`, returning a new `$api` (which must implement `Api + Default`).
/// Use it once at the root of a `cdylib` plugin crate named `cece-<name>`.
///
/// # Example
///
/// ```ignore
/// use cece::plugin::{Api, RepositoryRecord};
///
/// #[derive(Default)]
/// pub struct DiffusionApi;
///
/// impl Api for DiffusionApi {
///     fn on_load(&self, record: &mut RepositoryRecord) {
///         record.register_module::<Diffusion>("diffusion");
///     }
///
///     fn on_unload(&self, record: &mut RepositoryRecord) {
///         record.unregister_module("diffusion");
///     }
/// }
///
/// cece::define_plugin!(DiffusionApi);
/// ```
#[macro_export]
macro_rules! define_plugin {
    ($api:ty) => {
        #[no_mangle]
        pub extern "C" fn get_config() -> *const $crate::plugin::PluginConfig {
            static CONFIG: $crate::plugin::PluginConfig = $crate::plugin::PluginConfig::HOST;
            &CONFIG
        }

        #[no_mangle]
        pub extern "C" fn create() -> *mut $crate::plugin::ApiBox {
            let api: $crate::plugin::ApiBox = Box::new(<$api>::default());
            Box::into_raw(Box::new(api))
        }
    };
}
