//! Plugin built against an older runtime; the loader must reject it

use cece::plugin::{Api, ApiBox, PluginConfig, RepositoryRecord};

#[derive(Default)]
pub struct OldApi;

impl Api for OldApi {
    fn on_load(&self, record: &mut RepositoryRecord) {
        record.register_module_with("module", |_| unreachable!("old plugin must not load"));
    }

    fn on_unload(&self, _record: &mut RepositoryRecord) {}
}

static CONFIG: PluginConfig = PluginConfig {
    api_version: cece::plugin::API_VERSION - 1,
    ..PluginConfig::HOST
};

#[no_mangle]
pub extern "C" fn get_config() -> *const PluginConfig {
    &CONFIG
}

#[no_mangle]
pub extern "C" fn create() -> *mut ApiBox {
    let api: ApiBox = Box::new(OldApi);
    Box::into_raw(Box::new(api))
}
