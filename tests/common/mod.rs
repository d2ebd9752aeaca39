//! Shared fixtures: in-process plugins, a loader serving them per directory,
//! the demo shared-library plugins and log capture

#![allow(dead_code)]

use cece::plugin::{Api, ExtensionKind, Plugin, PluginLoader, RepositoryRecord};
use cece::simulation::{Initializer, Loader, Module, Object, Program, Real, Simulation};
use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;
use std::sync::{Arc, Mutex, OnceLock};

pub type Events = Rc<RefCell<Vec<String>>>;

pub struct Noop(pub String);

impl Initializer for Noop {
    fn call(&self, simulation: &mut Simulation) -> anyhow::Result<()> {
        simulation.set_parameter(self.0.clone(), 1.0);
        Ok(())
    }
}

impl Module for Noop {
    fn update(&mut self, _dt: Real) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Object for Noop {
    fn type_name(&self) -> &str {
        &self.0
    }
}

impl Program for Noop {
    fn call(&mut self, _object: &mut dyn Object, _dt: Real) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Loader for Noop {
    fn read(&self, source: &str) -> anyhow::Result<Simulation> {
        Ok(Simulation::new(source.trim()))
    }

    /// Writes the provider tag so tests can tell which plugin answered
    fn write(&self, _simulation: &Simulation) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

/// Plugin registering one no-op extension per `(kind, name)` pair
pub struct TestApi {
    pub plugin: String,
    pub extensions: Vec<(ExtensionKind, String)>,
    pub events: Events,
}

impl Api for TestApi {
    fn on_load(&self, record: &mut RepositoryRecord) {
        for (kind, name) in &self.extensions {
            let tag = format!("{}/{}", self.plugin, name);
            match kind {
                ExtensionKind::Loader => {
                    record.register_loader_with(name.clone(), move || Box::new(Noop(tag.clone())));
                }
                ExtensionKind::Initializer => {
                    record.register_initializer_with(name.clone(), move || {
                        Box::new(Noop(tag.clone()))
                    });
                }
                ExtensionKind::Module => {
                    record.register_module_with(name.clone(), move |_: &Simulation| {
                        Box::new(Noop(tag.clone()))
                    });
                }
                ExtensionKind::Object => {
                    record.register_object_with(name.clone(), move |_: &Simulation| {
                        Box::new(Noop(tag.clone()))
                    });
                }
                ExtensionKind::Program => {
                    record.register_program_with(name.clone(), move || Box::new(Noop(tag.clone())));
                }
            }
        }
        self.events.borrow_mut().push(format!("load:{}", self.plugin));
    }

    fn on_unload(&self, record: &mut RepositoryRecord) {
        for (kind, name) in &self.extensions {
            match kind {
                ExtensionKind::Loader => record.unregister_loader(name),
                ExtensionKind::Initializer => record.unregister_initializer(name),
                ExtensionKind::Module => record.unregister_module(name),
                ExtensionKind::Object => record.unregister_object(name),
                ExtensionKind::Program => record.unregister_program(name),
            };
        }
        self.events.borrow_mut().push(format!("unload:{}", self.plugin));
    }
}

pub fn plugin(name: &str, extensions: &[(ExtensionKind, &str)], events: &Events) -> Plugin {
    let api = TestApi {
        plugin: name.to_string(),
        extensions: extensions
            .iter()
            .map(|(kind, ext)| (*kind, (*ext).to_string()))
            .collect(),
        events: events.clone(),
    };
    Plugin::new(name, Box::new(api))
}

/// Plugin definition served by a [`DirectoryLoader`]
#[derive(Clone)]
pub struct Fixture {
    pub name: String,
    pub extensions: Vec<(ExtensionKind, String)>,
}

impl Fixture {
    pub fn new(name: &str, extensions: &[(ExtensionKind, &str)]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions
                .iter()
                .map(|(kind, ext)| (*kind, (*ext).to_string()))
                .collect(),
        }
    }
}

/// Loader producing in-process plugins for configured directories
pub struct DirectoryLoader {
    label: String,
    directories: HashMap<PathBuf, Vec<Fixture>>,
    events: Events,
}

impl DirectoryLoader {
    pub fn new(label: &str, events: &Events) -> Self {
        Self {
            label: label.to_string(),
            directories: HashMap::new(),
            events: events.clone(),
        }
    }

    pub fn serve(mut self, directory: impl Into<PathBuf>, fixture: Fixture) -> Self {
        self.directories
            .entry(directory.into())
            .or_default()
            .push(fixture);
        self
    }
}

impl PluginLoader for DirectoryLoader {
    fn name(&self) -> &str {
        &self.label
    }

    fn load_plugins(&mut self, directory: &Path) -> Vec<Plugin> {
        let Some(fixtures) = self.directories.get(directory) else {
            return Vec::new();
        };

        fixtures
            .iter()
            .map(|fixture| {
                let api = TestApi {
                    plugin: fixture.name.clone(),
                    extensions: fixture.extensions.clone(),
                    events: self.events.clone(),
                };
                Plugin::new(fixture.name.clone(), Box::new(api))
            })
            .collect()
    }
}

/// Directory holding `test-plugin` and `old-plugin` under their loader names
///
/// Uses `CECE_TEST_PLUGIN_DIR` when set, otherwise builds the demo crates
/// once per test binary with the same `cece` features as this build.
pub fn demo_plugin_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();

    DIR.get_or_init(|| match env::var_os("CECE_TEST_PLUGIN_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => build_demo_plugins(),
    })
}

fn build_demo_plugins() -> PathBuf {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    // Separate target dir so the outer cargo's build lock is not contended
    let target = root.join("target").join("demo-plugins");

    let mut features = Vec::new();
    if cfg!(feature = "real-f32") {
        features.push("cece/real-f32");
    }
    if cfg!(feature = "render") {
        features.push("cece/render");
    }
    if cfg!(feature = "thread-safe") {
        features.push("cece/thread-safe");
    }

    let cargo = env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
    let mut command = Command::new(cargo);
    command
        .current_dir(root)
        .args(["build", "-p", "cece-test-plugin", "-p", "cece-old-plugin"])
        .arg("--target-dir")
        .arg(&target);
    if !features.is_empty() {
        command.arg("--features").arg(features.join(","));
    }

    let status = command.status().expect("failed to run cargo");
    assert!(status.success(), "building demos/plugins failed: {status}");

    let plugins = target.join("plugins");
    fs::create_dir_all(&plugins).unwrap();
    for name in ["test-plugin", "old-plugin"] {
        let built = format!(
            "{}cece_{}{}",
            env::consts::DLL_PREFIX,
            name.replace('-', "_"),
            env::consts::DLL_SUFFIX
        );
        fs::copy(
            target.join("debug").join(built),
            plugins.join(cece::plugin::library::file_name_for(name)),
        )
        .unwrap();
    }

    plugins
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber recording log lines on this thread
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
