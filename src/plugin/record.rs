//! Extension registrations of a single plugin

use super::error::{ExtensionKind, Result};
use super::factory::FactoryRegistry;
use crate::simulation::{Initializer, Loader, Module, Object, Program, Simulation};

/// Extension factories registered by one plugin
///
/// A record is created by the manager when the plugin is loaded and filled in
/// by the plugin's `Api::on_load`. Registration methods return `&mut Self`
/// so a plugin can chain them:
///
/// ```ignore
/// record
///     .register_module::<Diffusion>("diffusion")
///     .register_program::<Chemotaxis>("chemotaxis");
/// ```
#[derive(Debug)]
pub struct RepositoryRecord {
    loaders: FactoryRegistry<dyn Loader>,
    initializers: FactoryRegistry<dyn Initializer>,
    modules: FactoryRegistry<dyn Module, Simulation>,
    objects: FactoryRegistry<dyn Object, Simulation>,
    programs: FactoryRegistry<dyn Program>,
}

impl RepositoryRecord {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaders: FactoryRegistry::new(ExtensionKind::Loader),
            initializers: FactoryRegistry::new(ExtensionKind::Initializer),
            modules: FactoryRegistry::new(ExtensionKind::Module),
            objects: FactoryRegistry::new(ExtensionKind::Object),
            programs: FactoryRegistry::new(ExtensionKind::Program),
        }
    }

    /// Whether `name` is registered for the given extension kind
    #[must_use]
    pub fn is_registered(&self, kind: ExtensionKind, name: &str) -> bool {
        match kind {
            ExtensionKind::Loader => self.loaders.exists(name),
            ExtensionKind::Initializer => self.initializers.exists(name),
            ExtensionKind::Module => self.modules.exists(name),
            ExtensionKind::Object => self.objects.exists(name),
            ExtensionKind::Program => self.programs.exists(name),
        }
    }

    /// Names registered for the given extension kind, sorted
    #[must_use]
    pub fn names(&self, kind: ExtensionKind) -> Vec<&str> {
        match kind {
            ExtensionKind::Loader => self.loaders.names().collect(),
            ExtensionKind::Initializer => self.initializers.names().collect(),
            ExtensionKind::Module => self.modules.names().collect(),
            ExtensionKind::Object => self.objects.names().collect(),
            ExtensionKind::Program => self.programs.names().collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        ExtensionKind::ALL
            .iter()
            .all(|&kind| self.names(kind).is_empty())
    }

    // Loaders

    #[must_use]
    pub fn is_registered_loader(&self, name: &str) -> bool {
        self.loaders.exists(name)
    }

    /// # Errors
    /// Returns `ExtensionNotFound` if no loader is registered under `name`.
    pub fn create_loader(&self, name: &str) -> Result<Box<dyn Loader + '_>> {
        self.loaders.create(name, &())
    }

    pub fn register_loader<L>(&mut self, name: impl Into<String>) -> &mut Self
    where
        L: Loader + Default + 'static,
    {
        self.loaders
            .register(name, |_: &()| Box::new(L::default()) as Box<dyn Loader>);
        self
    }

    pub fn register_loader_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Loader> + 'static,
    {
        self.loaders.register(name, move |_: &()| factory());
        self
    }

    pub fn unregister_loader(&mut self, name: &str) -> &mut Self {
        self.loaders.unregister(name);
        self
    }

    // Initializers

    #[must_use]
    pub fn is_registered_initializer(&self, name: &str) -> bool {
        self.initializers.exists(name)
    }

    /// # Errors
    /// Returns `ExtensionNotFound` if no initializer is registered under `name`.
    pub fn create_initializer(&self, name: &str) -> Result<Box<dyn Initializer + '_>> {
        self.initializers.create(name, &())
    }

    pub fn register_initializer<I>(&mut self, name: impl Into<String>) -> &mut Self
    where
        I: Initializer + Default + 'static,
    {
        self.initializers
            .register(name, |_: &()| Box::new(I::default()) as Box<dyn Initializer>);
        self
    }

    pub fn register_initializer_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Initializer> + 'static,
    {
        self.initializers.register(name, move |_: &()| factory());
        self
    }

    pub fn unregister_initializer(&mut self, name: &str) -> &mut Self {
        self.initializers.unregister(name);
        self
    }

    // Modules

    #[must_use]
    pub fn is_registered_module(&self, name: &str) -> bool {
        self.modules.exists(name)
    }

    /// Create the module registered under `name`
    ///
    /// The module borrows the record, so the plugin that registered it
    /// cannot be unloaded while the module is alive:
    ///
    /// ```compile_fail
    /// use cece::plugin::Manager;
    /// use cece::simulation::Simulation;
    ///
    /// let simulation = Simulation::default();
    /// let module = {
    ///     let manager = Manager::new();
    ///     let record = manager.repository().get("diffusion").unwrap();
    ///     record.create_module("diffusion", &simulation).unwrap()
    /// };
    /// drop(module);
    /// ```
    ///
    /// # Errors
    /// Returns `ExtensionNotFound` if no module is registered under `name`.
    pub fn create_module(
        &self,
        name: &str,
        simulation: &Simulation,
    ) -> Result<Box<dyn Module + '_>> {
        self.modules.create(name, simulation)
    }

    pub fn register_module<M>(&mut self, name: impl Into<String>) -> &mut Self
    where
        M: Module + Default + 'static,
    {
        self.modules
            .register(name, |_: &Simulation| Box::new(M::default()) as Box<dyn Module>);
        self
    }

    pub fn register_module_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Simulation) -> Box<dyn Module> + 'static,
    {
        self.modules.register(name, factory);
        self
    }

    pub fn unregister_module(&mut self, name: &str) -> &mut Self {
        self.modules.unregister(name);
        self
    }

    // Objects

    #[must_use]
    pub fn is_registered_object(&self, name: &str) -> bool {
        self.objects.exists(name)
    }

    /// # Errors
    /// Returns `ExtensionNotFound` if no object is registered under `name`.
    pub fn create_object(
        &self,
        name: &str,
        simulation: &Simulation,
    ) -> Result<Box<dyn Object + '_>> {
        self.objects.create(name, simulation)
    }

    pub fn register_object<O>(&mut self, name: impl Into<String>) -> &mut Self
    where
        O: Object + Default + 'static,
    {
        self.objects
            .register(name, |_: &Simulation| Box::new(O::default()) as Box<dyn Object>);
        self
    }

    pub fn register_object_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Simulation) -> Box<dyn Object> + 'static,
    {
        self.objects.register(name, factory);
        self
    }

    pub fn unregister_object(&mut self, name: &str) -> &mut Self {
        self.objects.unregister(name);
        self
    }

    // Programs

    #[must_use]
    pub fn is_registered_program(&self, name: &str) -> bool {
        self.programs.exists(name)
    }

    /// # Errors
    /// Returns `ExtensionNotFound` if no program is registered under `name`.
    pub fn create_program(&self, name: &str) -> Result<Box<dyn Program + '_>> {
        self.programs.create(name, &())
    }

    pub fn register_program<P>(&mut self, name: impl Into<String>) -> &mut Self
    where
        P: Program + Default + 'static,
    {
        self.programs
            .register(name, |_: &()| Box::new(P::default()) as Box<dyn Program>);
        self
    }

    pub fn register_program_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Program> + 'static,
    {
        self.programs.register(name, move |_: &()| factory());
        self
    }

    pub fn unregister_program(&mut self, name: &str) -> &mut Self {
        self.programs.unregister(name);
        self
    }
}

impl Default for RepositoryRecord {
    fn default() -> Self {
        Self::new()
    }
}
