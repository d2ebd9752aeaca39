//! Name to constructor registry for one extension kind

use super::error::{ExtensionKind, PluginError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Constructor stored in a [`FactoryRegistry`]
///
/// `A` is the construction argument (`()` for kinds built without one).
pub type Factory<T, A> = Box<dyn Fn(&A) -> Box<T>>;

/// Registry of constructors for extensions of type `T`
///
/// Registering a name that is already present replaces the previous
/// constructor. Plugin names in a [`Repository`](super::Repository), by
/// contrast, must be unique.
pub struct FactoryRegistry<T: ?Sized, A: ?Sized = ()> {
    kind: ExtensionKind,
    factories: BTreeMap<String, Factory<T, A>>,
}

impl<T: ?Sized, A: ?Sized> FactoryRegistry<T, A> {
    #[must_use]
    pub fn new(kind: ExtensionKind) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
        }
    }

    /// Extension kind this registry holds
    #[must_use]
    pub fn kind(&self) -> ExtensionKind {
        self.kind
    }

    /// Bind `factory` under `name`, replacing any previous binding
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&A) -> Box<T> + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Remove the binding for `name` if there is one
    pub fn unregister(&mut self, name: &str) {
        self.factories.remove(name);
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Construct the extension registered under `name`
    ///
    /// # Errors
    /// Returns [`PluginError::ExtensionNotFound`] if nothing is registered under `name`.
    pub fn create(&self, name: &str, args: &A) -> Result<Box<T>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PluginError::ExtensionNotFound {
                kind: self.kind,
                name: name.to_string(),
            })?;

        Ok(factory(args))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<T: ?Sized, A: ?Sized> fmt::Debug for FactoryRegistry<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("kind", &self.kind)
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape {
        fn sides(&self) -> u32;
    }

    struct Polygon(u32);

    impl Shape for Polygon {
        fn sides(&self) -> u32 {
            self.0
        }
    }

    fn registry() -> FactoryRegistry<dyn Shape, u32> {
        FactoryRegistry::new(ExtensionKind::Object)
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = registry();
        registry.register("polygon", |sides: &u32| Box::new(Polygon(*sides)) as Box<dyn Shape>);

        assert!(registry.exists("polygon"));
        assert_eq!(registry.create("polygon", &5).unwrap().sides(), 5);
    }

    #[test]
    fn test_create_missing() {
        let registry = registry();
        match registry.create("circle", &0) {
            Err(PluginError::ExtensionNotFound { kind, name }) => {
                assert_eq!(kind, ExtensionKind::Object);
                assert_eq!(name, "circle");
            }
            _ => panic!("expected ExtensionNotFound"),
        }
    }

    #[test]
    fn test_duplicate_register_overwrites() {
        let mut registry = registry();
        registry.register("shape", |_: &u32| Box::new(Polygon(3)) as Box<dyn Shape>);
        registry.register("shape", |_: &u32| Box::new(Polygon(4)) as Box<dyn Shape>);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.create("shape", &0).unwrap().sides(), 4);
    }

    #[test]
    fn test_unregister() {
        let mut registry = registry();
        registry.register("triangle", |_: &u32| Box::new(Polygon(3)) as Box<dyn Shape>);
        registry.unregister("triangle");
        registry.unregister("triangle");

        assert!(!registry.exists("triangle"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = registry();
        registry.register("b", |_: &u32| Box::new(Polygon(3)) as Box<dyn Shape>);
        registry.register("a", |_: &u32| Box::new(Polygon(4)) as Box<dyn Shape>);

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
