//! Component registry
//!
//! Maps element names to components. The process-wide registry is built once,
//! on first use, from the built-in components and is read-only afterwards.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use super::component::ViewComponent;
use super::components::register_builtin_components;
use super::element::QualifiedName;

static GLOBAL_REGISTRY: Lazy<ComponentRegistry> = Lazy::new(|| {
    let registry = ComponentRegistry::builder().with_builtins().build();
    log::debug!("component registry initialised with {} components", registry.len());
    registry
});

/// Get the process-wide registry of built-in components
pub fn global_registry() -> &'static ComponentRegistry {
    &GLOBAL_REGISTRY
}

/// Element-name to component map
#[derive(Default)]
pub struct ComponentRegistry {
    components: FxHashMap<QualifiedName, Arc<dyn ViewComponent>>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.components.keys().map(ToString::to_string).collect();
        names.sort();
        f.debug_struct("ComponentRegistry")
            .field("components", &names)
            .finish()
    }
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a registry
    pub fn builder() -> ComponentRegistryBuilder {
        ComponentRegistryBuilder::default()
    }

    /// Register a component under the name it claims
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register(&mut self, component: Arc<dyn ViewComponent>) -> Option<Arc<dyn ViewComponent>> {
        let name = component.element_name();
        let replaced = self.components.insert(name.clone(), component);
        if replaced.is_some() {
            log::warn!("component for '{name}' registered twice; the later registration wins");
        }
        replaced
    }

    /// Component registered under exactly `name`
    pub fn get(&self, name: &QualifiedName) -> Option<&Arc<dyn ViewComponent>> {
        self.components.get(name)
    }

    /// Component for `name`, falling back to its namespace's wildcard
    pub fn find(&self, name: &QualifiedName) -> Option<&Arc<dyn ViewComponent>> {
        self.get(name).or_else(|| self.get(&name.wildcard()))
    }

    /// Check if a component is registered under exactly `name`
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.components.contains_key(name)
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered names
    pub fn names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.components.keys()
    }
}

/// Collects components, then registers them in order
#[derive(Default)]
pub struct ComponentRegistryBuilder {
    components: Vec<Arc<dyn ViewComponent>>,
}

impl ComponentRegistryBuilder {
    /// Add a component instance
    pub fn with(mut self, component: impl ViewComponent + 'static) -> Self {
        self.components.push(Arc::new(component));
        self
    }

    /// Add a component built by its no-argument constructor
    pub fn component<C: ViewComponent + Default + 'static>(self) -> Self {
        self.with(C::default())
    }

    /// Add the built-in view components
    pub fn with_builtins(self) -> Self {
        register_builtin_components(self)
    }

    /// Build the registry; for duplicate names the last component added wins
    pub fn build(self) -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for component in self.components {
            registry.register(component);
        }
        registry
    }
}
