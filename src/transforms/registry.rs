use super::{IdentityTransformer, ProjectionTransformer, Transformer};
use crate::constants::filter::DEFAULT_SCOPE;
use crate::constants::transformers::{IDENTITY, PROJECTION};
use crate::error::{Error, Result};
use crate::reference::ConfigDescriptor;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a transformer from its construction parameters
pub type TransformerFactory =
    Arc<dyn Fn(&Map<String, Value>) -> Result<Arc<dyn Transformer>> + Send + Sync>;

/// Creates transformer instances out of class names and configuration descriptors
pub trait Constructor: Send + Sync {
    /// Whether the class satisfies the transformer capability in the given scope
    fn is_transformer(&self, class: &str, scope: &str) -> bool;

    /// Constructs the transformer described by the descriptor
    fn construct(&self, descriptor: &ConfigDescriptor, scope: &str)
        -> Result<Arc<dyn Transformer>>;

    /// Turns a bare class name into a transformer, `None` if the class is not a transformer
    fn resolve_class(&self, class: &str, scope: &str) -> Result<Option<Arc<dyn Transformer>>>;
}

/// Registry of transformer factories keyed by class name inside a scope.
///
/// Lookups in a scope other than `"global"` fall back to the global scope.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use transform_filter::reference::ConfigDescriptor;
/// use transform_filter::transforms::{Constructor, TransformerRegistry};
///
/// let registry = TransformerRegistry::with_defaults();
/// let descriptor = ConfigDescriptor::with_class("projection").param("attributes", json!(["id"]));
/// let transformer = registry.construct(&descriptor, "global").unwrap();
/// assert_eq!(transformer.transform(&json!({"id": 1, "x": 2})).unwrap(), json!({"id": 1}));
/// ```
#[derive(Default)]
pub struct TransformerRegistry {
    scopes: HashMap<String, HashMap<String, TransformerFactory>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in transformers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.init();
        registry
    }

    /// Registers the built-in transformers in the global scope
    /// - identity: Returns items unchanged
    /// - projection: Picks and renames attributes, exposes includes (see `ProjectionTransformer`)
    pub fn init(&mut self) {
        self.register_instance(IDENTITY, IdentityTransformer);
        self.register(PROJECTION, |params| {
            Ok(Arc::new(ProjectionTransformer::from_params(params)?) as Arc<dyn Transformer>)
        });
    }

    /// Registers a factory in the global scope
    pub fn register<F>(&mut self, class: &str, factory: F)
    where
        F: Fn(&Map<String, Value>) -> Result<Arc<dyn Transformer>> + Send + Sync + 'static,
    {
        self.register_scoped(DEFAULT_SCOPE, class, factory);
    }

    /// Registers a factory visible only in the given scope
    pub fn register_scoped<F>(&mut self, scope: &str, class: &str, factory: F)
    where
        F: Fn(&Map<String, Value>) -> Result<Arc<dyn Transformer>> + Send + Sync + 'static,
    {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .insert(class.to_string(), Arc::new(factory));
    }

    /// Registers a shared instance returned for every construction (parameters are ignored)
    pub fn register_instance<T: Transformer + 'static>(&mut self, class: &str, transformer: T) {
        let shared: Arc<dyn Transformer> = Arc::new(transformer);
        self.register(class, move |_| Ok(Arc::clone(&shared)));
    }

    /// Gets the factory for the class, looking in the scope first and then in the global scope
    pub fn get(&self, class: &str, scope: &str) -> Option<&TransformerFactory> {
        self.scopes
            .get(scope)
            .and_then(|classes| classes.get(class))
            .or_else(|| {
                self.scopes
                    .get(DEFAULT_SCOPE)
                    .and_then(|classes| classes.get(class))
            })
    }
}

impl Constructor for TransformerRegistry {
    fn is_transformer(&self, class: &str, scope: &str) -> bool {
        self.get(class, scope).is_some()
    }

    fn construct(
        &self,
        descriptor: &ConfigDescriptor,
        scope: &str,
    ) -> Result<Arc<dyn Transformer>> {
        let class = descriptor.class().ok_or_else(|| Error::ConstructionError {
            class: String::new(),
            cause: "descriptor has no class".to_string(),
        })?;
        let factory = self
            .get(class, scope)
            .ok_or_else(|| Error::UnknownTransformer {
                class: class.to_string(),
                scope: scope.to_string(),
            })?;
        factory(&descriptor.params()).map_err(|e| match e {
            Error::ConstructionError { .. } => e,
            other => Error::ConstructionError {
                class: class.to_string(),
                cause: other.to_string(),
            },
        })
    }

    fn resolve_class(&self, class: &str, scope: &str) -> Result<Option<Arc<dyn Transformer>>> {
        match self.get(class, scope) {
            Some(_) => self
                .construct(&ConfigDescriptor::with_class(class), scope)
                .map(Some),
            None => Ok(None),
        }
    }
}
