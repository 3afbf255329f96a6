//! Turns transformer references into invokable transformers.

use std::sync::Arc;

use crate::error::Result;
use crate::log::{debug_message, DiagnosticSink};
use crate::reference::TransformerReference;
use crate::transforms::{Constructor, Transformer};

pub const INVALID_CONFIGURATION: &str = "Invalid transformer configuration";

/// Resolves references within a scope using the given constructor.
///
/// The resolver keeps no state between calls: everything it needs comes from
/// the reference and the scope.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use transform_filter::log::MemorySink;
/// use transform_filter::reference::{ConfigDescriptor, TransformerReference};
/// use transform_filter::resolver::TransformerResolver;
/// use transform_filter::transforms::TransformerRegistry;
///
/// let registry = TransformerRegistry::with_defaults();
/// let sink = MemorySink::new();
/// let resolver = TransformerResolver::new(&registry, &sink);
///
/// let reference = TransformerReference::from(ConfigDescriptor::with_class("identity"));
/// assert!(resolver.resolve(&reference, "global").is_some());
///
/// let reference = TransformerReference::from(ConfigDescriptor::new().param("attributes", json!([])));
/// assert!(resolver.resolve(&reference, "global").is_none());
/// ```
pub struct TransformerResolver<'a> {
    constructor: &'a dyn Constructor,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> TransformerResolver<'a> {
    pub fn new(constructor: &'a dyn Constructor, sink: &'a dyn DiagnosticSink) -> Self {
        Self { constructor, sink }
    }

    /// Checks whether the reference is a descriptor that can be used to construct a transformer.
    ///
    /// The descriptor must carry a non-empty `class` naming a type that satisfies the
    /// transformer capability in the scope. A descriptor without `class` is never valid.
    pub fn is_transformer_config(&self, reference: &TransformerReference, scope: &str) -> bool {
        match reference {
            TransformerReference::ConfigDescriptor(descriptor) => descriptor
                .class()
                .is_some_and(|class| self.constructor.is_transformer(class, scope)),
            _ => false,
        }
    }

    /// Resolves the reference, `None` when no transformer is available.
    ///
    /// Construction failures are reported to the diagnostic sink and never propagated.
    pub fn resolve(
        &self,
        reference: &TransformerReference,
        scope: &str,
    ) -> Option<Arc<dyn Transformer>> {
        match self.try_resolve(reference, scope) {
            Ok(transformer) => transformer,
            Err(e) => {
                self.sink.emit(&debug_message(
                    format!("{}: {}", INVALID_CONFIGURATION, e),
                    format!(" (reference: {})", reference),
                ));
                None
            }
        }
    }

    /// Resolves the reference returning construction failures as errors instead of
    /// reporting them.
    pub fn try_resolve(
        &self,
        reference: &TransformerReference,
        scope: &str,
    ) -> Result<Option<Arc<dyn Transformer>>> {
        match reference {
            TransformerReference::Callable(transformer) => Ok(Some(Arc::clone(transformer))),
            TransformerReference::ConfigDescriptor(descriptor)
                if self.is_transformer_config(reference, scope) =>
            {
                let instance = self.constructor.construct(descriptor, scope)?;
                tracing::debug!(scope, reference = %reference, "constructed transformer");
                self.try_resolve(&TransformerReference::Callable(instance), scope)
            }
            TransformerReference::ClassIdentifier(class) => {
                self.constructor.resolve_class(class, scope)
            }
            TransformerReference::ConfigDescriptor(_) | TransformerReference::Absent => Ok(None),
        }
    }
}
