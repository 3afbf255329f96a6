use crate::error::Result;
use serde_json::Value;
use std::fmt;

/// Capability turning a raw domain value into its shaped, serializable representation.
///
/// Besides the base representation returned by [`Transformer::transform`], a
/// transformer may expose named includes (embedded relations) that clients
/// request or exclude through the shaping options.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use transform_filter::transforms::{FnTransformer, Transformer};
///
/// let transformer = FnTransformer::new(|item| Ok(json!({ "id": item["id"] })));
/// let result = transformer.transform(&json!({ "id": 7, "secret": "x" })).unwrap();
/// assert_eq!(result, json!({ "id": 7 }));
/// ```
pub trait Transformer: Send + Sync {
    /// Produces the base representation of the item
    fn transform(&self, item: &Value) -> Result<Value>;

    /// Names of the includes this transformer is able to produce
    fn available_includes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Includes embedded unless explicitly excluded
    fn default_includes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Produces the named include for the item, `None` when the item has nothing to embed
    fn include(&self, _name: &str, _item: &Value) -> Result<Option<Value>> {
        Ok(None)
    }
}

/// Adapts a closure into a [`Transformer`] without includes
pub struct FnTransformer<F> {
    func: F,
}

impl<F> FnTransformer<F>
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Transformer for FnTransformer<F>
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    fn transform(&self, item: &Value) -> Result<Value> {
        (self.func)(item)
    }
}

impl<F> fmt::Debug for FnTransformer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransformer")
    }
}

/// Returns every item unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&self, item: &Value) -> Result<Value> {
        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_fn_transformer_propagates_errors() {
        let transformer = FnTransformer::new(|_| Err(Error::from("boom")));
        assert!(transformer.transform(&json!({})).is_err());
    }

    #[test]
    fn test_fn_transformer_has_no_includes() {
        let transformer = FnTransformer::new(|item| Ok(item.clone()));
        assert!(transformer.available_includes().is_empty());
        assert!(transformer.default_includes().is_empty());
        assert_eq!(transformer.include("author", &json!({})).unwrap(), None);
    }

    #[test]
    fn test_identity_transformer() {
        let item = json!({"id": 1, "tags": ["a"]});
        assert_eq!(IdentityTransformer.transform(&item).unwrap(), item);
    }
}
