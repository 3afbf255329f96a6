use super::Transformer;
use crate::error::{Error, Result};
use crate::options::ShapingOptions;
use serde_json::Value;

/// Renders items and collections through a transformer honoring the shaping options.
///
/// Errors returned here are not recovered by the filter, they reach the caller.
pub trait RenderEngine: Send + Sync {
    /// Renders a single item
    fn render_item(
        &self,
        transformer: &dyn Transformer,
        item: &Value,
        options: &ShapingOptions,
    ) -> Result<Value>;

    /// Renders every item of a collection keeping their order.
    ///
    /// A failing item stops the rendering with an [`Error::TransformError`]
    /// naming its position.
    fn render_collection(
        &self,
        transformer: &dyn Transformer,
        items: &[Value],
        options: &ShapingOptions,
    ) -> Result<Vec<Value>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.render_item(transformer, item, options)
                    .map_err(|e| Error::TransformError {
                        target: format!("collection item #{}", index),
                        cause: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Default rendering engine.
///
/// For object representations, the requested includes (default includes plus
/// the `includes` option, minus the `excludes` option, restricted to what the
/// transformer makes available) are embedded under their own name, and when
/// `fields` is given only those attributes are kept next to the includes.
/// Any other representation is returned as produced by the transformer.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use transform_filter::options::ShapingOptions;
/// use transform_filter::transforms::{IdentityTransformer, Manager, RenderEngine};
///
/// let options = ShapingOptions::new().fields(["id"]);
/// let result = Manager
///     .render_item(&IdentityTransformer, &json!({"id": 1, "title": "a"}), &options)
///     .unwrap();
/// assert_eq!(result, json!({"id": 1}));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Manager;

impl Manager {
    pub fn new() -> Self {
        Self
    }

    /// Computes the includes to embed, in request order (default includes first)
    pub fn requested_includes(
        transformer: &dyn Transformer,
        options: &ShapingOptions,
    ) -> Vec<String> {
        let available = transformer.available_includes();
        transformer
            .default_includes()
            .into_iter()
            .chain(options.includes.iter().cloned())
            .filter(|name| available.contains(name) && !options.excludes.contains(name))
            .fold(Vec::new(), |mut names, name| {
                if !names.contains(&name) {
                    names.push(name);
                }
                names
            })
    }
}

impl RenderEngine for Manager {
    fn render_item(
        &self,
        transformer: &dyn Transformer,
        item: &Value,
        options: &ShapingOptions,
    ) -> Result<Value> {
        let mut object = match transformer.transform(item)? {
            Value::Object(object) => object,
            other => return Ok(other),
        };

        if !options.fields.is_empty() {
            object.retain(|key, _| options.fields.contains(key));
        }

        for name in Self::requested_includes(transformer, options) {
            let include = transformer
                .include(&name, item)
                .map_err(|e| Error::TransformError {
                    target: format!("include \"{}\"", name),
                    cause: e.to_string(),
                })?;
            if let Some(value) = include {
                object.insert(name, value);
            }
        }

        Ok(Value::Object(object))
    }
}
