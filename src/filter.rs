//! Action filter reshaping action results through transformers.
//!
//! Every call to [`TransformFilter::after_action`] walks the same steps and
//! keeps nothing once it returns:
//!
//! ```text
//! result ──▶ gate ──▶ select ──▶ HEAD? ──▶ resolve ──▶ shape ──▶ render
//!             │         │          │          │
//!             ▼         ▼          ▼          ▼
//!          original  original    Empty     original (+ diagnostic)
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::actions::ActionTransformerMap;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::log::{debug_message, DiagnosticSink, TracingSink};
use crate::options::ShapingOptions;
use crate::reference::TransformerReference;
use crate::request::Request;
use crate::resolver::{TransformerResolver, INVALID_CONFIGURATION};
use crate::result::{ActionResult, DataProvider};
use crate::transforms::{Constructor, Manager, RenderEngine, Transformer, TransformerRegistry};

/// Predicate deciding whether the filter applies to an action result
pub type MatchCallback =
    Arc<dyn Fn(&TransformFilter, &str, &ActionResult) -> bool + Send + Sync>;

static NO_BODY: Value = Value::Null;

/// What gets rendered for a given action result
#[derive(Debug, PartialEq)]
pub enum RenderTarget<'a> {
    SingleItem(&'a Value),
    Collection(&'a [Value], Option<&'a str>),
}

pub struct TransformFilter {
    config: FilterConfig,
    match_callback: Option<MatchCallback>,
    constructor: Arc<dyn Constructor>,
    engine: Arc<dyn RenderEngine>,
    sink: Arc<dyn DiagnosticSink>,
}

impl TransformFilter {
    /// Creates a filter using the built-in registry, the default rendering engine
    /// and `tracing` for diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use transform_filter::config::FilterConfig;
    /// use transform_filter::filter::TransformFilter;
    /// use transform_filter::request::QueryRequest;
    /// use transform_filter::result::{ActionResult, DataProvider};
    ///
    /// let config = FilterConfig::from_toml(r#"transformer = "identity""#, "inline").unwrap();
    /// let filter = TransformFilter::new(config);
    /// let request = QueryRequest::from_query("fields=id");
    /// let provider = DataProvider::new(vec![json!({"id": 1, "title": "a"})]);
    ///
    /// let result = filter.after_action("index", &request, provider.into()).unwrap();
    /// assert_eq!(result, ActionResult::Data(json!({"data": [{"id": 1}]})));
    /// ```
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            match_callback: None,
            constructor: Arc::new(TransformerRegistry::with_defaults()),
            engine: Arc::new(Manager),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_constructor(mut self, constructor: Arc<dyn Constructor>) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn RenderEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_match_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TransformFilter, &str, &ActionResult) -> bool + Send + Sync + 'static,
    {
        self.match_callback = Some(Arc::new(callback));
        self
    }

    /// Sets the default transformer (programmatic references such as closures included)
    pub fn with_transformer<R: Into<TransformerReference>>(mut self, reference: R) -> Self {
        self.config.transformer = reference.into();
        self
    }

    /// Sets the transformer of a single action (`"*"` for every action without entry)
    pub fn with_action<R: Into<TransformerReference>>(mut self, action_id: &str, reference: R) -> Self {
        self.config.actions.insert(action_id, reference);
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionTransformerMap {
        &self.config.actions
    }

    /// Checks whether the result of the action must go through a transformer.
    ///
    /// Empty results are only transformed when `transform_empty` is set, and the
    /// match callback (if any) must accept the result.
    pub fn should_transform(&self, action_id: &str, result: &ActionResult) -> bool {
        if result.is_empty() && !self.config.transform_empty {
            return false;
        }
        self.match_callback
            .as_ref()
            .map_or(true, |callback| callback(self, action_id, result))
    }

    /// Selects the transformer reference for the action: its own entry, then the
    /// wildcard entry, then the default transformer.
    pub fn transformer(&self, action_id: &str) -> &TransformerReference {
        self.config
            .actions
            .get(action_id)
            .unwrap_or(&self.config.transformer)
    }

    /// Reads the shaping options from the configured query parameters
    pub fn shaping_options(&self, request: &dyn Request) -> ShapingOptions {
        ShapingOptions::from_request(
            request,
            &self.config.fields_param,
            &self.config.includes_param,
            &self.config.excludes_param,
        )
    }

    /// Determines how the result is rendered: providers as collections, anything
    /// else (a missing body included, as `null`) as a single item
    pub fn render_target<'a>(&'a self, result: &'a ActionResult) -> RenderTarget<'a> {
        match result {
            ActionResult::Provider(provider) => RenderTarget::Collection(
                provider.models(),
                self.config.collection_envelope.as_deref(),
            ),
            ActionResult::Data(value) => RenderTarget::SingleItem(value),
            ActionResult::Empty => RenderTarget::SingleItem(&NO_BODY),
        }
    }

    /// Transforms the result of a finished action.
    ///
    /// Whenever no transformer applies the result is returned untouched. A HEAD
    /// request produces [`ActionResult::Empty`]. Only rendering errors are returned.
    pub fn after_action(
        &self,
        action_id: &str,
        request: &dyn Request,
        result: ActionResult,
    ) -> Result<ActionResult> {
        if !self.should_transform(action_id, &result) {
            tracing::debug!(action_id, "result not eligible for transformation");
            return Ok(result);
        }

        let reference = self.transformer(action_id);
        if reference.is_absent() {
            tracing::debug!(action_id, "no transformer configured");
            return Ok(result);
        }
        tracing::debug!(action_id, reference = %reference, "transformer selected");

        if request.is_head() {
            tracing::debug!(action_id, "HEAD request, body discarded");
            return Ok(ActionResult::Empty);
        }

        let Some(transformer) = self.resolve(reference) else {
            return Ok(result);
        };

        let options = self.shaping_options(request);
        self.render(transformer.as_ref(), &result, &options)
    }

    /// Resolves the reference, emitting a single diagnostic when it can't be resolved
    fn resolve(&self, reference: &TransformerReference) -> Option<Arc<dyn Transformer>> {
        let resolver = TransformerResolver::new(self.constructor.as_ref(), self.sink.as_ref());
        match resolver.try_resolve(reference, &self.config.scope) {
            Ok(Some(transformer)) => Some(transformer),
            Ok(None) => {
                self.sink
                    .emit(&format!("Unable to resolve transformer: {}", reference));
                None
            }
            Err(e) => {
                self.sink.emit(&debug_message(
                    format!("{}: {}", INVALID_CONFIGURATION, reference),
                    format!(" ({})", e),
                ));
                None
            }
        }
    }

    fn render(
        &self,
        transformer: &dyn Transformer,
        result: &ActionResult,
        options: &ShapingOptions,
    ) -> Result<ActionResult> {
        let rendered = match self.render_target(result) {
            RenderTarget::Collection(items, envelope) => {
                let items = self.engine.render_collection(transformer, items, options)?;
                self.envelope(Value::Array(items), envelope, result)
            }
            RenderTarget::SingleItem(item) => self.engine.render_item(transformer, item, options)?,
        };
        Ok(ActionResult::Data(rendered))
    }

    fn envelope(&self, items: Value, envelope: Option<&str>, result: &ActionResult) -> Value {
        let Some(key) = envelope else {
            return items;
        };

        let mut payload = Map::new();
        payload.insert(key.to_string(), items);
        if let (Some(meta_key), ActionResult::Provider(provider)) =
            (self.config.meta_envelope.as_deref(), result)
        {
            if let Some(meta) = Self::meta(provider) {
                payload.insert(meta_key.to_string(), meta);
            }
        }
        Value::Object(payload)
    }

    fn meta(provider: &DataProvider) -> Option<Value> {
        let pagination = serde_json::to_value(provider.pagination()?).ok()?;
        let mut meta = Map::new();
        meta.insert("pagination".to_string(), pagination);
        Some(Value::Object(meta))
    }
}

impl fmt::Debug for TransformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformFilter")
            .field("config", &self.config)
            .field("match_callback", &self.match_callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::log::MemorySink;
    use crate::reference::ConfigDescriptor;
    use crate::request::QueryRequest;
    use crate::result::Pagination;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn filter_with_sink(config: FilterConfig) -> (TransformFilter, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let filter = TransformFilter::new(config).with_sink(sink.clone());
        (filter, sink)
    }

    fn identity_config() -> FilterConfig {
        FilterConfig {
            transformer: TransformerReference::from("identity"),
            ..FilterConfig::default()
        }
    }

    fn three_posts() -> DataProvider {
        DataProvider::new(vec![
            json!({"id": 1, "title": "x"}),
            json!({"id": 2, "title": "y"}),
            json!({"id": 3, "title": "z"}),
        ])
    }

    #[test]
    fn test_transformer_selection() {
        let filter = TransformFilter::new(FilterConfig::default())
            .with_action("update", "A")
            .with_action("*", "B");
        assert_eq!(filter.transformer("update"), &TransformerReference::from("A"));
        assert_eq!(filter.transformer("delete"), &TransformerReference::from("B"));
    }

    #[test]
    fn test_transformer_selection_falls_back_to_default() {
        let filter = TransformFilter::new(FilterConfig::default())
            .with_transformer("default")
            .with_action("update", "A");
        assert_eq!(filter.transformer("delete"), &TransformerReference::from("default"));
        assert_eq!(filter.transformer("update"), &TransformerReference::from("A"));
    }

    #[test]
    fn test_empty_result_not_transformed() {
        let (filter, sink) = filter_with_sink(identity_config());
        let request = QueryRequest::new();
        for result in [ActionResult::Data(json!(null)), ActionResult::Data(json!([])), ActionResult::Empty] {
            assert!(!filter.should_transform("index", &result));
            assert_eq!(
                filter.after_action("index", &request, result.clone()).unwrap(),
                result
            );
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_empty_result_transformed_when_enabled() {
        let config = FilterConfig {
            transform_empty: true,
            ..FilterConfig::default()
        };
        let filter = TransformFilter::new(config)
            .with_transformer(TransformerReference::from_fn(|_| Ok(json!({"empty": true}))));
        let result = ActionResult::Data(json!([]));
        assert!(filter.should_transform("index", &result));
        assert_eq!(
            filter.after_action("index", &QueryRequest::new(), result).unwrap(),
            ActionResult::Data(json!({"empty": true}))
        );
    }

    #[test]
    fn test_missing_body_transformed_like_null_when_enabled() {
        let config = FilterConfig {
            transform_empty: true,
            ..FilterConfig::default()
        };
        let filter = TransformFilter::new(config).with_transformer(TransformerReference::from_fn(
            |item| Ok(json!({"empty": true, "source": item})),
        ));
        let request = QueryRequest::new();
        let expected = ActionResult::Data(json!({"empty": true, "source": null}));
        assert_eq!(
            filter.after_action("index", &request, ActionResult::Empty).unwrap(),
            expected
        );
        assert_eq!(
            filter.after_action("index", &request, json!(null).into()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_match_callback_gates_transformation() {
        let filter = TransformFilter::new(identity_config())
            .with_transformer(TransformerReference::from_fn(|_| Ok(json!("changed"))))
            .with_match_callback(|filter, action_id, _| {
                action_id != "raw" && filter.config().scope == "global"
            });
        let request = QueryRequest::new();
        let result = ActionResult::Data(json!({"id": 1}));

        assert!(!filter.should_transform("raw", &result));
        assert_eq!(
            filter.after_action("raw", &request, result.clone()).unwrap(),
            result
        );
        assert_eq!(
            filter.after_action("view", &request, result).unwrap(),
            ActionResult::Data(json!("changed"))
        );
    }

    #[test]
    fn test_absent_reference_passes_through() {
        let (filter, sink) = filter_with_sink(FilterConfig::default());
        let result = ActionResult::Data(json!({"id": 1}));
        assert_eq!(
            filter.after_action("view", &QueryRequest::new(), result.clone()).unwrap(),
            result
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_explicit_absent_action_disables_wildcard() {
        let (filter, _) = filter_with_sink(identity_config());
        let filter = filter
            .with_action("*", TransformerReference::from_fn(|_| Ok(json!("changed"))))
            .with_action("raw", TransformerReference::Absent);
        let result = ActionResult::Data(json!({"id": 1}));
        assert_eq!(
            filter.after_action("raw", &QueryRequest::new(), result.clone()).unwrap(),
            result
        );
    }

    #[test]
    fn test_collection_envelope() {
        let (filter, _) = filter_with_sink(identity_config());
        let result = filter
            .after_action("index", &QueryRequest::new(), three_posts().into())
            .unwrap();
        assert_eq!(
            result,
            ActionResult::Data(json!({"data": [
                {"id": 1, "title": "x"},
                {"id": 2, "title": "y"},
                {"id": 3, "title": "z"}
            ]}))
        );
    }

    #[test]
    fn test_collection_without_envelope() {
        let config = FilterConfig {
            collection_envelope: None,
            ..identity_config()
        };
        let (filter, _) = filter_with_sink(config);
        let request = QueryRequest::from_query("fields=id");
        let result = filter
            .after_action("index", &request, three_posts().into())
            .unwrap();
        assert_eq!(
            result,
            ActionResult::Data(json!([{"id": 1}, {"id": 2}, {"id": 3}]))
        );
    }

    #[test]
    fn test_collection_meta_envelope() {
        let config = FilterConfig {
            meta_envelope: Some("meta".to_string()),
            ..identity_config()
        };
        let (filter, _) = filter_with_sink(config);
        let provider = DataProvider::new(vec![json!({"id": 1})])
            .with_pagination(Pagination::new(11, 2, 10));
        let result = filter
            .after_action("index", &QueryRequest::new(), provider.into())
            .unwrap();
        assert_eq!(
            result,
            ActionResult::Data(json!({
                "data": [{"id": 1}],
                "meta": {"pagination": {
                    "totalCount": 11,
                    "pageCount": 2,
                    "currentPage": 2,
                    "perPage": 10
                }}
            }))
        );
    }

    #[test]
    fn test_meta_envelope_skipped_without_pagination() {
        let config = FilterConfig {
            meta_envelope: Some("meta".to_string()),
            ..identity_config()
        };
        let (filter, _) = filter_with_sink(config);
        let result = filter
            .after_action("index", &QueryRequest::new(), DataProvider::new(vec![]).into())
            .unwrap();
        assert_eq!(result, ActionResult::Data(json!({"data": []})));
    }

    #[test]
    fn test_single_item_with_shaping_options() {
        let config = FilterConfig {
            fields_param: "only".to_string(),
            ..FilterConfig::default()
        };
        let (filter, _) = filter_with_sink(config);
        let filter = filter.with_action(
            "view",
            ConfigDescriptor::with_class("projection")
                .param("includes", json!({"author": "author"})),
        );
        let request = QueryRequest::from_query("only=id&fields=title&includes=author");
        let item = json!({"id": 7, "title": "t", "author": {"name": "Ann"}});
        let result = filter.after_action("view", &request, item.into()).unwrap();
        assert_eq!(
            result,
            ActionResult::Data(json!({"id": 7, "author": {"name": "Ann"}}))
        );
    }

    #[test]
    fn test_plain_array_is_a_single_item() {
        let (filter, _) = filter_with_sink(identity_config());
        let filter = filter.with_transformer(TransformerReference::from_fn(|item| {
            Ok(json!({"count": item.as_array().map_or(0, |a| a.len())}))
        }));
        let result = filter
            .after_action("index", &QueryRequest::new(), json!([1, 2, 3]).into())
            .unwrap();
        assert_eq!(result, ActionResult::Data(json!({"count": 3})));
    }

    #[test]
    fn test_head_request_yields_empty() {
        let (filter, sink) = filter_with_sink(identity_config());
        let request = QueryRequest::new().head(true);
        let result = filter
            .after_action("index", &request, three_posts().into())
            .unwrap();
        assert_eq!(result, ActionResult::Empty);

        let filter = filter.with_transformer("missing");
        let result = filter
            .after_action("view", &request, json!({"id": 1}).into())
            .unwrap();
        assert_eq!(result, ActionResult::Empty);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_head_request_skips_rendering() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let filter = TransformFilter::new(FilterConfig::default()).with_transformer(
            TransformerReference::from_fn(move |item| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(item.clone())
            }),
        );
        let request = QueryRequest::new().head(true);
        filter
            .after_action("view", &request, json!({"id": 1}).into())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unresolvable_reference_passes_through_with_one_diagnostic() {
        let (filter, sink) = filter_with_sink(FilterConfig::default());
        let filter = filter.with_transformer("missing");
        let result = ActionResult::Data(json!({"id": 1, "title": "t"}));
        assert_eq!(
            filter.after_action("view", &QueryRequest::new(), result.clone()).unwrap(),
            result
        );
        assert_eq!(sink.len(), 1);
        assert!(sink.messages()[0].contains("missing"));
    }

    #[test]
    fn test_invalid_descriptor_passes_through_with_one_diagnostic() {
        let (filter, sink) = filter_with_sink(FilterConfig::default());
        let filter = filter.with_transformer(ConfigDescriptor::new().param("attributes", json!(["id"])));
        let provider: ActionResult = three_posts().into();
        assert_eq!(
            filter.after_action("index", &QueryRequest::new(), provider.clone()).unwrap(),
            provider
        );
        assert_eq!(sink.len(), 1);
        assert!(sink.messages()[0].contains(r#"{"attributes":["id"]}"#));
    }

    #[test]
    fn test_construction_failure_passes_through_with_one_diagnostic() {
        let (filter, sink) = filter_with_sink(FilterConfig::default());
        let filter = filter.with_transformer(
            ConfigDescriptor::with_class("projection").param("attributes", "id"),
        );
        let result = ActionResult::Data(json!({"id": 1}));
        assert_eq!(
            filter.after_action("view", &QueryRequest::new(), result.clone()).unwrap(),
            result
        );
        assert_eq!(sink.len(), 1);
        assert!(sink.messages()[0].starts_with(INVALID_CONFIGURATION));
        assert!(sink.messages()[0].contains("projection"));
    }

    #[test]
    fn test_diagnostic_per_invocation() {
        let (filter, sink) = filter_with_sink(FilterConfig::default());
        let filter = filter.with_transformer("missing");
        for _ in 0..3 {
            filter
                .after_action("view", &QueryRequest::new(), json!({"id": 1}).into())
                .unwrap();
        }
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_scope_is_used_for_resolution() {
        let mut registry = TransformerRegistry::new();
        registry.register_scoped("blog", "shout", |_: &Map<String, Value>| {
            Ok(Arc::new(crate::transforms::FnTransformer::new(|item| {
                Ok(Value::String(item.as_str().unwrap_or_default().to_uppercase()))
            })) as Arc<dyn Transformer>)
        });
        let config = FilterConfig {
            transformer: TransformerReference::from("shout"),
            scope: "blog".to_string(),
            ..FilterConfig::default()
        };
        let filter = TransformFilter::new(config).with_constructor(Arc::new(registry));
        let result = filter
            .after_action("view", &QueryRequest::new(), json!("hi").into())
            .unwrap();
        assert_eq!(result, ActionResult::Data(json!("HI")));
    }

    #[test]
    fn test_rendering_errors_propagate() {
        let filter = TransformFilter::new(FilterConfig::default())
            .with_transformer(TransformerReference::from_fn(|_| {
                Err(Error::TransformError {
                    target: "item".to_string(),
                    cause: "broken".to_string(),
                })
            }));
        let result = filter.after_action("view", &QueryRequest::new(), json!({"id": 1}).into());
        assert!(matches!(result, Err(Error::TransformError { .. })));
    }

    #[test]
    fn test_render_target() {
        let filter = TransformFilter::new(FilterConfig::default());
        let item = ActionResult::Data(json!({"id": 1}));
        assert_eq!(
            filter.render_target(&item),
            RenderTarget::SingleItem(&json!({"id": 1}))
        );
        let provider = ActionResult::Provider(DataProvider::new(vec![json!(1)]));
        assert_eq!(
            filter.render_target(&provider),
            RenderTarget::Collection(&[json!(1)], Some("data"))
        );
        let null = Value::Null;
        assert_eq!(
            filter.render_target(&ActionResult::Empty),
            RenderTarget::SingleItem(&null)
        );
    }
}
