//! `transform_filter` reshapes the results of controller actions through transformers.
//!
//! The main struct of this crate is `filter::TransformFilter`: it picks the
//! transformer configured for an action, resolves it (see `resolver`) and
//! renders the action result honoring the `fields`, `includes` and `excludes`
//! query parameters of the request.
//!
//! "Hello world" example:
//! ```
//! use serde_json::json;
//! use transform_filter::prelude::*;
//!
//! let config = FilterConfig::from_toml(
//!     r#"
//!     [actions]
//!     view = { class = "projection", attributes = ["id", "title"] }
//!     "#,
//!     "inline",
//! )
//! .unwrap();
//!
//! let filter = TransformFilter::new(config);
//! let request = QueryRequest::from_query("fields=title");
//! let result = filter
//!     .after_action("view", &request, json!({"id": 1, "title": "Hello", "secret": "x"}).into())
//!     .unwrap();
//!
//! assert_eq!(result, ActionResult::Data(json!({"title": "Hello"})));
//! ```

pub mod actions;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod log;
pub mod options;
pub mod reference;
pub mod request;
pub mod resolver;
pub mod result;
pub mod string_utils;
pub mod transforms;

/// The transform_filter prelude
///
/// This module re-exports the most commonly used items from transform_filter.
/// You can use it with `use transform_filter::prelude::*;` to bring all common items into scope.
pub mod prelude {
    // Re-export commonly used traits
    pub use crate::log::DiagnosticSink;
    pub use crate::request::Request;
    pub use crate::transforms::{Constructor, RenderEngine, Transformer};

    // Re-export commonly used types
    pub use crate::config::FilterConfig;
    pub use crate::error::Result;
    pub use crate::filter::TransformFilter;
    pub use crate::options::ShapingOptions;
    pub use crate::reference::{ConfigDescriptor, TransformerReference};
    pub use crate::request::QueryRequest;
    pub use crate::result::{ActionResult, DataProvider, Pagination};
    pub use crate::transforms::TransformerRegistry;

    // Re-export commonly used functions
    pub use crate::string_utils::split_tokens;
}
