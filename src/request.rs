//! Access to the inbound request as seen by the transform filter.
//!
//! The filter only needs two things from a request: the value of a named
//! query parameter and whether the response should carry a body at all.

use std::collections::HashMap;

/// Read-only view of the current request
pub trait Request {
    /// Returns the value of the given query parameter (if present)
    fn get(&self, name: &str) -> Option<&str>;

    /// Whether the request asks for headers only (no body must be produced)
    fn is_head(&self) -> bool;
}

/// Request backed by a decoded URL query string.
///
/// # Examples
///
/// ```
/// use transform_filter::request::{QueryRequest, Request};
///
/// let request = QueryRequest::from_query("fields=id%2Ctitle&includes=author");
/// assert_eq!(request.get("fields"), Some("id,title"));
/// assert_eq!(request.get("excludes"), None);
/// assert!(!request.is_head());
/// ```
#[derive(Debug, Default, Clone)]
pub struct QueryRequest {
    params: HashMap<String, String>,
    head: bool,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    /// A leading `?` is ignored and the first occurrence of a repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self {
            params,
            head: false,
        }
    }

    pub fn from<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            head: false,
        }
    }

    /// Marks the request as a HEAD request
    pub fn head(mut self, head: bool) -> Self {
        self.head = head;
        self
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.params.insert(key.into(), value.into());
    }
}

impl Request for QueryRequest {
    fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    fn is_head(&self) -> bool {
        self.head
    }
}
