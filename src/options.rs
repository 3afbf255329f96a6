use crate::request::Request;
use crate::string_utils::split_tokens;

/// Field selection and include/exclude instructions for a single rendering.
///
/// Empty lists mean no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapingOptions {
    pub fields: Vec<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

impl ShapingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the options reading each of the given query parameters from the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use transform_filter::options::ShapingOptions;
    /// use transform_filter::request::QueryRequest;
    ///
    /// let request = QueryRequest::from([("fields", " id, title "), ("expand", "author")]);
    /// let options = ShapingOptions::from_request(&request, "fields", "expand", "excludes");
    /// assert_eq!(options.fields, vec!["id", "title"]);
    /// assert_eq!(options.includes, vec!["author"]);
    /// assert!(options.excludes.is_empty());
    /// ```
    pub fn from_request(
        request: &dyn Request,
        fields_param: &str,
        includes_param: &str,
        excludes_param: &str,
    ) -> Self {
        Self {
            fields: split_tokens(request.get(fields_param)),
            includes: split_tokens(request.get(includes_param)),
            excludes: split_tokens(request.get(excludes_param)),
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    pub fn excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.fields.is_empty() && self.includes.is_empty() && self.excludes.is_empty()
    }
}
