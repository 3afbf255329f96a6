//! Action results as produced by controllers and returned by the filter.

use serde::Serialize;
use serde_json::Value;

/// Pagination details carried by a data provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_count: u64,
    pub page_count: u64,
    pub current_page: u64,
    pub per_page: u64,
}

impl Pagination {
    /// Computes the page count from the total number of models and the page size.
    ///
    /// # Examples
    ///
    /// ```
    /// use transform_filter::result::Pagination;
    ///
    /// let pagination = Pagination::new(25, 1, 10);
    /// assert_eq!(pagination.page_count, 3);
    /// ```
    pub fn new(total_count: u64, current_page: u64, per_page: u64) -> Self {
        let page_count = if per_page == 0 {
            0
        } else {
            total_count.div_ceil(per_page)
        };
        Self {
            total_count,
            page_count,
            current_page,
            per_page,
        }
    }
}

/// A provider of multiple underlying models (usually one page of a query)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataProvider {
    models: Vec<Value>,
    pagination: Option<Pagination>,
}

impl DataProvider {
    pub fn new(models: Vec<Value>) -> Self {
        Self {
            models,
            pagination: None,
        }
    }

    /// Builds the provider holding one page of the models.
    ///
    /// Pages start at 1. Without a page size every model is kept and no
    /// pagination details are attached.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use transform_filter::result::DataProvider;
    ///
    /// let provider = DataProvider::paginate(vec![json!(1), json!(2), json!(3)], 2, Some(2));
    /// assert_eq!(provider.models(), &[json!(3)]);
    /// assert_eq!(provider.pagination().map(|p| p.page_count), Some(2));
    /// ```
    pub fn paginate(models: Vec<Value>, page: u64, per_page: Option<u64>) -> Self {
        let Some(per_page) = per_page else {
            return Self::new(models);
        };
        let pagination = Pagination::new(models.len() as u64, page, per_page);
        let skip = usize::try_from(page.saturating_sub(1).saturating_mul(per_page))
            .unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        Self::new(models.into_iter().skip(skip).take(take).collect()).with_pagination(pagination)
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn models(&self) -> &[Value] {
        &self.models
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }
}

/// The value returned by an action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// A plain value, rendered as a single item
    Data(Value),
    /// A paginated provider, rendered as a collection
    Provider(DataProvider),
    /// No body at all
    Empty,
}

impl ActionResult {
    /// Checks whether the result counts as empty.
    ///
    /// `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are empty values.
    /// A provider is never empty, even without models.
    pub fn is_empty(&self) -> bool {
        match self {
            ActionResult::Empty => true,
            ActionResult::Provider(_) => false,
            ActionResult::Data(value) => match value {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
                Value::String(s) => s.is_empty() || s == "0",
                Value::Array(arr) => arr.is_empty(),
                Value::Object(obj) => obj.is_empty(),
            },
        }
    }

    /// Consumes the result returning the JSON payload to send (`None` when there's no body)
    pub fn into_payload(self) -> Option<Value> {
        match self {
            ActionResult::Data(value) => Some(value),
            ActionResult::Provider(provider) => Some(Value::Array(provider.models)),
            ActionResult::Empty => None,
        }
    }
}

impl From<Value> for ActionResult {
    fn from(value: Value) -> Self {
        ActionResult::Data(value)
    }
}

impl From<DataProvider> for ActionResult {
    fn from(provider: DataProvider) -> Self {
        ActionResult::Provider(provider)
    }
}
