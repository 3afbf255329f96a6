//! References to transformers as found in the filter configuration.
//!
//! A reference is either already invokable, the name of a registered
//! transformer class, a configuration descriptor naming the class together
//! with its construction parameters, or nothing at all.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::constants::descriptor::CLASS_KEY;
use crate::error::Result;
use crate::transforms::{FnTransformer, Transformer};

/// A mapping holding a `class` key plus arbitrary construction parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDescriptor(Map<String, Value>);

impl ConfigDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a descriptor for the given class without parameters
    pub fn with_class<S: Into<String>>(class: S) -> Self {
        let mut map = Map::new();
        map.insert(CLASS_KEY.to_string(), Value::String(class.into()));
        Self(map)
    }

    /// Adds a construction parameter
    pub fn param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the class name when present as a non-empty string
    pub fn class(&self) -> Option<&str> {
        self.0
            .get(CLASS_KEY)
            .and_then(Value::as_str)
            .filter(|class| !class.trim().is_empty())
    }

    /// Returns the construction parameters (every entry except `class`)
    pub fn params(&self) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != CLASS_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ConfigDescriptor {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for ConfigDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("{}"),
        }
    }
}

/// How a transformer is designated
#[derive(Clone, Default)]
pub enum TransformerReference {
    /// An already invokable transformer
    Callable(Arc<dyn Transformer>),
    /// Name of a registered transformer class
    ClassIdentifier(String),
    /// Class name plus construction parameters
    ConfigDescriptor(ConfigDescriptor),
    /// No transformer configured
    #[default]
    Absent,
}

impl TransformerReference {
    /// Wraps a transformer instance
    pub fn callable<T: Transformer + 'static>(transformer: T) -> Self {
        TransformerReference::Callable(Arc::new(transformer))
    }

    /// Wraps a closure as a transformer
    ///
    /// # Examples
    ///
    /// ```
    /// use transform_filter::reference::TransformerReference;
    ///
    /// let reference = TransformerReference::from_fn(|item| Ok(item.clone()));
    /// assert_eq!(reference.to_string(), "<callable>");
    /// ```
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::callable(FnTransformer::new(func))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TransformerReference::Absent)
    }
}

/// String form used in diagnostics
impl fmt::Display for TransformerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformerReference::Callable(_) => f.write_str("<callable>"),
            TransformerReference::ClassIdentifier(class) => f.write_str(class),
            TransformerReference::ConfigDescriptor(descriptor) => write!(f, "{}", descriptor),
            TransformerReference::Absent => f.write_str("null"),
        }
    }
}

impl fmt::Debug for TransformerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformerReference::Callable(_) => f.write_str("Callable(..)"),
            TransformerReference::ClassIdentifier(class) => {
                f.debug_tuple("ClassIdentifier").field(class).finish()
            }
            TransformerReference::ConfigDescriptor(descriptor) => {
                f.debug_tuple("ConfigDescriptor").field(descriptor).finish()
            }
            TransformerReference::Absent => f.write_str("Absent"),
        }
    }
}

impl PartialEq for TransformerReference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TransformerReference::Callable(a), TransformerReference::Callable(b)) => {
                std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            }
            (TransformerReference::ClassIdentifier(a), TransformerReference::ClassIdentifier(b)) => {
                a == b
            }
            (
                TransformerReference::ConfigDescriptor(a),
                TransformerReference::ConfigDescriptor(b),
            ) => a == b,
            (TransformerReference::Absent, TransformerReference::Absent) => true,
            _ => false,
        }
    }
}

impl From<&str> for TransformerReference {
    fn from(class: &str) -> Self {
        TransformerReference::ClassIdentifier(class.to_string())
    }
}

impl From<String> for TransformerReference {
    fn from(class: String) -> Self {
        TransformerReference::ClassIdentifier(class)
    }
}

impl From<ConfigDescriptor> for TransformerReference {
    fn from(descriptor: ConfigDescriptor) -> Self {
        TransformerReference::ConfigDescriptor(descriptor)
    }
}

impl From<Arc<dyn Transformer>> for TransformerReference {
    fn from(transformer: Arc<dyn Transformer>) -> Self {
        TransformerReference::Callable(transformer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Class(String),
    Config(Map<String, Value>),
}

/// Strings become class identifiers, tables become descriptors and `null` is absent
impl<'de> Deserialize<'de> for TransformerReference {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawReference>::deserialize(deserializer)? {
            Some(RawReference::Class(class)) => TransformerReference::ClassIdentifier(class),
            Some(RawReference::Config(map)) => {
                TransformerReference::ConfigDescriptor(ConfigDescriptor(map))
            }
            None => TransformerReference::Absent,
        })
    }
}
