//! Configurable transformer picking and renaming attributes of object items.
//!
//! ```text
//! item ──▶ pick `attributes` ──▶ apply `rename` ──▶ base representation
//!   │
//!   └──▶ include "author" ──▶ value at `includes.author` (dotted path)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::Transformer;
use crate::error::{ConfigType, Error, Result};

/// Construction parameters accepted by the `projection` class
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionParams {
    /// Attributes kept from the item (all of them when empty).
    pub attributes: Vec<String>,

    /// Attribute renaming map (`old_name` -> `new_name`), applied all at once.
    /// A renamed attribute replaces any attribute already holding its new name.
    pub rename: BTreeMap<String, String>,

    /// Available includes (`include_name` -> dotted source path in the item).
    pub includes: BTreeMap<String, String>,

    /// Includes embedded unless excluded.
    #[serde(alias = "defaultIncludes")]
    pub default_includes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectionTransformer {
    params: ProjectionParams,
}

impl ProjectionTransformer {
    /// Creates the transformer checking that every default include is available
    /// and that no two attributes are renamed to the same name
    pub fn new(params: ProjectionParams) -> Result<Self> {
        let duplicate = {
            let mut targets = BTreeSet::new();
            params
                .rename
                .values()
                .find(|new_name| !targets.insert(new_name.as_str()))
                .cloned()
        };
        if let Some(duplicate) = duplicate {
            return Err(Error::ConstructionError {
                class: crate::constants::transformers::PROJECTION.to_string(),
                cause: format!("several attributes are renamed to \"{}\"", duplicate),
            });
        }

        if let Some(unknown) = params
            .default_includes
            .iter()
            .find(|name| !params.includes.contains_key(name.as_str()))
        {
            return Err(Error::ConstructionError {
                class: crate::constants::transformers::PROJECTION.to_string(),
                cause: format!("default include \"{}\" is not an available include", unknown),
            });
        }
        Ok(Self { params })
    }

    /// Creates the transformer from the raw descriptor parameters
    pub fn from_params(params: &Map<String, Value>) -> Result<Self> {
        let params: ProjectionParams = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| Error::ConstructionError {
                class: crate::constants::transformers::PROJECTION.to_string(),
                cause: format!("{} are invalid: {}", ConfigType::TRANSFORMER, e),
            })?;
        Self::new(params)
    }

    fn pick(&self, object: &Map<String, Value>) -> Map<String, Value> {
        if self.params.attributes.is_empty() {
            return object.clone();
        }
        self.params
            .attributes
            .iter()
            .filter_map(|name| object.get(name).map(|v| (name.clone(), v.clone())))
            .collect()
    }

    fn rename(&self, object: Map<String, Value>) -> Map<String, Value> {
        if self.params.rename.is_empty() {
            return object;
        }
        let mut renamed = Vec::new();
        let mut output = Map::new();
        for (name, value) in object {
            match self.params.rename.get(&name) {
                Some(new_name) => renamed.push((new_name.clone(), value)),
                None => {
                    output.insert(name, value);
                }
            }
        }
        output.extend(renamed);
        output
    }
}

impl Transformer for ProjectionTransformer {
    fn transform(&self, item: &Value) -> Result<Value> {
        match item {
            Value::Object(object) => Ok(Value::Object(self.rename(self.pick(object)))),
            other => Ok(other.clone()),
        }
    }

    fn available_includes(&self) -> Vec<String> {
        self.params.includes.keys().cloned().collect()
    }

    fn default_includes(&self) -> Vec<String> {
        self.params.default_includes.clone()
    }

    fn include(&self, name: &str, item: &Value) -> Result<Option<Value>> {
        Ok(self
            .params
            .includes
            .get(name)
            .and_then(|path| lookup_path(item, path))
            .cloned())
    }
}

/// Resolves a dot separated path (`"author.profile"`) against a value
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        })
}
