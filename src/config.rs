use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::actions::ActionTransformerMap;
use crate::constants::filter::{DEFAULT_COLLECTION_ENVELOPE, DEFAULT_SCOPE};
use crate::constants::params;
use crate::error::*;
use crate::reference::TransformerReference;

/// Declarative part of the transform filter configuration.
///
/// Keys are accepted both in snake case and in their camel case form
/// (`fieldsParam`, `collectionEnvelope`, ...).
///
/// ```toml
/// transformer = "identity"
/// collection_envelope = "items"
///
/// [actions]
/// view = { class = "projection", attributes = ["id", "title"] }
/// "*" = "identity"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Transformer used when no action entry matches
    pub transformer: TransformerReference,
    pub actions: ActionTransformerMap,
    #[serde(alias = "fieldsParam")]
    pub fields_param: String,
    #[serde(alias = "includesParam")]
    pub includes_param: String,
    #[serde(alias = "excludesParam")]
    pub excludes_param: String,
    /// Key wrapping rendered collections, `None` returns the bare list
    #[serde(alias = "collectionEnvelope", deserialize_with = "deserialize_envelope")]
    pub collection_envelope: Option<String>,
    /// Key receiving the pagination details of providers, `None` omits them
    #[serde(alias = "metaEnvelope", deserialize_with = "deserialize_envelope")]
    pub meta_envelope: Option<String>,
    pub scope: String,
    #[serde(alias = "transformEmpty")]
    pub transform_empty: bool,
}

impl Default for FilterConfig {
    fn default() -> FilterConfig {
        FilterConfig {
            transformer: TransformerReference::Absent,
            actions: ActionTransformerMap::new(),
            fields_param: params::FIELDS.to_string(),
            includes_param: params::INCLUDES.to_string(),
            excludes_param: params::EXCLUDES.to_string(),
            collection_envelope: Some(DEFAULT_COLLECTION_ENVELOPE.to_string()),
            meta_envelope: None,
            scope: DEFAULT_SCOPE.to_string(),
            transform_empty: false,
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the configuration from TOML contents.
    ///
    /// # Arguments
    /// * `data` - The TOML contents
    /// * `file` - Name of the source used in error messages
    pub fn from_toml(data: &str, file: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e: toml::de::Error| Error::SerdeTomlError {
            location: ConfigType::FILTER,
            file: file.to_string(),
            cause: e.to_string(),
        })
    }

    /// Reads and parses the configuration file
    pub fn load(file_path: &Path) -> Result<Self> {
        let file_name = file_path.to_string_lossy().to_string();
        let data = parse(file_path).map_err(|e| match e {
            Error::Io(io) => Error::ConfigReadError {
                file: file_name.clone(),
                cause: io.to_string(),
            },
            other => other,
        })?;
        Self::from_toml(&data, &file_name)
    }
}

pub fn parse(file_path: &Path) -> Result<String> {
    let mut config_content = String::new();
    File::open(file_path)?.read_to_string(&mut config_content)?;
    Ok(config_content)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Key(String),
    Enabled(bool),
}

/// Accepts a key, `false` (disabled), `true` (default key) or `null` (disabled)
fn deserialize_envelope<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Envelope>::deserialize(deserializer)? {
        Some(Envelope::Key(key)) if !key.is_empty() => Some(key),
        Some(Envelope::Enabled(true)) => Some(DEFAULT_COLLECTION_ENVELOPE.to_string()),
        _ => None,
    })
}
