//! Transform configuration: option declarations and property values.
//!
//! A transform declares its options in a [`ConfigDef`]; a host hands it a
//! [`TransformConfig`] holding the raw values, which may come from code or
//! from a YAML file:
//!
//! ```yaml
//! transform: NestedValueToKeysAndHeader
//! config:
//!   keyFieldMapping: "id:identifier"
//!   headerFieldMapping:
//!     - "src:source"
//!     - "region:$.geo.region"
//! ```

use crate::error::ConfigurationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A raw option value: a list, or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    List(Vec<String>),
    String(String),
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(items: Vec<String>) -> Self {
        ConfigValue::List(items)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(items: Vec<&str>) -> Self {
        ConfigValue::List(items.into_iter().map(String::from).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    List,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Declaration of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    pub name: &'static str,
    pub kind: ConfigType,
    pub importance: Importance,
    pub documentation: &'static str,
}

/// Ordered set of option declarations for a transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDef {
    keys: Vec<ConfigKey>,
}

impl ConfigDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option.
    pub fn define(
        mut self,
        name: &'static str,
        kind: ConfigType,
        importance: Importance,
        documentation: &'static str,
    ) -> Self {
        self.keys.push(ConfigKey {
            name,
            kind,
            importance,
            documentation,
        });
        self
    }

    pub fn keys(&self) -> &[ConfigKey] {
        &self.keys
    }

    pub fn key(&self, name: &str) -> Option<&ConfigKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Options present in `props` that this definition does not declare.
    pub fn undeclared<'a>(&self, props: &'a TransformConfig) -> Vec<&'a str> {
        props
            .config
            .keys()
            .filter(|name| self.key(name).is_none())
            .map(|name| name.as_str())
            .collect()
    }

    /// Read a declared LIST option.
    ///
    /// Returns `Ok(None)` when the option is absent. String values are split
    /// on commas with surrounding whitespace removed; a blank string is an
    /// empty list.
    pub fn list(
        &self,
        props: &TransformConfig,
        name: &str,
    ) -> Result<Option<Vec<String>>, ConfigurationError> {
        let key = self
            .key(name)
            .ok_or_else(|| ConfigurationError::Undeclared(name.to_string()))?;
        if key.kind != ConfigType::List {
            return Err(ConfigurationError::InvalidValue {
                option: name.to_string(),
                reason: "option is not declared as a list".to_string(),
            });
        }

        let items = match props.get(name) {
            None => return Ok(None),
            Some(ConfigValue::List(items)) => items.iter().map(|s| s.trim().to_string()).collect(),
            Some(ConfigValue::String(s)) => split_list(s),
        };
        Ok(Some(items))
    }
}

fn split_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(',').map(|s| s.trim().to_string()).collect()
}

/// Raw configuration handed to a transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Registered transform name, when loaded from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,

    /// Option name -> value
    #[serde(default)]
    pub config: IndexMap<String, ConfigValue>,
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.insert(name.into(), value.into());
        self
    }

    pub fn for_transform(mut self, name: impl Into<String>) -> Self {
        self.transform = Some(name.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.config.get(name)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(contents)
            .map_err(|e| ConfigurationError::Load(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from a YAML file.
    ///
    /// # Example
    /// ```ignore
    /// use nestkey::config::TransformConfig;
    ///
    /// let config = TransformConfig::load_from_file("config/transform.yaml")?;
    /// println!("Transform: {:?}", config.transform);
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| {
            ConfigurationError::Load(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&contents)
    }
}
