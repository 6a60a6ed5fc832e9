//! Generic nested value tree used for path evaluation.
//!
//! Schemaless record values arrive in this shape directly; schema-bound values
//! are converted into it by [`crate::schema::to_nested_value`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically-typed value: scalars, ordered lists, and string-keyed maps.
///
/// Map entries keep insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NestedValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<NestedValue>),
    Map(IndexMap<String, NestedValue>),
    /// Raw bytes. Only produced from `bytes` schema fields; serializes as a list of octets.
    Bytes(Vec<u8>),
}

impl NestedValue {
    /// One-level lookup of `key` in a map value.
    ///
    /// The key is used verbatim; no path syntax is interpreted.
    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        match self {
            NestedValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, NestedValue>> {
        match self {
            NestedValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NestedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            NestedValue::Null => "null",
            NestedValue::Bool(_) => "boolean",
            NestedValue::Int(_) => "integer",
            NestedValue::Float(_) => "float",
            NestedValue::String(_) => "string",
            NestedValue::List(_) => "list",
            NestedValue::Map(_) => "map",
            NestedValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for NestedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NestedValue::Null => write!(f, "null"),
            NestedValue::Bool(b) => write!(f, "{}", b),
            NestedValue::Int(i) => write!(f, "{}", i),
            NestedValue::Float(fl) => write!(f, "{}", fl),
            NestedValue::String(s) => write!(f, "{}", s),
            NestedValue::Bytes(b) => write!(f, "{:?}", b),
            NestedValue::List(_) | NestedValue::Map(_) => {
                write!(f, "{}", serde_json::Value::from(self.clone()))
            }
        }
    }
}

impl From<serde_json::Value> for NestedValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => NestedValue::Null,
            serde_json::Value::Bool(b) => NestedValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    NestedValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    NestedValue::Float(f)
                } else {
                    NestedValue::Null
                }
            }
            serde_json::Value::String(s) => NestedValue::String(s),
            serde_json::Value::Array(arr) => {
                NestedValue::List(arr.into_iter().map(NestedValue::from).collect())
            }
            serde_json::Value::Object(obj) => NestedValue::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, NestedValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<NestedValue> for serde_json::Value {
    fn from(value: NestedValue) -> Self {
        match value {
            NestedValue::Null => serde_json::Value::Null,
            NestedValue::Bool(b) => serde_json::Value::Bool(b),
            NestedValue::Int(i) => serde_json::Value::from(i),
            // Non-finite floats have no JSON form
            NestedValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            NestedValue::String(s) => serde_json::Value::String(s),
            NestedValue::Bytes(b) => {
                serde_json::Value::Array(b.into_iter().map(serde_json::Value::from).collect())
            }
            NestedValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            NestedValue::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for NestedValue {
    fn from(s: &str) -> Self {
        NestedValue::String(s.to_string())
    }
}

impl From<String> for NestedValue {
    fn from(s: String) -> Self {
        NestedValue::String(s)
    }
}

impl From<i64> for NestedValue {
    fn from(i: i64) -> Self {
        NestedValue::Int(i)
    }
}

impl From<bool> for NestedValue {
    fn from(b: bool) -> Self {
        NestedValue::Bool(b)
    }
}

impl From<IndexMap<String, NestedValue>> for NestedValue {
    fn from(map: IndexMap<String, NestedValue>) -> Self {
        NestedValue::Map(map)
    }
}
