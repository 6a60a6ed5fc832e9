//! Declared schemas for structured record values.
//!
//! The serialized form follows the common connector JSON layout:
//!
//! ```json
//! {"type": "struct", "optional": false, "fields": [
//!     {"field": "id", "type": "string"},
//!     {"field": "tags", "type": "array", "items": {"type": "string"}}
//! ]}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared type, with optionality and optional name/doc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(flatten)]
    pub kind: SchemaKind,

    #[serde(default)]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaKind {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Array { items: Box<Schema> },
    Map { keys: Box<Schema>, values: Box<Schema> },
    Struct { fields: Vec<Field> },
}

/// A named field of a struct schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "field")]
    pub name: String,

    #[serde(flatten)]
    pub schema: Schema,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl SchemaKind {
    /// Lowercase type name as it appears in serialized schemas.
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int8 => "int8",
            SchemaKind::Int16 => "int16",
            SchemaKind::Int32 => "int32",
            SchemaKind::Int64 => "int64",
            SchemaKind::Float32 => "float32",
            SchemaKind::Float64 => "float64",
            SchemaKind::String => "string",
            SchemaKind::Bytes => "bytes",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Map { .. } => "map",
            SchemaKind::Struct { .. } => "struct",
        }
    }

    /// Inclusive value range for integer kinds.
    pub(crate) fn int_range(&self) -> Option<(i64, i64)> {
        match self {
            SchemaKind::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            SchemaKind::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            SchemaKind::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            SchemaKind::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    pub(crate) fn is_float(&self) -> bool {
        matches!(self, SchemaKind::Float32 | SchemaKind::Float64)
    }
}

impl Schema {
    fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            optional: false,
            name: None,
            doc: None,
        }
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn int8() -> Self {
        Self::of(SchemaKind::Int8)
    }

    pub fn int16() -> Self {
        Self::of(SchemaKind::Int16)
    }

    pub fn int32() -> Self {
        Self::of(SchemaKind::Int32)
    }

    pub fn int64() -> Self {
        Self::of(SchemaKind::Int64)
    }

    pub fn float32() -> Self {
        Self::of(SchemaKind::Float32)
    }

    pub fn float64() -> Self {
        Self::of(SchemaKind::Float64)
    }

    pub fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    pub fn bytes() -> Self {
        Self::of(SchemaKind::Bytes)
    }

    pub fn array(items: Schema) -> Self {
        Self::of(SchemaKind::Array {
            items: Box::new(items),
        })
    }

    pub fn map(keys: Schema, values: Schema) -> Self {
        Self::of(SchemaKind::Map {
            keys: Box::new(keys),
            values: Box::new(values),
        })
    }

    pub fn structure(fields: Vec<Field>) -> Self {
        Self::of(SchemaKind::Struct { fields })
    }

    /// Mark the schema optional (accepts null).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Fields of a struct schema, `None` for every other kind.
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            SchemaKind::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}({})", self.kind.type_name(), name),
            None => write!(f, "{}", self.kind.type_name()),
        }
    }
}
