//! Schema-bound values.

use crate::error::SchemaError;
use crate::schema::types::{Field, Schema, SchemaKind};
use crate::value::NestedValue;

/// A value stored in a [`Struct`] field.
///
/// All integer widths share `Int` and all float widths share `Float`; the
/// declared schema bounds them when the datum is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Datum>),
    Map(Vec<(Datum, Datum)>),
    Struct(Struct),
}

impl Datum {
    fn type_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "boolean",
            Datum::Int(_) => "integer",
            Datum::Float(_) => "float",
            Datum::String(_) => "string",
            Datum::Bytes(_) => "bytes",
            Datum::Array(_) => "array",
            Datum::Map(_) => "map",
            Datum::Struct(_) => "struct",
        }
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Datum::Int(i)
    }
}

impl From<i32> for Datum {
    fn from(i: i32) -> Self {
        Datum::Int(i as i64)
    }
}

impl From<f64> for Datum {
    fn from(f: f64) -> Self {
        Datum::Float(f)
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Bool(b)
    }
}

impl From<Struct> for Datum {
    fn from(s: Struct) -> Self {
        Datum::Struct(s)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(items: Vec<Datum>) -> Self {
        Datum::Array(items)
    }
}

/// A value bound to a struct schema.
///
/// Field values are checked against the declared field types when stored.
/// Unset fields read as [`Datum::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    schema: Schema,
    values: Vec<Datum>,
}

impl Struct {
    /// Create an empty struct for `schema`, which must be a struct schema.
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        let width = schema
            .fields()
            .ok_or_else(|| SchemaError::NotAStruct(schema.to_string()))?
            .len();

        Ok(Self {
            schema,
            values: vec![Datum::Null; width],
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Store `value` in the field called `name`.
    ///
    /// # Example
    ///
    /// ```
    /// use nestkey::schema::{Field, Schema, Struct};
    ///
    /// let schema = Schema::structure(vec![Field::new("id", Schema::string())]);
    /// let value = Struct::new(schema).unwrap().put("id", "abc").unwrap();
    /// assert!(value.validate().is_ok());
    /// ```
    pub fn put(mut self, name: &str, value: impl Into<Datum>) -> Result<Self, SchemaError> {
        let value = value.into();
        let index = self.index_of(name)?;
        let field_schema = &self.fields()[index].schema;
        check(name, field_schema, &value)?;
        self.values[index] = value;
        Ok(self)
    }

    /// Value of the field called `name`, `None` if the schema has no such field.
    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.index_of(name).ok().map(|i| &self.values[i])
    }

    /// Declared fields paired with their values, in schema order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.fields()
            .iter()
            .zip(self.values.iter())
            .map(|(field, value)| (field.name.as_str(), value))
    }

    /// Check that every required field has a value.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (field, value) in self.fields().iter().zip(self.values.iter()) {
            if matches!(value, Datum::Null) && !field.schema.optional {
                return Err(SchemaError::MissingRequired(field.name.clone()));
            }
            if let Datum::Struct(inner) = value {
                inner.validate()?;
            }
        }
        Ok(())
    }

    /// Bind a generic map value to `schema`.
    ///
    /// Declared fields are read by name; undeclared keys are ignored. Integer
    /// values are accepted for float fields, and lists of octets for bytes.
    pub fn from_nested(schema: Schema, value: &NestedValue) -> Result<Self, SchemaError> {
        let map = value.as_map().ok_or_else(|| SchemaError::TypeMismatch {
            field: schema.name.clone().unwrap_or_else(|| "<root>".to_string()),
            expected: "struct".to_string(),
            actual: value.type_name().to_string(),
        })?;

        let mut result = Struct::new(schema)?;
        for i in 0..result.values.len() {
            let field = &result.schema.fields().unwrap_or_default()[i];
            let datum = match map.get(&field.name) {
                Some(v) => datum_from_nested(&field.name, &field.schema, v)?,
                None => Datum::Null,
            };
            result.values[i] = datum;
        }

        result.validate()?;
        Ok(result)
    }

    fn fields(&self) -> &[Field] {
        self.schema.fields().unwrap_or_default()
    }

    fn index_of(&self, name: &str) -> Result<usize, SchemaError> {
        self.fields()
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }
}

fn mismatch(field: &str, schema: &Schema, actual: &str) -> SchemaError {
    SchemaError::TypeMismatch {
        field: field.to_string(),
        expected: schema.to_string(),
        actual: actual.to_string(),
    }
}

/// Check `value` against `schema`, recursing into containers.
fn check(field: &str, schema: &Schema, value: &Datum) -> Result<(), SchemaError> {
    match (&schema.kind, value) {
        (_, Datum::Null) if schema.optional => Ok(()),
        (_, Datum::Null) => Err(SchemaError::MissingRequired(field.to_string())),
        (SchemaKind::Boolean, Datum::Bool(_)) => Ok(()),
        (kind, Datum::Int(i)) if kind.int_range().is_some() => {
            let (min, max) = kind.int_range().unwrap_or((i64::MIN, i64::MAX));
            if (min..=max).contains(i) {
                Ok(())
            } else {
                Err(mismatch(field, schema, &format!("integer {} out of range", i)))
            }
        }
        (kind, Datum::Float(_)) if kind.is_float() => Ok(()),
        (SchemaKind::String, Datum::String(_)) => Ok(()),
        (SchemaKind::Bytes, Datum::Bytes(_)) => Ok(()),
        (SchemaKind::Array { items }, Datum::Array(values)) => values
            .iter()
            .enumerate()
            .try_for_each(|(i, v)| check(&format!("{}[{}]", field, i), items, v)),
        (SchemaKind::Map { keys, values }, Datum::Map(entries)) => {
            entries.iter().try_for_each(|(k, v)| {
                check(&format!("{} key", field), keys, k)?;
                check(&format!("{} value", field), values, v)
            })
        }
        (SchemaKind::Struct { .. }, Datum::Struct(inner)) => {
            if inner.schema.kind == schema.kind {
                Ok(())
            } else {
                Err(mismatch(field, schema, &inner.schema.to_string()))
            }
        }
        (_, other) => Err(mismatch(field, schema, other.type_name())),
    }
}

fn datum_from_nested(
    field: &str,
    schema: &Schema,
    value: &NestedValue,
) -> Result<Datum, SchemaError> {
    let datum = match (&schema.kind, value) {
        (_, NestedValue::Null) => Datum::Null,
        (SchemaKind::Boolean, NestedValue::Bool(b)) => Datum::Bool(*b),
        (kind, NestedValue::Int(i)) if kind.int_range().is_some() => Datum::Int(*i),
        (kind, NestedValue::Float(f)) if kind.is_float() => Datum::Float(*f),
        (kind, NestedValue::Int(i)) if kind.is_float() => Datum::Float(*i as f64),
        (SchemaKind::String, NestedValue::String(s)) => Datum::String(s.clone()),
        (SchemaKind::Bytes, NestedValue::Bytes(b)) => Datum::Bytes(b.clone()),
        (SchemaKind::Bytes, NestedValue::List(items)) => Datum::Bytes(
            items
                .iter()
                .map(|item| match item {
                    NestedValue::Int(i) => u8::try_from(*i).ok(),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| mismatch(field, schema, "list with non-octet items"))?,
        ),
        (SchemaKind::Array { items }, NestedValue::List(values)) => Datum::Array(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| datum_from_nested(&format!("{}[{}]", field, i), items, v))
                .collect::<Result<_, _>>()?,
        ),
        (SchemaKind::Map { keys, values }, NestedValue::Map(entries)) => Datum::Map(
            entries
                .iter()
                .map(|(k, v)| {
                    let key =
                        datum_from_nested(&format!("{} key", field), keys, &map_key(k, keys))?;
                    let value = datum_from_nested(&format!("{}.{}", field, k), values, v)?;
                    Ok((key, value))
                })
                .collect::<Result<_, SchemaError>>()?,
        ),
        (SchemaKind::Struct { .. }, NestedValue::Map(_)) => {
            Datum::Struct(Struct::from_nested(schema.clone(), value)?)
        }
        (_, other) => return Err(mismatch(field, schema, other.type_name())),
    };

    check(field, schema, &datum)?;
    Ok(datum)
}

/// Object keys are always strings; read them back as the declared key kind.
fn map_key(key: &str, schema: &Schema) -> NestedValue {
    let parsed = match &schema.kind {
        kind if kind.int_range().is_some() => key.parse().ok().map(NestedValue::Int),
        kind if kind.is_float() => key.parse().ok().map(NestedValue::Float),
        SchemaKind::Boolean => key.parse().ok().map(NestedValue::Bool),
        _ => None,
    };
    parsed.unwrap_or_else(|| NestedValue::String(key.to_string()))
}
