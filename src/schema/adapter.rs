//! Conversion of schema-bound values into generic nested values.

use crate::schema::datum::{Datum, Struct};
use crate::value::NestedValue;
use indexmap::IndexMap;

/// Convert a [`Struct`] into a [`NestedValue::Map`].
///
/// Fields are walked in schema order. Integer and float widths collapse to
/// `Int`/`Float`, nested structs become maps, arrays become lists and map
/// keys are rendered as strings. Unset optional fields become `Null`.
pub fn to_nested_value(value: &Struct) -> NestedValue {
    NestedValue::Map(
        value
            .entries()
            .map(|(name, datum)| (name.to_string(), datum_to_nested(datum)))
            .collect(),
    )
}

pub fn datum_to_nested(datum: &Datum) -> NestedValue {
    match datum {
        Datum::Null => NestedValue::Null,
        Datum::Bool(b) => NestedValue::Bool(*b),
        Datum::Int(i) => NestedValue::Int(*i),
        Datum::Float(f) => NestedValue::Float(*f),
        Datum::String(s) => NestedValue::String(s.clone()),
        Datum::Bytes(b) => NestedValue::Bytes(b.clone()),
        Datum::Array(items) => NestedValue::List(items.iter().map(datum_to_nested).collect()),
        Datum::Map(entries) => {
            let map: IndexMap<String, NestedValue> = entries
                .iter()
                .map(|(k, v)| (map_key(k), datum_to_nested(v)))
                .collect();
            NestedValue::Map(map)
        }
        Datum::Struct(inner) => to_nested_value(inner),
    }
}

fn map_key(key: &Datum) -> String {
    match key {
        Datum::String(s) => s.clone(),
        other => datum_to_nested(other).to_string(),
    }
}
