//! Declared schemas, schema-bound values, and their conversion to [`crate::value::NestedValue`].

pub mod adapter;
pub mod datum;
pub mod types;

pub use adapter::{datum_to_nested, to_nested_value};
pub use datum::{Datum, Struct};
pub use types::{Field, Schema, SchemaKind};
