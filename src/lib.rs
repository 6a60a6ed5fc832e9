//! # Nestkey: derive record keys and headers from nested values
//!
//! Nestkey reads values out of a record body with path expressions and uses
//! them to build a new record key and/or new headers. The body itself is
//! passed through untouched.
//!
//! ## Features
//!
//! - **Mapping lists**: `name:path` tokens parsed into an ordered [`FieldMapping`]
//! - **Path extraction**: a JSONPath subset (`$.a.b`, `a[0]`, `a['b c']`, `a[*].b`)
//!   evaluated over [`NestedValue`] trees
//! - **Schema support**: struct-typed values are converted to nested values
//!   before extraction
//! - **Transforms**: header-only, key-only and key-and-header variants behind the
//!   [`Transformation`] trait, built by name from a [`TransformRegistry`]
//!
//! ## Example
//!
//! ```
//! use nestkey::{NestedValue, NestedValueToHeader, Record, TransformConfig, Transformation};
//! use serde_json::json;
//!
//! let transform = NestedValueToHeader::configure(
//!     &TransformConfig::new().with("headerFieldMapping", "region:geo"),
//! )
//! .unwrap();
//!
//! let record =
//!     Record::schemaless("events", NestedValue::from(json!({"geo": "us-east", "id": 7})));
//! let out = transform.apply(&record).unwrap();
//!
//! assert_eq!(out.headers.last_with_name("region").unwrap().value, NestedValue::from("us-east"));
//! ```

// Core modules
pub mod error;
pub mod value;
pub mod mapping;
pub mod extraction;
pub mod schema;

// Record boundary and configuration
pub mod record;
pub mod config;

// Transforms and their registry
pub mod transforms;
pub mod transform_registry;

pub mod serialization;

// Re-export key types
pub use error::{ConfigurationError, ExtractionError, SchemaError, TransformError};
pub use value::NestedValue;
pub use mapping::{parse_mappings, FieldMapping};
pub use extraction::{Extracted, FieldPath, PathExtractor};
pub use schema::{to_nested_value, Datum, Field, Schema, SchemaKind, Struct};
pub use record::{Header, Headers, Record, RecordValue};
pub use config::{ConfigDef, ConfigValue, TransformConfig};
pub use transforms::{
    NestedValueToHeader, NestedValueToKeys, NestedValueToKeysAndHeader, Transformation,
};
pub use transform_registry::TransformRegistry;
pub use serialization::{NdjsonReader, NdjsonWriter, RecordLine};
