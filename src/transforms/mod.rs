//! Transforms that derive record keys and headers from the record value.
//!
//! Every transform picks one of two paths per record:
//!
//! - **schemaless** ([`RecordValue::RawMapping`]): the value must be a map and
//!   each mapped path is looked up as a single top-level key
//! - **schema-bound** ([`RecordValue::TypedStructure`]): the struct is converted
//!   with [`to_nested_value`] and each path is fully evaluated
//!
//! The record value itself is never altered.

pub mod header;
pub mod key;
pub mod key_and_header;

pub use header::NestedValueToHeader;
pub use key::NestedValueToKeys;
pub use key_and_header::NestedValueToKeysAndHeader;

use crate::config::{ConfigDef, TransformConfig};
use crate::error::{ConfigurationError, Result, TransformError};
use crate::extraction::PathExtractor;
use crate::mapping::{parse_mappings, FieldMapping};
use crate::record::{Headers, Record, RecordValue};
use crate::schema::{to_nested_value, Schema};
use crate::value::NestedValue;
use indexmap::IndexMap;

/// Option naming the header `name:path` list.
pub const HEADER_FIELD_MAPPING: &str = "headerFieldMapping";

/// Option naming the key `name:path` list.
pub const KEY_FIELD_MAPPING: &str = "keyFieldMapping";

/// Name of the key schema attached to derived keys on the schema-bound path.
pub const KEY_SCHEMA_NAME: &str = "MAP_STRING_TO_ANY";

/// A configured record transform.
///
/// Instances only exist once configured and hold no per-record state, so one
/// instance can be shared across threads.
pub trait Transformation: Send + Sync {
    /// Registered name of the transform.
    fn name(&self) -> &'static str;

    /// What the transform does, used in error messages.
    fn purpose(&self) -> &'static str;

    /// Options this transform accepts.
    fn config(&self) -> ConfigDef;

    /// Handle a record whose value has no schema.
    fn apply_schemaless(
        &self,
        record: &Record,
        value: &IndexMap<String, NestedValue>,
    ) -> Result<Record>;

    /// Handle a record whose value has been converted from a struct.
    fn apply_with_schema(&self, record: &Record, value: &NestedValue) -> Result<Record>;

    /// Transform one record.
    fn apply(&self, record: &Record) -> Result<Record> {
        match &record.value {
            RecordValue::RawMapping(value) => {
                let map = value.as_map().ok_or_else(|| TransformError::UnexpectedValue {
                    purpose: self.purpose(),
                    found: value.type_name().to_string(),
                })?;
                tracing::trace!(
                    transform = self.name(),
                    topic = %record.topic,
                    "applying schemaless"
                );
                self.apply_schemaless(record, map)
            }
            RecordValue::TypedStructure(value) => {
                let nested = to_nested_value(value);
                tracing::trace!(
                    transform = self.name(),
                    topic = %record.topic,
                    "applying with schema"
                );
                self.apply_with_schema(record, &nested)
            }
        }
    }
}

/// Read a required mapping option and bind it to an extractor.
pub(crate) fn require_mapping(
    def: &ConfigDef,
    props: &TransformConfig,
    option: &str,
    transform: &str,
) -> std::result::Result<PathExtractor, ConfigurationError> {
    let tokens = def.list(props, option)?.unwrap_or_default();
    if tokens.is_empty() {
        return Err(ConfigurationError::MissingMapping {
            option: option.to_string(),
            transform: transform.to_string(),
        });
    }

    let mapping = parse_mappings(&tokens, option)?;
    Ok(PathExtractor::new(mapping, option))
}

/// Log options the transform does not recognise.
pub(crate) fn warn_undeclared(def: &ConfigDef, props: &TransformConfig, transform: &str) {
    for option in def.undeclared(props) {
        tracing::warn!(transform, option, "ignoring unknown configuration option");
    }
}

/// Key schema for derived keys: a map of string to optional string.
pub(crate) fn derived_key_schema(transform: &str) -> Schema {
    Schema::map(Schema::string(), Schema::string().optional())
        .with_doc(format!("Schema generated by {} SMT", transform))
        .named(KEY_SCHEMA_NAME)
}

/// Append one header per mapping entry, reading each path as a top-level key.
pub(crate) fn add_flat_headers(
    headers: &mut Headers,
    mapping: &FieldMapping,
    value: &IndexMap<String, NestedValue>,
) {
    for (field, path) in mapping.iter() {
        headers.add(field, value.get(path).cloned().unwrap_or_default());
    }
}

/// Key map built by reading each path as a top-level key.
pub(crate) fn flat_key(
    mapping: &FieldMapping,
    value: &IndexMap<String, NestedValue>,
) -> NestedValue {
    NestedValue::Map(
        mapping
            .iter()
            .map(|(field, path)| (field.to_string(), value.get(path).cloned().unwrap_or_default()))
            .collect(),
    )
}

/// Append one header per mapping entry, evaluating the full path.
pub(crate) fn add_extracted_headers(
    headers: &mut Headers,
    extractor: &PathExtractor,
    value: &NestedValue,
) -> Result<()> {
    for field in extractor.mapping().field_names() {
        let extracted = extractor.extract_value(field, value)?;
        headers.add(field, extracted.into_value());
    }
    Ok(())
}
