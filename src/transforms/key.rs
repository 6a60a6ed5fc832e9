//! Derive the record key from the record value.

use crate::config::{ConfigDef, ConfigType, Importance, TransformConfig};
use crate::error::{ConfigurationError, Result};
use crate::extraction::PathExtractor;
use crate::record::Record;
use crate::schema::Schema;
use crate::transforms::{
    derived_key_schema, flat_key, require_mapping, warn_undeclared, Transformation,
    KEY_FIELD_MAPPING,
};
use crate::value::NestedValue;
use indexmap::IndexMap;

/// Replaces the key with a map built from `keyFieldMapping`.
///
/// Headers pass through unchanged.
#[derive(Debug, Clone)]
pub struct NestedValueToKeys {
    key_extractor: PathExtractor,
    key_schema: Schema,
}

impl NestedValueToKeys {
    pub const NAME: &'static str = "NestedValueToKeys";

    const PURPOSE: &'static str = "construct the record key from value";

    pub fn config_def() -> ConfigDef {
        ConfigDef::new().define(
            KEY_FIELD_MAPPING,
            ConfigType::List,
            Importance::Low,
            "Map of key field name to json path in the message value. eg: field1:jsonpath1,field2:jsonpath2..",
        )
    }

    pub fn configure(props: &TransformConfig) -> std::result::Result<Self, ConfigurationError> {
        let def = Self::config_def();
        warn_undeclared(&def, props, Self::NAME);

        let key_extractor = require_mapping(&def, props, KEY_FIELD_MAPPING, Self::NAME)?;
        tracing::debug!(
            transform = Self::NAME,
            key_fields = key_extractor.mapping().len(),
            "configured"
        );

        Ok(Self {
            key_extractor,
            key_schema: derived_key_schema(Self::NAME),
        })
    }

    pub fn key_schema(&self) -> &Schema {
        &self.key_schema
    }
}

impl Transformation for NestedValueToKeys {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn purpose(&self) -> &'static str {
        Self::PURPOSE
    }

    fn config(&self) -> ConfigDef {
        Self::config_def()
    }

    fn apply_schemaless(
        &self,
        record: &Record,
        value: &IndexMap<String, NestedValue>,
    ) -> Result<Record> {
        let key = flat_key(self.key_extractor.mapping(), value);
        Ok(record.new_record(None, Some(key), record.headers.duplicate()))
    }

    fn apply_with_schema(&self, record: &Record, value: &NestedValue) -> Result<Record> {
        let key = self.key_extractor.extract_values(value)?;
        Ok(record.new_record(
            Some(self.key_schema.clone()),
            Some(NestedValue::Map(key)),
            record.headers.duplicate(),
        ))
    }
}
