//! Derive headers from the record value.

use crate::config::{ConfigDef, ConfigType, Importance, TransformConfig};
use crate::error::{ConfigurationError, Result};
use crate::extraction::PathExtractor;
use crate::record::Record;
use crate::transforms::{
    add_extracted_headers, add_flat_headers, require_mapping, warn_undeclared, Transformation,
    HEADER_FIELD_MAPPING,
};
use crate::value::NestedValue;
use indexmap::IndexMap;

/// Appends one header per `headerFieldMapping` entry.
///
/// Key, key schema and value pass through untouched.
#[derive(Debug, Clone)]
pub struct NestedValueToHeader {
    header_extractor: PathExtractor,
}

impl NestedValueToHeader {
    pub const NAME: &'static str = "NestedValueToHeader";

    const PURPOSE: &'static str = "construct the record header from value";

    pub fn config_def() -> ConfigDef {
        ConfigDef::new().define(
            HEADER_FIELD_MAPPING,
            ConfigType::List,
            Importance::Low,
            "Map of header field name to json path in the message value. eg: field1:jsonpath1,field2:jsonpath2..",
        )
    }

    pub fn configure(props: &TransformConfig) -> std::result::Result<Self, ConfigurationError> {
        let def = Self::config_def();
        warn_undeclared(&def, props, Self::NAME);

        let header_extractor = require_mapping(&def, props, HEADER_FIELD_MAPPING, Self::NAME)?;
        tracing::debug!(
            transform = Self::NAME,
            header_fields = header_extractor.mapping().len(),
            "configured"
        );

        Ok(Self { header_extractor })
    }
}

impl Transformation for NestedValueToHeader {
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
        let mut headers = record.headers.duplicate();
        add_flat_headers(&mut headers, self.header_extractor.mapping(), value);

        Ok(record.new_record(record.key_schema.clone(), record.key.clone(), headers))
    }

    fn apply_with_schema(&self, record: &Record, value: &NestedValue) -> Result<Record> {
        let mut headers = record.headers.duplicate();
        add_extracted_headers(&mut headers, &self.header_extractor, value)?;

        Ok(record.new_record(record.key_schema.clone(), record.key.clone(), headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, TransformError};
    use crate::record::Headers;
    use crate::schema::{Field, Schema, Struct};
    use serde_json::json;

    fn transform(mapping: &str) -> NestedValueToHeader {
        NestedValueToHeader::configure(&TransformConfig::new().with(HEADER_FIELD_MAPPING, mapping))
            .unwrap()
    }

    #[test]
    fn test_schemaless_single_header() {
        let record =
            Record::schemaless("events", NestedValue::from(json!({"geo": "us-east", "id": 7})));

        let out = transform("region:geo").apply(&record).unwrap();

        assert_eq!(out.headers.len(), 1);
        let header = out.headers.iter().next().unwrap();
        assert_eq!(header.key, "region");
        assert_eq!(header.value, NestedValue::from("us-east"));
        assert_eq!(out.value, record.value);
        assert_eq!(out.key, None);
    }

    #[test]
    fn test_schemaless_missing_key_writes_null() {
        let record = Record::schemaless("events", NestedValue::from(json!({"a": {"x": 1}})));

        let out = transform("h1:a.b.c").apply(&record).unwrap();

        assert_eq!(out.headers.last_with_name("h1").unwrap().value, NestedValue::Null);
    }

    #[test]
    fn test_schema_bound_nested_paths() {
        let geo = Schema::structure(vec![Field::new("region", Schema::string())]);
        let schema = Schema::structure(vec![
            Field::new("id", Schema::int64()),
            Field::new("geo", geo.clone()),
        ]);
        let value = Struct::new(schema)
            .unwrap()
            .put("id", 7i64)
            .unwrap()
            .put("geo", Struct::new(geo).unwrap().put("region", "eu").unwrap())
            .unwrap();
        let record = Record::with_schema("events", value);

        let out = transform("region:$.geo.region,id:id,gone:geo.city").apply(&record).unwrap();

        let headers: Vec<(&str, &NestedValue)> =
            out.headers.iter().map(|h| (h.key.as_str(), &h.value)).collect();
        assert_eq!(
            headers,
            vec![
                ("region", &NestedValue::from("eu")),
                ("id", &NestedValue::Int(7)),
                ("gone", &NestedValue::Null),
            ]
        );
        assert_eq!(out.value, record.value);
        assert_eq!(out.key_schema, None);
    }

    #[test]
    fn test_existing_headers_are_kept() {
        let mut record = Record::schemaless("events", NestedValue::from(json!({"geo": "eu"})));
        record.headers.add("region", NestedValue::from("old"));
        record.key = Some(NestedValue::from("k"));

        let out = transform("region:geo").apply(&record).unwrap();

        let values: Vec<&NestedValue> =
            out.headers.all_with_name("region").map(|h| &h.value).collect();
        assert_eq!(values, vec![&NestedValue::from("old"), &NestedValue::from("eu")]);
        assert_eq!(record.headers.len(), 1);
        assert_eq!(out.key, Some(NestedValue::from("k")));
    }

    #[test]
    fn test_header_derivation_is_repeatable() {
        let mut original = Headers::new();
        original.add("trace", NestedValue::from("t-1"));
        let mut record = Record::schemaless("events", NestedValue::from(json!({"geo": "eu"})));
        record.headers = original.clone();

        let t = transform("region:geo");
        let first = t.apply(&record).unwrap();
        let second = t.apply(&record).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.headers.iter().next(), original.iter().next());
        assert_eq!(record.headers, original);
    }

    #[test]
    fn test_non_map_schemaless_value() {
        let record = Record::schemaless("events", NestedValue::from("plain"));

        let err = transform("a:b").apply(&record).unwrap_err();
        assert_eq!(
            err,
            TransformError::UnexpectedValue {
                purpose: "construct the record header from value",
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_path_on_schema_bound_record() {
        let schema = Schema::structure(vec![Field::new("a", Schema::string())]);
        let record =
            Record::with_schema("events", Struct::new(schema).unwrap().put("a", "x").unwrap());

        let err = transform("h:a[").apply(&record).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Extraction(ExtractionError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_configure_requires_mapping() {
        let err = NestedValueToHeader::configure(&TransformConfig::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`headerFieldMapping` is required for `NestedValueToHeader`"
        );
    }

    #[test]
    fn test_configure_rejects_duplicates() {
        let props = TransformConfig::new().with(HEADER_FIELD_MAPPING, "a:x,a:y");
        assert!(matches!(
            NestedValueToHeader::configure(&props).unwrap_err(),
            ConfigurationError::DuplicateField { .. }
        ));
    }
}
