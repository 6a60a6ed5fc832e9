//! Evaluates a [`FieldMapping`] against nested values.

use crate::error::ExtractionError;
use crate::extraction::path::{Extracted, FieldPath, PathSyntaxError};
use crate::mapping::FieldMapping;
use crate::value::NestedValue;
use indexmap::IndexMap;

/// Evaluates the path expressions of one mapping.
///
/// Paths are parsed once on construction. A malformed path is kept as a
/// syntax error and reported only when that field is evaluated.
#[derive(Debug, Clone)]
pub struct PathExtractor {
    label: String,
    mapping: FieldMapping,
    paths: IndexMap<String, Result<FieldPath, PathSyntaxError>>,
}

impl PathExtractor {
    /// Bind `mapping` to an extractor. `config_label` appears in errors.
    pub fn new(mapping: FieldMapping, config_label: impl Into<String>) -> Self {
        let paths = mapping
            .iter()
            .map(|(field, path)| (field.to_string(), FieldPath::parse(path)))
            .collect();

        Self {
            label: config_label.into(),
            mapping,
            paths,
        }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluate the path mapped to `field_name` against `value`.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::MalformedPath`] when the mapped path does not parse
    /// - [`ExtractionError::UnknownField`] when `field_name` is not in the mapping
    pub fn extract_value(
        &self,
        field_name: &str,
        value: &NestedValue,
    ) -> Result<Extracted, ExtractionError> {
        let path = self
            .paths
            .get(field_name)
            .ok_or_else(|| ExtractionError::UnknownField {
                label: self.label.clone(),
                field: field_name.to_string(),
            })?;

        match path {
            Ok(path) => Ok(path.evaluate(value)),
            Err(err) => Err(ExtractionError::MalformedPath {
                label: self.label.clone(),
                field: field_name.to_string(),
                path: self.mapping.get(field_name).unwrap_or_default().to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// Evaluate every mapped field in mapping order.
    ///
    /// Missing results are recorded as [`NestedValue::Null`].
    pub fn extract_values(
        &self,
        value: &NestedValue,
    ) -> Result<IndexMap<String, NestedValue>, ExtractionError> {
        self.mapping
            .field_names()
            .map(|field| {
                let extracted = self.extract_value(field, value)?;
                Ok((field.to_string(), extracted.into_value()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::parse_mappings;
    use serde_json::json;

    fn extractor(tokens: &[&str]) -> PathExtractor {
        PathExtractor::new(
            parse_mappings(tokens, "headerFieldMapping").unwrap(),
            "headerFieldMapping",
        )
    }

    #[test]
    fn test_extract_value() {
        let ex = extractor(&["region:$.geo.region", "first:tags[0]"]);
        let value = NestedValue::from(json!({"geo": {"region": "eu"}, "tags": ["x", "y"]}));

        assert_eq!(
            ex.extract_value("region", &value).unwrap(),
            Extracted::Value(NestedValue::from("eu"))
        );
        assert_eq!(
            ex.extract_value("first", &value).unwrap(),
            Extracted::Value(NestedValue::from("x"))
        );
    }

    #[test]
    fn test_missing_path_is_not_an_error() {
        let ex = extractor(&["h1:a.b.c"]);
        let value = NestedValue::from(json!({"a": {"x": 1}}));

        assert_eq!(ex.extract_value("h1", &value).unwrap(), Extracted::Missing);
    }

    #[test]
    fn test_malformed_path_fails_on_evaluation() {
        let ex = extractor(&["ok:a", "bad:a[oops"]);
        let value = NestedValue::from(json!({"a": 1}));

        assert!(ex.extract_value("ok", &value).is_ok());
        match ex.extract_value("bad", &value).unwrap_err() {
            ExtractionError::MalformedPath { label, field, path, .. } => {
                assert_eq!(label, "headerFieldMapping");
                assert_eq!(field, "bad");
                assert_eq!(path, "a[oops");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(ex.extract_values(&value).is_err());
    }

    #[test]
    fn test_unknown_field() {
        let ex = extractor(&["a:a"]);
        let err = ex.extract_value("b", &NestedValue::Null).unwrap_err();

        assert!(matches!(err, ExtractionError::UnknownField { .. }));
    }

    #[test]
    fn test_extract_values_in_mapping_order() {
        let ex = extractor(&["z:$.z", "missing:$.nope", "a:$.a"]);
        let value = NestedValue::from(json!({"a": 1, "z": 26}));

        let values = ex.extract_values(&value).unwrap();
        let pairs: Vec<(&String, &NestedValue)> = values.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (&"z".to_string(), &NestedValue::Int(26)),
                (&"missing".to_string(), &NestedValue::Null),
                (&"a".to_string(), &NestedValue::Int(1)),
            ]
        );
    }

    #[test]
    fn test_evaluation_leaves_value_untouched() {
        let ex = extractor(&["all:$.*", "x:$.x"]);
        let value = NestedValue::from(json!({"x": {"y": [1, 2]}}));
        let before = value.clone();

        ex.extract_values(&value).unwrap();
        assert_eq!(value, before);
    }
}
