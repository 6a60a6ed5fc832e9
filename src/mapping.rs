//! `name:path` mapping lists.

use crate::error::ConfigurationError;
use indexmap::IndexMap;

/// Ordered map of derived field name to path expression.
///
/// Built once from configuration and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMapping {
    entries: IndexMap<String, String>,
}

impl FieldMapping {
    /// Path registered for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(|s| s.as_str())
    }

    /// `(field, path)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse `name:path` tokens into a [`FieldMapping`].
///
/// `config_label` names the option the tokens came from and appears in every
/// error. Order of the tokens is kept.
///
/// # Errors
///
/// - [`ConfigurationError::InvalidMapping`] when a token has no colon, more
///   than one colon, or an empty name or path
/// - [`ConfigurationError::DuplicateField`] when a name appears twice
///
/// # Example
///
/// ```
/// use nestkey::mapping::parse_mappings;
///
/// let mapping = parse_mappings(&["region:geo.region", "id:$.id"], "headerFieldMapping").unwrap();
/// assert_eq!(mapping.get("region"), Some("geo.region"));
/// ```
pub fn parse_mappings<S: AsRef<str>>(
    tokens: &[S],
    config_label: &str,
) -> Result<FieldMapping, ConfigurationError> {
    let mut entries = IndexMap::with_capacity(tokens.len());

    for token in tokens {
        let token = token.as_ref();
        let invalid = || ConfigurationError::InvalidMapping {
            label: config_label.to_string(),
            token: token.to_string(),
        };

        let mut parts = token.split(':');
        let (name, path) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(path), None) => (name.trim(), path.trim()),
            _ => return Err(invalid()),
        };
        if name.is_empty() || path.is_empty() {
            return Err(invalid());
        }

        if entries.contains_key(name) {
            return Err(ConfigurationError::DuplicateField {
                label: config_label.to_string(),
                field: name.to_string(),
            });
        }
        entries.insert(name.to_string(), path.to_string());
    }

    Ok(FieldMapping { entries })
}
