//! Error types for mapping configuration, path extraction and record dispatch.

use thiserror::Error;

/// Errors raised while configuring a transform.
///
/// These are always fatal to the startup of the transform instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A required mapping list was absent or empty.
    #[error("`{option}` is required for `{transform}`")]
    MissingMapping { option: String, transform: String },

    /// A token did not have the form `name:path`.
    #[error("Invalid `{label}` mapping: '{token}' (expected `name:path`)")]
    InvalidMapping { label: String, token: String },

    /// The same field name was mapped twice in one list.
    #[error("Duplicate field '{field}' in `{label}`")]
    DuplicateField { label: String, field: String },

    /// An option was looked up that the transform never declared.
    #[error("Unknown configuration option `{0}`")]
    Undeclared(String),

    /// An option value could not be read as its declared type.
    #[error("Invalid value for `{option}`: {reason}")]
    InvalidValue { option: String, reason: String },

    /// No transform is registered under the requested name.
    #[error("Transform not found: {0}")]
    UnknownTransform(String),

    /// A configuration file could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

/// Errors raised while evaluating a path expression against a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The path expression itself is syntactically invalid.
    #[error("Invalid path '{path}' for field '{field}' in `{label}`: {reason}")]
    MalformedPath {
        label: String,
        field: String,
        path: String,
        reason: String,
    },

    /// The field name has no path registered in the mapping.
    #[error("Field '{field}' is not mapped in `{label}`")]
    UnknownField { label: String, field: String },
}

/// Errors raised while building or reading schema-bound values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Field '{0}' is not declared in the schema")]
    UnknownField(String),

    #[error("Field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Required field '{0}' has no value")]
    MissingRequired(String),

    #[error("Expected a struct schema, got {0}")]
    NotAStruct(String),
}

/// Errors surfaced by a transform while processing a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The record value did not have the shape the dispatch path needs.
    #[error("Only map objects supported in absence of schema for [{purpose}], found: {found}")]
    UnexpectedValue { purpose: &'static str, found: String },
}

/// Result type alias
pub type Result<T, E = TransformError> = std::result::Result<T, E>;
