//! Path-based extraction from nested values.
//!
//! [`FieldPath`] parses and evaluates a single path expression;
//! [`PathExtractor`] evaluates every path in a [`crate::mapping::FieldMapping`].

pub mod extractor;
pub mod path;

pub use extractor::PathExtractor;
pub use path::{Extracted, Extractor, FieldPath, PathSegment, PathSyntaxError};
