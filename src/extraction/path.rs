//! Path expressions over nested values.
//!
//! The grammar is a small JSONPath subset:
//!
//! - `$` - optional root marker
//! - `user.name` or `$.user.name` - map keys
//! - `$['first name']` - quoted map keys (may contain dots and spaces)
//! - `items[0]`, `items[-1]` - list indices, negative counts from the end
//! - `items[*].sku`, `geo.*` - wildcard over every child

use crate::value::NestedValue;
use std::fmt;
use thiserror::Error;

/// A parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// The raw path string
    pub raw: String,
    /// Parsed path segments
    pub segments: Vec<PathSegment>,
}

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A map key (e.g., "user", "name")
    Field(String),
    /// A list index (e.g., [0], [-1])
    Index(i64),
    /// Every child of a map or list
    Wildcard,
}

/// A syntax error in a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at position {position}")]
pub struct PathSyntaxError {
    pub position: usize,
    pub reason: String,
}

impl PathSyntaxError {
    fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

/// Outcome of evaluating a path against a value.
///
/// `Missing` means the path is well-formed but does not resolve; it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Value(NestedValue),
    Missing,
}

impl Extracted {
    pub fn is_missing(&self) -> bool {
        matches!(self, Extracted::Missing)
    }

    pub fn as_value(&self) -> Option<&NestedValue> {
        match self {
            Extracted::Value(v) => Some(v),
            Extracted::Missing => None,
        }
    }

    /// Collapse to a value, rendering `Missing` as `Null`.
    pub fn into_value(self) -> NestedValue {
        match self {
            Extracted::Value(v) => v,
            Extracted::Missing => NestedValue::Null,
        }
    }
}

impl FieldPath {
    /// Parse a path expression
    ///
    /// # Example
    ///
    /// ```
    /// use nestkey::extraction::{FieldPath, PathSegment};
    ///
    /// let path = FieldPath::parse("$.user.tags[0]").unwrap();
    /// assert_eq!(path.segments.len(), 3);
    /// assert_eq!(path.segments[2], PathSegment::Index(0));
    /// ```
    pub fn parse(path: &str) -> Result<Self, PathSyntaxError> {
        let chars: Vec<char> = path.trim().chars().collect();
        if chars.is_empty() {
            return Err(PathSyntaxError::new(0, "empty path"));
        }

        let mut segments = Vec::new();
        let mut pos = 0;

        match chars[0] {
            '$' => pos = 1,
            '.' => return Err(PathSyntaxError::new(0, "path cannot start with '.'")),
            '[' => {}
            _ => {
                let (segment, next) = read_name(&chars, 0)?;
                segments.push(segment);
                pos = next;
            }
        }

        while pos < chars.len() {
            match chars[pos] {
                '.' => {
                    pos += 1;
                    match chars.get(pos) {
                        None => return Err(PathSyntaxError::new(pos, "path ends with '.'")),
                        Some('.') => {
                            return Err(PathSyntaxError::new(pos, "deep scan '..' is not supported"))
                        }
                        Some('[') => {
                            return Err(PathSyntaxError::new(pos, "unexpected '[' after '.'"))
                        }
                        Some(_) => {
                            let (segment, next) = read_name(&chars, pos)?;
                            segments.push(segment);
                            pos = next;
                        }
                    }
                }
                '[' => {
                    let (segment, next) = read_bracket(&chars, pos)?;
                    segments.push(segment);
                    pos = next;
                }
                c => {
                    return Err(PathSyntaxError::new(
                        pos,
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// True when the path can match more than one location.
    pub fn is_indefinite(&self) -> bool {
        self.segments.contains(&PathSegment::Wildcard)
    }

    /// Evaluate against `root` without modifying it.
    ///
    /// Definite paths yield the single value found or `Missing`. Paths with a
    /// wildcard yield a list of every location that resolved.
    pub fn evaluate(&self, root: &NestedValue) -> Extracted {
        let mut current: Vec<&NestedValue> = vec![root];

        for segment in &self.segments {
            current = current
                .into_iter()
                .flat_map(|node| step(node, segment))
                .collect();

            if current.is_empty() && !self.is_indefinite() {
                return Extracted::Missing;
            }
        }

        if self.is_indefinite() {
            Extracted::Value(NestedValue::List(current.into_iter().cloned().collect()))
        } else {
            current
                .first()
                .map(|v| Extracted::Value((*v).clone()))
                .unwrap_or(Extracted::Missing)
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Trait for values that can be addressed by a [`FieldPath`]
pub trait Extractor {
    /// Extract the value at the given path
    fn extract(&self, path: &FieldPath) -> Extracted;
}

impl Extractor for NestedValue {
    fn extract(&self, path: &FieldPath) -> Extracted {
        path.evaluate(self)
    }
}

fn step<'a>(node: &'a NestedValue, segment: &PathSegment) -> Vec<&'a NestedValue> {
    match (segment, node) {
        (PathSegment::Field(name), NestedValue::Map(map)) => map.get(name).into_iter().collect(),
        (PathSegment::Index(index), NestedValue::List(items)) => {
            let len = items.len() as i64;
            let resolved = if *index < 0 { len + index } else { *index };
            if (0..len).contains(&resolved) {
                vec![&items[resolved as usize]]
            } else {
                Vec::new()
            }
        }
        (PathSegment::Wildcard, NestedValue::Map(map)) => map.values().collect(),
        (PathSegment::Wildcard, NestedValue::List(items)) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Read an unquoted name starting at `start`, stopping at `.` or `[`.
fn read_name(chars: &[char], start: usize) -> Result<(PathSegment, usize), PathSyntaxError> {
    let mut end = start;
    while end < chars.len() && chars[end] != '.' && chars[end] != '[' {
        if chars[end] == ']' {
            return Err(PathSyntaxError::new(end, "unexpected ']'"));
        }
        end += 1;
    }

    let name: String = chars[start..end].iter().collect();
    let segment = if name == "*" {
        PathSegment::Wildcard
    } else {
        PathSegment::Field(name)
    };
    Ok((segment, end))
}

/// Read a bracketed segment starting at the `[` at `start`.
fn read_bracket(chars: &[char], start: usize) -> Result<(PathSegment, usize), PathSyntaxError> {
    let mut pos = start + 1;
    skip_spaces(chars, &mut pos);

    let segment = match chars.get(pos) {
        None => return Err(PathSyntaxError::new(start, "unclosed '['")),
        Some(&quote) if quote == '\'' || quote == '"' => {
            pos += 1;
            let mut name = String::new();
            loop {
                match chars.get(pos) {
                    None => return Err(PathSyntaxError::new(start, "unterminated quoted name")),
                    Some('\\') => {
                        let escaped = chars
                            .get(pos + 1)
                            .ok_or_else(|| PathSyntaxError::new(pos, "dangling escape"))?;
                        name.push(*escaped);
                        pos += 2;
                    }
                    Some(&c) if c == quote => {
                        pos += 1;
                        break;
                    }
                    Some(&c) => {
                        name.push(c);
                        pos += 1;
                    }
                }
            }
            PathSegment::Field(name)
        }
        Some('*') => {
            pos += 1;
            PathSegment::Wildcard
        }
        Some(_) => {
            let begin = pos;
            while pos < chars.len() && chars[pos] != ']' {
                pos += 1;
            }
            if pos >= chars.len() {
                return Err(PathSyntaxError::new(start, "unclosed '['"));
            }
            let text: String = chars[begin..pos].iter().collect();
            let text = text.trim();
            let index = text
                .parse::<i64>()
                .map_err(|_| PathSyntaxError::new(begin, format!("invalid index '{}'", text)))?;
            PathSegment::Index(index)
        }
    };

    skip_spaces(chars, &mut pos);
    match chars.get(pos) {
        Some(']') => Ok((segment, pos + 1)),
        None => Err(PathSyntaxError::new(start, "unclosed '['")),
        Some(&c) => Err(PathSyntaxError::new(
            pos,
            format!("expected ']' but found '{}'", c),
        )),
    }
}

fn skip_spaces(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos] == ' ' {
        *pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str) -> PathSegment {
        PathSegment::Field(name.to_string())
    }

    fn value(json: serde_json::Value) -> NestedValue {
        NestedValue::from(json)
    }

    #[test]
    fn test_field_path_parse() {
        let path = FieldPath::parse("user.address.city").unwrap();

        assert_eq!(path.segments, vec![field("user"), field("address"), field("city")]);
        assert_eq!(path.raw, "user.address.city");
    }

    #[test]
    fn test_root_marker_is_optional() {
        assert_eq!(
            FieldPath::parse("$.a.b").unwrap().segments,
            FieldPath::parse("a.b").unwrap().segments
        );
        assert!(FieldPath::parse("$").unwrap().segments.is_empty());
    }

    #[test]
    fn test_field_path_with_index() {
        let path = FieldPath::parse("$.items[0].name").unwrap();

        assert_eq!(path.segments, vec![field("items"), PathSegment::Index(0), field("name")]);
    }

    #[test]
    fn test_quoted_names_and_negative_index() {
        let path = FieldPath::parse(r#"$['first name']["a.b"][ -1 ]"#).unwrap();

        assert_eq!(
            path.segments,
            vec![field("first name"), field("a.b"), PathSegment::Index(-1)]
        );
    }

    #[test]
    fn test_wildcards() {
        let path = FieldPath::parse("$.items[*].sku").unwrap();
        assert_eq!(path.segments, vec![field("items"), PathSegment::Wildcard, field("sku")]);
        assert!(path.is_indefinite());

        let path = FieldPath::parse("geo.*").unwrap();
        assert_eq!(path.segments, vec![field("geo"), PathSegment::Wildcard]);
    }

    #[test]
    fn test_malformed_paths() {
        for bad in [
            "", "   ", ".a", "a.", "a..b", "a[", "a[0", "a['x]", "a[x]", "a[]", "a.[0]", "$x",
            "a]b", "a[0]b",
        ] {
            assert!(FieldPath::parse(bad).is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_error_reports_position() {
        let err = FieldPath::parse("a..b").unwrap_err();
        assert_eq!(err.position, 2);
        assert!(err.reason.contains("deep scan"));
    }

    #[test]
    fn test_evaluate_nested() {
        let doc = value(json!({"a": {"b": {"c": 42}}, "list": [1, 2, 3]}));

        let found = FieldPath::parse("a.b.c").unwrap().evaluate(&doc);
        assert_eq!(found, Extracted::Value(NestedValue::Int(42)));

        let last = FieldPath::parse("$.list[-1]").unwrap().evaluate(&doc);
        assert_eq!(last, Extracted::Value(NestedValue::Int(3)));

        let whole = FieldPath::parse("$").unwrap().evaluate(&doc);
        assert_eq!(whole, Extracted::Value(doc.clone()));
    }

    #[test]
    fn test_evaluate_missing() {
        let doc = value(json!({"a": {"x": 1}, "list": [1]}));

        for path in ["a.b.c", "a.x.y", "list[5]", "list[-2]", "a[0]", "nope"] {
            let result = FieldPath::parse(path).unwrap().evaluate(&doc);
            assert!(result.is_missing(), "expected '{}' to be missing", path);
        }
    }

    #[test]
    fn test_explicit_null_is_a_value() {
        let doc = value(json!({"a": null}));
        let result = FieldPath::parse("a").unwrap().evaluate(&doc);

        assert_eq!(result, Extracted::Value(NestedValue::Null));
        assert_eq!(result.into_value(), NestedValue::Null);
    }

    #[test]
    fn test_evaluate_wildcard_collects_matches() {
        let doc = value(json!({"items": [{"sku": "a"}, {"qty": 2}, {"sku": "c"}]}));

        let result = FieldPath::parse("items[*].sku").unwrap().evaluate(&doc);
        assert_eq!(result, Extracted::Value(value(json!(["a", "c"]))));

        let none = FieldPath::parse("items[*].price").unwrap().evaluate(&doc);
        assert_eq!(none, Extracted::Value(NestedValue::List(vec![])));
    }

    #[test]
    fn test_extractor_trait() {
        let doc = value(json!({"geo": {"region": "us-east"}}));
        let path = FieldPath::parse("geo.region").unwrap();

        assert_eq!(doc.extract(&path).as_value(), Some(&NestedValue::from("us-east")));
    }
}
