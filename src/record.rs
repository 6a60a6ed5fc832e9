//! Records flowing through a transform.
//!
//! A minimal stand-in for a host framework's record: topic/partition routing,
//! key with optional key schema, value, headers and timestamp.

use crate::schema::{Schema, Struct};
use crate::value::NestedValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record value, with or without a declared schema.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Schemaless value, used as-is.
    RawMapping(NestedValue),
    /// Value bound to a struct schema.
    TypedStructure(Struct),
}

impl RecordValue {
    /// Declared schema of the value, if any.
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            RecordValue::RawMapping(_) => None,
            RecordValue::TypedStructure(value) => Some(value.schema()),
        }
    }
}

/// A single header entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    #[serde(default)]
    pub value: NestedValue,
}

/// Ordered, multi-valued header collection.
///
/// Adding a header never replaces an existing one with the same key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    entries: Vec<Header>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent copy to extend without touching the original.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn add(&mut self, key: impl Into<String>, value: NestedValue) -> &mut Self {
        self.entries.push(Header {
            key: key.into(),
            value,
        });
        self
    }

    /// Most recently added header named `key`.
    pub fn last_with_name(&self, key: &str) -> Option<&Header> {
        self.entries.iter().rev().find(|h| h.key == key)
    }

    /// Every header named `key`, oldest first.
    pub fn all_with_name<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Header> + 'a {
        self.entries.iter().filter(move |h| h.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A keyed record with headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub topic: String,
    pub partition: Option<i32>,
    pub key_schema: Option<Schema>,
    pub key: Option<NestedValue>,
    pub value: RecordValue,
    pub headers: Headers,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Record {
    /// Schemaless record with no key, headers or timestamp.
    pub fn schemaless(topic: impl Into<String>, value: NestedValue) -> Self {
        Self::new(topic, RecordValue::RawMapping(value))
    }

    /// Schema-bound record with no key, headers or timestamp.
    pub fn with_schema(topic: impl Into<String>, value: Struct) -> Self {
        Self::new(topic, RecordValue::TypedStructure(value))
    }

    fn new(topic: impl Into<String>, value: RecordValue) -> Self {
        Self {
            topic: topic.into(),
            partition: None,
            key_schema: None,
            key: None,
            value,
            headers: Headers::new(),
            timestamp: None,
        }
    }

    pub fn value_schema(&self) -> Option<&Schema> {
        self.value.schema()
    }

    /// Copy of this record with key, key schema and headers replaced.
    ///
    /// Topic, partition, value and timestamp carry over.
    pub fn new_record(
        &self,
        key_schema: Option<Schema>,
        key: Option<NestedValue>,
        headers: Headers,
    ) -> Self {
        Self {
            topic: self.topic.clone(),
            partition: self.partition,
            key_schema,
            key,
            value: self.value.clone(),
            headers,
            timestamp: self.timestamp,
        }
    }
}
