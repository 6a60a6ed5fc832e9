//! NDJSON encoding of records.
//!
//! One record per line:
//!
//! ```json
//! {"topic":"orders","key":null,"value":{"id":7},"headers":[{"key":"src","value":"svcA"}]}
//! ```
//!
//! A line carrying `valueSchema` is bound to that schema and takes the
//! schema-bound path through a transform.

use crate::error::SchemaError;
use crate::record::{Headers, Record, RecordValue};
use crate::schema::{to_nested_value, Schema, Struct};
use crate::value::NestedValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use thiserror::Error;

/// Error type for serialization operations
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),
}

/// Wire form of a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLine {
    pub topic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,

    #[serde(default)]
    pub key: Option<NestedValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_schema: Option<Schema>,

    #[serde(default)]
    pub value: NestedValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_schema: Option<Schema>,

    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RecordLine {
    pub fn from_record(record: &Record) -> Self {
        let (value, value_schema) = match &record.value {
            RecordValue::RawMapping(value) => (value.clone(), None),
            RecordValue::TypedStructure(value) => {
                (to_nested_value(value), Some(value.schema().clone()))
            }
        };

        Self {
            topic: record.topic.clone(),
            partition: record.partition,
            key: record.key.clone(),
            key_schema: record.key_schema.clone(),
            value,
            value_schema,
            headers: record.headers.clone(),
            timestamp: record.timestamp,
        }
    }

    /// Build a record, binding the value to `valueSchema` when present.
    pub fn into_record(self) -> Result<Record, SchemaError> {
        let value = match self.value_schema {
            Some(schema) => RecordValue::TypedStructure(Struct::from_nested(schema, &self.value)?),
            None => RecordValue::RawMapping(self.value),
        };

        Ok(Record {
            topic: self.topic,
            partition: self.partition,
            key_schema: self.key_schema,
            key: self.key,
            value,
            headers: self.headers,
            timestamp: self.timestamp,
        })
    }
}

/// NDJSON (Newline Delimited JSON) writer
///
/// Writes records as NDJSON, one JSON object per line.
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    /// Create a new NDJSON writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single serializable value as an NDJSON line
    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<(), SerializationError> {
        let json = serde_json::to_string(value)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// Write a record as an NDJSON line
    pub fn write_record(&mut self, record: &Record) -> Result<(), SerializationError> {
        self.write(&RecordLine::from_record(record))
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// NDJSON record reader
///
/// Yields one result per non-blank line, so a bad line does not stop the stream.
pub struct NdjsonReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> NdjsonReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Line number of the most recently read line (1-based).
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for NdjsonReader<R> {
    type Item = Result<Record, SerializationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str::<RecordLine>(&line)
                    .map_err(SerializationError::from)
                    .and_then(|parsed| parsed.into_record().map_err(SerializationError::from)),
            );
        }
    }
}
