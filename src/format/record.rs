//! Record framing
//!
//! One entry is stored as exactly two lines: the escaped key, then the
//! escaped value. Empty fields are empty lines and are still records.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::codec::{escape, unescape, CodecError};

/// Number of lines one entry occupies in the store file
pub const LINES_PER_RECORD: usize = 2;

/// A key/value pair held by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn into_pair(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl From<(String, String)> for Entry {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}

impl<'a> From<(&'a str, &'a str)> for Entry {
    fn from((key, value): (&'a str, &'a str)) -> Self {
        Self::new(key, value)
    }
}

/// Which line of a record failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Key,
    Value,
}

impl RecordField {
    /// Zero-based line offset inside the record
    pub fn line_offset(self) -> usize {
        match self {
            RecordField::Key => 0,
            RecordField::Value => 1,
        }
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordField::Key => f.write_str("key"),
            RecordField::Value => f.write_str("value"),
        }
    }
}

/// Decoding failure for a single record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} line: {source}")]
pub struct RecordError {
    pub field: RecordField,
    #[source]
    pub source: CodecError,
}

/// The escaped, newline-free form of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key_line: String,
    pub value_line: String,
}

impl Record {
    /// Escape both fields of an entry
    pub fn encode(key: &str, value: &str) -> Self {
        Self {
            key_line: escape(key),
            value_line: escape(value),
        }
    }

    /// Build a record from two lines read off disk (terminators stripped)
    pub fn from_lines(key_line: String, value_line: String) -> Self {
        Self {
            key_line,
            value_line,
        }
    }

    /// Unescape both lines back into an entry
    pub fn decode(&self) -> Result<Entry, RecordError> {
        let key = unescape(&self.key_line).map_err(|source| RecordError {
            field: RecordField::Key,
            source,
        })?;
        let value = unescape(&self.value_line).map_err(|source| RecordError {
            field: RecordField::Value,
            source,
        })?;

        Ok(Entry { key, value })
    }

    /// Bytes this record occupies on disk, terminators included
    pub fn encoded_len(&self) -> usize {
        self.key_line.len() + self.value_line.len() + LINES_PER_RECORD
    }

    /// Write both lines, each followed by `\n`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.key_line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(self.value_line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Encode and write one entry, returning the number of bytes written
pub fn write_record<W: Write>(writer: &mut W, key: &str, value: &str) -> io::Result<usize> {
    let record = Record::encode(key, value);
    record.write_to(writer)?;
    Ok(record.encoded_len())
}
