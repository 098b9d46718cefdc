//! Input record sources.
//!
//! Records arrive already parsed as `serde_json::Value`s. Sources hand them
//! out one at a time; [`read_records`] turns a JSON document (one record or
//! an array of records) into a list, and [`unwrap_envelope`] strips the
//! transport wrappers some exports put around a record.
//!
//! ## Example
//!
//! ```ignore
//! use icsr_source::{RecordSource, VecDataSource};
//! use serde_json::json;
//!
//! let mut source = VecDataSource::new(vec![json!({"pv_case": {}})]);
//! while let Some(record) = source.next() {
//!     println!("{record}");
//! }
//! ```

use serde_json::Value;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A trait for sources that feed records into the pipeline.
pub trait RecordSource: Send {
    /// The next record, or `None` once the source is exhausted.
    fn next(&mut self) -> Option<Value>;

    /// Total number of records, when known.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Drains the source.
    fn collect_all(&mut self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.size_hint().unwrap_or(0));
        while let Some(record) = self.next() {
            out.push(record);
        }
        out
    }
}

/// Wraps any iterator as a source.
pub struct IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    inner: I,
}

impl<I> IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I> RecordSource for IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> Option<usize> {
        match self.inner.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        }
    }
}

/// An in-memory list of records, handed out by value.
pub struct VecDataSource {
    records: std::vec::IntoIter<Value>,
}

impl VecDataSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl RecordSource for VecDataSource {
    fn next(&mut self) -> Option<Value> {
        self.records.next()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.records.len())
    }
}

impl RecordSource for Box<dyn RecordSource> {
    fn next(&mut self) -> Option<Value> {
        (**self).next()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}

/// Returns the record inside `{"input_json": {"data": …}}` or `{"data": …}`
/// wrappers, or the value itself when it is not wrapped.
pub fn unwrap_envelope(value: &Value) -> &Value {
    if let Some(data) = value.get("input_json").and_then(|inner| inner.get("data")) {
        return data;
    }
    match value.get("data") {
        Some(data) if data.is_object() => data,
        _ => value,
    }
}

/// Reads one JSON document: an array yields one record per element,
/// anything else is a single record.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Value>, SourceError> {
    let document: Value = serde_json::from_reader(reader)?;
    let records = match document {
        Value::Array(items) => items,
        other => vec![other],
    };
    log::debug!("Read {} input record(s)", records.len());
    Ok(records)
}
