//! A uniform, non-failing view over heterogeneous record values.
use serde_json::{Map, Value};
use std::borrow::Cow;

/// The shape of a value found while walking a record.
///
/// Every accessor returns [`Lookup::Absent`] on a missing key, an index past
/// the end or a shape mismatch, so a walk never fails half-way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Object(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
    Absent,
}

impl<'a> Lookup<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Null => Lookup::Absent,
            Value::Object(map) => Lookup::Object(map),
            Value::Array(items) => Lookup::Sequence(items.as_slice()),
            scalar => Lookup::Scalar(scalar),
        }
    }

    /// Object-style field access.
    pub fn field(self, name: &str) -> Self {
        match self {
            Lookup::Object(map) => map.get(name).map(Lookup::of).unwrap_or(Lookup::Absent),
            _ => Lookup::Absent,
        }
    }

    /// Positional access into a sequence.
    pub fn index(self, position: usize) -> Self {
        match self {
            Lookup::Sequence(items) => items.get(position).map(Lookup::of).unwrap_or(Lookup::Absent),
            _ => Lookup::Absent,
        }
    }

    pub fn items(self) -> Option<&'a [Value]> {
        match self {
            Lookup::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    /// The literal text of a scalar leaf.
    ///
    /// Numbers keep their source spelling (`1.50` stays `1.50`). Empty
    /// strings, nulls and containers have no text.
    pub fn text(&self) -> Option<Cow<'a, str>> {
        match self {
            Lookup::Scalar(Value::String(s)) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
            Lookup::Scalar(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            Lookup::Scalar(Value::Bool(b)) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Lookup::Object(_) | Lookup::Sequence(_))
    }
}
