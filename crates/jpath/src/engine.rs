//! Resolves a parsed source path against a record.
use super::ast::{IndexTuple, PathExpr, PathSegment};
use super::value::Lookup;
use serde_json::Value;

/// One branch of a resolution: the positions that produced it and what was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub index: IndexTuple,
    pub value: Lookup<'a>,
}

/// Walks `path` over `record`, expanding every placeholder depth-first, left
/// to right, so tuple components are ordered outer-to-inner.
///
/// A path without placeholders yields exactly one resolution with an empty
/// tuple. A placeholder over a missing or non-sequence value yields a single
/// absent branch; over an empty sequence it yields nothing. The record is
/// never mutated.
pub fn resolve<'a>(path: &PathExpr, record: &'a Value) -> Vec<Resolution<'a>> {
    let mut out = Vec::new();
    walk(path.segments(), Lookup::of(record), IndexTuple::new(), &mut out);
    log::trace!("Resolved '{}' into {} branch(es).", path, out.len());
    out
}

/// Resolves a path that is expected to produce a single value.
pub fn select<'a>(path: &PathExpr, record: &'a Value) -> Lookup<'a> {
    resolve(path, record)
        .into_iter()
        .next()
        .map(|r| r.value)
        .unwrap_or(Lookup::Absent)
}

fn walk<'a>(
    segments: &[PathSegment],
    current: Lookup<'a>,
    index: IndexTuple,
    out: &mut Vec<Resolution<'a>>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(Resolution { index, value: current });
        return;
    };
    if current.is_absent() {
        out.push(Resolution { index, value: Lookup::Absent });
        return;
    }

    match head {
        PathSegment::Key(key) => walk(rest, current.field(key), index, out),
        PathSegment::Index(position) => walk(rest, current.index(*position), index, out),
        PathSegment::Each => match current.items() {
            Some(items) => {
                for (position, item) in items.iter().enumerate() {
                    walk(rest, Lookup::of(item), index.extended(position), out);
                }
            }
            None => out.push(Resolution { index, value: Lookup::Absent }),
        },
    }
}
