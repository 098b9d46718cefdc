//! Defines the parsed form of a source path.
use std::fmt;

/// A single step of a source path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key (e.g., `.name`).
    Key(String),
    /// A fixed position in a sequence (e.g., `[0]`).
    Index(usize),
    /// The repetition placeholder: one branch per element of the sequence.
    Each,
}

/// A parsed source path, kept together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PathExpr {
    pub fn new(raw: impl Into<String>, segments: Vec<PathSegment>) -> Self {
        Self {
            raw: raw.into(),
            segments,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of repetition placeholders, i.e. the length of every index tuple
    /// produced for a present value.
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Each))
            .count()
    }

    pub fn is_repetitive(&self) -> bool {
        self.placeholder_count() > 0
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The positions that produced a resolved value, one per placeholder,
/// ordered outer-to-inner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexTuple(Vec<usize>);

impl IndexTuple {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<usize> {
        self.0.get(depth).copied()
    }

    /// Returns a new tuple extended by one inner position.
    pub fn extended(&self, position: usize) -> Self {
        let mut next = self.0.clone();
        next.push(position);
        Self(next)
    }
}

impl From<Vec<usize>> for IndexTuple {
    fn from(v: Vec<usize>) -> Self {
        Self(v)
    }
}

impl fmt::Display for IndexTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, pos) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pos)?;
        }
        write!(f, "]")
    }
}
