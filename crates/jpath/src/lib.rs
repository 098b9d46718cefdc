//! Source path expressions for loosely-structured JSON records.
//!
//! A source path addresses a value inside a record with `.key` steps, fixed
//! `[n]` indices and a repetition placeholder that fans out over every element
//! of a sequence. Resolution never fails: anything that cannot be reached is
//! reported as absent, tagged with the index tuple of the branch that missed.

pub mod ast;
pub mod engine;
pub mod error;
mod parser;
pub mod value;

// --- Public API ---
pub use ast::{IndexTuple, PathExpr, PathSegment};
pub use engine::{Resolution, resolve, select};
pub use error::JPathError;
pub use parser::{DEFAULT_PLACEHOLDER, parse_path};
pub use value::Lookup;
