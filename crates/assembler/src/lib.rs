//! Tree assembly: places every resolved mapping value under the right,
//! index-consistent ancestor instance of a schema-shaped output tree.
//!
//! [`Blueprint::compile`] runs once per mapping table and schema and reports
//! configuration problems as [`SchemaError`](icsr_schema::SchemaError).
//! [`Blueprint::assemble`] runs once per record and owns the tree it builds.

mod blueprint;
mod draft;
pub mod error;
pub mod functions;
mod params;

pub use blueprint::Blueprint;
pub use error::GenerationError;
pub use functions::{FunctionRegistry, LeafFunction, hl7_date};
pub use params::GenerationParams;
