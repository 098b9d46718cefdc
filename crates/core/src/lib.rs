//! # icsr-core
//!
//! Caller-facing API of the generator: load a mapping table, generate an
//! output tree for a record, render it.
//!
//! ```ignore
//! let mapping = icsr_core::load_mapping(&std::fs::read_to_string("mapping.csv")?)?;
//! let root = icsr_core::generate(&mapping, &record)?;
//! let xml = icsr_core::render(&root, true)?;
//! ```
//!
//! [`Generator`] does the same with the schema compilation done once, for
//! callers that process many records.

// Re-export foundation and algorithm crates
pub use icsr_assembler as assembler;
pub use icsr_jpath as jpath;
pub use icsr_mapping as mapping;
pub use icsr_schema as schema;
pub use icsr_source as source;
pub use icsr_traits as traits;
pub use icsr_tree as tree;

pub mod error;
mod generator;

pub use error::PipelineError;
pub use generator::{BUILTIN_MAPPING_CSV, Generator, builtin_mapping};

pub use icsr_assembler::{Blueprint, FunctionRegistry, GenerationError, GenerationParams};
pub use icsr_mapping::{FormatError, MappingConventions, MappingEntry, MappingTable, RawRow};
pub use icsr_schema::{Schema, SchemaError};
pub use icsr_tree::OutputNode;

use serde_json::Value;

/// Parses a mapping table from CSV text (`tag,source_path`).
pub fn load_mapping(text: &str) -> Result<MappingTable, PipelineError> {
    Ok(icsr_mapping::load_mapping(text)?)
}

/// Parses a mapping table from rows that were already split into cells.
pub fn load_mapping_rows(rows: Vec<RawRow>) -> Result<MappingTable, PipelineError> {
    Ok(MappingTable::parse(rows, MappingConventions::default())?)
}

/// Generates the output tree for one record against the built-in schema.
///
/// Compiles the mapping on every call and fills no generation parameters;
/// use a [`Generator`] for batches or to set the message id.
pub fn generate(mapping: &MappingTable, record: &Value) -> Result<OutputNode, PipelineError> {
    let schema = Schema::builtin()?;
    let blueprint = Blueprint::compile(mapping, &schema, &FunctionRegistry::default())?;
    Ok(blueprint.assemble(
        icsr_source::unwrap_envelope(record),
        &GenerationParams::default(),
    )?)
}

/// Renders a tree to UTF-8 XML bytes.
pub fn render(root: &OutputNode, pretty: bool) -> Result<Vec<u8>, PipelineError> {
    Ok(icsr_xml::render(root, pretty)?)
}
