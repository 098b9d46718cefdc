//! Mapping tables: which source path feeds which hierarchical tag.
//!
//! A table is loaded once from a two-column sheet (`tag`, `source_path`)
//! and is immutable afterwards, so it can be shared across threads.

mod conventions;
mod csv;
mod error;
mod table;

pub use conventions::MappingConventions;
pub use csv::{RawRow, read_rows};
pub use error::FormatError;
pub use table::{MappingEntry, MappingTable};

/// Loads a table from CSV text using the default conventions.
pub fn load_mapping(text: &str) -> Result<MappingTable, FormatError> {
    MappingTable::from_csv_str(text, MappingConventions::default())
}
