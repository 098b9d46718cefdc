use icsr_jpath::JPathError;
use thiserror::Error;

/// A malformed mapping row. Fatal to loading the table it belongs to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("line {line}: expected 2 columns (tag, source_path), found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("line {line}: empty tag")]
    EmptyTag { line: usize },

    #[error("line {line}: duplicate tag '{tag}' (first defined on line {first_line})")]
    DuplicateTag {
        line: usize,
        tag: String,
        first_line: usize,
    },

    #[error("line {line}: tag '{tag}' has an invalid source path: {source}")]
    Path {
        line: usize,
        tag: String,
        #[source]
        source: JPathError,
    },

    #[error(
        "line {line}: tag '{tag}': placeholder usage in '{path}' does not parse as repetition (expected '{placeholder}')"
    )]
    Placeholder {
        line: usize,
        tag: String,
        path: String,
        placeholder: String,
    },

    #[error("line {line}: {message}")]
    Csv { line: usize, message: String },
}
