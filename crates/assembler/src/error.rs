use icsr_jpath::IndexTuple;
use thiserror::Error;

/// An internal contradiction found while assembling one record.
///
/// Fatal to that generation run only; the blueprint stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("tag '{tag}' at index {index}: leaf is already set on this element")]
    DuplicateLeaf { tag: String, index: IndexTuple },

    #[error("tag '{tag}' at index {index}: expected {expected} index component(s)")]
    IndexMismatch {
        tag: String,
        index: IndexTuple,
        expected: usize,
    },

    #[error("tag '{tag}': anchor '{anchor}' is missing from the output skeleton")]
    MissingAnchor { tag: String, anchor: String },
}
