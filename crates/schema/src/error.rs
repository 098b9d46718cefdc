use thiserror::Error;

/// A configuration problem in the schema or in how a mapping table uses it.
///
/// Always raised before any record is processed.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("tag '{tag}' does not match the tag grammar: {reason}")]
    TagGrammar { tag: String, reason: String },

    #[error("failed to parse schema definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema is invalid: {0}")]
    Invalid(String),

    #[error("tag '{tag}': no group definition for ancestor segment '{segment}'")]
    UnknownGroup { tag: String, segment: String },

    #[error("tag '{tag}': no field definition")]
    UnknownField { tag: String },

    #[error("'{tag}' refers to unknown anchor '{anchor}'")]
    UnknownAnchor { tag: String, anchor: String },

    #[error("'{tag}' declares an anchor but is not a top-level segment")]
    NestedAnchor { tag: String },

    #[error("tag '{tag}': transparent group '{segment}' cannot repeat")]
    TransparentRepeat { tag: String, segment: String },

    #[error("tag '{tag}': repeated leaf needs a host element")]
    RepeatedLeafWithoutHost { tag: String },

    #[error("tag '{tag}': attribute '{attribute}' is fixed on its host element")]
    FixedAttribute { tag: String, attribute: String },

    #[error("tag '{tag}': unknown transform '{name}'")]
    UnknownTransform { tag: String, name: String },

    #[error("tag '{tag}': fields sharing slot '{slot}' declare different host elements")]
    SlotConflict { tag: String, slot: String },

    #[error(
        "tag '{tag}': source path has {placeholders} placeholder(s) but only {available} segment(s) can repeat"
    )]
    Placeholder {
        tag: String,
        placeholders: usize,
        available: usize,
    },
}
