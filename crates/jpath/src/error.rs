use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JPathError {
    #[error("Empty source path")]
    Empty,

    #[error("Source path parse error in '{0}': {1}")]
    Parse(String, String),
}
