//! Defines the unified error type for all caller-facing operations.

use icsr_assembler::GenerationError;
use icsr_mapping::FormatError;
use icsr_schema::SchemaError;
use icsr_source::SourceError;
use icsr_traits::ExecutorError;
use icsr_xml::XmlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Mapping table error: {0}")]
    Format(#[from] FormatError),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("XML rendering error: {0}")]
    Xml(#[from] XmlError),
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),
    #[error("Input error: {0}")]
    Source(#[from] SourceError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}
