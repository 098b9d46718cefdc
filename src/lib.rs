//! # icsr
//!
//! Generates E2B R3 ICSR XML messages from JSON case records, driven by a
//! mapping table (`tag,source_path`) and a schema configuration.
//!
//! The library layer lives in [`icsr_core`]; this crate adds the batch
//! [`Pipeline`] and the `icsr` command-line tool.
//!
//! ```ignore
//! use icsr::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_mapping_file("mapping.csv")?
//!     .with_param("message_id", "MSG-1")
//!     .build()?;
//! let xml = pipeline.generate(&record)?;
//! ```

pub mod pipeline;

pub use icsr_core::{
    BUILTIN_MAPPING_CSV, Blueprint, FunctionRegistry, GenerationError, GenerationParams, Generator,
    MappingTable, OutputNode, PipelineError, Schema, SchemaError, builtin_mapping, generate,
    load_mapping, render,
};
pub use icsr_executor::{Executor, ExecutorImpl};
pub use icsr_source::{RecordSource, VecDataSource, read_records};
pub use pipeline::{Pipeline, PipelineBuilder};
