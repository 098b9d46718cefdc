//! Batch generation.
//!
//! - [`PipelineBuilder`]: collects the mapping, schema, leaf functions,
//!   generation parameters and worker count
//! - [`Pipeline`]: a compiled [`Generator`](icsr_core::Generator) plus an
//!   executor; every record is an independent run

mod builder;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::Pipeline;
