#![allow(dead_code)]

pub mod fixtures;

use icsr::{Pipeline, PipelineBuilder, PipelineError};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const MESSAGE_ID: &str = "MSG-0001";
pub const CREATION_TIME: &str = "20240301120000";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The built-in mapping and schema with fixed generation parameters.
pub fn builtin_pipeline() -> Result<Pipeline, PipelineError> {
    init_logger();
    PipelineBuilder::new()
        .with_param("message_id", MESSAGE_ID)
        .with_param("creation_time", CREATION_TIME)
        .with_worker_count(1)
        .build()
}

/// Rendered XML for one record, as a string.
pub fn generate_xml(pipeline: &Pipeline, record: &Value) -> Result<String, Box<dyn std::error::Error>> {
    Ok(String::from_utf8(pipeline.generate(record)?)?)
}

/// The first element with the given local name.
pub fn first<'a, 'i>(doc: &'a roxmltree::Document<'i>, name: &str) -> Option<roxmltree::Node<'a, 'i>> {
    doc.descendants().find(|n| n.has_tag_name(name))
}

/// Element children with the given local name.
pub fn children<'a, 'i>(node: roxmltree::Node<'a, 'i>, name: &str) -> Vec<roxmltree::Node<'a, 'i>> {
    node.children().filter(|n| n.has_tag_name(name)).collect()
}

/// Follows a `/`-separated chain of element names, taking the first match at each step.
pub fn descend<'a, 'i>(node: roxmltree::Node<'a, 'i>, path: &str) -> Option<roxmltree::Node<'a, 'i>> {
    path.split('/')
        .try_fold(node, |current, step| current.children().find(|n| n.has_tag_name(step)))
}
