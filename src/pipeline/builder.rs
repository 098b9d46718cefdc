use super::orchestrator::Pipeline;
use icsr_core::assembler::LeafFunction;
use icsr_core::{
    FunctionRegistry, GenerationParams, Generator, MappingTable, PipelineError, Schema,
    builtin_mapping,
};
use icsr_executor::ExecutorImpl;
use std::fs;
use std::io;
use std::path::Path;

/// A builder for creating a [`Pipeline`].
///
/// Without a mapping or schema the built-in E2B R3 ones are used.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    mapping: Option<MappingTable>,
    schema: Option<Schema>,
    functions: FunctionRegistry,
    params: GenerationParams,
    workers: Option<usize>,
    compact: bool,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads the mapping table from a CSV file.
    pub fn with_mapping_file<P: AsRef<Path>>(self, path: P) -> Result<Self, PipelineError> {
        let text = read_config(path.as_ref(), "mapping table")?;
        self.with_mapping_source(&text)
    }

    pub fn with_mapping_source(mut self, text: &str) -> Result<Self, PipelineError> {
        self.mapping = Some(icsr_core::load_mapping(text)?);
        Ok(self)
    }

    pub fn with_mapping(mut self, mapping: MappingTable) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Loads a schema configuration from a JSON file.
    pub fn with_schema_file<P: AsRef<Path>>(self, path: P) -> Result<Self, PipelineError> {
        let text = read_config(path.as_ref(), "schema")?;
        self.with_schema_source(&text)
    }

    pub fn with_schema_source(mut self, text: &str) -> Result<Self, PipelineError> {
        self.schema = Some(Schema::from_json_str(text)?);
        Ok(self)
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Registers a leaf function that field definitions can name as `transform`.
    pub fn with_function(mut self, name: &str, function: LeafFunction) -> Self {
        self.functions.register(name, function);
        self
    }

    /// Sets a generation parameter (`message_id`, `creation_time`, ...).
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(name, value);
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Number of records generated at once. `1` runs sequentially; unset
    /// uses every available core.
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Emits compact XML instead of indented XML.
    pub fn with_compact_output(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Compiles the mapping against the schema. Every load-time error
    /// (unknown tags, placeholder counts, anchors) surfaces here.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let mapping = match self.mapping {
            Some(mapping) => mapping,
            None => builtin_mapping()?,
        };
        let schema = match self.schema {
            Some(schema) => schema,
            None => Schema::builtin()?,
        };
        if mapping.materialized().next().is_none() {
            log::warn!("Mapping table has no materialized entries; every message will be the bare skeleton.");
        }

        let generator = Generator::with_functions(mapping, &schema, &self.functions)?;
        let executor = ExecutorImpl::for_workers(self.workers)?;
        log::debug!(
            "Pipeline ready: schema '{}' v{}, {} leaves, executor '{}'.",
            schema.name,
            schema.version,
            generator.blueprint().tags().count(),
            icsr_executor::Executor::name(&executor)
        );

        Ok(Pipeline::new(generator, executor, self.params, !self.compact))
    }
}

fn read_config(path: &Path, what: &str) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}
