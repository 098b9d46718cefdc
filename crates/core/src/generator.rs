use crate::error::PipelineError;
use icsr_assembler::{Blueprint, FunctionRegistry, GenerationParams};
use icsr_mapping::{MappingConventions, MappingTable};
use icsr_schema::Schema;
use icsr_source::unwrap_envelope;
use icsr_tree::OutputNode;
use serde_json::Value;
use std::sync::Arc;

/// The built-in mapping table source (`tag,source_path` CSV).
pub const BUILTIN_MAPPING_CSV: &str = include_str!("../assets/e2b_r3_mapping.csv");

/// The mapping table that ships with the crate, for `pv_case` records.
pub fn builtin_mapping() -> Result<MappingTable, PipelineError> {
    Ok(MappingTable::from_csv_str(
        BUILTIN_MAPPING_CSV,
        MappingConventions::default(),
    )?)
}

/// A mapping table compiled against a schema, ready for any number of
/// records. Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Generator {
    mapping: Arc<MappingTable>,
    blueprint: Arc<Blueprint>,
}

impl Generator {
    pub fn new(mapping: MappingTable, schema: &Schema) -> Result<Self, PipelineError> {
        Self::with_functions(mapping, schema, &FunctionRegistry::default())
    }

    pub fn with_functions(
        mapping: MappingTable,
        schema: &Schema,
        functions: &FunctionRegistry,
    ) -> Result<Self, PipelineError> {
        let blueprint = Blueprint::compile(&mapping, schema, functions)?;
        log::debug!(
            "Compiled {} mapping entries against schema '{}' v{}.",
            mapping.len(),
            schema.name,
            schema.version
        );
        Ok(Self {
            mapping: Arc::new(mapping),
            blueprint: Arc::new(blueprint),
        })
    }

    /// The built-in mapping over the built-in E2B R3 schema.
    pub fn builtin() -> Result<Self, PipelineError> {
        Self::new(builtin_mapping()?, &Schema::builtin()?)
    }

    pub fn mapping(&self) -> &MappingTable {
        &self.mapping
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    /// Assembles one record, looking through transport envelopes first.
    pub fn generate(
        &self,
        record: &Value,
        params: &GenerationParams,
    ) -> Result<OutputNode, PipelineError> {
        Ok(self.blueprint.assemble(unwrap_envelope(record), params)?)
    }

    pub fn generate_xml(
        &self,
        record: &Value,
        params: &GenerationParams,
        pretty: bool,
    ) -> Result<Vec<u8>, PipelineError> {
        let root = self.generate(record, params)?;
        Ok(icsr_xml::render(&root, pretty)?)
    }
}
