use icsr_core::{GenerationParams, Generator, OutputNode, PipelineError};
use icsr_executor::{Executor, ExecutorImpl};
use icsr_source::RecordSource;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// A compiled generator bound to an executor. Shareable across threads;
/// records never see each other's state.
#[derive(Debug, Clone)]
pub struct Pipeline {
    generator: Generator,
    executor: ExecutorImpl,
    params: GenerationParams,
    pretty: bool,
}

impl Pipeline {
    pub(super) fn new(
        generator: Generator,
        executor: ExecutorImpl,
        params: GenerationParams,
        pretty: bool,
    ) -> Self {
        Self {
            generator,
            executor,
            params,
            pretty,
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Builds the output tree for one record with the pipeline's parameters.
    pub fn generate_tree(&self, record: &Value) -> Result<OutputNode, PipelineError> {
        self.generator.generate(record, &self.params)
    }

    /// Generates the XML bytes for one record.
    pub fn generate(&self, record: &Value) -> Result<Vec<u8>, PipelineError> {
        self.generate_with(record, &self.params)
    }

    /// Generates one record with parameters that replace the pipeline's own.
    pub fn generate_with(
        &self,
        record: &Value,
        params: &GenerationParams,
    ) -> Result<Vec<u8>, PipelineError> {
        self.generator.generate_xml(record, params, self.pretty)
    }

    /// Generates every record, one result per record in input order. A
    /// failing record does not affect the others.
    pub fn generate_all(&self, records: Vec<Value>) -> Vec<Result<Vec<u8>, PipelineError>> {
        let batch = records
            .into_iter()
            .map(|record| (record, self.params.clone()))
            .collect();
        self.generate_batch(batch)
    }

    /// Like [`generate_all`](Self::generate_all), with per-record parameters.
    pub fn generate_batch(
        &self,
        batch: Vec<(Value, GenerationParams)>,
    ) -> Vec<Result<Vec<u8>, PipelineError>> {
        let start = Instant::now();
        let count = batch.len();
        log::info!(
            "Generating {} message(s) with the '{}' executor ({} worker(s)).",
            count,
            self.executor.name(),
            self.executor.parallelism()
        );

        let results = self
            .executor
            .map_ordered(batch, |(record, params)| self.generate_with(&record, &params));

        let failed = results.iter().filter(|r| r.is_err()).count();
        log::info!(
            "Generated {} of {} message(s) in {:.2?}.",
            count - failed,
            count,
            start.elapsed()
        );
        results
    }

    /// Drains a record source through [`generate_all`](Self::generate_all).
    pub fn generate_source(
        &self,
        source: &mut dyn RecordSource,
    ) -> Vec<Result<Vec<u8>, PipelineError>> {
        self.generate_all(source.collect_all())
    }

    pub fn generate_to_file<P: AsRef<Path>>(
        &self,
        record: &Value,
        path: P,
    ) -> Result<(), PipelineError> {
        let bytes = self.generate(record)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
