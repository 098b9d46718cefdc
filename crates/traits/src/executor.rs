//! The execution seam for batch generation.
//!
//! A generation run is independent of every other run, so a batch is just a
//! map over records. Implementations decide how many of those run at once.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),

    #[error("Invalid worker count: {0}")]
    InvalidWorkers(usize),
}

/// Runs one closure per item.
///
/// Results come back in input order whatever the degree of parallelism, so
/// callers can zip them with their inputs.
pub trait Executor: Send + Sync {
    fn map_ordered<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync;

    /// How many items may be in flight at once.
    fn parallelism(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// Processes items one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn map_ordered<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}
