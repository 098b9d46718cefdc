//! Rayon-backed executor.

use icsr_traits::{Executor, ExecutorError};
use rayon::prelude::*;
use std::sync::Arc;

/// Fans records out over a rayon thread pool.
///
/// [`RayonExecutor::new`] uses rayon's global pool. [`RayonExecutor::with_threads`]
/// builds a dedicated pool of the given size, leaving the global pool alone.
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self { pool: None }
    }

    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        if threads == 0 {
            return Err(ExecutorError::InvalidWorkers(threads));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("icsr-worker-{i}"))
            .build()
            .map_err(|e| ExecutorError::PoolBuild(e.to_string()))?;
        log::debug!("Built rayon pool with {} threads", threads);
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn map_ordered<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        // Indexed parallel iterators collect in input order.
        match &self.pool {
            Some(pool) => pool.install(|| items.into_par_iter().map(&f).collect()),
            None => items.into_par_iter().map(&f).collect(),
        }
    }

    fn parallelism(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}
