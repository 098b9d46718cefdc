//! Executor implementations for batch generation.
//!
//! - [`RayonExecutor`]: work-stealing thread pool (feature: `rayon`)
//! - [`SyncExecutor`]: sequential execution (re-exported from icsr-traits)

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use icsr_traits::{Executor, ExecutorError, SyncExecutor};

/// A concrete executor chosen at runtime.
///
/// `Executor` has generic methods and so cannot be a trait object; this enum
/// stands in for `dyn Executor`.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    Sync(SyncExecutor),

    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    /// Picks an executor for a worker count: `None` means "as many as the
    /// machine offers", `Some(1)` means sequential.
    pub fn for_workers(workers: Option<usize>) -> Result<Self, ExecutorError> {
        match workers {
            Some(0) => Err(ExecutorError::InvalidWorkers(0)),
            Some(1) => Ok(ExecutorImpl::Sync(SyncExecutor::new())),
            #[cfg(feature = "rayon")]
            Some(n) => Ok(ExecutorImpl::Rayon(RayonExecutor::with_threads(n)?)),
            #[cfg(feature = "rayon")]
            None => Ok(ExecutorImpl::Rayon(RayonExecutor::new())),
            #[cfg(not(feature = "rayon"))]
            _ => Ok(ExecutorImpl::Sync(SyncExecutor::new())),
        }
    }
}

impl Executor for ExecutorImpl {
    fn map_ordered<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.map_ordered(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.map_ordered(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            ExecutorImpl::Rayon(RayonExecutor::new())
        }
        #[cfg(not(feature = "rayon"))]
        {
            ExecutorImpl::Sync(SyncExecutor::new())
        }
    }
}
