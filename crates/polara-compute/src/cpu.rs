//! CPU compute backend using Rayon for shared-memory parallelism.

use crate::backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};

/// CPU backend that parallelises work across threads via Rayon.
///
/// [`CpuBackend::new`] schedules on the global Rayon pool;
/// [`CpuBackend::with_threads`] owns a dedicated pool so a configured thread
/// cap actually holds.
pub struct CpuBackend {
    pool: Option<rayon::ThreadPool>,
    num_threads: usize,
}

impl CpuBackend {
    /// Create a CPU backend on the global thread pool.
    pub fn new() -> Self {
        Self {
            pool: None,
            num_threads: rayon::current_num_threads(),
        }
    }

    /// Create a CPU backend with a dedicated pool of `num_threads` threads.
    ///
    /// A count of zero falls back to one thread per available core.
    ///
    /// # Errors
    /// [`ComputeError::Unavailable`] when the pool cannot be spawned.
    pub fn with_threads(num_threads: usize) -> Result<Self, ComputeError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|err| ComputeError::Unavailable(err.to_string()))?;
        let num_threads = pool.current_num_threads();
        Ok(Self {
            pool: Some(pool),
            num_threads,
        })
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU ({} threads)", self.num_threads),
            backend_type: BackendType::Cpu,
            memory_bytes: None,
            compute_units: Some(self.num_threads),
        }
    }

    fn map_indexed(
        &self,
        count: usize,
        task: &(dyn Fn(usize) -> Result<f64, ComputeError> + Send + Sync),
    ) -> Result<Vec<f64>, ComputeError> {
        use rayon::prelude::*;

        let run = || -> Result<Vec<f64>, ComputeError> {
            (0..count).into_par_iter().map(task).collect()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}
