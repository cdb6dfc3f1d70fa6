//! Compute backend trait and device abstraction.
//!
//! The [`ComputeBackend`] trait abstracts over execution environments so the
//! sweep drivers in [`crate::sweep`] stay device-agnostic. Sweeps decompose
//! into independent scalar samples (one extinction value per grid point),
//! which is what [`ComputeBackend::map_indexed`] parallelises.

use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("backend not available: {0}")]
    Unavailable(String),

    /// A single sweep sample failed; `index` locates it in the request.
    #[error("sweep item {index} failed: {message}")]
    ItemFailed { index: usize, message: String },
}

/// Describes the capabilities of a compute backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    pub memory_bytes: Option<usize>,
    pub compute_units: Option<usize>,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Cpu,
}

/// Abstraction over compute backends.
///
/// Sweep drivers operate against this trait; implementations decide how the
/// independent samples are scheduled.
pub trait ComputeBackend: Send + Sync {
    /// Return information about the device.
    fn device_info(&self) -> DeviceInfo;

    /// Evaluate `task` for every index in `0..count`, preserving order.
    ///
    /// The returned vector holds `task(i)` at position `i` regardless of the
    /// execution schedule. The first failing item aborts the map.
    fn map_indexed(
        &self,
        count: usize,
        task: &(dyn Fn(usize) -> Result<f64, ComputeError> + Send + Sync),
    ) -> Result<Vec<f64>, ComputeError>;
}
