//! # Polara Compute
//!
//! Compute backend abstraction for the Polara framework. A
//! [`ComputeBackend`](backend::ComputeBackend) schedules the independent
//! samples of a spectral sweep; [`sweep`] provides drivers that mirror the
//! sequential sweeps of `polara-core` while fanning the work out across a
//! backend.
//!
//! The CPU backend ([`CpuBackend`]) parallelises through Rayon. The trait
//! boundary keeps room for offload backends without touching the physics
//! code.

pub mod backend;
pub mod cpu;
pub mod sweep;

pub use backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};
pub use cpu::CpuBackend;
pub use sweep::{band_map_parallel, extinction_spectrum_parallel};
