//! Lattice Green's functions for in-plane dipoles on 2D periodic arrays.
//!
//! Two summation strategies produce the same quantities:
//!
//! * [`direct`] sums the free-space kernels of [`kernel`] term by term over a
//!   truncated lattice. The terms decay like $R^{-1/2}$, so the partial sums
//!   converge slowly and only in the Cesàro sense; the module exists for
//!   cross-validation and small sanity scans.
//! * [`ewald`] splits each sum into a Gaussian-filtered reciprocal part and
//!   an exponentially screened real part. Both halves converge in a handful
//!   of shells and the total is independent of the splitting parameter.
//!
//! All sums are Bloch-phased: every lattice term carries $e^{i\mathbf{q}
//! \cdot \mathbf{R}}$ for the in-plane wavevector $\mathbf{q}$.

pub mod direct;
pub mod ewald;
pub mod kernel;

pub use ewald::{EwaldParams, EwaldSum};
pub use kernel::{DyadicComponent, DyadicValue};
