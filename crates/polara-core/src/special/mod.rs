//! Special functions used by the Green's-function kernels.
//!
//! The lattice sums need cylinder functions ($J_0$, $J_1$, $Y_0$, $Y_1$ and
//! the first-kind Hankel functions built from them) together with the
//! generalised exponential integrals $E_n$ and the exponential integral
//! $\mathrm{Ei}$. They are implemented in-crate from the classical series and
//! continued-fraction expansions (Abramowitz & Stegun, ch. 5 and 9), which
//! cover the full argument range the engine produces with at least twelve
//! significant digits.

mod bessel;
mod expint;

pub use bessel::{bessel_j0, bessel_j1, bessel_y0, bessel_y1, hankel1};
pub use expint::{expi, expi_complex, expn};

/// Euler-Mascheroni constant.
pub(crate) const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
