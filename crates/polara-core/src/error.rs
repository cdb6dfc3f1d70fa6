//! Error types shared across the crate.

use num_complex::Complex64;
use thiserror::Error;

/// Errors that can occur while building lattices or evaluating lattice sums.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The two basis vectors span zero area, so no reciprocal basis exists.
    #[error("degenerate lattice: a1 = ({a1x:.6e}, {a1y:.6e}) and a2 = ({a2x:.6e}, {a2y:.6e}) span zero area")]
    DegenerateLattice {
        a1x: f64,
        a1y: f64,
        a2x: f64,
        a2y: f64,
    },

    /// A special-function argument left the supported domain.
    #[error("{function}: argument {argument:.6e} outside the supported domain")]
    Domain {
        function: &'static str,
        argument: f64,
    },

    /// A lattice sum failed on a specific term. Carries the full evaluation
    /// context so batch sweeps can report exactly which item broke.
    #[error("lattice sum at w = {frequency} eV, q = ({qx:.6e}, {qy:.6e}) m^-1 failed on point ({px:.6e}, {py:.6e}) m: {reason}")]
    LatticeSum {
        frequency: Complex64,
        qx: f64,
        qy: f64,
        px: f64,
        py: f64,
        reason: String,
    },

    /// The assembled interaction matrix contains a non-finite entry,
    /// typically from a wavevector sitting numerically on the light line.
    #[error("non-finite interaction matrix entry ({row}, {col}) at w = {frequency} eV, q = ({qx:.6e}, {qy:.6e}) m^-1")]
    NonFinite {
        frequency: Complex64,
        qx: f64,
        qy: f64,
        row: usize,
        col: usize,
    },

    /// Dense linear algebra failure (singular system, non-finite result).
    #[error("linear algebra: {0}")]
    LinAlg(String),
}
