//! Complex resonance frequencies by damped Newton iteration on the
//! determinant of the coupled-dipole system matrix.
//!
//! A collective lattice resonance is a zero of $\det A(w, q)$ continued into
//! the complex frequency plane, where $A$ is the eigenproblem matrix of
//! [`crate::assembly`]. The determinant is analytic in $w$, so a single
//! central difference along the real axis supplies the full complex
//! derivative through the Cauchy-Riemann relations, and the Newton step
//! $\Delta w = \det A / (\det A)'$ walks the iterate off the axis towards the
//! pole. Steps that increase the residual are halved a few times before being
//! accepted, which keeps the iteration from jumping between basins when the
//! starting guess sits on a steep flank.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::assembly;
use crate::error::CoreError;
use crate::greens::EwaldSum;
use crate::lattice::cells::UnitCell;
use crate::linalg;
use crate::types::{Particle, ResonanceRoot};

fn default_max_iterations() -> usize {
    40
}

fn default_step_tolerance() -> f64 {
    1e-10
}

fn default_fd_step() -> f64 {
    1e-6
}

/// Tuning knobs of the Newton refinement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewtonOptions {
    /// Iteration cap before the search gives up.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Step magnitude (eV) below which the iterate counts as converged.
    #[serde(default = "default_step_tolerance")]
    pub step_tolerance: f64,
    /// Finite-difference stencil width (eV) for the determinant derivative.
    #[serde(default = "default_fd_step")]
    pub fd_step: f64,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            step_tolerance: default_step_tolerance(),
            fd_step: default_fd_step(),
        }
    }
}

/// Determinant of the coupled-dipole system matrix at a complex frequency.
///
/// # Errors
/// Fails when the matrix cannot be assembled or its determinant overflows.
pub fn system_determinant(
    engine: &mut EwaldSum,
    frequency: Complex64,
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
) -> Result<Complex64, CoreError> {
    let matrix = assembly::eigenproblem_matrix(engine, frequency, q, cell, particle)?;
    let value = linalg::determinant(&matrix);
    if !(value.re.is_finite() && value.im.is_finite()) {
        return Err(CoreError::LinAlg(format!(
            "determinant overflow at w = {frequency} eV"
        )));
    }
    Ok(value)
}

/// Refines a resonance guess into a complex root of the system determinant.
///
/// The iterate is left untouched by steps smaller than the tolerance; if the
/// iteration cap is reached first, the last iterate is returned with
/// `converged = false` so a sweep can keep the best available estimate.
///
/// # Arguments
/// * `engine` - Ewald engine built from the same `cell`.
/// * `start` - Starting frequency (eV), typically the extinction peak.
/// * `q` - Bloch wavevector (m⁻¹).
/// * `cell` - Unit cell supplying the particle positions.
/// * `particle` - Shared particle material and size.
/// * `options` - Iteration cap, step tolerance and stencil width.
///
/// # Errors
/// Propagates assembly and determinant failures at any probed frequency.
pub fn refine_resonance(
    engine: &mut EwaldSum,
    start: Complex64,
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
    options: NewtonOptions,
) -> Result<ResonanceRoot, CoreError> {
    let mut frequency = start;

    for iteration in 0..options.max_iterations {
        let value = system_determinant(engine, frequency, q, cell, particle)?;
        let h = Complex64::from(options.fd_step);
        let forward = system_determinant(engine, frequency + h, q, cell, particle)?;
        let backward = system_determinant(engine, frequency - h, q, cell, particle)?;
        let derivative = (forward - backward) / (2.0 * options.fd_step);
        if derivative.norm() == 0.0 {
            return Ok(ResonanceRoot {
                frequency,
                residual: value.norm(),
                iterations: iteration,
                converged: false,
            });
        }

        let step = value / derivative;
        let mut scale = 1.0;
        for _ in 0..8 {
            let probe = system_determinant(engine, frequency - scale * step, q, cell, particle)?;
            if probe.norm() <= value.norm() {
                break;
            }
            scale *= 0.5;
        }

        frequency -= scale * step;
        if (scale * step).norm() < options.step_tolerance {
            let residual = system_determinant(engine, frequency, q, cell, particle)?.norm();
            return Ok(ResonanceRoot {
                frequency,
                residual,
                iterations: iteration + 1,
                converged: true,
            });
        }
    }

    let residual = system_determinant(engine, frequency, q, cell, particle)?.norm();
    Ok(ResonanceRoot {
        frequency,
        residual,
        iterations: options.max_iterations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greens::EwaldParams;
    use crate::types::Units;
    use approx::assert_abs_diff_eq;

    const SPACING: f64 = 15e-9;

    fn square_cell() -> UnitCell {
        UnitCell::Square {
            spacing: SPACING,
            scaling: 1.0,
        }
    }

    fn standard_particle() -> Particle {
        Particle {
            radius: 5e-9,
            plasma_frequency: 6.18,
            loss: 0.01,
        }
    }

    fn engine(cell: &UnitCell) -> EwaldSum {
        EwaldSum::new(cell, EwaldParams::default(), Units::default()).unwrap()
    }

    #[test]
    fn newton_walks_the_grid_peak_to_the_complex_pole() {
        let cell = square_cell();
        let mut ewald = engine(&cell);
        let root = refine_resonance(
            &mut ewald,
            Complex64::from(5.115_168_539_325_843),
            [0.0, 0.0],
            &cell,
            &standard_particle(),
            NewtonOptions::default(),
        )
        .unwrap();

        assert!(root.converged);
        assert!(root.iterations >= 2);
        assert_abs_diff_eq!(root.frequency.re, 5.112_884_867, epsilon = 1e-6);
        assert_abs_diff_eq!(root.frequency.im, 0.005_057_817, epsilon = 1e-6);
    }

    #[test]
    fn exhausted_iteration_budget_returns_best_effort() {
        let cell = square_cell();
        let mut ewald = engine(&cell);
        let options = NewtonOptions {
            max_iterations: 0,
            ..NewtonOptions::default()
        };
        let root = refine_resonance(
            &mut ewald,
            Complex64::from(5.0),
            [0.0, 0.0],
            &cell,
            &standard_particle(),
            options,
        )
        .unwrap();

        assert!(!root.converged);
        assert_eq!(root.iterations, 0);
        assert_eq!(root.frequency, Complex64::from(5.0));
        assert!(root.residual.is_finite());
    }
}
