//! Term-by-term Bloch-phased lattice sums of the free-space kernels.
//!
//! Each term is a [`kernel`] evaluation at `position - R` weighted by
//! $e^{i\mathbf{q}\cdot\mathbf{R}}$, summed over a pre-truncated point set.
//! The terms fall off like $R^{-1/2}$, so truncated totals oscillate around
//! the converged value and settle only in the Cesàro sense; these sums are
//! the slow reference the Ewald engine is validated against.
//!
//! Callers choose the point set: include the origin for source and observer
//! in different cells, exclude it for the self-interaction sum.

use num_complex::Complex64;

use super::kernel::{self, DyadicValue};
use crate::error::CoreError;
use crate::types::Units;

fn bloch_phase(q: [f64; 2], point: [f64; 2]) -> Complex64 {
    Complex64::new(0.0, q[0] * point[0] + q[1] * point[1]).exp()
}

fn term_failure(frequency_ev: f64, q: [f64; 2], point: [f64; 2], source: CoreError) -> CoreError {
    CoreError::LatticeSum {
        frequency: Complex64::from(frequency_ev),
        qx: q[0],
        qy: q[1],
        px: point[0],
        py: point[1],
        reason: source.to_string(),
    }
}

/// Directly summed monopolar lattice Green's function
/// $\sum_\mathbf{R} \tfrac{i}{4} H_0^{(1)}(k |\mathbf{r} - \mathbf{R}|)
/// \, e^{i\mathbf{q}\cdot\mathbf{R}}$.
///
/// # Arguments
/// * `units` - Unit system fixing the eV-to-wavenumber conversion.
/// * `frequency_ev` - Real drive frequency (eV).
/// * `q` - Bloch wavevector (m⁻¹).
/// * `position` - Observation point relative to the cell origin (m).
/// * `points` - Truncated lattice point set, origin already in or out.
///
/// # Errors
/// Fails with full term context when `position` lands on a lattice point.
pub fn monopolar_sum(
    units: &Units,
    frequency_ev: f64,
    q: [f64; 2],
    position: [f64; 2],
    points: &[[f64; 2]],
) -> Result<Complex64, CoreError> {
    let k = units.wavenumber_real(frequency_ev);
    let mut total = Complex64::default();
    for &point in points {
        let dx = position[0] - point[0];
        let dy = position[1] - point[1];
        let term = kernel::scalar(k, dx.hypot(dy))
            .map_err(|err| term_failure(frequency_ev, q, point, err))?;
        total += term * bloch_phase(q, point);
    }
    Ok(total)
}

/// Directly summed full dyadic lattice Green's function (with the $k^2$
/// prefactor), one [`DyadicValue`] accumulated over the point set.
///
/// # Errors
/// Fails with full term context when `position` lands on a lattice point.
pub fn dyadic_sum(
    units: &Units,
    frequency_ev: f64,
    q: [f64; 2],
    position: [f64; 2],
    points: &[[f64; 2]],
) -> Result<DyadicValue, CoreError> {
    let k = units.wavenumber_real(frequency_ev);
    let mut total = DyadicValue::default();
    for &point in points {
        let displacement = [position[0] - point[0], position[1] - point[1]];
        let term = kernel::full(k, displacement)
            .map_err(|err| term_failure(frequency_ev, q, point, err))?;
        total += term * bloch_phase(q, point);
    }
    Ok(total)
}

/// Directly summed reduced dyadic lattice sum, the $k^2$-free companion of
/// [`dyadic_sum`]. Its converged value matches the Ewald reduced
/// self-interaction when summed at `position = 0` without the origin.
///
/// # Errors
/// Fails with full term context when `position` lands on a lattice point.
pub fn reduced_dyadic_sum(
    units: &Units,
    frequency_ev: f64,
    q: [f64; 2],
    position: [f64; 2],
    points: &[[f64; 2]],
) -> Result<DyadicValue, CoreError> {
    let k = units.wavenumber_real(frequency_ev);
    let mut total = DyadicValue::default();
    for &point in points {
        let displacement = [position[0] - point[0], position[1] - point[1]];
        let term = kernel::reduced(k, displacement)
            .map_err(|err| term_failure(frequency_ev, q, point, err))?;
        total += term * bloch_phase(q, point);
    }
    Ok(total)
}
