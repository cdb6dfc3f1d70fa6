//! High-symmetry Brillouin-zone paths and the vacuum light line.
//!
//! Band maps are sampled along the conventional irreducible-wedge circuits
//! ($\Gamma \to X \to M \to \Gamma$ and friends). Interior segments omit
//! their final point so that adjacent segments never duplicate a corner.

use super::cells::UnitCell;
use super::norm;
use crate::types::Units;

/// Evenly spaced samples from `start` towards `end`.
///
/// With `endpoint` the final sample is `end` itself (step
/// `(end - start)/(count - 1)`); without it the step is
/// `(end - start)/count` and `end` is left for the following segment.
pub fn linspace(start: f64, end: f64, count: usize, endpoint: bool) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let denom = if endpoint { (count - 1).max(1) } else { count } as f64;
    (0..count)
        .map(|i| start + (end - start) * i as f64 / denom)
        .collect()
}

/// Bloch wavevectors along the family's high-symmetry circuit.
///
/// `size` is the total sample budget: three equal segments of `size/3`
/// points for the three-leg circuits, two segments of `size/2` for the
/// honeycomb supercell's K→Γ→M path.
///
/// # Arguments
/// * `cell` - Lattice family, fixing both the circuit and its period.
/// * `size` - Total number of path points requested.
pub fn path_points(cell: &UnitCell, size: usize) -> Vec<[f64; 2]> {
    let l = cell.pitch();
    let pi = std::f64::consts::PI;
    let s3 = 3.0_f64.sqrt();
    match cell {
        UnitCell::Square { .. } => {
            let n = size / 3;
            let edge = pi / l;
            let mut path = Vec::with_capacity(3 * n);
            // Γ → X along qx.
            for x in linspace(0.0, edge, n, false) {
                path.push([x, 0.0]);
            }
            // X → M along qy at the zone edge.
            for y in linspace(0.0, edge, n, false) {
                path.push([edge, y]);
            }
            // M → Γ down the diagonal.
            for t in linspace(edge, 0.0, n, true) {
                path.push([t, t]);
            }
            path
        }
        UnitCell::Triangle { .. } => {
            let n = size / 3;
            let m_y = 2.0 * pi / (s3 * l);
            let k_x = 2.0 * pi / (3.0 * l);
            let mut path = Vec::with_capacity(3 * n);
            // Γ → M.
            for y in linspace(0.0, m_y, n, false) {
                path.push([0.0, y]);
            }
            // M → K along the zone boundary.
            for x in linspace(0.0, k_x, n, false) {
                path.push([x, m_y]);
            }
            // K → Γ.
            let xs = linspace(k_x, 0.0, n, true);
            let ys = linspace(m_y, 0.0, n, true);
            for (x, y) in xs.into_iter().zip(ys) {
                path.push([x, y]);
            }
            path
        }
        UnitCell::SimpleHoneycomb { .. } => {
            let n = size / 3;
            let m_x = 2.0 * pi / (3.0 * l);
            let k_y = 4.0 * pi / (3.0 * s3 * l);
            let mut path = Vec::with_capacity(3 * n);
            // Γ → M.
            for x in linspace(0.0, m_x, n, false) {
                path.push([x, 0.0]);
            }
            // M → K.
            let xs = linspace(m_x, 0.0, n, false);
            let ys = linspace(0.0, k_y, n, false);
            for (x, y) in xs.into_iter().zip(ys) {
                path.push([x, y]);
            }
            // K → Γ.
            for y in linspace(k_y, 0.0, n, true) {
                path.push([0.0, y]);
            }
            path
        }
        UnitCell::Honeycomb { .. } => {
            let n = size / 2;
            let b = 3.0 * l;
            let k_x = 4.0 * pi / (3.0 * b);
            let m_y = 2.0 * pi / (s3 * b);
            let mut path = Vec::with_capacity(2 * n);
            // K → Γ.
            for x in linspace(k_x, 0.0, n, false) {
                path.push([x, 0.0]);
            }
            // Γ → M.
            for y in linspace(0.0, m_y, n, true) {
                path.push([0.0, y]);
            }
            path
        }
    }
}

/// Free-photon dispersion at Bloch vector `q`, in eV.
///
/// Band features below this line are bound lattice modes; above it they can
/// radiate into the light cone.
pub fn light_line_ev(q: [f64; 2], units: &Units) -> f64 {
    norm(q) / units.ev_to_wavenumber
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn square_circuit_visits_gamma_x_m_gamma() {
        let cell = UnitCell::Square {
            spacing: 15e-9,
            scaling: 1.0,
        };
        let path = path_points(&cell, 90);
        let edge = PI / 15e-9;
        assert_eq!(path.len(), 90);
        assert_eq!(path[0], [0.0, 0.0]);
        assert_relative_eq!(path[30][0], edge, max_relative = 1e-12);
        assert_eq!(path[30][1], 0.0);
        assert_relative_eq!(path[60][0], edge, max_relative = 1e-12);
        assert_relative_eq!(path[60][1], edge, max_relative = 1e-12);
        assert_eq!(*path.last().unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn interior_corners_are_not_duplicated() {
        let cell = UnitCell::Square {
            spacing: 15e-9,
            scaling: 1.0,
        };
        let path = path_points(&cell, 90);
        // The X corner belongs to the second segment only.
        assert!(path[29][0] < path[30][0]);
        assert!((path[29][0] - path[30][0]).abs() > 1e-3);
    }

    #[test]
    fn triangle_circuit_endpoints() {
        let cell = UnitCell::Triangle { spacing: 15e-9 };
        let path = path_points(&cell, 90);
        let l = 15e-9;
        let m_y = 2.0 * PI / (3.0_f64.sqrt() * l);
        let k_x = 2.0 * PI / (3.0 * l);
        assert_eq!(path.len(), 90);
        assert_eq!(path[0], [0.0, 0.0]);
        assert_eq!(path[30][0], 0.0);
        assert_relative_eq!(path[30][1], m_y, max_relative = 1e-12);
        assert_relative_eq!(path[60][0], k_x, max_relative = 1e-12);
        assert_relative_eq!(path[60][1], m_y, max_relative = 1e-12);
        assert_eq!(*path.last().unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn honeycomb_supercell_runs_k_gamma_m() {
        let cell = UnitCell::Honeycomb {
            spacing: 15e-9,
            scaling: 1.0,
        };
        let path = path_points(&cell, 90);
        let b = 3.0 * 15e-9;
        assert_eq!(path.len(), 90);
        assert_relative_eq!(path[0][0], 4.0 * PI / (3.0 * b), max_relative = 1e-12);
        assert_eq!(path[45], [0.0, 0.0]);
        let last = path.last().unwrap();
        assert_eq!(last[0], 0.0);
        assert_relative_eq!(last[1], 2.0 * PI / (3.0_f64.sqrt() * b), max_relative = 1e-12);
    }

    #[test]
    fn linspace_matches_both_endpoint_conventions() {
        let open = linspace(0.0, 1.0, 4, false);
        assert_eq!(open, vec![0.0, 0.25, 0.5, 0.75]);
        let closed = linspace(0.0, 1.0, 5, true);
        assert_eq!(closed, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1, true), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0, true).is_empty());
    }

    #[test]
    fn light_line_converts_to_ev() {
        let units = Units::default();
        let q = [units.ev_to_wavenumber, 0.0];
        assert_relative_eq!(light_line_ev(q, &units), 1.0, max_relative = 1e-12);
        let q = [3.0e6, 4.0e6];
        assert_relative_eq!(
            light_line_ev(q, &units),
            5.0e6 / units.ev_to_wavenumber,
            max_relative = 1e-12
        );
    }
}
