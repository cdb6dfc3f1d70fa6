//! Unit-cell families for periodic nanoparticle arrays.
//!
//! Each family fixes a Bravais basis, a particle basis within the cell, and
//! the truncation window used for lattice sums. The honeycomb supercell uses
//! a sheared window so that the summed shell stays inversion symmetric.

use serde::{Deserialize, Serialize};

use super::{square_window, Lattice};
use crate::error::CoreError;

fn default_scaling() -> f64 {
    1.0
}

/// Supported lattice families, with nearest-neighbour spacing in metres.
///
/// `scaling` stretches the Bravais basis without moving particles inside the
/// cell, which separates the array period from the intra-cell geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum UnitCell {
    /// Simple square array, one particle per cell.
    Square {
        spacing: f64,
        #[serde(default = "default_scaling")]
        scaling: f64,
    },
    /// Triangular array, one particle per cell.
    Triangle { spacing: f64 },
    /// Two-site honeycomb with the primitive rhombic cell.
    SimpleHoneycomb {
        spacing: f64,
        #[serde(default = "default_scaling")]
        scaling: f64,
    },
    /// Six-site honeycomb supercell, one full hexagonal ring per cell.
    Honeycomb {
        spacing: f64,
        #[serde(default = "default_scaling")]
        scaling: f64,
    },
}

impl UnitCell {
    /// Nearest-neighbour spacing (m).
    pub fn spacing(&self) -> f64 {
        match *self {
            UnitCell::Square { spacing, .. }
            | UnitCell::Triangle { spacing }
            | UnitCell::SimpleHoneycomb { spacing, .. }
            | UnitCell::Honeycomb { spacing, .. } => spacing,
        }
    }

    /// Basis scaling factor; the triangular family is always unscaled.
    pub fn scaling(&self) -> f64 {
        match *self {
            UnitCell::Square { scaling, .. }
            | UnitCell::SimpleHoneycomb { scaling, .. }
            | UnitCell::Honeycomb { scaling, .. } => scaling,
            UnitCell::Triangle { .. } => 1.0,
        }
    }

    /// Array period along a primitive direction (m), `spacing * scaling`.
    pub fn pitch(&self) -> f64 {
        self.spacing() * self.scaling()
    }

    /// Number of particles per unit cell.
    pub fn cell_size(&self) -> usize {
        match self {
            UnitCell::Square { .. } | UnitCell::Triangle { .. } => 1,
            UnitCell::SimpleHoneycomb { .. } => 2,
            UnitCell::Honeycomb { .. } => 6,
        }
    }

    /// The Bravais lattice of this family.
    ///
    /// # Errors
    /// Propagates [`CoreError::DegenerateLattice`] for zero spacing.
    pub fn lattice(&self) -> Result<Lattice, CoreError> {
        let s3 = 3.0_f64.sqrt();
        match *self {
            UnitCell::Square { spacing, scaling } => {
                let p = spacing * scaling;
                Lattice::new([0.0, p], [p, 0.0])
            }
            UnitCell::Triangle { spacing } => {
                Lattice::new([spacing / 2.0, spacing * s3 / 2.0], [spacing, 0.0])
            }
            UnitCell::SimpleHoneycomb { spacing, scaling } => {
                let p = spacing * scaling;
                Lattice::new([1.5 * p, p * s3 / 2.0], [1.5 * p, -p * s3 / 2.0])
            }
            UnitCell::Honeycomb { spacing, scaling } => {
                let b = 3.0 * spacing * scaling;
                Lattice::new([b, 0.0], [b / 2.0, b * s3 / 2.0])
            }
        }
    }

    /// Particle coordinates within the cell, relative to the cell origin (m).
    pub fn particle_positions(&self) -> Vec<[f64; 2]> {
        let s3 = 3.0_f64.sqrt();
        match *self {
            UnitCell::Square { .. } | UnitCell::Triangle { .. } => vec![[0.0, 0.0]],
            UnitCell::SimpleHoneycomb { spacing, .. } => vec![[0.0, 0.0], [spacing, 0.0]],
            UnitCell::Honeycomb { spacing, .. } => {
                let s = spacing;
                vec![
                    [s, 0.0],
                    [s / 2.0, -s * s3 / 2.0],
                    [-s / 2.0, -s * s3 / 2.0],
                    [-s, 0.0],
                    [-s / 2.0, s * s3 / 2.0],
                    [s / 2.0, s * s3 / 2.0],
                ]
            }
        }
    }

    /// Truncation window of `(n, m)` indices for lattice sums.
    ///
    /// For the honeycomb supercell the plain square window is not inversion
    /// symmetric in Cartesian coordinates, so the `m` range is sheared
    /// against `n`; the window then maps onto itself under `(n, m) ->
    /// (-n, -m)` and phase sums over it stay conjugate-paired.
    pub fn index_window(&self, truncation: i32) -> Vec<(i32, i32)> {
        match self {
            UnitCell::Honeycomb { .. } => {
                let nb = truncation;
                let mut window = Vec::new();
                for n in -nb..=nb {
                    let (lo, hi) = if n < 0 {
                        (-n - nb, nb)
                    } else if n > 0 {
                        (-nb, nb - n)
                    } else {
                        (-nb, nb)
                    };
                    for m in lo..=hi {
                        window.push((n, m));
                    }
                }
                window
            }
            _ => square_window(truncation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::dot;
    use approx::assert_relative_eq;

    fn families() -> Vec<UnitCell> {
        vec![
            UnitCell::Square {
                spacing: 15e-9,
                scaling: 1.0,
            },
            UnitCell::Triangle { spacing: 15e-9 },
            UnitCell::SimpleHoneycomb {
                spacing: 15e-9,
                scaling: 1.0,
            },
            UnitCell::Honeycomb {
                spacing: 15e-9,
                scaling: 1.0,
            },
        ]
    }

    #[test]
    fn particle_counts_per_family() {
        let sizes: Vec<usize> = families().iter().map(|c| c.cell_size()).collect();
        assert_eq!(sizes, vec![1, 1, 2, 6]);
        for cell in families() {
            assert_eq!(cell.particle_positions().len(), cell.cell_size());
        }
    }

    #[test]
    fn every_family_has_a_dual_basis() {
        let tau = 2.0 * std::f64::consts::PI;
        for cell in families() {
            let lat = cell.lattice().unwrap();
            let (a1, a2) = lat.basis();
            let (b1, b2) = lat.reciprocal_basis();
            assert_relative_eq!(dot(a1, b1), tau, max_relative = 1e-12);
            assert_relative_eq!(dot(a2, b2), tau, max_relative = 1e-12);
            assert!(dot(a1, b2).abs() < 1e-9);
            assert!(dot(a2, b1).abs() < 1e-9);
        }
    }

    #[test]
    fn honeycomb_window_is_sheared_and_inversion_symmetric() {
        let cell = UnitCell::Honeycomb {
            spacing: 15e-9,
            scaling: 1.0,
        };
        let window = cell.index_window(3);
        // (2N+1)^2 - N(N+1) points at N = 3.
        assert_eq!(window.len(), 37);
        for &(n, m) in &window {
            assert!(window.contains(&(-n, -m)), "missing image of ({n}, {m})");
        }
    }

    #[test]
    fn square_window_is_the_full_grid() {
        let cell = UnitCell::Square {
            spacing: 15e-9,
            scaling: 1.0,
        };
        assert_eq!(cell.index_window(3).len(), 49);
    }

    #[test]
    fn honeycomb_ring_sits_at_the_spacing_radius() {
        let cell = UnitCell::Honeycomb {
            spacing: 15e-9,
            scaling: 2.0,
        };
        for p in cell.particle_positions() {
            assert_relative_eq!(p[0].hypot(p[1]), 15e-9, max_relative = 1e-12);
        }
    }

    #[test]
    fn family_tag_round_trips_through_serde() {
        let cell = UnitCell::SimpleHoneycomb {
            spacing: 15e-9,
            scaling: 1.0,
        };
        let text = serde_json::to_string(&cell).unwrap();
        assert!(text.contains("\"family\":\"simple_honeycomb\""));
        let back: UnitCell = serde_json::from_str(&text).unwrap();
        assert_eq!(back.cell_size(), 2);
    }
}
