//! Bravais lattices and their reciprocal duals.
//!
//! A [`Lattice`] is a pair of 2D basis vectors together with the reciprocal
//! basis satisfying $\mathbf{a}_i \cdot \mathbf{b}_j = 2\pi \delta_{ij}$.
//! Truncated point sets from either basis feed the Green's-function sums.

pub mod brillouin;
pub mod cells;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 2D dot product.
pub(crate) fn dot(u: [f64; 2], v: [f64; 2]) -> f64 {
    u[0] * v[0] + u[1] * v[1]
}

/// Euclidean norm of a 2D vector.
pub(crate) fn norm(u: [f64; 2]) -> f64 {
    u[0].hypot(u[1])
}

/// A 2D Bravais lattice with its precomputed reciprocal basis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    a1: [f64; 2],
    a2: [f64; 2],
    b1: [f64; 2],
    b2: [f64; 2],
    area: f64,
}

impl Lattice {
    /// Build a lattice from two basis vectors (metres).
    ///
    /// The reciprocal basis is
    /// $\mathbf{b}_i = 2\pi\,R\,\mathbf{a}_j / (\mathbf{a}_i \cdot R\,\mathbf{a}_j)$
    /// with $R$ the quarter-turn rotation, which is the 2D specialisation of
    /// the usual cross-product construction.
    ///
    /// # Errors
    /// Returns [`CoreError::DegenerateLattice`] when the basis vectors are
    /// collinear, since no reciprocal basis exists for a zero-area cell.
    pub fn new(a1: [f64; 2], a2: [f64; 2]) -> Result<Self, CoreError> {
        let cross = a1[0] * a2[1] - a1[1] * a2[0];
        if cross == 0.0 {
            return Err(CoreError::DegenerateLattice {
                a1x: a1[0],
                a1y: a1[1],
                a2x: a2[0],
                a2y: a2[1],
            });
        }
        let rot_a2 = [-a2[1], a2[0]];
        let rot_a1 = [-a1[1], a1[0]];
        let d1 = dot(a1, rot_a2);
        let d2 = dot(a2, rot_a1);
        let tau = 2.0 * std::f64::consts::PI;
        Ok(Self {
            a1,
            a2,
            b1: [tau * rot_a2[0] / d1, tau * rot_a2[1] / d1],
            b2: [tau * rot_a1[0] / d2, tau * rot_a1[1] / d2],
            area: cross.abs(),
        })
    }

    /// Unit-cell area (m²).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Real-space basis vectors.
    pub fn basis(&self) -> ([f64; 2], [f64; 2]) {
        (self.a1, self.a2)
    }

    /// Reciprocal basis vectors.
    pub fn reciprocal_basis(&self) -> ([f64; 2], [f64; 2]) {
        (self.b1, self.b2)
    }

    /// Real-space lattice points $n\,\mathbf{a}_1 + m\,\mathbf{a}_2$ over an
    /// index window, optionally without the origin.
    pub fn points_at(&self, window: &[(i32, i32)], include_origin: bool) -> Vec<[f64; 2]> {
        window
            .iter()
            .filter(|&&(n, m)| include_origin || n != 0 || m != 0)
            .map(|&(n, m)| {
                let (nf, mf) = (n as f64, m as f64);
                [
                    nf * self.a1[0] + mf * self.a2[0],
                    nf * self.a1[1] + mf * self.a2[1],
                ]
            })
            .collect()
    }

    /// Reciprocal lattice points $n\,\mathbf{b}_1 + m\,\mathbf{b}_2$ over an
    /// index window, optionally without the origin.
    pub fn reciprocal_points_at(
        &self,
        window: &[(i32, i32)],
        include_origin: bool,
    ) -> Vec<[f64; 2]> {
        window
            .iter()
            .filter(|&&(n, m)| include_origin || n != 0 || m != 0)
            .map(|&(n, m)| {
                let (nf, mf) = (n as f64, m as f64);
                [
                    nf * self.b1[0] + mf * self.b2[0],
                    nf * self.b1[1] + mf * self.b2[1],
                ]
            })
            .collect()
    }

    /// Real-space points over the symmetric square window
    /// $n, m \in [-N, N]$.
    pub fn points(&self, truncation: i32, include_origin: bool) -> Vec<[f64; 2]> {
        self.points_at(&square_window(truncation), include_origin)
    }

    /// Reciprocal points over the symmetric square window.
    pub fn reciprocal_points(&self, truncation: i32, include_origin: bool) -> Vec<[f64; 2]> {
        self.reciprocal_points_at(&square_window(truncation), include_origin)
    }
}

/// The symmetric square index window $[-N, N]^2$ in row-major order.
pub fn square_window(truncation: i32) -> Vec<(i32, i32)> {
    let mut window = Vec::with_capacity(((2 * truncation + 1) * (2 * truncation + 1)) as usize);
    for n in -truncation..=truncation {
        for m in -truncation..=truncation {
            window.push((n, m));
        }
    }
    window
}
