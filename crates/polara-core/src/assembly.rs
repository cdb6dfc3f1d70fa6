//! Bloch-periodic interaction matrices and extinction of one unit cell.
//!
//! Identical particles at the cell positions $r_1, \dots, r_N$ couple through
//! the lattice-summed dyadic Green's function, giving a $2N \times 2N$ matrix
//! of $2 \times 2$ in-plane blocks
//!
//! $$ M_{ij}(w, q) = \begin{cases}
//!    -k^2\, G^{\mathrm{self}}(w, q) & i = j, \\
//!    G(w, q, r_i - r_j) & i \ne j.
//! \end{cases} $$
//!
//! Subtracting the inverse polarisability on the diagonal turns $M$ into the
//! coupled-dipole system matrix $A = M - \alpha^{-1}(w)\,\mathbb{1}$, and the
//! optical theorem gives the extinction per cell as
//! $\sigma = 4\pi k\, \mathrm{Im}\, \mathrm{tr}\, A^{-1}$.
//!
//! Two assembly routes are provided: the production route through the Ewald
//! engine, and a brute-force route ([`direct_interaction_matrix`]) that sums
//! the bare kernels over a finite window and serves as an independent
//! cross-check of the split sums.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::CoreError;
use crate::greens::{direct, DyadicValue, EwaldSum};
use crate::lattice::cells::UnitCell;
use crate::linalg;
use crate::types::{Particle, Units};

/// Copies one 2x2 dyadic block into the matrix at block position (row, col).
fn write_block(matrix: &mut Array2<Complex64>, row: usize, col: usize, block: DyadicValue) {
    matrix[[2 * row, 2 * col]] = block.xx;
    matrix[[2 * row, 2 * col + 1]] = block.xy;
    matrix[[2 * row + 1, 2 * col]] = block.xy;
    matrix[[2 * row + 1, 2 * col + 1]] = block.yy;
}

/// Rejects matrices containing NaN or infinite entries, reporting the first
/// offending position together with the sweep coordinates that produced it.
fn ensure_finite(
    matrix: &Array2<Complex64>,
    frequency: Complex64,
    q: [f64; 2],
) -> Result<(), CoreError> {
    for ((row, col), value) in matrix.indexed_iter() {
        if !(value.re.is_finite() && value.im.is_finite()) {
            return Err(CoreError::NonFinite {
                frequency,
                qx: q[0],
                qy: q[1],
                row,
                col,
            });
        }
    }
    Ok(())
}

/// Assembles the Green's-function interaction matrix of the unit cell at one
/// frequency and Bloch wavevector.
///
/// The diagonal blocks carry the $\eta$-independent self-interaction scaled
/// by $-k^2$; every particle is identical, so the block is computed once. The
/// off-diagonal blocks are converged off-site dyadics evaluated at the
/// intra-cell separations $r_i - r_j$.
///
/// # Arguments
/// * `engine` - Ewald engine built from the same `cell`.
/// * `frequency` - Frequency (eV); complex values probe resonance poles.
/// * `q` - Bloch wavevector (m⁻¹).
/// * `cell` - Unit cell supplying the particle positions.
///
/// # Errors
/// Propagates lattice-sum term failures and rejects non-finite entries.
pub fn interaction_matrix(
    engine: &mut EwaldSum,
    frequency: Complex64,
    q: [f64; 2],
    cell: &UnitCell,
) -> Result<Array2<Complex64>, CoreError> {
    let positions = cell.particle_positions();
    let count = positions.len();
    let mut matrix = Array2::<Complex64>::zeros((2 * count, 2 * count));

    let k2 = engine.units().wavenumber(frequency).powu(2);
    let self_block = engine.reduced_dyadic_self(frequency, q)? * (-k2);
    for index in 0..count {
        write_block(&mut matrix, index, index, self_block);
    }

    for row in 0..count {
        for col in 0..count {
            if row == col {
                continue;
            }
            let separation = [
                positions[row][0] - positions[col][0],
                positions[row][1] - positions[col][1],
            ];
            let block = engine.dyadic_offsite(frequency, q, separation)?;
            write_block(&mut matrix, row, col, block);
        }
    }

    ensure_finite(&matrix, frequency, q)?;
    Ok(matrix)
}

/// Coupled-dipole system matrix $A = M - \alpha^{-1}(w)\,\mathbb{1}$.
///
/// Zeros of $\det A$ just off the real frequency axis are the collective
/// lattice resonances; [`crate::roots`] chases them and [`extinction`] reads
/// the response on the real axis.
///
/// # Errors
/// As [`interaction_matrix`], plus a non-finite report when the
/// polarisability vanishes at `frequency`.
pub fn eigenproblem_matrix(
    engine: &mut EwaldSum,
    frequency: Complex64,
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
) -> Result<Array2<Complex64>, CoreError> {
    let mut matrix = interaction_matrix(engine, frequency, q, cell)?;
    let inverse_alpha = Complex64::from(1.0) / particle.polarisability(frequency, engine.units());
    for index in 0..matrix.nrows() {
        matrix[[index, index]] -= inverse_alpha;
    }
    ensure_finite(&matrix, frequency, q)?;
    Ok(matrix)
}

/// Extinction per unit cell at a real frequency, from the optical theorem:
/// $\sigma(w, q) = 4\pi k\, \mathrm{Im}\, \mathrm{tr}\, A^{-1}$.
///
/// # Arguments
/// * `engine` - Ewald engine built from the same `cell`.
/// * `frequency_ev` - Frequency (eV) on the real axis.
/// * `q` - Bloch wavevector (m⁻¹).
/// * `cell` - Unit cell supplying the particle positions.
/// * `particle` - Shared particle material and size.
///
/// # Errors
/// Fails when the system matrix cannot be assembled or inverted.
pub fn extinction(
    engine: &mut EwaldSum,
    frequency_ev: f64,
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
) -> Result<f64, CoreError> {
    let frequency = Complex64::from(frequency_ev);
    let matrix = eigenproblem_matrix(engine, frequency, q, cell, particle)?;
    let trace = linalg::inverse_trace(&matrix)?;
    let k = engine.units().wavenumber_real(frequency_ev);
    Ok(4.0 * std::f64::consts::PI * k * trace.im)
}

/// Interaction matrix from brute-force kernel sums over a finite window.
///
/// The diagonal uses the punctured window (the kernel diverges at zero
/// separation); off-diagonal blocks keep the origin cell. Without the Ewald
/// split the result oscillates with `truncation` and only its Cesàro mean
/// approaches the converged matrix, so this route is for validation, not
/// production sweeps.
///
/// # Errors
/// Fails when an intra-cell separation lands on a lattice point.
pub fn direct_interaction_matrix(
    units: &Units,
    frequency_ev: f64,
    q: [f64; 2],
    cell: &UnitCell,
    truncation: i32,
) -> Result<Array2<Complex64>, CoreError> {
    let lattice = cell.lattice()?;
    let window = cell.index_window(truncation);
    let with_origin = lattice.points_at(&window, true);
    let punctured = lattice.points_at(&window, false);

    let positions = cell.particle_positions();
    let count = positions.len();
    let mut matrix = Array2::<Complex64>::zeros((2 * count, 2 * count));

    let self_block = direct::dyadic_sum(units, frequency_ev, q, [0.0, 0.0], &punctured)?;
    for index in 0..count {
        write_block(&mut matrix, index, index, self_block);
    }

    for row in 0..count {
        for col in 0..count {
            if row == col {
                continue;
            }
            let separation = [
                positions[row][0] - positions[col][0],
                positions[row][1] - positions[col][1],
            ];
            let block = direct::dyadic_sum(units, frequency_ev, q, separation, &with_origin)?;
            write_block(&mut matrix, row, col, block);
        }
    }

    ensure_finite(&matrix, Complex64::from(frequency_ev), q)?;
    Ok(matrix)
}

/// Extinction through the brute-force matrix of [`direct_interaction_matrix`].
///
/// # Errors
/// As [`direct_interaction_matrix`], plus inversion failures.
pub fn direct_extinction(
    units: &Units,
    frequency_ev: f64,
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
    truncation: i32,
) -> Result<f64, CoreError> {
    let mut matrix = direct_interaction_matrix(units, frequency_ev, q, cell, truncation)?;
    let inverse_alpha =
        Complex64::from(1.0) / particle.polarisability(Complex64::from(frequency_ev), units);
    for index in 0..matrix.nrows() {
        matrix[[index, index]] -= inverse_alpha;
    }
    ensure_finite(&matrix, Complex64::from(frequency_ev), q)?;
    let trace = linalg::inverse_trace(&matrix)?;
    let k = units.wavenumber_real(frequency_ev);
    Ok(4.0 * std::f64::consts::PI * k * trace.im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greens::EwaldParams;
    use approx::assert_relative_eq;

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

    fn engine(cell: &UnitCell, truncation: i32) -> EwaldSum {
        let params = EwaldParams {
            truncation,
            ..EwaldParams::default()
        };
        EwaldSum::new(cell, params, Units::default()).unwrap()
    }

    #[test]
    fn single_particle_diagonal_is_the_scaled_self_block() {
        let cell = square_cell();
        let mut ewald = engine(&cell, 12);
        let frequency = Complex64::from(4.0);
        let q = [
            0.2 * std::f64::consts::PI / SPACING,
            0.1 * std::f64::consts::PI / SPACING,
        ];

        let k2 = ewald.units().wavenumber(frequency).powu(2);
        let expected = ewald.reduced_dyadic_self(frequency, q).unwrap() * (-k2);
        let matrix = interaction_matrix(&mut ewald, frequency, q, &cell).unwrap();

        assert_eq!(matrix.dim(), (2, 2));
        assert_eq!(matrix[[0, 0]], expected.xx);
        assert_eq!(matrix[[0, 1]], expected.xy);
        assert_eq!(matrix[[1, 0]], expected.xy);
        assert_eq!(matrix[[1, 1]], expected.yy);
    }

    #[test]
    fn two_particle_blocks_are_hermitian_at_real_frequency() {
        let cell = UnitCell::SimpleHoneycomb {
            spacing: SPACING,
            scaling: 1.0,
        };
        let mut ewald = engine(&cell, 8);
        let frequency = Complex64::from(4.0);
        let q = [0.3 / SPACING, 0.11 / SPACING];

        let matrix = interaction_matrix(&mut ewald, frequency, q, &cell).unwrap();
        assert_eq!(matrix.dim(), (4, 4));
        for row in 0..2 {
            for col in 2..4 {
                let upper = matrix[[row, col]];
                let lower = matrix[[col, row]];
                assert_relative_eq!(lower.re, upper.conj().re, max_relative = 1e-12);
                assert_relative_eq!(lower.im, upper.conj().im, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn extinction_reference_off_resonance() {
        let cell = square_cell();
        let mut ewald = engine(&cell, 12);
        let value = extinction(&mut ewald, 4.0, [0.0, 0.0], &cell, &standard_particle()).unwrap();
        assert_relative_eq!(value, 6.091_317_201_8e-10, max_relative = 1e-6);
    }

    #[test]
    fn direct_extinction_reference() {
        let cell = square_cell();
        let value = direct_extinction(
            &Units::default(),
            4.0,
            [0.0, 0.0],
            &cell,
            &standard_particle(),
            2,
        )
        .unwrap();
        assert_relative_eq!(value, -3.473_961_077_0e-7, max_relative = 1e-6);
    }

    #[test]
    fn vanishing_polarisability_is_reported_as_non_finite() {
        let cell = square_cell();
        let mut ewald = engine(&cell, 8);
        let flat = Particle {
            radius: 0.0,
            plasma_frequency: 6.18,
            loss: 0.01,
        };
        let error = eigenproblem_matrix(&mut ewald, Complex64::from(4.0), [0.0, 0.0], &cell, &flat)
            .unwrap_err();
        assert!(matches!(
            error,
            CoreError::NonFinite { row: 0, col: 0, .. }
        ));
    }
}
