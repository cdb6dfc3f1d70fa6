//! Dense complex linear algebra for the assembler and the resonance solver.
//!
//! Two primitives cover everything the eigenproblem needs: a determinant for
//! root finding (an in-crate partial-pivot LU, since the determinant sign
//! and scale must be ours to control) and the trace of a matrix inverse for
//! extinction, delegated to `faer`'s LU with one unit-vector solve per
//! column.

use faer::linalg::solvers::SpSolver;
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::CoreError;

/// Determinant of a square complex matrix via partial-pivot LU.
///
/// Row swaps flip the sign; a column with no usable pivot short-circuits to
/// an exact zero, which the root finder treats as "on the root".
///
/// # Panics
/// Panics if the matrix is not square.
pub fn determinant(matrix: &Array2<Complex64>) -> Complex64 {
    let dim = matrix.nrows();
    assert_eq!(dim, matrix.ncols(), "Matrix must be square");

    let mut lu = matrix.clone();
    let mut sign = Complex64::from(1.0);
    for col in 0..dim {
        let mut pivot_row = col;
        let mut pivot_mag = lu[[col, col]].norm();
        for row in col + 1..dim {
            let mag = lu[[row, col]].norm();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = row;
            }
        }
        if pivot_mag == 0.0 {
            return Complex64::default();
        }
        if pivot_row != col {
            for j in 0..dim {
                lu.swap([col, j], [pivot_row, j]);
            }
            sign = -sign;
        }
        let pivot = lu[[col, col]];
        for row in col + 1..dim {
            let factor = lu[[row, col]] / pivot;
            for j in col + 1..dim {
                lu[[row, j]] = lu[[row, j]] - factor * lu[[col, j]];
            }
            lu[[row, col]] = factor;
        }
    }

    let mut det = sign;
    for i in 0..dim {
        det *= lu[[i, i]];
    }
    det
}

/// Trace of the matrix inverse: one LU factorisation, then a unit-vector
/// solve per column, reading back only the diagonal entry.
///
/// # Errors
/// Returns [`CoreError::LinAlg`] when the accumulated trace is non-finite,
/// which is how a singular eigenproblem matrix surfaces.
///
/// # Panics
/// Panics if the matrix is not square.
pub fn inverse_trace(matrix: &Array2<Complex64>) -> Result<Complex64, CoreError> {
    let dim = matrix.nrows();
    assert_eq!(dim, matrix.ncols(), "Matrix must be square");

    // Convert ndarray to faer Mat<c64>
    let faer_mat = faer::Mat::<faer::complex_native::c64>::from_fn(dim, dim, |i, j| {
        let c = matrix[[i, j]];
        faer::complex_native::c64::new(c.re, c.im)
    });
    let lu = faer_mat.partial_piv_lu();

    let mut trace = Complex64::default();
    for col in 0..dim {
        let unit = faer::Col::<faer::complex_native::c64>::from_fn(dim, |i| {
            if i == col {
                faer::complex_native::c64::new(1.0, 0.0)
            } else {
                faer::complex_native::c64::new(0.0, 0.0)
            }
        });
        let solution = lu.solve(&unit);
        let diagonal = solution[col];
        trace += Complex64::new(diagonal.re, diagonal.im);
    }

    if !trace.re.is_finite() || !trace.im.is_finite() {
        return Err(CoreError::LinAlg(format!(
            "non-finite inverse trace for a {dim}x{dim} system"
        )));
    }
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn determinant_of_a_2x2() {
        let m = array![
            [Complex64::new(2.0, 0.0), Complex64::new(0.0, 1.0)],
            [Complex64::new(0.0, -1.0), Complex64::new(3.0, 0.0)]
        ];
        let det = determinant(&m);
        assert_relative_eq!(det.re, 5.0, max_relative = 1e-14);
        assert_relative_eq!(det.im, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn determinant_of_a_3x3_against_cofactors() {
        let m = array![
            [
                Complex64::new(1.0, 1.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(0.0, 0.0)
            ],
            [
                Complex64::new(0.0, 0.0),
                Complex64::new(3.0, -1.0),
                Complex64::new(1.0, 0.0)
            ],
            [
                Complex64::new(0.0, 1.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(2.0, 0.0)
            ]
        ];
        let det = determinant(&m);
        assert_relative_eq!(det.re, 8.0, max_relative = 1e-13);
        assert_relative_eq!(det.im, 6.0, max_relative = 1e-13);
    }

    #[test]
    fn row_swap_flips_the_sign() {
        let m = array![
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]
        ];
        let det = determinant(&m);
        assert_relative_eq!(det.re, -1.0, max_relative = 1e-14);
    }

    #[test]
    fn singular_matrix_has_zero_determinant() {
        let row = [Complex64::new(1.0, 2.0), Complex64::new(-3.0, 0.5)];
        let m = array![[row[0], row[1]], [row[0] * 2.0, row[1] * 2.0]];
        assert_eq!(determinant(&m), Complex64::default());
    }

    #[test]
    fn inverse_trace_of_a_diagonal_matrix() {
        let m = array![
            [Complex64::new(0.0, 2.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(4.0, 0.0)]
        ];
        // 1/(2i) + 1/4
        let trace = inverse_trace(&m).unwrap();
        assert_relative_eq!(trace.re, 0.25, max_relative = 1e-13);
        assert_relative_eq!(trace.im, -0.5, max_relative = 1e-13);
    }

    #[test]
    fn inverse_trace_matches_the_adjugate_for_2x2() {
        let m = array![
            [Complex64::new(2.0, 0.0), Complex64::new(0.0, 1.0)],
            [Complex64::new(0.0, -1.0), Complex64::new(3.0, 0.0)]
        ];
        // tr(M^{-1}) = (a + d)/det = 5/5 = 1.
        let trace = inverse_trace(&m).unwrap();
        assert_relative_eq!(trace.re, 1.0, max_relative = 1e-13);
        assert_relative_eq!(trace.im, 0.0, epsilon = 1e-13);
    }

    #[test]
    fn singular_system_is_reported() {
        let zero = Complex64::default();
        let m = array![[zero, zero], [zero, zero]];
        assert!(matches!(inverse_trace(&m), Err(CoreError::LinAlg(_))));
    }
}
