//! Linear algebra used by the estimator.
//!
//! The estimator needs two dense operations on small square systems: solving
//! `A x = b` for the damped normal equations, and inverting the final
//! approximate Hessian to obtain the covariance. Zero construction and
//! element-wise copies come from ndarray itself.
//!
//! `LinearSolver` is the seam; `NalgebraSolver` (feature `matrix`) binds it to
//! nalgebra's LU decomposition.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{LmEstError, Result};

/// Dense square-system solver.
///
/// Implementations must return `LmEstError::SingularMatrix` when the system
/// cannot be solved or inverted, including when the result is not finite.
pub trait LinearSolver {
    /// Solve `a * x = b` for `x`.
    fn solve(&self, a: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>>;

    /// Compute the inverse of `a`.
    fn inverse(&self, a: ArrayView2<f64>) -> Result<Array2<f64>>;
}

impl<S: LinearSolver + ?Sized> LinearSolver for &S {
    fn solve(&self, a: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>> {
        (**self).solve(a, b)
    }

    fn inverse(&self, a: ArrayView2<f64>) -> Result<Array2<f64>> {
        (**self).inverse(a)
    }
}

/// Check that `a` is square and, if given, that `b` matches its order.
pub fn check_square(a: ArrayView2<f64>, b: Option<ArrayView1<f64>>) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(LmEstError::InvalidInput(format!(
            "expected a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if let Some(b) = b {
        if b.len() != a.nrows() {
            return Err(LmEstError::InvalidInput(format!(
                "right-hand side has length {}, expected {}",
                b.len(),
                a.nrows()
            )));
        }
    }
    Ok(())
}

/// LU-based solver backed by nalgebra.
#[cfg(feature = "matrix")]
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraSolver;

#[cfg(feature = "matrix")]
impl LinearSolver for NalgebraSolver {
    fn solve(&self, a: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>> {
        use crate::utils::matrix_convert::{
            nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra,
        };

        check_square(a, Some(b))?;

        let lu = ndarray_to_nalgebra(a).lu();
        let x = lu.solve(&ndarray_vec_to_nalgebra(b)).ok_or_else(|| {
            LmEstError::SingularMatrix("linear system has no unique solution".to_string())
        })?;

        if x.iter().any(|v| !v.is_finite()) {
            return Err(LmEstError::SingularMatrix(
                "linear system solution is not finite".to_string(),
            ));
        }

        Ok(nalgebra_vec_to_ndarray(&x))
    }

    fn inverse(&self, a: ArrayView2<f64>) -> Result<Array2<f64>> {
        use crate::utils::matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};

        check_square(a, None)?;

        let inv = ndarray_to_nalgebra(a)
            .try_inverse()
            .ok_or_else(|| LmEstError::SingularMatrix("matrix is not invertible".to_string()))?;

        if inv.iter().any(|v| !v.is_finite()) {
            return Err(LmEstError::SingularMatrix(
                "matrix inverse is not finite".to_string(),
            ));
        }

        Ok(nalgebra_to_ndarray(&inv))
    }
}
