//! # Covariance Matrix Helpers
//!
//! The estimator reports the inverse of the final approximate Hessian as the
//! covariance of the fitted coefficients. These helpers derive standard errors
//! and correlations from it.

use ndarray::{Array1, Array2};

/// Correlation matrix of a covariance matrix.
///
/// `correlation[i, j] = covariance[i, j] / sqrt(covariance[i, i] * covariance[j, j])`,
/// with ones on the diagonal. Pairs involving a non-positive variance get 0.
pub fn calculate_correlation(covariance: &Array2<f64>) -> Array2<f64> {
    let variances = covariance.diag();
    Array2::from_shape_fn(covariance.dim(), |(i, j)| {
        if i == j {
            return 1.0;
        }
        let scale = (variances[i] * variances[j]).sqrt();
        if scale > 0.0 {
            covariance[[i, j]] / scale
        } else {
            0.0
        }
    })
}

/// Square roots of the covariance diagonal; a non-positive variance gives 0.
pub fn standard_errors_from_covariance(covariance: &Array2<f64>) -> Array1<f64> {
    covariance
        .diag()
        .mapv(|v| if v > 0.0 { v.sqrt() } else { 0.0 })
}
