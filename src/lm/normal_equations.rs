//! Gauss-Newton normal equations.
//!
//! For coefficients **A** the builder evaluates the function at every observation
//! and accumulates
//!
//! * chi-squared `Σ r² / w²`
//! * the gradient vector (beta) `Σ r · ∂f/∂a_i / w²`
//! * the approximate Hessian (alpha) `Σ ∂f/∂a_i · ∂f/∂a_j / w²`
//!
//! where `r = y - f(x; A)` and `w` is the observation weight. Second derivatives
//! of the model are dropped.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{LmEstError, Result};
use crate::function::EstimateFunction;
use crate::observations::ObservationStore;

/// Chi-squared, approximate Hessian and gradient at one set of coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEquations {
    /// Weighted sum of squared residuals
    pub chi_squared: f64,

    /// Approximate Hessian (alpha), symmetric
    pub hessian: Array2<f64>,

    /// Gradient vector (beta), right-hand side of the normal equations
    pub gradient: Array1<f64>,
}

impl NormalEquations {
    /// Build the normal equations for `function` at `coefficients` over all observations.
    ///
    /// # Errors
    ///
    /// * `FunctionEvaluation` if the function returns a derivative vector whose
    ///   length differs from the number of coefficients
    pub fn build<F: EstimateFunction + ?Sized>(
        function: &F,
        coefficients: ArrayView1<f64>,
        observations: &ObservationStore,
    ) -> Result<Self> {
        let n = coefficients.len();
        let mut chi_squared = 0.0;
        let mut hessian = Array2::<f64>::zeros((n, n));
        let mut gradient = Array1::<f64>::zeros(n);

        for obs in observations {
            let est = function.evaluate(obs.point.view(), coefficients);
            if est.derivatives.len() != n {
                return Err(LmEstError::FunctionEvaluation(format!(
                    "expected {} derivatives, got {}",
                    n,
                    est.derivatives.len()
                )));
            }

            let residual = obs.value - est.value;
            let weight_sq = obs.weight * obs.weight;
            chi_squared += residual * residual / weight_sq;

            for row in 0..n {
                gradient[row] += residual * est.derivatives[row] / weight_sq;
            }
            for row in 0..n {
                for col in 0..n {
                    hessian[[row, col]] += est.derivatives[row] * est.derivatives[col] / weight_sq;
                }
            }
        }

        Ok(Self {
            chi_squared,
            hessian,
            gradient,
        })
    }
}
