//! Damping of the normal equations.
//!
//! The damped matrix scales only the diagonal of the approximate Hessian by
//! `1 + lambda`. Large lambda shortens the step and turns it towards steepest
//! descent; small lambda approaches the Gauss-Newton step.

use ndarray::{Array2, ArrayView2};

/// Owns the damping parameter and its adaptation schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct DampingController {
    /// Current value of the damping parameter
    lambda: f64,

    /// Multiplied in on acceptance, divided out on rejection
    scale_per_step: f64,
}

impl DampingController {
    /// Create a controller starting at `lambda_start`.
    pub fn new(lambda_start: f64, scale_per_step: f64) -> Self {
        Self {
            lambda: lambda_start,
            scale_per_step,
        }
    }

    /// Current damping parameter.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Damped copy of `hessian` at the current lambda.
    pub fn damped(&self, hessian: ArrayView2<f64>) -> Array2<f64> {
        damp(hessian, self.lambda)
    }

    /// Step accepted: relax the damping.
    pub fn accept(&mut self) {
        self.lambda *= self.scale_per_step;
        log::trace!("lambda decreased to {:e}", self.lambda);
    }

    /// Step rejected: increase the damping.
    pub fn reject(&mut self) {
        self.lambda /= self.scale_per_step;
        log::trace!("lambda increased to {:e}", self.lambda);
    }
}

/// Copy `hessian` and multiply its diagonal by `1 + lambda`.
pub fn damp(hessian: ArrayView2<f64>, lambda: f64) -> Array2<f64> {
    let mut damped = hessian.to_owned();
    let one_plus_lambda = 1.0 + lambda;
    damped.diag_mut().mapv_inplace(|d| d * one_plus_lambda);
    damped
}
