//! Model function contract.
//!
//! This module defines the `EstimateFunction` trait, which represents a function
//! f(**X**;**A**) of a point vector **X** and a coefficient vector **A**. The
//! estimator only needs the function value and its partial derivatives with
//! respect to each coefficient at a given point.

use ndarray::{Array1, ArrayView1};
use std::fmt;

/// Value of a function and its coefficient derivatives at one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Estimated value of f at the requested point.
    pub value: f64,

    /// Derivatives of f with respect to each coefficient.
    pub derivatives: Array1<f64>,
}

impl Estimate {
    /// Create an estimate with zeroed value and derivatives for `coefficient_count` coefficients.
    pub fn zeros(coefficient_count: usize) -> Self {
        Self {
            value: 0.0,
            derivatives: Array1::zeros(coefficient_count),
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "estimate = {}", self.value)?;
        for (i, d) in self.derivatives.iter().enumerate() {
            writeln!(f, "derivative[{}] = {}", i, d)?;
        }
        Ok(())
    }
}

/// A function f(X;A) whose coefficients A can be estimated from observations.
///
/// Implementations must return a derivative vector of length
/// [`coefficient_count`](EstimateFunction::coefficient_count) from every call to
/// [`evaluate`](EstimateFunction::evaluate).
pub trait EstimateFunction {
    /// Number of "x" values: 1 for f(x;A), 2 for f(x,y;A), etc.
    fn point_dimension(&self) -> usize;

    /// Number of coefficients that determine this function.
    fn coefficient_count(&self) -> usize;

    /// Name of the coefficient at `index`.
    fn coefficient_name(&self, index: usize) -> String {
        format!("coef[{}]", index)
    }

    /// Evaluate the function and its coefficient derivatives at a point.
    ///
    /// # Arguments
    ///
    /// * `point` - Point to evaluate the function at
    /// * `coefficients` - Coefficients to use
    ///
    /// # Returns
    ///
    /// * The estimated value and derivatives at the point
    fn evaluate(&self, point: ArrayView1<f64>, coefficients: ArrayView1<f64>) -> Estimate;
}

impl<F: EstimateFunction + ?Sized> EstimateFunction for &F {
    fn point_dimension(&self) -> usize {
        (**self).point_dimension()
    }

    fn coefficient_count(&self) -> usize {
        (**self).coefficient_count()
    }

    fn coefficient_name(&self, index: usize) -> String {
        (**self).coefficient_name(index)
    }

    fn evaluate(&self, point: ArrayView1<f64>, coefficients: ArrayView1<f64>) -> Estimate {
        (**self).evaluate(point, coefficients)
    }
}
