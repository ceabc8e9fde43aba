//! # lmest-rs
//!
//! `lmest-rs` estimates the coefficients of a nonlinear function from weighted
//! observations with the Levenberg-Marquardt method, and reports the
//! covariance of the estimated coefficients.
//!
//! The library provides:
//! - The [`EstimateFunction`] trait: a function value plus analytic derivatives
//!   with respect to each coefficient
//! - An [`ObservationStore`] of `(point, value, weight)` triples
//! - The [`LevenbergMarquardtEstimator`] with configurable damping, stop
//!   condition and iteration cap
//! - Iteration diagnostics through [`IterationObserver`]
//! - Built-in models and a synthetic data sampler in [`models`]
//!
//! ## Basic Usage
//!
//! ```
//! use lmest_rs::models::SumOfGaussians;
//! use lmest_rs::LevenbergMarquardtEstimator;
//! use ndarray::array;
//!
//! let model = SumOfGaussians::new(1);
//! let truth = array![2.0, 1.0, 0.5];
//!
//! let mut estimator = LevenbergMarquardtEstimator::new(model);
//! for i in 0..40 {
//!     let x = 0.05 * (i + 1) as f64;
//!     let y = model.value_at(x, truth.view());
//!     estimator.add_observation(array![x], y, 0.01).unwrap();
//! }
//!
//! let fit = estimator.estimate(array![1.8, 1.1, 0.6]).unwrap();
//! assert!((fit.coefficients[1] - 1.0).abs() < 1e-4);
//! ```

pub mod error;
pub mod function;
pub mod linalg;
pub mod lm;
pub mod models;
pub mod observations;
pub mod uncertainty;

#[cfg(feature = "matrix")]
mod utils;

// Re-exports for convenience
pub use error::{LmEstError, Result};
pub use function::{Estimate, EstimateFunction};
pub use linalg::LinearSolver;
pub use lm::{
    ChiSquaredTracking, ConvergenceStatus, EstimatorConfig, FitResult, IterationObserver,
    IterationRecord, LevenbergMarquardtEstimator,
};
pub use observations::{Observation, ObservationStore};

#[cfg(feature = "matrix")]
pub use linalg::NalgebraSolver;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
