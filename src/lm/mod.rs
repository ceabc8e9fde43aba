//! Levenberg-Marquardt estimator implementation.
//!
//! This module provides the damped Gauss-Newton iteration used to estimate the
//! coefficients of an [`EstimateFunction`](crate::EstimateFunction) from weighted
//! observations, together with its configuration, convergence tracking and
//! diagnostics.

pub mod config;
pub mod convergence;
pub mod damping;
pub mod estimator;
pub mod normal_equations;
pub mod observer;

// Re-export key types
pub use config::{ChiSquaredTracking, EstimatorConfig};
pub use convergence::{ChiSquaredStopCondition, ConvergenceStatus};
pub use damping::{damp, DampingController};
pub use estimator::{FitResult, LevenbergMarquardtEstimator};
pub use normal_equations::NormalEquations;
pub use observer::{IterationObserver, IterationRecord, LogObserver, TraceWriter};
