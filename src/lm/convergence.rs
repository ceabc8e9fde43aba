//! Convergence criteria for the estimator.
//!
//! The estimator stops once chi-squared has changed by less than a tolerance
//! for a number of consecutive steps, or when the iteration cap is hit.

use serde::{Deserialize, Serialize};

/// Possible states of an estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// The estimator is still iterating.
    Running,

    /// Chi-squared stopped changing for the required number of extra iterations.
    Converged,

    /// The iteration cap was reached first.
    MaxIterationsReached,
}

impl ConvergenceStatus {
    /// Returns true if the run has terminated.
    pub fn is_terminated(&self) -> bool {
        !matches!(self, ConvergenceStatus::Running)
    }

    /// Returns true if the run met the chi-squared stop condition.
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceStatus::Converged)
    }

    /// Returns a description of the status.
    pub fn description(&self) -> &'static str {
        match self {
            ConvergenceStatus::Running => "Estimation is still running",
            ConvergenceStatus::Converged => "Converged: chi-squared change below tolerance",
            ConvergenceStatus::MaxIterationsReached => "Terminated: maximum iterations reached",
        }
    }
}

/// Tracks consecutive small chi-squared changes.
#[derive(Debug, Clone)]
pub struct ChiSquaredStopCondition {
    /// Change below which a step counts as an extra iteration
    delta_stop: f64,

    /// Extra iterations needed to stop
    max_extra: usize,

    /// Consecutive extra iterations seen so far
    extra: usize,

    /// Reference value of the previous step
    last_chi_squared: f64,
}

impl ChiSquaredStopCondition {
    /// Start tracking from the chi-squared of the initial guess.
    pub fn new(delta_stop: f64, max_extra: usize, initial_chi_squared: f64) -> Self {
        Self {
            delta_stop,
            max_extra,
            extra: 0,
            last_chi_squared: initial_chi_squared,
        }
    }

    /// Record the reference chi-squared after a step and return the extra iteration count.
    pub fn update(&mut self, chi_squared: f64) -> usize {
        if (chi_squared - self.last_chi_squared).abs() < self.delta_stop {
            self.extra += 1;
        } else {
            self.extra = 0;
        }
        self.last_chi_squared = chi_squared;
        self.extra
    }

    /// Consecutive extra iterations seen so far.
    pub fn extra_iterations(&self) -> usize {
        self.extra
    }

    /// Returns true once enough extra iterations have been seen.
    pub fn is_met(&self) -> bool {
        self.extra >= self.max_extra
    }

    /// Status after a step, given the 1-based iteration counter that will be used next.
    pub fn status(&self, next_iteration: usize, max_total_iterations: usize) -> ConvergenceStatus {
        if self.is_met() {
            ConvergenceStatus::Converged
        } else if next_iteration >= max_total_iterations {
            ConvergenceStatus::MaxIterationsReached
        } else {
            ConvergenceStatus::Running
        }
    }
}
