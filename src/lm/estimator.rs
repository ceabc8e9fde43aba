//! Implementation of the Levenberg-Marquardt estimator.
//!
//! The estimator owns the function, the observations and the configuration.
//! Each call to [`estimate`](LevenbergMarquardtEstimator::estimate) starts from
//! an initial guess and repeats:
//!
//! 1. damp the current approximate Hessian by `1 + lambda` on its diagonal,
//! 2. solve the damped normal equations for a coefficient step,
//! 3. rebuild the normal equations at the trial coefficients,
//! 4. accept the trial if chi-squared did not grow, otherwise keep the current
//!    coefficients, and adapt lambda accordingly,
//!
//! until chi-squared stops changing or the iteration cap is reached. The
//! covariance of the result is the inverse of the final approximate Hessian.

use ndarray::{Array1, Array2};
use std::fmt;

use crate::error::{LmEstError, Result};
use crate::function::EstimateFunction;
use crate::linalg::LinearSolver;
use crate::observations::ObservationStore;
use crate::uncertainty::{calculate_correlation, standard_errors_from_covariance};

use super::config::{ChiSquaredTracking, EstimatorConfig};
use super::convergence::{ChiSquaredStopCondition, ConvergenceStatus};
use super::damping::DampingController;
use super::normal_equations::NormalEquations;
use super::observer::{IterationObserver, IterationRecord};

#[cfg(feature = "matrix")]
use crate::linalg::NalgebraSolver;

/// Result of a Levenberg-Marquardt estimation.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Estimated coefficients
    pub coefficients: Array1<f64>,

    /// Covariance of the coefficients, the inverse of the final approximate Hessian
    pub covariance: Array2<f64>,

    /// Chi-squared at the estimated coefficients
    pub chi_squared: f64,

    /// Number of steps performed
    pub iterations: usize,

    /// How the iteration stopped
    pub status: ConvergenceStatus,
}

impl FitResult {
    /// Standard errors of the coefficients (square roots of the covariance diagonal).
    pub fn standard_errors(&self) -> Array1<f64> {
        standard_errors_from_covariance(&self.covariance)
    }

    /// Correlation matrix of the coefficients.
    pub fn correlation(&self) -> Array2<f64> {
        calculate_correlation(&self.covariance)
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimation Result:")?;
        writeln!(f, "  Status: {}", self.status.description())?;
        writeln!(f, "  Chi-squared: {:.6e}", self.chi_squared)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Coefficients: {}", self.coefficients)?;
        writeln!(f, "  Uncertainties: {}", self.standard_errors())?;
        Ok(())
    }
}

/// Coefficients together with the normal equations built at them.
struct IterationState {
    coefficients: Array1<f64>,
    equations: NormalEquations,
}

impl IterationState {
    fn evaluate<F: EstimateFunction>(
        function: &F,
        coefficients: Array1<f64>,
        observations: &ObservationStore,
    ) -> Result<Self> {
        let equations = NormalEquations::build(function, coefficients.view(), observations)?;
        Ok(Self {
            coefficients,
            equations,
        })
    }

    fn chi_squared(&self) -> f64 {
        self.equations.chi_squared
    }
}

/// Levenberg-Marquardt estimator for the coefficients of an [`EstimateFunction`].
///
/// A single estimator is not meant to be shared between threads while
/// estimating; `estimate` takes `&mut self`, so observations cannot change
/// during a fit.
pub struct LevenbergMarquardtEstimator<F, S> {
    function: F,
    solver: S,
    observations: ObservationStore,
    config: EstimatorConfig,
    observer: Option<Box<dyn IterationObserver>>,
    final_covariance: Option<Array2<f64>>,
}

#[cfg(feature = "matrix")]
impl<F: EstimateFunction> LevenbergMarquardtEstimator<F, NalgebraSolver> {
    /// Create an estimator for `function` using the nalgebra LU solver.
    pub fn new(function: F) -> Self {
        Self::with_solver(function, NalgebraSolver)
    }
}

impl<F: EstimateFunction, S: LinearSolver> LevenbergMarquardtEstimator<F, S> {
    /// Create an estimator for `function` using a custom linear solver.
    pub fn with_solver(function: F, solver: S) -> Self {
        let observations = ObservationStore::new(function.point_dimension());
        Self {
            function,
            solver,
            observations,
            config: EstimatorConfig::default(),
            observer: None,
            final_covariance: None,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the initial damping and its per-step scale factor.
    pub fn with_lambda(mut self, lambda_start: f64, lambda_scale_per_step: f64) -> Self {
        self.setup_lambda(lambda_start, lambda_scale_per_step);
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.setup_maximum_iterations(max_iterations);
        self
    }

    /// Set which chi-squared the accept test and stop condition compare against.
    pub fn with_chi_squared_tracking(mut self, tracking: ChiSquaredTracking) -> Self {
        self.config.chi_squared_tracking = tracking;
        self
    }

    /// Attach a diagnostic observer.
    pub fn with_observer(mut self, observer: Box<dyn IterationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set the initial damping and its per-step scale factor.
    pub fn setup_lambda(&mut self, lambda_start: f64, lambda_scale_per_step: f64) {
        self.config.lambda_start = lambda_start;
        self.config.lambda_scale_per_step = lambda_scale_per_step;
    }

    /// Stop once chi-squared changes by less than `delta_chi_squared` for
    /// `extra_iterations` consecutive steps.
    pub fn setup_delta_chi_squared_stop_condition(
        &mut self,
        delta_chi_squared: f64,
        extra_iterations: usize,
    ) {
        self.config.delta_chi_squared_stop = delta_chi_squared;
        self.config.max_extra_iterations = extra_iterations;
    }

    /// Set the maximum number of iterations.
    pub fn setup_maximum_iterations(&mut self, max_iterations: usize) {
        self.config.max_total_iterations = max_iterations;
    }

    /// Attach or remove the diagnostic observer.
    pub fn set_observer(&mut self, observer: Option<Box<dyn IterationObserver>>) {
        self.observer = observer;
    }

    /// Current configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The function being estimated.
    pub fn function(&self) -> &F {
        &self.function
    }

    /// Observations added so far.
    pub fn observations(&self) -> &ObservationStore {
        &self.observations
    }

    /// Add a data point.
    ///
    /// # Arguments
    ///
    /// * `point` - Point with the function's point dimension
    /// * `value` - Observed value at this point
    /// * `weight` - Estimated spread of this value; smaller numbers mean more weight
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` if `point` has the wrong length
    /// * `InvalidObservation` for a non-finite value or a non-positive weight
    pub fn add_observation(&mut self, point: Array1<f64>, value: f64, weight: f64) -> Result<()> {
        self.observations.add(point, value, weight)
    }

    /// Covariance of the coefficients from the last successful [`estimate`](Self::estimate).
    pub fn estimated_covariance(&self) -> Result<&Array2<f64>> {
        self.final_covariance
            .as_ref()
            .ok_or(LmEstError::CovarianceUnavailable)
    }

    /// Fit the coefficients to the observations, starting from `initial_coefficients`.
    ///
    /// The attached observer, if any, receives every iteration.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the configuration is out of range
    /// * `CoefficientCountMismatch` if the guess has the wrong length
    /// * `InsufficientData` if there are fewer observations than coefficients
    /// * `SingularMatrix` if a damped system cannot be solved or the final
    ///   approximate Hessian cannot be inverted
    pub fn estimate(&mut self, initial_coefficients: Array1<f64>) -> Result<FitResult> {
        match self.observer.take() {
            Some(mut observer) => {
                let result = self.run(initial_coefficients, Some(&mut *observer));
                self.observer = Some(observer);
                result
            }
            None => self.run(initial_coefficients, None),
        }
    }

    /// Like [`estimate`](Self::estimate), reporting to `observer` instead of the
    /// attached one.
    pub fn estimate_observed(
        &mut self,
        initial_coefficients: Array1<f64>,
        observer: &mut dyn IterationObserver,
    ) -> Result<FitResult> {
        self.run(initial_coefficients, Some(observer))
    }

    fn run(
        &mut self,
        initial_coefficients: Array1<f64>,
        mut observer: Option<&mut dyn IterationObserver>,
    ) -> Result<FitResult> {
        self.config.validate()?;

        let n_coef = self.function.coefficient_count();
        if initial_coefficients.len() != n_coef {
            return Err(LmEstError::CoefficientCountMismatch {
                expected: n_coef,
                actual: initial_coefficients.len(),
            });
        }
        if self.observations.len() < n_coef {
            return Err(LmEstError::InsufficientData {
                observations: self.observations.len(),
                coefficients: n_coef,
            });
        }

        self.final_covariance = None;
        let config = &self.config;
        let names: Vec<String> = (0..n_coef)
            .map(|i| self.function.coefficient_name(i))
            .collect();

        let mut current =
            IterationState::evaluate(&self.function, initial_coefficients, &self.observations)?;
        let mut damping = DampingController::new(config.lambda_start, config.lambda_scale_per_step);
        let mut reference_chi_squared = current.chi_squared();
        let mut stop = ChiSquaredStopCondition::new(
            config.delta_chi_squared_stop,
            config.max_extra_iterations,
            reference_chi_squared,
        );
        let mut iteration = 1;

        log::debug!(
            "starting estimation: {} coefficients, {} observations, chi-squared {:e}",
            n_coef,
            self.observations.len(),
            reference_chi_squared
        );

        let status = loop {
            let damped = damping.damped(current.equations.hessian.view());
            let delta = self
                .solver
                .solve(damped.view(), current.equations.gradient.view())?;

            let trial = IterationState::evaluate(
                &self.function,
                &current.coefficients + &delta,
                &self.observations,
            )?;
            let trial_chi_squared = trial.chi_squared();

            let accepted = if trial_chi_squared > reference_chi_squared {
                log::debug!(
                    "iteration {}: bad step (chi-squared {:e} > {:e}), increasing damping",
                    iteration,
                    trial_chi_squared,
                    reference_chi_squared
                );
                damping.reject();
                false
            } else {
                log::debug!(
                    "iteration {}: good step, chi-squared {:e}",
                    iteration,
                    trial_chi_squared
                );
                damping.accept();
                current = trial;
                true
            };

            if accepted || config.chi_squared_tracking == ChiSquaredTracking::Trial {
                reference_chi_squared = trial_chi_squared;
            }
            let extra_iterations = stop.update(reference_chi_squared);

            if let Some(obs) = observer.as_deref_mut() {
                obs.on_iteration(&IterationRecord {
                    iteration,
                    extra_iterations,
                    chi_squared: reference_chi_squared,
                    retained_chi_squared: current.chi_squared(),
                    lambda: damping.lambda(),
                    accepted,
                    coefficients: current.coefficients.view(),
                    coefficient_names: &names,
                });
            }

            iteration += 1;
            let status = stop.status(iteration, config.max_total_iterations);
            if status.is_terminated() {
                break status;
            }
        };

        let iterations = iteration - 1;
        if let Some(obs) = observer.as_deref_mut() {
            obs.on_finish(status, iterations);
        }
        log::info!(
            "estimation stopped after {} iterations ({}), chi-squared {:e}",
            iterations,
            status.description(),
            current.chi_squared()
        );

        let covariance = self.solver.inverse(current.equations.hessian.view())?;
        self.final_covariance = Some(covariance.clone());

        Ok(FitResult {
            chi_squared: current.chi_squared(),
            coefficients: current.coefficients,
            covariance,
            iterations,
            status,
        })
    }
}
