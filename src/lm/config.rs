//! Configuration options for the Levenberg-Marquardt estimator.
//!
//! This module defines the damping schedule, the chi-squared stop condition and
//! the iteration cap used by [`LevenbergMarquardtEstimator`](super::LevenbergMarquardtEstimator).
//! Configurations can be built in code or loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{LmEstError, Result};

/// Which chi-squared the stop condition and the next accept test compare against
/// after a rejected step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChiSquaredTracking {
    /// After every step, rejected or not, the trial chi-squared becomes the
    /// reference value. Accept tests and the stop condition then compare against
    /// a value that may not belong to the retained coefficients.
    Trial,

    /// Only accepted steps update the reference value, so it always belongs to
    /// the retained coefficients.
    Accepted,
}

impl Default for ChiSquaredTracking {
    fn default() -> Self {
        ChiSquaredTracking::Trial
    }
}

/// Configuration options for the Levenberg-Marquardt estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Initial value for the damping parameter. Default: 1e-3
    pub lambda_start: f64,

    /// Lambda is multiplied by this factor after an accepted step and divided
    /// by it after a rejected one; 1.0 keeps lambda constant. Must lie in
    /// (0, 1]. Default: 0.1
    pub lambda_scale_per_step: f64,

    /// A step whose chi-squared changes by less than this counts towards
    /// convergence. Default: 0.1
    pub delta_chi_squared_stop: f64,

    /// Number of consecutive small-change steps needed to stop. Default: 3
    pub max_extra_iterations: usize,

    /// Iteration cap; at most `max(1, max_total_iterations - 1)` steps run. Default: 1000
    pub max_total_iterations: usize,

    /// Reference chi-squared policy. Default: Trial
    pub chi_squared_tracking: ChiSquaredTracking,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            lambda_start: 1e-3,
            lambda_scale_per_step: 0.1,
            delta_chi_squared_stop: 0.1,
            max_extra_iterations: 3,
            max_total_iterations: 1000,
            chi_squared_tracking: ChiSquaredTracking::default(),
        }
    }
}

impl EstimatorConfig {
    /// Parse a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every setting is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.lambda_start.is_finite() && self.lambda_start > 0.0) {
            return Err(LmEstError::InvalidConfig(format!(
                "lambda_start must be finite and positive, got {}",
                self.lambda_start
            )));
        }
        if !(self.lambda_scale_per_step > 0.0 && self.lambda_scale_per_step <= 1.0) {
            return Err(LmEstError::InvalidConfig(format!(
                "lambda_scale_per_step must lie in (0, 1], got {}",
                self.lambda_scale_per_step
            )));
        }
        if !(self.delta_chi_squared_stop.is_finite() && self.delta_chi_squared_stop >= 0.0) {
            return Err(LmEstError::InvalidConfig(format!(
                "delta_chi_squared_stop must be finite and non-negative, got {}",
                self.delta_chi_squared_stop
            )));
        }
        if self.max_total_iterations == 0 {
            return Err(LmEstError::InvalidConfig(
                "max_total_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
