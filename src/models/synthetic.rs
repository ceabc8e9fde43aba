//! Synthetic observations for testing and demonstrations.
//!
//! Samples are drawn from a known function and known coefficients, optionally
//! perturbed by multiplicative Gaussian noise `y * (1 + spread * N(0, 1))`.
//! Each sample's weight is `spread * |y|`, i.e. a constant relative error.

use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{LmEstError, Result};
use crate::function::EstimateFunction;

/// One generated observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub point: Array1<f64>,
    pub value: f64,
    pub weight: f64,
}

/// Draws observations from a function with known coefficients.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSampler {
    spread: f64,
    noise: bool,
}

impl SyntheticSampler {
    /// Sampler with relative error `spread`, adding noise of that size.
    pub fn new(spread: f64) -> Result<Self> {
        if !(spread.is_finite() && spread > 0.0) {
            return Err(LmEstError::InvalidInput(format!(
                "spread must be finite and positive, got {}",
                spread
            )));
        }
        Ok(Self {
            spread,
            noise: true,
        })
    }

    /// Keep the weights but leave the values exact.
    pub fn without_noise(mut self) -> Self {
        self.noise = false;
        self
    }

    /// Relative error of the samples.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// One-dimensional points `step * 1, step * 2, ..., step * count`.
    pub fn evenly_spaced(count: usize, step: f64) -> Vec<Array1<f64>> {
        (1..=count)
            .map(|i| Array1::from_elem(1, step * i as f64))
            .collect()
    }

    /// Evaluate `function` at every point and build samples.
    ///
    /// # Errors
    ///
    /// * `CoefficientCountMismatch` if `coefficients` has the wrong length
    /// * `DimensionMismatch` if a point has the wrong length
    pub fn sample<F, R>(
        &self,
        function: &F,
        coefficients: &Array1<f64>,
        points: &[Array1<f64>],
        rng: &mut R,
    ) -> Result<Vec<Sample>>
    where
        F: EstimateFunction + ?Sized,
        R: Rng + ?Sized,
    {
        if coefficients.len() != function.coefficient_count() {
            return Err(LmEstError::CoefficientCountMismatch {
                expected: function.coefficient_count(),
                actual: coefficients.len(),
            });
        }

        points
            .iter()
            .map(|point| {
                if point.len() != function.point_dimension() {
                    return Err(LmEstError::DimensionMismatch {
                        expected: function.point_dimension(),
                        actual: point.len(),
                    });
                }

                let mut value = function.evaluate(point.view(), coefficients.view()).value;
                if self.noise {
                    let z: f64 = rng.sample(StandardNormal);
                    value *= 1.0 + self.spread * z;
                }

                let weight = self.spread * value.abs();
                Ok(Sample {
                    point: point.clone(),
                    value,
                    weight: if weight > 0.0 { weight } else { self.spread },
                })
            })
            .collect()
    }
}
