//! Peak functions for fitting data.
//!
//! This module provides a sum of Gaussian peaks, the usual test case for
//! Levenberg-Marquardt fitting of spectra and chromatograms.

use ndarray::{Array1, ArrayView1};

use crate::function::{Estimate, EstimateFunction};

/// A sum of Gaussian peaks in one variable.
///
/// The function is defined as:
/// f(x) = Σ_k B_k * exp(-((x - E_k) / G_k)²)
///
/// Each peak is characterized by three consecutive coefficients:
/// - `amplitude` B_k: the height of the peak
/// - `center` E_k: the position of the peak center
/// - `width` G_k: the distance from the center at which the peak falls to 1/e
///
/// Note that `width` is not the standard deviation; `sigma = width / √2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumOfGaussians {
    peaks: usize,
}

impl SumOfGaussians {
    /// Create a sum of `peaks` Gaussians (3 coefficients per peak).
    pub fn new(peaks: usize) -> Self {
        Self { peaks }
    }

    /// Number of peaks.
    pub fn peaks(&self) -> usize {
        self.peaks
    }

    /// Evaluate the function at `x` without derivatives.
    pub fn value_at(&self, x: f64, coefficients: ArrayView1<f64>) -> f64 {
        (0..self.peaks)
            .map(|k| {
                let i = 3 * k;
                gaussian(x, coefficients[i], coefficients[i + 1], coefficients[i + 2])
            })
            .sum()
    }
}

fn gaussian(x: f64, amplitude: f64, center: f64, width: f64) -> f64 {
    let arg = (x - center) / width;
    amplitude * (-arg * arg).exp()
}

impl EstimateFunction for SumOfGaussians {
    fn point_dimension(&self) -> usize {
        1
    }

    fn coefficient_count(&self) -> usize {
        3 * self.peaks
    }

    fn coefficient_name(&self, index: usize) -> String {
        let peak = index / 3;
        match index % 3 {
            0 => format!("amplitude{}", peak),
            1 => format!("center{}", peak),
            _ => format!("width{}", peak),
        }
    }

    fn evaluate(&self, point: ArrayView1<f64>, coefficients: ArrayView1<f64>) -> Estimate {
        let x = point[0];
        let mut value = 0.0;
        let mut derivatives = Array1::zeros(self.coefficient_count());

        for k in 0..self.peaks {
            let i = 3 * k;
            let (amplitude, center, width) =
                (coefficients[i], coefficients[i + 1], coefficients[i + 2]);

            let arg = (x - center) / width;
            let ex = (-arg * arg).exp();
            let fac = amplitude * ex * 2.0 * arg;

            value += amplitude * ex;

            // d/d(amplitude)
            derivatives[i] = ex;
            // d/d(center)
            derivatives[i + 1] = fac / width;
            // d/d(width)
            derivatives[i + 2] = fac * arg / width;
        }

        Estimate { value, derivatives }
    }
}
