//! Observation storage.
//!
//! Observations are (point, value, weight) triples collected before a fit.
//! The store is append-only and checks each point against the dimension of
//! the function being estimated.

use ndarray::Array1;

use crate::error::{LmEstError, Result};

/// A single observed data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Multidimensional point the value was observed at.
    pub point: Array1<f64>,

    /// Observed value of the function at this point.
    pub value: f64,

    /// Per-point scale of the observation; smaller numbers mean more weight.
    /// Enters the fit as `1 / weight²`.
    pub weight: f64,
}

/// Append-only collection of observations for a function of fixed point dimension.
#[derive(Debug, Clone)]
pub struct ObservationStore {
    point_dimension: usize,
    observations: Vec<Observation>,
}

impl ObservationStore {
    /// Create an empty store accepting points of `point_dimension` components.
    pub fn new(point_dimension: usize) -> Self {
        Self {
            point_dimension,
            observations: Vec::new(),
        }
    }

    /// Point dimension this store accepts.
    pub fn point_dimension(&self) -> usize {
        self.point_dimension
    }

    /// Add an observation.
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` if `point` does not have the store's point dimension
    /// * `InvalidObservation` if `value` is not finite or `weight` is not a
    ///   finite positive number
    ///
    /// The store is left unchanged when an error is returned.
    pub fn add(&mut self, point: Array1<f64>, value: f64, weight: f64) -> Result<()> {
        if point.len() != self.point_dimension {
            return Err(LmEstError::DimensionMismatch {
                expected: self.point_dimension,
                actual: point.len(),
            });
        }
        if !value.is_finite() {
            return Err(LmEstError::InvalidObservation(format!(
                "value {} is not finite",
                value
            )));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(LmEstError::InvalidObservation(format!(
                "weight {} must be finite and positive",
                weight
            )));
        }

        self.observations.push(Observation {
            point,
            value,
            weight,
        });
        Ok(())
    }

    /// Number of stored observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if no observation has been added.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterate over the observations in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }
}

impl<'a> IntoIterator for &'a ObservationStore {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
