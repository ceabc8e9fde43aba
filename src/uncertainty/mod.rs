//! Uncertainty estimates derived from a fit's covariance matrix.

pub mod covariance;

pub use covariance::{calculate_correlation, standard_errors_from_covariance};
