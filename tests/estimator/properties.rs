//! Invariants every estimation must satisfy.

use crate::test_helpers::{line_estimator, two_peak_estimator, two_peak_guess, Counting, Line};
use approx::assert_relative_eq;
use lmest_rs::lm::NormalEquations;
use lmest_rs::{
    ChiSquaredTracking, ConvergenceStatus, Estimate, EstimateFunction, EstimatorConfig,
    IterationRecord, LevenbergMarquardtEstimator, LmEstError,
};
use ndarray::{array, Array1, ArrayView1};

/// f(x; a, b) = 1, independent of its coefficients.
struct Flat;

impl EstimateFunction for Flat {
    fn point_dimension(&self) -> usize {
        1
    }

    fn coefficient_count(&self) -> usize {
        2
    }

    fn evaluate(&self, _point: ArrayView1<f64>, _coefficients: ArrayView1<f64>) -> Estimate {
        Estimate {
            value: 1.0,
            derivatives: Array1::zeros(2),
        }
    }
}

/// f(x; a, b) = (a + b) * x, where only the sum of the coefficients is determined.
struct SummedSlope;

impl EstimateFunction for SummedSlope {
    fn point_dimension(&self) -> usize {
        1
    }

    fn coefficient_count(&self) -> usize {
        2
    }

    fn evaluate(&self, point: ArrayView1<f64>, coefficients: ArrayView1<f64>) -> Estimate {
        let x = point[0];
        Estimate {
            value: (coefficients[0] + coefficients[1]) * x,
            derivatives: array![x, x],
        }
    }
}

#[test]
fn test_result_has_one_value_per_coefficient() {
    let mut line = line_estimator(10, 0.5);
    let fit = line.estimate(array![0.0, 0.0]).unwrap();
    assert_eq!(fit.coefficients.len(), 2);
    assert_eq!(fit.covariance.dim(), (2, 2));

    let mut peaks = two_peak_estimator(None);
    let fit = peaks.estimate(two_peak_guess()).unwrap();
    assert_eq!(fit.coefficients.len(), 6);
    assert_eq!(fit.covariance.dim(), (6, 6));
}

#[test]
fn test_dimension_mismatch_leaves_observations_unchanged() {
    let mut estimator = line_estimator(4, 1.0);

    let err = estimator
        .add_observation(array![1.0, 2.0], 3.0, 1.0)
        .unwrap_err();
    assert!(matches!(
        err,
        LmEstError::DimensionMismatch {
            expected: 1,
            actual: 2
        }
    ));
    assert_eq!(estimator.observations().len(), 4);
}

#[test]
fn test_insufficient_data_fails_before_evaluation() {
    let mut estimator = LevenbergMarquardtEstimator::new(Counting::new(Line));

    let err = estimator.estimate(array![1.0, 1.0]).unwrap_err();
    assert!(matches!(
        err,
        LmEstError::InsufficientData {
            observations: 0,
            coefficients: 2
        }
    ));

    estimator.add_observation(array![1.0], 3.0, 1.0).unwrap();
    let err = estimator.estimate(array![1.0, 1.0]).unwrap_err();
    assert!(matches!(err, LmEstError::InsufficientData { .. }));

    assert_eq!(estimator.function().calls.get(), 0);
}

#[test]
fn test_wrong_initial_coefficient_count() {
    let mut estimator = line_estimator(5, 1.0);
    let err = estimator.estimate(array![1.0]).unwrap_err();
    assert!(matches!(
        err,
        LmEstError::CoefficientCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[test]
fn test_estimation_is_deterministic() {
    let first = two_peak_estimator(Some(7))
        .estimate(two_peak_guess())
        .unwrap();
    let second = two_peak_estimator(Some(7))
        .estimate(two_peak_guess())
        .unwrap();

    assert_eq!(first.coefficients, second.coefficients);
    assert_eq!(first.covariance, second.covariance);
    assert_eq!(first.chi_squared, second.chi_squared);
    assert_eq!(first.iterations, second.iterations);

    // repeating on the same estimator starts from scratch
    let mut estimator = two_peak_estimator(Some(7));
    let a = estimator.estimate(two_peak_guess()).unwrap();
    let b = estimator.estimate(two_peak_guess()).unwrap();
    assert_eq!(a.coefficients, b.coefficients);
    assert_eq!(a.coefficients, first.coefficients);
}

#[test]
fn test_retained_chi_squared_never_increases() {
    let mut estimator =
        two_peak_estimator(Some(3)).with_chi_squared_tracking(ChiSquaredTracking::Accepted);
    let initial = NormalEquations::build(
        estimator.function(),
        two_peak_guess().view(),
        estimator.observations(),
    )
    .unwrap()
    .chi_squared;

    let mut trace = Vec::new();
    let fit = estimator
        .estimate_observed(two_peak_guess(), &mut |r: &IterationRecord<'_>| {
            trace.push((r.chi_squared, r.retained_chi_squared))
        })
        .unwrap();

    assert_eq!(trace.len(), fit.iterations);
    let mut previous = initial;
    for &(reference, retained) in &trace {
        assert!(retained <= previous);
        assert_eq!(reference, retained);
        previous = retained;
    }
    assert_eq!(fit.chi_squared, previous);
}

/// Chi-squared of the two-peak estimator at the starting guess.
fn initial_chi_squared<F: EstimateFunction>(
    estimator: &LevenbergMarquardtEstimator<F, lmest_rs::NalgebraSolver>,
) -> f64 {
    NormalEquations::build(
        estimator.function(),
        two_peak_guess().view(),
        estimator.observations(),
    )
    .unwrap()
    .chi_squared
}

#[test]
fn test_rejected_steps_keep_coefficients() {
    let mut estimator = two_peak_estimator(None);
    let mut previous = (initial_chi_squared(&estimator), two_peak_guess());

    let mut trace: Vec<(bool, f64, Array1<f64>)> = Vec::new();
    estimator
        .estimate_observed(two_peak_guess(), &mut |r: &IterationRecord<'_>| {
            trace.push((r.accepted, r.retained_chi_squared, r.coefficients.to_owned()))
        })
        .unwrap();
    assert!(trace.iter().any(|(accepted, _, _)| !*accepted));

    for (accepted, chi, coef) in trace {
        if !accepted {
            assert_eq!(chi, previous.0);
            assert_eq!(coef, previous.1);
        }
        previous = (chi, coef);
    }
}

#[test]
fn test_trial_tracking_compares_against_rejected_chi_squared() {
    let mut estimator = two_peak_estimator(None);
    let initial = initial_chi_squared(&estimator);
    let delta = estimator.config().delta_chi_squared_stop;
    assert_eq!(
        estimator.config().chi_squared_tracking,
        ChiSquaredTracking::Trial
    );

    let mut trace: Vec<(bool, f64, f64, usize)> = Vec::new();
    estimator
        .estimate_observed(two_peak_guess(), &mut |r: &IterationRecord<'_>| {
            trace.push((
                r.accepted,
                r.chi_squared,
                r.retained_chi_squared,
                r.extra_iterations,
            ))
        })
        .unwrap();
    assert!(trace.iter().any(|t| !t.0));

    let mut reference = initial;
    let mut extra = 0;
    for &(accepted, chi_squared, retained, extra_iterations) in &trace {
        // the accept test uses the previous reference, whatever its origin
        assert_eq!(accepted, chi_squared <= reference);
        if !accepted {
            // the rejected trial becomes the new reference
            assert!(chi_squared > retained);
        }

        extra = if (chi_squared - reference).abs() < delta {
            extra + 1
        } else {
            0
        };
        assert_eq!(extra_iterations, extra);
        reference = chi_squared;
    }
}

#[test]
fn test_covariance_diagonal_is_non_negative() {
    let mut estimator = two_peak_estimator(Some(11));
    let fit = estimator.estimate(two_peak_guess()).unwrap();

    for i in 0..6 {
        assert!(fit.covariance[[i, i]] >= 0.0);
        for j in 0..6 {
            assert_relative_eq!(
                fit.covariance[[i, j]],
                fit.covariance[[j, i]],
                max_relative = 1e-8
            );
        }
    }
    assert_eq!(estimator.estimated_covariance().unwrap(), &fit.covariance);
}

#[test]
fn test_single_iteration_cap() {
    let config = EstimatorConfig {
        max_total_iterations: 1,
        delta_chi_squared_stop: 0.0,
        ..EstimatorConfig::default()
    };
    let mut estimator = line_estimator(10, 0.5).with_config(config);
    let fit = estimator.estimate(array![0.0, 0.0]).unwrap();

    assert_eq!(fit.status, ConvergenceStatus::MaxIterationsReached);
    assert_eq!(fit.iterations, 1);
    assert!(estimator.estimated_covariance().is_ok());
}

#[test]
fn test_iteration_cap_counts_steps() {
    let mut estimator = line_estimator(10, 0.5);
    estimator.setup_delta_chi_squared_stop_condition(0.0, 3);
    estimator.setup_maximum_iterations(5);

    let fit = estimator.estimate(array![0.0, 0.0]).unwrap();
    assert_eq!(fit.status, ConvergenceStatus::MaxIterationsReached);
    assert_eq!(fit.iterations, 4);
}

#[test]
fn test_zero_derivatives_are_singular() {
    let mut estimator = LevenbergMarquardtEstimator::new(Flat);
    for i in 0..5 {
        estimator.add_observation(array![i as f64], 1.0, 1.0).unwrap();
    }

    let err = estimator.estimate(array![1.0, 2.0]).unwrap_err();
    assert!(matches!(err, LmEstError::SingularMatrix(_)));
    assert!(matches!(
        estimator.estimated_covariance(),
        Err(LmEstError::CovarianceUnavailable)
    ));
}

#[test]
fn test_undetermined_coefficients_are_singular() {
    let mut estimator = LevenbergMarquardtEstimator::new(SummedSlope);
    for i in 1..=5 {
        let x = i as f64;
        estimator.add_observation(array![x], 3.0 * x, 0.1).unwrap();
    }

    let err = estimator.estimate(array![1.0, 1.0]).unwrap_err();
    assert!(matches!(err, LmEstError::SingularMatrix(_)));
    assert!(estimator.estimated_covariance().is_err());
}
