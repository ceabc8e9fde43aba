//! Configuration loading and validation through the estimator.

use crate::test_helpers::line_estimator;
use lmest_rs::{ChiSquaredTracking, ConvergenceStatus, EstimatorConfig, LmEstError};
use ndarray::array;

#[test]
fn test_json_config_drives_estimation() {
    let config = EstimatorConfig::from_json(
        r#"{
            "delta_chi_squared_stop": 1e-9,
            "max_extra_iterations": 2,
            "chi_squared_tracking": "accepted"
        }"#,
    )
    .unwrap();
    assert_eq!(config.lambda_start, 1e-3);
    assert_eq!(config.max_extra_iterations, 2);
    assert_eq!(config.chi_squared_tracking, ChiSquaredTracking::Accepted);

    let mut estimator = line_estimator(10, 0.5).with_config(config.clone());
    assert_eq!(estimator.config(), &config);

    let fit = estimator.estimate(array![0.0, 0.0]).unwrap();
    assert_eq!(fit.status, ConvergenceStatus::Converged);
    assert!((fit.coefficients[0] - 2.0).abs() < 1e-8);
}

#[test]
fn test_config_json_round_trip() {
    let config = EstimatorConfig {
        lambda_start: 0.01,
        max_total_iterations: 50,
        ..EstimatorConfig::default()
    };
    let json = config.to_json().unwrap();
    assert!(json.contains("\"chi_squared_tracking\": \"trial\""));
    assert_eq!(EstimatorConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_bad_json_config() {
    assert!(matches!(
        EstimatorConfig::from_json("{"),
        Err(LmEstError::JsonError(_))
    ));
    assert!(matches!(
        EstimatorConfig::from_json(r#"{"lambda_scale_per_step": 2.0}"#),
        Err(LmEstError::InvalidConfig(_))
    ));
    assert!(matches!(
        EstimatorConfig::from_json(r#"{"max_total_iterations": 0}"#),
        Err(LmEstError::InvalidConfig(_))
    ));
}

#[test]
fn test_invalid_setup_is_reported_by_estimate() {
    let mut estimator = line_estimator(10, 0.5);
    estimator.setup_lambda(1e-3, 1.5);
    assert!(matches!(
        estimator.estimate(array![0.0, 0.0]),
        Err(LmEstError::InvalidConfig(_))
    ));

    estimator.setup_lambda(1e-2, 0.5);
    assert!(estimator.estimate(array![0.0, 0.0]).is_ok());

    // constant damping
    estimator.setup_lambda(1e-3, 1.0);
    let fit = estimator.estimate(array![0.0, 0.0]).unwrap();
    assert!((fit.coefficients[1] - 1.0).abs() < 1e-6);
}
