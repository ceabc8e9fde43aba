//! Built-in models driven through the estimator.

use approx::assert_relative_eq;
use lmest_rs::models::{SumOfGaussians, SyntheticSampler};
use lmest_rs::{EstimateFunction, LevenbergMarquardtEstimator};
use ndarray::array;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_single_peak_recovered_from_noisy_samples() {
    let model = SumOfGaussians::new(1);
    let truth = array![3.0, 4.0, 1.5];
    let points = SyntheticSampler::evenly_spaced(80, 0.1);
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let samples = SyntheticSampler::new(0.01)
        .unwrap()
        .sample(&model, &truth, &points, &mut rng)
        .unwrap();

    let mut estimator = LevenbergMarquardtEstimator::new(model);
    for s in samples {
        estimator.add_observation(s.point, s.value, s.weight).unwrap();
    }

    let fit = estimator.estimate(array![2.5, 3.6, 1.8]).unwrap();
    let errors = fit.standard_errors();
    for i in 0..3 {
        assert!((fit.coefficients[i] - truth[i]).abs() < 6.0 * errors[i]);
    }
}

#[test]
fn test_sampler_points_match_model_dimension() {
    let model = SumOfGaussians::new(3);
    let points = SyntheticSampler::evenly_spaced(5, 0.5);
    assert!(points.iter().all(|p| p.len() == model.point_dimension()));
    assert_relative_eq!(points[4][0], 2.5);
}

#[test]
fn test_two_peak_coefficient_names() {
    let model = SumOfGaussians::new(2);
    let names: Vec<String> = (0..model.coefficient_count())
        .map(|i| model.coefficient_name(i))
        .collect();
    assert_eq!(names[3], "amplitude1");
    assert_eq!(names[5], "width1");
}
