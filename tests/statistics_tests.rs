use oxdc_analysis::stats::*;
use oxdc_analysis::AnalysisError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn stationary_noise(n: usize, mean: f64, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

#[test]
fn test_block_average_of_one_to_ten() {
    let series: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let result = block_average(&series, 5).unwrap();

    assert_eq!(result.block_means, vec![1.5, 3.5, 5.5, 7.5, 9.5]);
    assert_eq!(result.block_size, 2);
    assert_eq!(result.dropped, 0);
    assert!((result.grand_mean - 5.5).abs() < 1e-12);
    // Population std of the block means is sqrt(8), divided by sqrt(5)
    let expected = 8.0_f64.sqrt() / 5.0_f64.sqrt();
    assert!((result.standard_error - expected).abs() < 1e-12);
}

#[test]
fn test_block_average_drops_trailing_samples() {
    let series: Vec<f64> = (1..=11).map(|i| i as f64).collect();
    let result = block_average(&series, 5).unwrap();
    assert_eq!(result.block_size, 2);
    assert_eq!(result.dropped, 1);
    // The 11 is excluded, so the grand mean stays at 5.5 rather than 6
    assert!((result.grand_mean - 5.5).abs() < 1e-12);
}

#[test]
fn test_constant_series_has_zero_error() {
    let result = block_average(&[2.5; 40], 4).unwrap();
    assert_eq!(result.standard_error, 0.0);
    assert_eq!(result.grand_mean, 2.5);
    assert!(result.is_converged(0.01));
}

#[test]
fn test_block_count_limits() {
    assert!(matches!(
        block_average(&[1.0, 2.0, 3.0], 1),
        Err(AnalysisError::InsufficientData(_))
    ));
    assert!(matches!(
        block_average(&[1.0, 2.0, 3.0], 4),
        Err(AnalysisError::InsufficientData(_))
    ));
    assert!(block_average(&[1.0, 2.0, 3.0, 4.0], 4).is_ok());
}

#[test]
fn test_more_blocks_keep_the_grand_mean_of_stationary_noise() {
    let series = stationary_noise(1000, 1.2, 0.2, 5);
    let sample_mean = mean(&series).unwrap();
    for blocks in [2, 5, 10, 20, 50] {
        let result = block_average(&series, blocks).unwrap();
        // 1000 is divisible by every block count, so nothing is dropped
        assert_eq!(result.dropped, 0);
        assert!((result.grand_mean - sample_mean).abs() < 1e-12);
        assert!(result.standard_error < 0.05);
    }
}

#[test]
fn test_regression_recovers_exact_line() {
    let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
    let fit = linear_regression(&x, &y).unwrap();
    assert!((fit.slope - 2.0).abs() < 1e-12);
    assert!((fit.intercept - 3.0).abs() < 1e-12);
    assert!((fit.r_squared - 1.0).abs() < 1e-12);
    assert_eq!(fit.count, 20);
    assert!((fit.predict(100.0) - 203.0).abs() < 1e-9);
}

#[test]
fn test_regression_degenerate_inputs() {
    assert!(matches!(
        linear_regression(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
        Err(AnalysisError::DegenerateInput(_))
    ));
    assert!(matches!(
        linear_regression(&[1.0, 2.0], &[1.0]),
        Err(AnalysisError::DimensionMismatch { .. })
    ));
    assert!(linear_regression(&[1.0], &[1.0]).is_err());
}

#[test]
fn test_inexact_constant_input_is_degenerate() {
    // 0.1 has no exact binary form, so its mean leaves a rounding residue
    let constant = [0.1; 3];
    let ramp = [1.0, 2.0, 3.0];
    assert!(matches!(
        linear_regression(&constant, &ramp),
        Err(AnalysisError::DegenerateInput(_))
    ));
    assert!(matches!(
        pearson(&constant, &ramp),
        Err(AnalysisError::DegenerateInput(_))
    ));
    assert!(matches!(
        pearson(&ramp, &[0.7; 3]),
        Err(AnalysisError::DegenerateInput(_))
    ));
    assert!(is_constant(&constant));
    assert!(!is_constant(&ramp));
}

#[test]
fn test_noisy_fit_has_partial_r_squared() {
    let noise = stationary_noise(200, 0.0, 1.0, 9);
    let y: Vec<f64> = noise.iter().enumerate().map(|(i, e)| 0.01 * i as f64 + e).collect();
    let fit = fit_series(&y).unwrap();
    assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    assert!((fit.slope - 0.01).abs() < 0.01);
}

#[test]
fn test_pearson_sign_and_p_value() {
    let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
    let up: Vec<f64> = x.iter().map(|v| v * 1.5 + 2.0).collect();
    let down: Vec<f64> = x.iter().map(|v| -v).collect();

    let positive = pearson(&x, &up).unwrap();
    let negative = pearson(&x, &down).unwrap();
    assert!((positive.r - 1.0).abs() < 1e-12);
    assert!((negative.r + 1.0).abs() < 1e-12);
    assert_eq!(positive.p_value, negative.p_value);
    assert!(positive.p_value <= 1e-6);

    let unrelated = pearson(&x, &stationary_noise(30, 0.0, 1.0, 3)).unwrap();
    assert!(unrelated.p_value > 0.0 && unrelated.p_value <= 1.0);
}

#[test]
fn test_entropy_and_mutual_information() {
    let uniform: Vec<f64> = (0..1000).map(|i| i as f64).collect();
    let h = entropy(&uniform, 10).unwrap();
    assert!((h - 10.0_f64.log2()).abs() < 1e-12);
    assert_eq!(entropy(&[4.0; 10], 10).unwrap(), 0.0);

    let independent_a: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
    let independent_b: Vec<f64> = (0..100).map(|i| (i / 10) as f64).collect();
    let mi = mutual_information(&independent_a, &independent_b, 5).unwrap();
    assert!(mi.abs() < 1e-12);

    let mi_self = mutual_information(&independent_a, &independent_a, 5).unwrap();
    assert!((mi_self - 5.0_f64.log2()).abs() < 1e-12);
}

#[test]
fn test_normality_heuristic_separates_shapes() {
    let gaussian = normality_heuristic(&stationary_noise(2000, 0.0, 1.0, 21)).unwrap();
    assert!(gaussian.p_value > 0.5);

    // Heavily skewed: mostly zeros with a few large outliers
    let mut skewed = vec![0.0; 200];
    for v in skewed.iter_mut().step_by(20) {
        *v = 50.0;
    }
    let skewed = normality_heuristic(&skewed).unwrap();
    assert!(skewed.skewness > 2.0);
    assert!(skewed.p_value < gaussian.p_value);
}

#[test]
fn test_descriptive_helpers() {
    let series: Vec<f64> = (1..=100).map(|i| i as f64).collect();
    let tail = tail_window(&series, 10).unwrap();
    assert_eq!(tail.count, 10);
    assert_eq!(tail.mean, 95.5);
    assert_eq!(tail.min, 91.0);

    let split = split_fraction(&series, 0.5).unwrap();
    assert_eq!(split.split_index, 50);
    assert_eq!(split.early_mean, 25.5);
    assert_eq!(split.late_mean, 75.5);

    assert!(split_fraction(&series, 1.0).is_err());
    assert!(matches!(mean(&[]), Err(AnalysisError::InsufficientData(_))));
}
