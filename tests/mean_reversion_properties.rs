//! Integration tests for the statistical properties of the diagnostics
//!
//! Each test uses seeded synthetic series with known behaviour: random walks
//! (unit root, Hurst 0.5), AR(1) processes (stationary, known half-life) and
//! deterministic alternating sequences.

use assert_approx_eq::assert_approx_eq;
use pairs_cointegration::generators::{ar1_process, random_walk, seeded_rng, white_noise};
use pairs_cointegration::math_utils::constants::LN_2;
use pairs_cointegration::{
    check_for_stationarity, half_life, hurst, variance_ratio, zero_crossings, zscore,
    MeanReversionProfile, PairAnalysisError,
};

/// Property: p-values are probabilities and statistics are finite
#[test]
fn test_stationarity_outputs_are_well_formed() {
    let mut rng = seeded_rng(1);
    let mut inputs: Vec<Vec<f64>> = Vec::new();
    for length in [30, 45, 80, 250, 1000] {
        inputs.push(random_walk(&mut rng, length, 50.0, 1.0));
        inputs.push(white_noise(&mut rng, length, 2.0));
        inputs.push(ar1_process(&mut rng, length, 0.95, 1.0));
        inputs.push(
            white_noise(&mut rng, length, 0.5)
                .iter()
                .enumerate()
                .map(|(i, e)| (i as f64 * 0.3).sin() * 3.0 + e)
                .collect(),
        );
    }

    for series in &inputs {
        let result = check_for_stationarity(series).unwrap();
        assert!(result.t_statistic.is_finite());
        assert!((0.0..=1.0).contains(&result.p_value));
        assert!(result.critical_values.one_percent < result.critical_values.ten_percent);
        assert!(result.nobs < series.len());
    }
}

/// Property: the half-life of AR(1) with reversion speed -0.1 is ln 2 / 0.1
#[test]
fn test_half_life_of_synthetic_ar1() {
    let expected = LN_2 / 0.1;
    for seed in [3, 4, 5] {
        let spread = ar1_process(&mut seeded_rng(seed), 20_000, 0.9, 0.5);
        let estimate = half_life(&spread).unwrap();
        assert!(
            (estimate - expected).abs() <= 0.1 * expected,
            "seed {}: half-life {:.3}, expected {:.3}",
            seed,
            estimate,
            expected
        );
    }
}

/// Property: Hurst is about 0.5 for random walks and below 0.5 for reverting series
#[test]
fn test_hurst_regimes() {
    let mut rng = seeded_rng(6);
    let trials = 10;
    let mut total = 0.0;
    for _ in 0..trials {
        let walk = random_walk(&mut rng, 5000, 0.0, 1.0);
        let h = hurst(&walk).unwrap();
        assert!((0.25..=0.75).contains(&h), "random walk Hurst {}", h);
        total += h;
    }
    assert_approx_eq!(total / trials as f64, 0.5, 0.1);

    for phi in [0.0, 0.5, 0.8] {
        let reverting = ar1_process(&mut rng, 5000, phi, 1.0);
        assert!(hurst(&reverting).unwrap() < 0.5, "AR(1) phi={}", phi);
    }
}

/// Property: an alternating sequence of length N crosses its mean N - 1 times
#[test]
fn test_alternating_sequence_crossings() {
    for n in 2..40 {
        let series: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert_eq!(zero_crossings(&series), n - 1);
    }
}

/// Property: variance ratio separates walks from reverting series
#[test]
fn test_variance_ratio_regimes() {
    let mut rng = seeded_rng(7);
    let walk = random_walk(&mut rng, 10_000, 0.0, 1.0);
    let reverting = ar1_process(&mut rng, 10_000, 0.3, 1.0);
    for lag in [2, 5, 10] {
        assert_approx_eq!(variance_ratio(&walk, lag).unwrap(), 1.0, 0.15);
        assert!(variance_ratio(&reverting, lag).unwrap() < 0.8);
    }
}

/// Property: a trending spread has no half-life but still gets a profile
#[test]
fn test_profile_of_trending_spread() {
    let mut rng = seeded_rng(8);
    let noise = white_noise(&mut rng, 400, 0.1);
    let trending: Vec<f64> = noise
        .iter()
        .enumerate()
        .map(|(i, e)| 1.01f64.powi(i as i32) + e)
        .collect();

    assert!(matches!(
        half_life(&trending),
        Err(PairAnalysisError::NonMeanReverting { .. })
    ));
    let profile = MeanReversionProfile::compute(&trending).unwrap();
    assert!(profile.reversion_speed >= 0.0);
    assert!(profile.half_life.is_none());
    assert!(profile.hurst_exponent > 0.5);
}

#[test]
fn test_zscore_of_spread() {
    let spread = ar1_process(&mut seeded_rng(9), 1000, 0.6, 2.0);
    let z = zscore(&spread).unwrap();
    assert_eq!(z.len(), spread.len());
    let mean = z.iter().sum::<f64>() / z.len() as f64;
    let var = z.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / z.len() as f64;
    assert_approx_eq!(mean, 0.0, 1e-10);
    assert_approx_eq!(var, 1.0, 1e-10);
}
