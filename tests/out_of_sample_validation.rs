//! Integration tests for walk-forward validation of candidate pairs
//!
//! Candidates discovered on a train window are refitted on a disjoint later
//! window; only relationships that persist survive.

use pairs_cointegration::generators::{
    ar1_process, cointegrated_pair, random_walk, seeded_rng, CointegratedPairConfig,
};
use pairs_cointegration::{
    find_pairs, pairs_overlap, PairThresholds, PairValidator, PricePanel, SearchConfig,
};

const TRAIN_LENGTH: usize = 2000;
const TEST_LENGTH: usize = 2000;

fn thresholds() -> PairThresholds {
    PairThresholds {
        p_value_threshold: 0.05,
        min_half_life: 1.0,
        max_half_life: Some(30.0),
        min_zero_crossings: 12,
        hurst_threshold: 0.5,
    }
}

/// Scenario: the relationship holds in both windows
#[test]
fn test_persistent_relationship_is_confirmed() {
    let mut rng = seeded_rng(404);
    let config = CointegratedPairConfig {
        length: TRAIN_LENGTH + TEST_LENGTH,
        start_price: 500.0,
        ..Default::default()
    };
    let (a, b) = cointegrated_pair(&mut rng, &config);
    let other = random_walk(&mut rng, TRAIN_LENGTH + TEST_LENGTH, 200.0, 1.0);
    let panel = PricePanel::from_columns(vec![("A", a), ("B", b), ("W", other)]).unwrap();
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();

    let candidates = find_pairs(&train, &test, &thresholds()).unwrap();
    assert_eq!(candidates.len(), 1);

    let confirmed = pairs_overlap(&candidates, &thresholds()).unwrap();
    assert_eq!(confirmed.len(), 1);
    let validated = &confirmed[0];
    assert_eq!(validated.index, 0);
    assert!(validated.candidate.validated);

    // the refit is an independent fit on the test legs
    assert_eq!(validated.out_of_sample.regression.spread.len(), TEST_LENGTH);
    assert_eq!(
        validated.out_of_sample.regression.dependent,
        validated.candidate.regression.dependent
    );
    assert_ne!(
        validated.out_of_sample.regression.hedge_ratio,
        validated.candidate.regression.hedge_ratio
    );
    let out_of_sample_half_life = validated.out_of_sample.profile.half_life.unwrap();
    assert!(out_of_sample_half_life <= 30.0);
}

/// Scenario: the relationship breaks down after the train window
#[test]
fn test_broken_relationship_is_excluded() {
    let mut rng = seeded_rng(505);
    let a = random_walk(&mut rng, TRAIN_LENGTH + TEST_LENGTH, 500.0, 1.0);
    let train_noise = ar1_process(&mut rng, TRAIN_LENGTH, 0.7, 1.0);
    let test_drift = random_walk(&mut rng, TEST_LENGTH, 0.0, 3.0);

    // B tracks 2 A on the train window, then wanders off on a walk of its own
    let b: Vec<f64> = (0..TRAIN_LENGTH + TEST_LENGTH)
        .map(|t| {
            let deviation = if t < TRAIN_LENGTH {
                train_noise[t]
            } else {
                train_noise[TRAIN_LENGTH - 1] + test_drift[t - TRAIN_LENGTH]
            };
            2.0 * a[t] + deviation
        })
        .collect();

    let panel = PricePanel::from_columns(vec![("A", a), ("B", b)]).unwrap();
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();

    let candidates = find_pairs(&train, &test, &thresholds()).unwrap();
    assert_eq!(candidates.len(), 1, "train window should still show the pair");

    let confirmed = pairs_overlap(&candidates, &thresholds()).unwrap();
    assert!(confirmed.is_empty());
}

/// Scenario: one good and one broken candidate in the same batch
#[test]
fn test_validator_keeps_original_indices() {
    let mut rng = seeded_rng(606);
    let config = CointegratedPairConfig {
        length: TRAIN_LENGTH + TEST_LENGTH,
        start_price: 500.0,
        ..Default::default()
    };
    let (a, b) = cointegrated_pair(&mut rng, &config);
    let c = random_walk(&mut rng, TRAIN_LENGTH + TEST_LENGTH, 300.0, 1.0);
    let train_noise = ar1_process(&mut rng, TRAIN_LENGTH, 0.5, 1.0);
    let test_drift = random_walk(&mut rng, TEST_LENGTH, 0.0, 3.0);
    let d: Vec<f64> = (0..TRAIN_LENGTH + TEST_LENGTH)
        .map(|t| {
            let deviation = if t < TRAIN_LENGTH {
                train_noise[t]
            } else {
                test_drift[t - TRAIN_LENGTH]
            };
            1.5 * c[t] + deviation
        })
        .collect();

    // enumeration puts C/D before A/B
    let panel = PricePanel::from_columns(vec![("C", c), ("D", d), ("A", a), ("B", b)]).unwrap();
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();

    let candidates = find_pairs(&train, &test, &thresholds()).unwrap();
    let position = |x: &str, y: &str| {
        candidates
            .iter()
            .position(|p| p.symbol_a == x && p.symbol_b == y)
    };
    let broken_index = position("C", "D").expect("C/D found on train window");
    let good_index = position("A", "B").expect("A/B found on train window");

    let config = SearchConfig::default().with_thresholds(thresholds());
    let validator = PairValidator::new(&config).unwrap();
    let confirmed = validator.pairs_overlap(&candidates);
    let confirmed_indices: Vec<usize> = confirmed.iter().map(|v| v.index).collect();
    assert!(confirmed_indices.contains(&good_index));
    assert!(!confirmed_indices.contains(&broken_index));
    for validated in &confirmed {
        assert_eq!(validated.candidate, {
            let mut original = candidates[validated.index].clone();
            original.validated = true;
            original
        });
    }
}
