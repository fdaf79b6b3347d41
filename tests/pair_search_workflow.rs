//! Integration tests for the pair discovery workflow
//!
//! These tests build price panels with one engineered cointegrated pair hidden
//! among independent random walks and check that the search, the
//! cluster-restricted search and the summaries find exactly that pair.

use pairs_cointegration::generators::{
    cointegrated_pair, random_walk, seeded_rng, CointegratedPairConfig,
};
use pairs_cointegration::{
    find_pairs, get_candidate_pairs, ClusterAssignment, PairSearch, PairThresholds, PricePanel,
    RegressionDirection, SearchConfig, NOISE_LABEL,
};
use rand_chacha::ChaCha20Rng;

const TRAIN_LENGTH: usize = 2000;
const TEST_LENGTH: usize = 2000;

fn short_horizon_thresholds() -> PairThresholds {
    PairThresholds {
        p_value_threshold: 0.05,
        min_half_life: 1.0,
        max_half_life: Some(30.0),
        min_zero_crossings: 12,
        hurst_threshold: 0.5,
    }
}

/// Panel of `W1`, `A`, `W2`, `B`, `W3`, `W4` where `B = 2 A + AR(1)` and the
/// `W` columns are independent random walks.
fn engineered_panel(rng: &mut ChaCha20Rng) -> PricePanel {
    let config = CointegratedPairConfig {
        length: TRAIN_LENGTH + TEST_LENGTH,
        start_price: 500.0,
        ..Default::default()
    };
    let (a, b) = cointegrated_pair(rng, &config);
    let mut walk = |start: f64| random_walk(&mut *rng, TRAIN_LENGTH + TEST_LENGTH, start, 1.0);
    let columns = vec![
        ("W1", walk(300.0)),
        ("A", a),
        ("W2", walk(400.0)),
        ("B", b),
        ("W3", walk(250.0)),
        ("W4", walk(600.0)),
    ];
    PricePanel::from_columns(columns).unwrap()
}

/// Scenario: a researcher screens a small universe for tradable pairs
#[test]
fn test_find_pairs_returns_only_the_engineered_pair() {
    let mut rng = seeded_rng(2024);
    let panel = engineered_panel(&mut rng);
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();

    let pairs = find_pairs(&train, &test, &short_horizon_thresholds()).unwrap();

    assert_eq!(pairs.len(), 1, "expected exactly the engineered pair");
    let pair = &pairs[0];
    assert_eq!((pair.symbol_a.as_str(), pair.symbol_b.as_str()), ("A", "B"));

    let half_life = pair.profile.half_life.unwrap();
    assert!((1.0..=30.0).contains(&half_life));
    assert!(pair.stationarity.p_value < 0.05);
    assert!(pair.profile.zero_crossings >= 12);
    assert!(pair.profile.hurst_exponent < 0.5);

    let implied_ratio = match pair.direction {
        RegressionDirection::BOnA => pair.regression.hedge_ratio,
        RegressionDirection::AOnB => 1.0 / pair.regression.hedge_ratio,
    };
    assert!((implied_ratio - 2.0).abs() < 0.05, "hedge ratio {}", implied_ratio);
}

/// Scenario: the test window of every candidate is oriented like its regression
#[test]
fn test_candidates_carry_oriented_test_legs() {
    let mut rng = seeded_rng(99);
    let panel = engineered_panel(&mut rng);
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();

    let config = SearchConfig::default().with_thresholds(short_horizon_thresholds());
    let outcome = PairSearch::new(&config).unwrap().find_pairs(&train, &test).unwrap();
    assert_eq!(outcome.stats.evaluated, 15);

    for pair in &outcome.pairs {
        assert_eq!(pair.test_dependent.name(), pair.regression.dependent);
        assert_eq!(pair.test_independent.name(), pair.regression.independent);
        assert_eq!(pair.test_dependent.len(), TEST_LENGTH);
        assert_eq!(pair.regression.spread.len(), TRAIN_LENGTH);

        let expected_first = test.series(&pair.regression.dependent).unwrap().values()[0];
        assert_eq!(pair.test_dependent.values()[0], expected_first);

        let summary = pair.summary();
        assert_eq!(summary.spread_train.len(), TRAIN_LENGTH);
        assert_eq!(summary.spread_test.len(), TEST_LENGTH);
        assert_eq!(summary.half_life, pair.profile.half_life);
    }
}

/// Scenario: clustering splits the universe before the search
#[test]
fn test_cluster_restricted_search() {
    let mut rng = seeded_rng(5150);
    let panel = engineered_panel(&mut rng);
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();
    let config = SearchConfig::default().with_thresholds(short_horizon_thresholds());

    // A and B share a cluster
    let together = ClusterAssignment::from_labels(
        &["W1", "A", "W2", "B", "W3", "W4"],
        &[0, 1, 0, 1, NOISE_LABEL, 0],
    )
    .unwrap();
    let found = get_candidate_pairs(&together, &train, &test, &config).unwrap();
    assert_eq!(found.stats.evaluated, together.pairs_to_evaluate());
    assert_eq!(found.stats.evaluated, 3 + 1);
    assert_eq!(found.pairs.len(), 1);
    let symbols: Vec<&str> = found.unique_symbols.iter().map(String::as_str).collect();
    assert_eq!(symbols, vec!["A", "B"]);

    // A and B separated: the pair is never compared
    let apart = ClusterAssignment::from_labels(
        &["W1", "A", "W2", "B", "W3", "W4"],
        &[0, 0, 1, 1, NOISE_LABEL, NOISE_LABEL],
    )
    .unwrap();
    let found = get_candidate_pairs(&apart, &train, &test, &config).unwrap();
    assert_eq!(found.stats.evaluated, 2);
    assert!(found.pairs.iter().all(|p| !(p.contains("A") && p.contains("B"))));
}

/// Scenario: enumeration order is the panel's insertion order
#[test]
fn test_results_follow_enumeration_order() {
    let mut rng = seeded_rng(31);
    let config = CointegratedPairConfig {
        length: 1500,
        start_price: 400.0,
        ..Default::default()
    };
    let (a, b) = cointegrated_pair(&mut rng, &config);
    let (c, d) = cointegrated_pair(&mut rng, &config);
    let panel = PricePanel::from_columns(vec![("C", c), ("A", a), ("D", d), ("B", b)]).unwrap();
    let (train, test) = panel.split_at(1000).unwrap();

    let pairs = find_pairs(&train, &test, &short_horizon_thresholds()).unwrap();
    let found: Vec<(&str, &str)> = pairs
        .iter()
        .map(|p| (p.symbol_a.as_str(), p.symbol_b.as_str()))
        .collect();
    let position = |pair: (&str, &str)| found.iter().position(|&p| p == pair);

    let cd = position(("C", "D")).expect("C/D pair found");
    let ab = position(("A", "B")).expect("A/B pair found");
    assert!(cd < ab);
}

/// Scenario: the test panel lists the same symbols in another column order
#[test]
fn test_reordered_test_panel_gives_same_pairs() {
    let mut rng = seeded_rng(2024);
    let panel = engineered_panel(&mut rng);
    let (train, test) = panel.split_at(TRAIN_LENGTH).unwrap();
    let reordered_test = test.subset(&["W4", "B", "W3", "A", "W2", "W1"]).unwrap();

    let expected = find_pairs(&train, &test, &short_horizon_thresholds()).unwrap();
    let pairs = find_pairs(&train, &reordered_test, &short_horizon_thresholds()).unwrap();

    assert_eq!(pairs, expected);
    for pair in &pairs {
        assert_eq!(pair.test_dependent.name(), pair.regression.dependent);
        assert_eq!(pair.test_independent.name(), pair.regression.independent);
        let dependent = test.series(&pair.regression.dependent).unwrap();
        let independent = test.series(&pair.regression.independent).unwrap();
        assert_eq!(pair.test_dependent.values(), dependent.values());
        assert_eq!(pair.test_independent.values(), independent.values());
    }
}
