//! Exhaustive pair search over a symbol universe.
//!
//! Every unordered pair `(i, j)` with `i < j` of the train panel is evaluated
//! once by the [`CointegrationEngine`] and screened by the four-stage filter.
//! Evaluations are independent of one another, so with the `parallel` feature
//! they run on the rayon pool; results are always returned in enumeration
//! order.

use crate::clustering::ClusterAssignment;
use crate::cointegration::{CointegrationEngine, CointegrationOutcome};
use crate::config::{PairThresholds, SearchConfig};
use crate::errors::PairResult;
use crate::filters::{screen, FilterRejection};
use crate::panel::{PricePanel, PriceSeries};
use crate::results::CandidatePair;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Counts of a search run by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    pub evaluated: usize,
    pub accepted: usize,
    /// Neither regression direction could be evaluated
    pub not_cointegrated: usize,
    pub rejected_p_value: usize,
    pub rejected_half_life: usize,
    pub rejected_non_mean_reverting: usize,
    pub rejected_zero_crossings: usize,
    pub rejected_hurst: usize,
}

impl SearchStats {
    pub fn rejected(&self) -> usize {
        self.rejected_p_value
            + self.rejected_half_life
            + self.rejected_non_mean_reverting
            + self.rejected_zero_crossings
            + self.rejected_hurst
    }

    fn record_rejection(&mut self, rejection: &FilterRejection) {
        match rejection {
            FilterRejection::PValue { .. } => self.rejected_p_value += 1,
            FilterRejection::HalfLife { .. } => self.rejected_half_life += 1,
            FilterRejection::NonMeanReverting { .. } => self.rejected_non_mean_reverting += 1,
            FilterRejection::ZeroCrossings { .. } => self.rejected_zero_crossings += 1,
            FilterRejection::Hurst { .. } => self.rejected_hurst += 1,
        }
    }

    /// Adds the counts of `other`.
    pub fn merge(&mut self, other: &SearchStats) {
        self.evaluated += other.evaluated;
        self.accepted += other.accepted;
        self.not_cointegrated += other.not_cointegrated;
        self.rejected_p_value += other.rejected_p_value;
        self.rejected_half_life += other.rejected_half_life;
        self.rejected_non_mean_reverting += other.rejected_non_mean_reverting;
        self.rejected_zero_crossings += other.rejected_zero_crossings;
        self.rejected_hurst += other.rejected_hurst;
    }
}

/// Accepted pairs of one search, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub pairs: Vec<CandidatePair>,
    pub stats: SearchStats,
}

/// Accepted pairs of a cluster-restricted search.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Pairs of every cluster, by ascending cluster label
    pub pairs: Vec<CandidatePair>,
    /// Distinct symbols appearing in any pair, sorted
    pub unique_symbols: BTreeSet<String>,
    pub stats: SearchStats,
}

enum PairVerdict {
    Accepted(Box<CandidatePair>),
    Rejected(FilterRejection),
    NotCointegrated,
}

/// Evaluates and screens every pair of a panel.
#[derive(Debug, Clone)]
pub struct PairSearch {
    engine: CointegrationEngine,
    thresholds: PairThresholds,
}

impl PairSearch {
    /// Validates `config` and builds the search.
    pub fn new(config: &SearchConfig) -> PairResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: CointegrationEngine::new(config.adf.clone()),
            thresholds: config.thresholds.clone(),
        })
    }

    pub fn thresholds(&self) -> &PairThresholds {
        &self.thresholds
    }

    pub fn engine(&self) -> &CointegrationEngine {
        &self.engine
    }

    /// Evaluates all pairs of `train` and keeps those passing the filters.
    ///
    /// # Errors
    /// `MalformedPanel` when `train` and `test` do not hold the same symbols.
    /// Numerical problems of individual pairs never fail the search.
    pub fn find_pairs(&self, train: &PricePanel, test: &PricePanel) -> PairResult<SearchOutcome> {
        train.ensure_same_universe(test)?;

        let n = train.n_symbols();
        let index_pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        // test legs by symbol, in train order
        let train_series: Vec<&PriceSeries> = train.iter().collect();
        let test_series = train_series
            .iter()
            .map(|s| test.series(s.name()))
            .collect::<PairResult<Vec<_>>>()?;
        let evaluate = |&(i, j): &(usize, usize)| {
            self.evaluate_pair(train_series[i], train_series[j], test_series[i], test_series[j])
        };

        #[cfg(feature = "parallel")]
        let verdicts: Vec<PairVerdict> = {
            use rayon::prelude::*;
            index_pairs.par_iter().map(evaluate).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let verdicts: Vec<PairVerdict> = index_pairs.iter().map(evaluate).collect();

        let mut outcome = SearchOutcome::default();
        for verdict in verdicts {
            outcome.stats.evaluated += 1;
            match verdict {
                PairVerdict::Accepted(pair) => {
                    outcome.stats.accepted += 1;
                    outcome.pairs.push(*pair);
                }
                PairVerdict::Rejected(rejection) => outcome.stats.record_rejection(&rejection),
                PairVerdict::NotCointegrated => outcome.stats.not_cointegrated += 1,
            }
        }

        log::info!(
            "Pair search: {} evaluated, {} accepted, {} rejected, {} not cointegrated",
            outcome.stats.evaluated,
            outcome.stats.accepted,
            outcome.stats.rejected(),
            outcome.stats.not_cointegrated
        );
        Ok(outcome)
    }

    fn evaluate_pair(
        &self,
        train_a: &PriceSeries,
        train_b: &PriceSeries,
        test_a: &PriceSeries,
        test_b: &PriceSeries,
    ) -> PairVerdict {
        let result = match self.engine.evaluate(train_a, train_b, test_a, test_b) {
            CointegrationOutcome::Evaluated(result) => result,
            CointegrationOutcome::NotCointegrated { b_on_a, a_on_b } => {
                log::debug!(
                    "{}/{}: not cointegrated ({}; {})",
                    train_a.name(),
                    train_b.name(),
                    b_on_a,
                    a_on_b
                );
                return PairVerdict::NotCointegrated;
            }
        };

        let evaluation = &result.evaluation;
        match screen(&evaluation.stationarity, &evaluation.profile, &self.thresholds) {
            Ok(()) => PairVerdict::Accepted(Box::new(CandidatePair::new(
                train_a.name(),
                train_b.name(),
                *result,
            ))),
            Err(rejection) => {
                log::debug!("{}/{}: rejected, {}", train_a.name(), train_b.name(), rejection);
                PairVerdict::Rejected(rejection)
            }
        }
    }

    /// Runs [`PairSearch::find_pairs`] inside each cluster of `clusters`, by
    /// ascending label, and unions the results. Noise symbols are never paired.
    ///
    /// # Errors
    /// `MalformedPanel` for differing universes, `SymbolNotFound` when a
    /// clustered symbol is missing from the panels.
    pub fn get_candidate_pairs(
        &self,
        clusters: &ClusterAssignment,
        train: &PricePanel,
        test: &PricePanel,
    ) -> PairResult<CandidateSet> {
        train.ensure_same_universe(test)?;

        let clusters_to_search = clusters.clusters();
        log::info!(
            "Searching {} clusters, {} pairs to evaluate",
            clusters_to_search.len(),
            clusters.pairs_to_evaluate()
        );

        let mut set = CandidateSet::default();
        for cluster in &clusters_to_search {
            let cluster_train = train.subset(&cluster.symbols)?;
            let cluster_test = test.subset(&cluster.symbols)?;
            let outcome = self.find_pairs(&cluster_train, &cluster_test)?;
            log::debug!(
                "Cluster {}: {} of {} pairs accepted",
                cluster.label,
                outcome.stats.accepted,
                outcome.stats.evaluated
            );
            set.stats.merge(&outcome.stats);
            set.pairs.extend(outcome.pairs);
        }

        set.unique_symbols = set
            .pairs
            .iter()
            .flat_map(|pair| [pair.symbol_a.clone(), pair.symbol_b.clone()])
            .collect();

        log::info!(
            "Found {} pairs containing {} unique symbols",
            set.pairs.len(),
            set.unique_symbols.len()
        );
        Ok(set)
    }
}

/// Pair search over the whole universe with the default unit-root test.
pub fn find_pairs(
    train: &PricePanel,
    test: &PricePanel,
    thresholds: &PairThresholds,
) -> PairResult<Vec<CandidatePair>> {
    let config = SearchConfig::default().with_thresholds(thresholds.clone());
    Ok(PairSearch::new(&config)?.find_pairs(train, test)?.pairs)
}

/// Cluster-restricted pair search.
pub fn get_candidate_pairs(
    clusters: &ClusterAssignment,
    train: &PricePanel,
    test: &PricePanel,
    config: &SearchConfig,
) -> PairResult<CandidateSet> {
    PairSearch::new(config)?.get_candidate_pairs(clusters, train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PairAnalysisError;
    use crate::generators::{random_walk, seeded_rng};

    fn walk_panel(seed: u64, symbols: &[&str], length: usize) -> PricePanel {
        let mut rng = seeded_rng(seed);
        PricePanel::from_columns(
            symbols
                .iter()
                .map(|s| (s.to_string(), random_walk(&mut rng, length, 100.0, 1.0))),
        )
        .unwrap()
    }

    #[test]
    fn test_every_pair_is_evaluated_once() {
        let panel = walk_panel(1, &["A", "B", "C", "D"], 300);
        let (train, test) = panel.split_at(200).unwrap();
        let search = PairSearch::new(&SearchConfig::default()).unwrap();
        let outcome = search.find_pairs(&train, &test).unwrap();
        assert_eq!(outcome.stats.evaluated, 6);
        assert_eq!(
            outcome.stats.accepted + outcome.stats.rejected() + outcome.stats.not_cointegrated,
            6
        );
        assert_eq!(outcome.pairs.len(), outcome.stats.accepted);
    }

    #[test]
    fn test_mismatched_universe_is_fatal() {
        let train = walk_panel(2, &["A", "B"], 120);
        let test = walk_panel(3, &["A", "C"], 60);
        let search = PairSearch::new(&SearchConfig::default()).unwrap();
        assert!(matches!(
            search.find_pairs(&train, &test),
            Err(PairAnalysisError::MalformedPanel { .. })
        ));
    }

    #[test]
    fn test_invalid_thresholds_are_fatal() {
        let thresholds = PairThresholds {
            p_value_threshold: 2.0,
            ..Default::default()
        };
        let panel = walk_panel(4, &["A", "B"], 120);
        assert!(matches!(
            find_pairs(&panel, &panel, &thresholds),
            Err(PairAnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_stats_merge() {
        let mut total = SearchStats {
            evaluated: 3,
            accepted: 1,
            rejected_p_value: 2,
            ..Default::default()
        };
        total.merge(&SearchStats {
            evaluated: 1,
            not_cointegrated: 1,
            ..Default::default()
        });
        assert_eq!(total.evaluated, 4);
        assert_eq!(total.rejected(), 2);
        assert_eq!(total.not_cointegrated, 1);
    }
}
