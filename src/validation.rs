//! Out-of-sample confirmation of candidate pairs.
//!
//! A candidate found on the train window is refitted on its test-period legs
//! alone: a fresh hedge ratio and intercept, a fresh spread, a fresh unit-root
//! test and mean-reversion profile. The pair survives only if that
//! out-of-sample spread passes the same four-stage filter.

use crate::cointegration::{CointegrationEngine, DirectionEvaluation};
use crate::config::{PairThresholds, SearchConfig};
use crate::errors::PairResult;
use crate::filters::screen;
use crate::results::CandidatePair;

/// A candidate confirmed on the test window.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPair {
    /// Position of the pair in the candidate list
    pub index: usize,
    /// The candidate, with `validated` set
    pub candidate: CandidatePair,
    /// Regression and diagnostics refitted on the test window
    pub out_of_sample: DirectionEvaluation,
}

/// Re-evaluates candidates on their test-period data.
#[derive(Debug, Clone)]
pub struct PairValidator {
    engine: CointegrationEngine,
    thresholds: PairThresholds,
}

impl PairValidator {
    pub fn new(config: &SearchConfig) -> PairResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: CointegrationEngine::new(config.adf.clone()),
            thresholds: config.thresholds.clone(),
        })
    }

    /// Refits one candidate on its test legs, keeping its orientation.
    pub fn refit(&self, candidate: &CandidatePair) -> PairResult<DirectionEvaluation> {
        self.engine.evaluate_direction(
            candidate.direction,
            &candidate.test_dependent,
            &candidate.test_independent,
        )
    }

    /// The candidates that still pass the filters out-of-sample, in input order.
    ///
    /// A candidate whose refit fails numerically is excluded; the others are
    /// unaffected.
    pub fn pairs_overlap(&self, candidates: &[CandidatePair]) -> Vec<ValidatedPair> {
        let mut confirmed = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let label = format!("{}/{}", candidate.symbol_a, candidate.symbol_b);
            let out_of_sample = match self.refit(candidate) {
                Ok(evaluation) => evaluation,
                Err(err) => {
                    log::debug!("{}: out-of-sample refit failed: {}", label, err);
                    continue;
                }
            };

            if let Err(rejection) = screen(
                &out_of_sample.stationarity,
                &out_of_sample.profile,
                &self.thresholds,
            ) {
                log::debug!("{}: rejected out-of-sample, {}", label, rejection);
                continue;
            }

            let mut candidate = candidate.clone();
            candidate.validated = true;
            confirmed.push(ValidatedPair {
                index,
                candidate,
                out_of_sample,
            });
        }

        log::info!(
            "{} of {} candidate pairs confirmed out-of-sample",
            confirmed.len(),
            candidates.len()
        );
        confirmed
    }
}

/// Out-of-sample confirmation with the default unit-root test.
pub fn pairs_overlap(
    candidates: &[CandidatePair],
    thresholds: &PairThresholds,
) -> PairResult<Vec<ValidatedPair>> {
    let config = SearchConfig::default().with_thresholds(thresholds.clone());
    Ok(PairValidator::new(&config)?.pairs_overlap(candidates))
}
