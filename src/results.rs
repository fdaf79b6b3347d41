//! # Pair Search Results
//!
//! Candidate pairs carrying their full diagnostic payload, and the flat
//! summary record handed to reporting layers.

use crate::cointegration::{CointegrationResult, RegressionDirection, RegressionResult};
use crate::mean_reversion::MeanReversionProfile;
use crate::panel::PriceSeries;
use crate::stationarity::{CriticalValues, StationarityResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pair that passed the acceptance test on the train window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidatePair {
    /// First symbol in enumeration order
    pub symbol_a: String,
    /// Second symbol in enumeration order
    pub symbol_b: String,
    pub direction: RegressionDirection,
    pub regression: RegressionResult,
    pub stationarity: StationarityResult,
    pub profile: MeanReversionProfile,
    /// Test-period leg used as the dependent variable
    pub test_dependent: PriceSeries,
    /// Test-period leg used as the independent variable
    pub test_independent: PriceSeries,
    /// Set once the pair has been confirmed out-of-sample
    pub validated: bool,
}

impl CandidatePair {
    pub fn new(
        symbol_a: impl Into<String>,
        symbol_b: impl Into<String>,
        result: CointegrationResult,
    ) -> Self {
        let CointegrationResult {
            evaluation,
            test_dependent,
            test_independent,
        } = result;
        Self {
            symbol_a: symbol_a.into(),
            symbol_b: symbol_b.into(),
            direction: evaluation.direction,
            regression: evaluation.regression,
            stationarity: evaluation.stationarity,
            profile: evaluation.profile,
            test_dependent,
            test_independent,
            validated: false,
        }
    }

    /// Whether the pair involves `symbol`.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_a == symbol || self.symbol_b == symbol
    }

    /// Test-period spread under the train-period hedge ratio and intercept.
    pub fn test_spread(&self) -> Vec<f64> {
        self.test_dependent
            .values()
            .iter()
            .zip(self.test_independent.values())
            .map(|(y, x)| y - self.regression.hedge_ratio * x - self.regression.intercept)
            .collect()
    }

    /// Flattens the pair into a [`PairSummary`].
    pub fn summary(&self) -> PairSummary {
        PairSummary {
            symbol_a: self.symbol_a.clone(),
            symbol_b: self.symbol_b.clone(),
            dependent: self.regression.dependent.clone(),
            independent: self.regression.independent.clone(),
            hedge_ratio: self.regression.hedge_ratio,
            intercept: self.regression.intercept,
            t_statistic: self.stationarity.t_statistic,
            p_value: self.stationarity.p_value,
            critical_values: self.stationarity.critical_values,
            half_life: self.profile.half_life,
            zero_crossings: self.profile.zero_crossings,
            hurst_exponent: self.profile.hurst_exponent,
            spread_train: self.regression.spread.clone(),
            spread_test: self.test_spread(),
        }
    }
}

/// Flat output record of a candidate pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairSummary {
    pub symbol_a: String,
    pub symbol_b: String,
    pub dependent: String,
    pub independent: String,
    pub hedge_ratio: f64,
    pub intercept: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    pub half_life: Option<f64>,
    pub zero_crossings: usize,
    pub hurst_exponent: f64,
    pub spread_train: Vec<f64>,
    pub spread_test: Vec<f64>,
}
