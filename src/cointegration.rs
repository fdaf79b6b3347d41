//! Bidirectional Engle-Granger style evaluation of a symbol pair.
//!
//! Both `B ~ A` and `A ~ B` are fitted by OLS with an intercept. Each residual
//! spread is tested for a unit root and profiled for mean reversion, and the
//! direction whose unit-root statistic is larger in magnitude becomes the
//! canonical one. A direction that cannot be evaluated (constant regressor,
//! Hurst domain error, short sample) simply drops out; only when both drop out
//! is the pair reported as not cointegrated.

use crate::errors::{PairAnalysisError, PairResult};
use crate::math_utils::ols_regression;
use crate::mean_reversion::MeanReversionProfile;
use crate::panel::PriceSeries;
use crate::stationarity::{adf_test, AdfConfig, StationarityResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which leg of the pair is the dependent variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RegressionDirection {
    /// B regressed on A; evaluated first and preferred on ties
    BOnA,
    /// A regressed on B
    AOnB,
}

impl RegressionDirection {
    /// Orders `(a, b)` as `(dependent, independent)`.
    pub fn orient<'a, T: ?Sized>(&self, a: &'a T, b: &'a T) -> (&'a T, &'a T) {
        match self {
            RegressionDirection::BOnA => (b, a),
            RegressionDirection::AOnB => (a, b),
        }
    }
}

/// Hedge regression `dependent = intercept + hedge_ratio * independent + spread`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegressionResult {
    pub dependent: String,
    pub independent: String,
    pub hedge_ratio: f64,
    pub intercept: f64,
    /// `dependent - hedge_ratio * independent - intercept`, one value per observation
    pub spread: Vec<f64>,
}

/// Fits the hedge regression of `dependent` on `independent`.
///
/// # Errors
/// `DegenerateRegression` naming the independent symbol when it is constant,
/// `InsufficientData` for fewer than three or mismatched observations.
pub fn hedge_regression(
    dependent: &PriceSeries,
    independent: &PriceSeries,
) -> PairResult<RegressionResult> {
    let fit = ols_regression(independent.values(), dependent.values(), independent.name())?;
    Ok(RegressionResult {
        dependent: dependent.name().to_string(),
        independent: independent.name().to_string(),
        hedge_ratio: fit.slope,
        intercept: fit.intercept,
        spread: fit.residuals,
    })
}

/// Everything computed for one regression direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionEvaluation {
    pub direction: RegressionDirection,
    pub regression: RegressionResult,
    pub stationarity: StationarityResult,
    pub profile: MeanReversionProfile,
}

/// The canonical direction of a cointegrated-looking pair together with the
/// test-period legs, oriented as dependent and independent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CointegrationResult {
    pub evaluation: DirectionEvaluation,
    pub test_dependent: PriceSeries,
    pub test_independent: PriceSeries,
}

/// Result of [`CointegrationEngine::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum CointegrationOutcome {
    /// At least one direction could be evaluated
    Evaluated(Box<CointegrationResult>),
    /// Neither direction could be evaluated
    NotCointegrated {
        b_on_a: PairAnalysisError,
        a_on_b: PairAnalysisError,
    },
}

impl CointegrationOutcome {
    pub fn result(&self) -> Option<&CointegrationResult> {
        match self {
            CointegrationOutcome::Evaluated(result) => Some(result),
            CointegrationOutcome::NotCointegrated { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<CointegrationResult> {
        match self {
            CointegrationOutcome::Evaluated(result) => Some(*result),
            CointegrationOutcome::NotCointegrated { .. } => None,
        }
    }
}

/// Scores symbol pairs in both regression directions.
#[derive(Debug, Clone, Default)]
pub struct CointegrationEngine {
    adf: AdfConfig,
}

impl CointegrationEngine {
    pub fn new(adf: AdfConfig) -> Self {
        Self { adf }
    }

    pub fn adf_config(&self) -> &AdfConfig {
        &self.adf
    }

    /// Regression, unit-root test and mean-reversion profile for one direction.
    pub fn evaluate_direction(
        &self,
        direction: RegressionDirection,
        dependent: &PriceSeries,
        independent: &PriceSeries,
    ) -> PairResult<DirectionEvaluation> {
        let regression = hedge_regression(dependent, independent)?;
        let stationarity = adf_test(&regression.spread, &self.adf)?;
        let profile = MeanReversionProfile::compute(&regression.spread)?;
        Ok(DirectionEvaluation {
            direction,
            regression,
            stationarity,
            profile,
        })
    }

    /// Evaluates the pair `(a, b)` on its train legs and attaches the test legs
    /// of the winning orientation.
    pub fn evaluate(
        &self,
        train_a: &PriceSeries,
        train_b: &PriceSeries,
        test_a: &PriceSeries,
        test_b: &PriceSeries,
    ) -> CointegrationOutcome {
        let b_on_a = self.evaluate_direction(RegressionDirection::BOnA, train_b, train_a);
        let a_on_b = self.evaluate_direction(RegressionDirection::AOnB, train_a, train_b);

        let evaluation = match (b_on_a, a_on_b) {
            (Ok(first), Ok(second)) => canonical(first, second),
            (Ok(only), Err(err)) | (Err(err), Ok(only)) => {
                log::debug!(
                    "{}/{}: keeping {:?}, other direction failed: {}",
                    train_a.name(),
                    train_b.name(),
                    only.direction,
                    err
                );
                only
            }
            (Err(b_on_a), Err(a_on_b)) => {
                return CointegrationOutcome::NotCointegrated { b_on_a, a_on_b };
            }
        };

        let (test_dependent, test_independent) = evaluation.direction.orient(test_a, test_b);
        CointegrationOutcome::Evaluated(Box::new(CointegrationResult {
            test_dependent: test_dependent.clone(),
            test_independent: test_independent.clone(),
            evaluation,
        }))
    }
}

/// The evaluation with the larger |t|; `first` wins ties.
fn canonical(first: DirectionEvaluation, second: DirectionEvaluation) -> DirectionEvaluation {
    if second.stationarity.t_statistic.abs() > first.stationarity.t_statistic.abs() {
        second
    } else {
        first
    }
}
