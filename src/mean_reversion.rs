//! Mean-reversion diagnostics for spread series.
//!
//! - **Half-life** from the Ornstein-Uhlenbeck discretisation
//!   `Δz_t = μ + λ·z_{t-1} + ε_t`, defined only for `λ < 0`
//! - **Hurst exponent** from the scaling of lagged-difference dispersion
//! - **Zero crossings** of the de-meaned spread
//! - **Variance ratio** of multi-period to one-period increments
//!
//! The half-life, Hurst exponent and zero-crossing count make up the
//! [`MeanReversionProfile`] consumed by the pair filters; the variance ratio is
//! a standalone diagnostic.

use crate::errors::{validate_all_finite, validate_data_length, PairAnalysisError, PairResult};
use crate::math_utils::{
    constants, first_differences, float_ops, lagged_differences, mean, ols_regression,
    population_std,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest lag of the Hurst regression.
pub const HURST_MIN_LAG: usize = 2;
/// One past the largest lag of the Hurst regression.
pub const HURST_MAX_LAG: usize = 100;

/// Mean-reversion characteristics of a spread.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeanReversionProfile {
    /// λ of `Δz_t = μ + λ·z_{t-1} + ε_t`
    pub reversion_speed: f64,
    /// `-ln 2 / λ`, absent when `λ >= 0`
    pub half_life: Option<f64>,
    /// Hurst exponent from [`hurst`]
    pub hurst_exponent: f64,
    /// Zero crossings of the de-meaned spread
    pub zero_crossings: usize,
}

impl MeanReversionProfile {
    /// Computes every diagnostic of the profile for `spread`.
    ///
    /// A non-negative reversion speed is recorded as a missing half-life rather
    /// than an error; the Hurst estimator's errors are propagated.
    pub fn compute(spread: &[f64]) -> PairResult<Self> {
        let reversion_speed = reversion_speed(spread)?;
        Ok(Self {
            reversion_speed,
            half_life: half_life_from_speed(reversion_speed).ok(),
            hurst_exponent: hurst(spread)?,
            zero_crossings: zero_crossings(spread),
        })
    }

    /// The half-life, or `NonMeanReverting` when the reversion speed is non-negative.
    pub fn half_life(&self) -> PairResult<f64> {
        self.half_life
            .ok_or(PairAnalysisError::NonMeanReverting {
                reversion_speed: self.reversion_speed,
            })
    }
}

/// Estimates λ in `Δz_t = μ + λ·z_{t-1} + ε_t` by OLS.
///
/// The first observation has no lag and is excluded.
pub fn reversion_speed(spread: &[f64]) -> PairResult<f64> {
    validate_data_length(spread, 4)?;
    let lagged = &spread[..spread.len() - 1];
    let delta = first_differences(spread);
    Ok(ols_regression(lagged, &delta, "lagged spread")?.slope)
}

/// Half-life of mean reversion, `-ln(2) / λ`.
///
/// # Errors
/// `NonMeanReverting` when `λ >= 0`; the regression errors of
/// [`reversion_speed`] otherwise.
pub fn half_life(spread: &[f64]) -> PairResult<f64> {
    half_life_from_speed(reversion_speed(spread)?)
}

fn half_life_from_speed(lambda: f64) -> PairResult<f64> {
    if lambda < 0.0 {
        Ok(-constants::LN_2 / lambda)
    } else {
        Err(PairAnalysisError::NonMeanReverting {
            reversion_speed: lambda,
        })
    }
}

/// Hurst exponent of a level series.
///
/// For each lag `L` in `2..100` the dispersion `τ(L) = sqrt(std(z[t+L] - z[t]))`
/// is formed, `ln τ` is regressed on `ln L` and twice the slope is returned.
/// About 0.5 for a random walk, below 0.5 for a mean-reverting series and
/// above 0.5 for a trending one.
///
/// # Errors
/// - `InsufficientData` unless the series has more than 100 points
/// - `Domain` when some lag window has zero dispersion
pub fn hurst(series: &[f64]) -> PairResult<f64> {
    validate_data_length(series, HURST_MAX_LAG + 1)?;
    validate_all_finite(series, "hurst input")?;

    let mut log_lags = Vec::with_capacity(HURST_MAX_LAG - HURST_MIN_LAG);
    let mut log_tau = Vec::with_capacity(HURST_MAX_LAG - HURST_MIN_LAG);

    for lag in HURST_MIN_LAG..HURST_MAX_LAG {
        let tau = population_std(&lagged_differences(series, lag)).sqrt();
        let ln_tau = float_ops::safe_ln(tau).ok_or_else(|| PairAnalysisError::Domain {
            operation: "hurst".to_string(),
            reason: format!("lag {} differences have zero dispersion", lag),
        })?;
        log_lags.push((lag as f64).ln());
        log_tau.push(ln_tau);
    }

    let fit = ols_regression(&log_lags, &log_tau, "log lag")?;
    Ok(2.0 * fit.slope)
}

/// Counts adjacent pairs where the de-meaned series changes sign, or where
/// the earlier value sits exactly on the mean.
pub fn zero_crossings(series: &[f64]) -> usize {
    if series.len() < 2 {
        return 0;
    }
    let center = mean(series);
    series
        .windows(2)
        .filter(|w| {
            let (current, next) = (w[0] - center, w[1] - center);
            current * next < 0.0 || current == 0.0
        })
        .count()
}

/// Variance ratio of `lag`-period to one-period increments.
///
/// About 1 for a random walk, below 1 for mean reversion and above 1 for
/// momentum.
///
/// # Errors
/// - `InvalidParameter` unless `2 <= lag < series.len()`
/// - `Domain` when the one-period increments have zero variance
pub fn variance_ratio(series: &[f64], lag: usize) -> PairResult<f64> {
    validate_data_length(series, 3)?;
    validate_all_finite(series, "variance ratio input")?;
    let n = series.len();
    if lag < 2 || lag >= n {
        return Err(PairAnalysisError::InvalidParameter {
            parameter: "lag".to_string(),
            value: lag as f64,
            constraint: format!("[2, {})", n),
        });
    }

    let n_f = n as f64;
    let k = lag as f64;
    let increments = first_differences(series);
    let mu = increments.iter().sum::<f64>() / n_f;

    let m = (n_f - k + 1.0) * (1.0 - k / n_f);
    let one_period = increments.iter().map(|d| (d - mu).powi(2)).sum::<f64>() / (n_f - 1.0);
    let multi_period = lagged_differences(series, lag)
        .iter()
        .map(|d| (d - k * mu).powi(2))
        .sum::<f64>()
        / m;

    if one_period <= 0.0 {
        return Err(PairAnalysisError::Domain {
            operation: "variance_ratio".to_string(),
            reason: "one-period increments have zero variance".to_string(),
        });
    }

    Ok(multi_period / (k * one_period))
}

/// Standardises a series to zero mean and unit (population) standard deviation.
pub fn zscore(series: &[f64]) -> PairResult<Vec<f64>> {
    validate_data_length(series, 2)?;
    let center = mean(series);
    let scale = population_std(series);
    if scale <= 0.0 || !scale.is_finite() {
        return Err(PairAnalysisError::Domain {
            operation: "zscore".to_string(),
            reason: "series has zero variance".to_string(),
        });
    }
    Ok(series.iter().map(|x| (x - center) / scale).collect())
}
