//! Augmented Dickey-Fuller unit-root test.
//!
//! The test regression, with a constant and `p` lagged differences, is
//!
//! ```text
//! Δx_t = α + γ·x_{t-1} + Σ_{i=1..p} β_i·Δx_{t-i} + ε_t
//! ```
//!
//! and the statistic is the t-value of `γ`. Under the null hypothesis the
//! series has a unit root (γ = 0). The lag order is chosen by minimising an
//! information criterion over `0..=max_lag`, all candidates fitted on the same
//! trimmed sample, after which the chosen model is re-fitted on the longest
//! sample available for that lag.
//!
//! p-values use the MacKinnon (1994) response surface and critical values the
//! MacKinnon (2010) finite-sample surface, both for a single series with a
//! constant term.

use crate::errors::{validate_all_finite, validate_data_length, PairAnalysisError, PairResult};
use crate::linear_algebra::{multiple_regression, RegressionFit};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Shortest series accepted by the test.
pub const MIN_ADF_OBSERVATIONS: usize = 20;

/// Default significance cutoff of [`StationarityResult::is_stationary`].
pub const DEFAULT_STATIONARITY_CUTOFF: f64 = 0.01;

// MacKinnon (1994), one series, constant only.
const TAU_MAX_C: f64 = 2.74;
const TAU_MIN_C: f64 = -18.83;
const TAU_STAR_C: f64 = -1.61;
const TAU_C_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_C_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010), one series, constant only: 1%, 5%, 10%.
const TAU_C_CRITICAL: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];

/// Lag-order selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AutoLag {
    /// Minimise the Akaike information criterion
    Aic,
    /// Minimise the Bayesian information criterion
    Bic,
    /// Use the maximum lag without selection
    Fixed,
}

/// Configuration of the unit-root test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdfConfig {
    /// Upper bound of the lag search; `None` uses `ceil(12 (n/100)^{1/4})`
    pub max_lag: Option<usize>,
    /// How the lag order is selected
    pub autolag: AutoLag,
}

impl Default for AdfConfig {
    fn default() -> Self {
        Self {
            max_lag: None,
            autolag: AutoLag::Aic,
        }
    }
}

/// Critical values of the test statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CriticalValues {
    /// 1% level
    pub one_percent: f64,
    /// 5% level
    pub five_percent: f64,
    /// 10% level
    pub ten_percent: f64,
}

/// Outcome of the augmented Dickey-Fuller test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationarityResult {
    /// t-statistic of the lagged level coefficient
    pub t_statistic: f64,
    /// MacKinnon approximate p-value under the unit-root null
    pub p_value: f64,
    /// Finite-sample critical values at 1%, 5% and 10%
    pub critical_values: CriticalValues,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    /// Best information criterion value when the lag was selected
    pub ic_best: Option<f64>,
}

impl StationarityResult {
    /// Whether the unit-root null is rejected at `cutoff`.
    pub fn is_stationary(&self, cutoff: f64) -> bool {
        self.p_value < cutoff
    }
}

/// Runs the unit-root test with the default configuration.
pub fn check_for_stationarity(data: &[f64]) -> PairResult<StationarityResult> {
    adf_test(data, &AdfConfig::default())
}

/// Runs the augmented Dickey-Fuller test on `data`.
///
/// # Errors
/// - `InsufficientData` when the series is shorter than [`MIN_ADF_OBSERVATIONS`]
///   or too short for any lag structure
/// - `NumericalError` for non-finite input, a singular regression (for example a
///   constant series) or a non-finite statistic
pub fn adf_test(data: &[f64], config: &AdfConfig) -> PairResult<StationarityResult> {
    validate_data_length(data, MIN_ADF_OBSERVATIONS)?;
    validate_all_finite(data, "stationarity input")?;

    let n = data.len();
    let lag_cap = (n / 2)
        .checked_sub(2)
        .ok_or(PairAnalysisError::InsufficientData {
            required: 4,
            actual: n,
        })?;
    let default_max = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let max_lag = config.max_lag.unwrap_or(default_max).min(lag_cap);

    let diffs: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    let (used_lag, ic_best) = match config.autolag {
        AutoLag::Fixed => (max_lag, None),
        AutoLag::Aic | AutoLag::Bic => {
            let (lag, ic) = select_lag(data, &diffs, max_lag, config.autolag)?;
            (lag, Some(ic))
        }
    };

    let fit = fit_adf_regression(data, &diffs, used_lag, used_lag)?;
    let t_statistic = fit.t_value(1);
    if !t_statistic.is_finite() {
        return Err(PairAnalysisError::NumericalError {
            reason: "Unit-root regression produced a non-finite t-statistic".to_string(),
        });
    }

    log::trace!(
        "ADF: n={}, max_lag={}, used_lag={}, t={:.4}",
        n,
        max_lag,
        used_lag,
        t_statistic
    );

    Ok(StationarityResult {
        t_statistic,
        p_value: mackinnon_p_value(t_statistic),
        critical_values: mackinnon_critical_values(fit.nobs),
        used_lag,
        nobs: fit.nobs,
        ic_best,
    })
}

/// Fits every lag in `0..=max_lag` on the sample trimmed at `max_lag` and keeps
/// the first lag with the smallest criterion.
fn select_lag(
    data: &[f64],
    diffs: &[f64],
    max_lag: usize,
    rule: AutoLag,
) -> PairResult<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for lag in 0..=max_lag {
        let fit = fit_adf_regression(data, diffs, lag, max_lag)?;
        let ic = match rule {
            AutoLag::Bic => fit.bic(),
            _ => fit.aic(),
        };
        match best {
            Some((_, best_ic)) if ic >= best_ic => {}
            _ => best = Some((lag, ic)),
        }
    }

    best.ok_or_else(|| PairAnalysisError::NumericalError {
        reason: "No lag order could be evaluated".to_string(),
    })
}

/// Test regression with `lag` lagged differences on rows `trim..diffs.len()`.
///
/// Column order: constant, lagged level, lagged differences.
fn fit_adf_regression(
    data: &[f64],
    diffs: &[f64],
    lag: usize,
    trim: usize,
) -> PairResult<RegressionFit> {
    let rows = trim..diffs.len();
    let response: Vec<f64> = diffs[rows.clone()].to_vec();

    let mut columns = Vec::with_capacity(lag + 2);
    columns.push(vec![1.0; response.len()]);
    columns.push(data[rows.clone()].to_vec());
    for i in 1..=lag {
        columns.push(rows.clone().map(|t| diffs[t - i]).collect());
    }

    multiple_regression(&columns, &response)
}

/// MacKinnon (1994) approximate p-value for the constant-only test statistic.
pub fn mackinnon_p_value(t_statistic: f64) -> f64 {
    if t_statistic > TAU_MAX_C {
        return 1.0;
    }
    if t_statistic < TAU_MIN_C {
        return 0.0;
    }

    let z = if t_statistic <= TAU_STAR_C {
        polyval(&TAU_C_SMALLP, t_statistic)
    } else {
        polyval(&TAU_C_LARGEP, t_statistic)
    };

    // Mean 0, sd 1 is always a valid parameterisation.
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(z).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

/// MacKinnon (2010) critical values for a regression with `nobs` observations.
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let inverse_n = 1.0 / nobs as f64;
    let at = |level: usize| polyval(&TAU_C_CRITICAL[level], inverse_n);
    CriticalValues {
        one_percent: at(0),
        five_percent: at(1),
        ten_percent: at(2),
    }
}

/// Evaluates `c[0] + c[1] x + c[2] x² + …` by Horner's rule.
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
