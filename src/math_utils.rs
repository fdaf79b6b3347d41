//! Mathematical utility functions and constants for pair analysis.
//!
//! Descriptive statistics, the closed-form simple regression used for hedge
//! ratios and half-lives, and the safe floating-point helpers the estimators
//! rely on to turn invalid arguments into errors instead of NaN.

use crate::errors::{validate_all_finite, PairAnalysisError, PairResult};

/// Numerical constants shared by the estimators.
pub mod constants {
    /// Relative range below which a regressor is treated as constant
    pub const DEGENERATE_RANGE_TOLERANCE: f64 = 1e-12;

    /// Smallest argument accepted by [`super::float_ops::safe_ln`]
    pub const MIN_LOG_VALUE: f64 = 1e-300;

    /// ln(2), the numerator of the half-life formula
    pub const LN_2: f64 = std::f64::consts::LN_2;

    /// ln(2π), used by the Gaussian log-likelihood
    pub const LN_TWO_PI: f64 = 1.8378770664093454835606594728112;
}

/// Safe floating point operations.
pub mod float_ops {
    use super::constants::MIN_LOG_VALUE;

    /// Safe logarithm that checks for positive arguments and finite inputs
    pub fn safe_ln(x: f64) -> Option<f64> {
        if x > MIN_LOG_VALUE && x.is_finite() {
            Some(x.ln())
        } else {
            None
        }
    }
}

/// Arithmetic mean. Returns NaN for empty input.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (divides by `n`).
///
/// Uses Welford's single-pass update for numerical stability. Returns 0.0 for
/// fewer than two points.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }

    let mut running_mean = 0.0;
    let mut m2 = 0.0;
    for (i, &value) in data.iter().enumerate() {
        let count = (i + 1) as f64;
        let delta = value - running_mean;
        running_mean += delta / count;
        m2 += delta * (value - running_mean);
    }

    (m2 / data.len() as f64).max(0.0)
}

/// Population standard deviation (divides by `n`).
pub fn population_std(data: &[f64]) -> f64 {
    population_variance(data).sqrt()
}

/// First differences `x[t] - x[t-1]`, length `n - 1`.
pub fn first_differences(data: &[f64]) -> Vec<f64> {
    lagged_differences(data, 1)
}

/// Lagged differences `x[t] - x[t-lag]`, length `n - lag` (empty when `lag >= n`).
pub fn lagged_differences(data: &[f64], lag: usize) -> Vec<f64> {
    if lag >= data.len() {
        return Vec::new();
    }
    data[lag..]
        .iter()
        .zip(&data[..data.len() - lag])
        .map(|(later, earlier)| later - earlier)
        .collect()
}

/// Result of a simple linear regression `y = intercept + slope * x + e`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// Estimated slope
    pub slope: f64,
    /// Estimated intercept
    pub intercept: f64,
    /// Standard error of the slope (homoscedastic)
    pub slope_std_error: f64,
    /// Residuals `y - (intercept + slope * x)`, one per observation
    pub residuals: Vec<f64>,
}

/// Ordinary least squares with an intercept.
///
/// The data are centred before the cross products are formed, which avoids
/// catastrophic cancellation on price-level inputs. `x_name` only labels the
/// regressor in a [`PairAnalysisError::DegenerateRegression`] error.
///
/// # Errors
/// - `InsufficientData` for fewer than three observations or mismatched lengths
/// - `NumericalError` for non-finite inputs
/// - `DegenerateRegression` when `x` is constant
///
/// # Example
/// ```rust
/// use pairs_cointegration::math_utils::ols_regression;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![3.0, 5.0, 7.0, 9.0, 11.0];
/// let fit = ols_regression(&x, &y, "x").unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-10);
/// assert!((fit.intercept - 1.0).abs() < 1e-10);
/// ```
pub fn ols_regression(x: &[f64], y: &[f64], x_name: &str) -> PairResult<LinearFit> {
    if x.len() != y.len() || x.len() < 3 {
        return Err(PairAnalysisError::InsufficientData {
            required: 3,
            actual: x.len().min(y.len()),
        });
    }
    validate_all_finite(x, x_name)?;
    validate_all_finite(y, "regression response")?;

    let x_min = x.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let x_max = x.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let scale = x_min.abs().max(x_max.abs()).max(1.0);
    if x_max - x_min <= constants::DEGENERATE_RANGE_TOLERANCE * scale {
        return Err(PairAnalysisError::DegenerateRegression {
            variable: x_name.to_string(),
        });
    }

    let n = x.len() as f64;
    let mean_x = mean(x);
    let mean_y = mean(y);

    let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
        let dx = xi - mean_x;
        (sxy + dx * (yi - mean_y), sxx + dx * dx)
    });

    if sxx <= 0.0 {
        return Err(PairAnalysisError::DegenerateRegression {
            variable: x_name.to_string(),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(PairAnalysisError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
        });
    }

    let residuals: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| yi - (intercept + slope * xi))
        .collect();
    let rss: f64 = residuals.iter().map(|r| r * r).sum();
    let slope_std_error = (rss / (n - 2.0) / sxx).sqrt();

    Ok(LinearFit {
        slope,
        intercept,
        slope_std_error,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_population_variance_matches_definition() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx_eq!(population_variance(&data), 4.0, 1e-12);
        assert_approx_eq!(population_std(&data), 2.0, 1e-12);
        assert_eq!(population_variance(&[1.0]), 0.0);
    }

    #[test]
    fn test_lagged_differences() {
        let data = vec![1.0, 4.0, 9.0, 16.0];
        assert_eq!(first_differences(&data), vec![3.0, 5.0, 7.0]);
        assert_eq!(lagged_differences(&data, 2), vec![8.0, 12.0]);
        assert!(lagged_differences(&data, 4).is_empty());
    }

    #[test]
    fn test_ols_recovers_line_with_noise_free_data() {
        let x: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 0.5).collect();
        let y: Vec<f64> = x.iter().map(|xi| 3.0 - 1.5 * xi).collect();
        let fit = ols_regression(&x, &y, "x").unwrap();
        assert_approx_eq!(fit.slope, -1.5, 1e-10);
        assert_approx_eq!(fit.intercept, 3.0, 1e-8);
        assert!(fit.residuals.iter().all(|r| r.abs() < 1e-8));
        assert_eq!(fit.residuals.len(), x.len());
    }

    #[test]
    fn test_ols_constant_regressor_is_degenerate() {
        let x = vec![5.0; 20];
        let y: Vec<f64> = (0..20).map(|i| i as f64).collect();
        match ols_regression(&x, &y, "FLAT") {
            Err(PairAnalysisError::DegenerateRegression { variable }) => {
                assert_eq!(variable, "FLAT")
            }
            other => panic!("Expected DegenerateRegression, got {:?}", other),
        }
    }

    #[test]
    fn test_ols_rejects_short_and_non_finite_input() {
        assert!(matches!(
            ols_regression(&[1.0, 2.0], &[1.0, 2.0], "x"),
            Err(PairAnalysisError::InsufficientData { .. })
        ));
        assert!(matches!(
            ols_regression(&[1.0, 2.0, f64::NAN], &[1.0, 2.0, 3.0], "x"),
            Err(PairAnalysisError::NumericalError { .. })
        ));
    }

    #[test]
    fn test_safe_ln_rejects_zero() {
        assert!(float_ops::safe_ln(0.0).is_none());
        assert!(float_ops::safe_ln(-1.0).is_none());
        assert_approx_eq!(float_ops::safe_ln(1.0).unwrap(), 0.0, 1e-15);
    }
}
