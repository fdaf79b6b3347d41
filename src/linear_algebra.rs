//! Multiple linear regression for the unit-root test.
//!
//! The augmented Dickey-Fuller regression needs coefficient standard errors and
//! the Gaussian log-likelihood for lag selection, so the normal equations are
//! solved through a Cholesky factorisation of `XᵀX`, which also yields
//! `(XᵀX)⁻¹` for the covariance of the estimates.

use crate::errors::{validate_all_finite, PairAnalysisError, PairResult};
use crate::math_utils::constants;
use nalgebra::{Cholesky, DMatrix, DVector};

/// Relative pivot size below which the design matrix is treated as singular.
const SINGULAR_PIVOT_RATIO: f64 = 1e-12;

/// Fitted multiple regression with inference statistics.
#[derive(Debug, Clone)]
pub struct RegressionFit {
    /// Coefficients, one per predictor column
    pub params: Vec<f64>,
    /// Homoscedastic standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Number of observations
    pub nobs: usize,
}

impl RegressionFit {
    /// t-statistic of coefficient `index`.
    pub fn t_value(&self, index: usize) -> f64 {
        self.params[index] / self.std_errors[index]
    }

    /// Gaussian log-likelihood evaluated at the OLS estimates.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * (constants::LN_TWO_PI + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion, `-2 llf + 2k`.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.params.len() as f64
    }

    /// Bayesian information criterion, `-2 llf + k ln n`.
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + self.params.len() as f64 * (self.nobs as f64).ln()
    }
}

/// Least squares fit of `y` on the predictor columns in `x`.
///
/// `x` is in predictor-by-observation format (`x[predictor][observation]`);
/// include a column of ones for an intercept.
pub fn multiple_regression(x: &[Vec<f64>], y: &[f64]) -> PairResult<RegressionFit> {
    let k = x.len();
    let n = y.len();

    if k == 0 {
        return Err(PairAnalysisError::NumericalError {
            reason: "Regression requires at least one predictor".to_string(),
        });
    }
    if n <= k {
        return Err(PairAnalysisError::InsufficientData {
            required: k + 1,
            actual: n,
        });
    }

    validate_all_finite(y, "regression response")?;
    for (i, column) in x.iter().enumerate() {
        if column.len() != n {
            return Err(PairAnalysisError::NumericalError {
                reason: format!(
                    "Predictor column {} has length {} but expected {}",
                    i,
                    column.len(),
                    n
                ),
            });
        }
        validate_all_finite(column, "regression predictor")?;
    }

    let design = DMatrix::from_fn(n, k, |row, col| x[col][row]);
    let response = DVector::from_column_slice(y);

    let xtx = design.transpose() * &design;
    let xty = design.transpose() * &response;

    let cholesky = Cholesky::new(xtx.clone()).ok_or_else(|| PairAnalysisError::NumericalError {
        reason: "Singular design matrix in regression".to_string(),
    })?;

    let factor = cholesky.l();
    for j in 0..k {
        let pivot = factor[(j, j)] * factor[(j, j)];
        if pivot <= SINGULAR_PIVOT_RATIO * xtx[(j, j)] {
            return Err(PairAnalysisError::NumericalError {
                reason: format!("Predictor column {} is collinear with earlier columns", j),
            });
        }
    }

    let beta = cholesky.solve(&xty);
    let residuals = &response - &design * &beta;
    let ssr = residuals.dot(&residuals);

    let sigma2 = ssr / (n - k) as f64;
    let covariance = cholesky.inverse();
    let std_errors: Vec<f64> = (0..k)
        .map(|j| (sigma2 * covariance[(j, j)]).max(0.0).sqrt())
        .collect();

    let params: Vec<f64> = beta.iter().copied().collect();
    if params.iter().any(|p| !p.is_finite()) {
        return Err(PairAnalysisError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
        });
    }

    Ok(RegressionFit {
        params,
        std_errors,
        ssr,
        nobs: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_multiple_regression_recovers_coefficients() {
        let n = 40;
        let ones = vec![1.0; n];
        let x1: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..n).map(|i| ((i * 7) % 11) as f64).collect();
        let y: Vec<f64> = (0..n)
            .map(|i| 2.0 + 0.5 * x1[i] - 3.0 * x2[i] + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();

        let fit = multiple_regression(&[ones, x1, x2], &y).unwrap();
        assert_approx_eq!(fit.params[0], 2.0, 0.1);
        assert_approx_eq!(fit.params[1], 0.5, 0.01);
        assert_approx_eq!(fit.params[2], -3.0, 0.02);
        assert!(fit.std_errors.iter().all(|se| se.is_finite() && *se > 0.0));
        assert_eq!(fit.nobs, n);
    }

    #[test]
    fn test_information_criteria_penalise_parameters() {
        let n = 30;
        let ones = vec![1.0; n];
        let x1: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
        let y: Vec<f64> = (0..n).map(|i| 1.0 + x1[i] + 0.01 * (i % 3) as f64).collect();
        let fit = multiple_regression(&[ones, x1], &y).unwrap();
        let penalty = fit.bic() - fit.aic();
        assert_approx_eq!(penalty, 2.0 * ((n as f64).ln() - 2.0), 1e-9);
    }

    #[test]
    fn test_collinear_columns_are_rejected() {
        let n = 20;
        let ones = vec![1.0; n];
        let twos = vec![2.0; n];
        let y: Vec<f64> = (0..n).map(|i| i as f64).collect();
        assert!(matches!(
            multiple_regression(&[ones, twos], &y),
            Err(PairAnalysisError::NumericalError { .. })
        ));
    }

    #[test]
    fn test_too_few_observations() {
        let x = vec![vec![1.0, 1.0], vec![0.0, 1.0]];
        assert!(matches!(
            multiple_regression(&x, &[1.0, 2.0]),
            Err(PairAnalysisError::InsufficientData { .. })
        ));
    }
}
