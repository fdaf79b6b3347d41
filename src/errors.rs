//! Error types and validation functions for pair analysis.
//!
//! Two families of errors live here. Per-pair numerical pathologies
//! (`InsufficientData`, `DegenerateRegression`, `NonMeanReverting`, `Domain`,
//! `NumericalError`) are caught by the pair search and the out-of-sample
//! validator and only exclude the offending pair. Input errors
//! (`MalformedPanel`, `InvalidParameter`, `SymbolNotFound`) are returned to the
//! caller before any computation starts.

use thiserror::Error;

/// Error types for cointegration and mean-reversion analysis.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PairAnalysisError {
    /// Sequence too short for the requested test or estimator.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// The regressor of an OLS fit has zero variance, so no slope exists.
    #[error("Degenerate regression: independent variable '{variable}' has zero variance")]
    DegenerateRegression {
        /// Name of the constant regressor
        variable: String,
    },

    /// The fitted reversion speed is non-negative, so the half-life is undefined.
    #[error("Series is not mean-reverting: reversion speed {reversion_speed} >= 0")]
    NonMeanReverting {
        /// Estimated lambda of `dz = mu + lambda * z_lag`
        reversion_speed: f64,
    },

    /// A logarithm or normalisation received a zero (or negative) argument.
    #[error("Domain error in {operation}: {reason}")]
    Domain {
        /// Estimator that hit the invalid argument
        operation: String,
        /// What was out of domain
        reason: String,
    },

    /// Invalid parameter value for an analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// The price panel cannot be searched (empty, ragged or mismatched universes).
    #[error("Malformed price panel: {reason}")]
    MalformedPanel {
        /// What is wrong with the panel
        reason: String,
    },

    /// A symbol referenced by a cluster assignment is absent from the panel.
    #[error("Symbol not found in panel: {symbol}")]
    SymbolNotFound {
        /// The missing symbol
        symbol: String,
    },

    /// Numerical computation error due to non-finite input or a singular system.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
    },
}

impl PairAnalysisError {
    /// Whether the error describes a single pair's data rather than the inputs
    /// of the whole batch. Per-pair errors exclude the pair and never abort a
    /// search.
    pub fn is_per_pair(&self) -> bool {
        matches!(
            self,
            PairAnalysisError::InsufficientData { .. }
                | PairAnalysisError::DegenerateRegression { .. }
                | PairAnalysisError::NonMeanReverting { .. }
                | PairAnalysisError::Domain { .. }
                | PairAnalysisError::NumericalError { .. }
        )
    }
}

/// Result type for pair analysis operations.
pub type PairResult<T> = Result<T, PairAnalysisError>;

/// Validates that data has sufficient length for analysis.
///
/// # Example
/// ```rust
/// use pairs_cointegration::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2).is_ok());
/// assert!(validate_data_length(&data, 5).is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize) -> PairResult<()> {
    if data.len() < min_required {
        Err(PairAnalysisError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within expected bounds (inclusive).
///
/// # Example
/// ```rust
/// use pairs_cointegration::errors::validate_parameter;
///
/// assert!(validate_parameter(0.05, 0.0, 1.0, "p_value_threshold").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "p_value_threshold").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> PairResult<()> {
    if value.is_nan() {
        return Err(PairAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if min.is_nan() || max.is_nan() || min > max {
        return Err(PairAnalysisError::NumericalError {
            reason: format!(
                "Invalid bounds for parameter {}: min={}, max={}",
                name, min, max
            ),
        });
    }

    if value < min || value > max {
        Err(PairAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, naming its index.
pub fn validate_all_finite(data: &[f64], name: &str) -> PairResult<()> {
    if let Some((i, value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(PairAnalysisError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
        });
    }

    Ok(())
}
