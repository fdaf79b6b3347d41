//! # Search Configuration
//!
//! Acceptance thresholds of the four-stage pair filter and the options of the
//! pair search, with named presets and environment-based preset selection.

use crate::errors::{validate_parameter, PairAnalysisError, PairResult};
use crate::stationarity::{AdfConfig, AutoLag};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable naming the preset used by [`SearchConfig::from_environment`].
pub const PROFILE_ENV_VAR: &str = "PAIRS_PROFILE";

/// Acceptance thresholds applied to a pair's spread, in filter order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairThresholds {
    /// Unit-root p-value must be strictly below this
    pub p_value_threshold: f64,
    /// Half-life must be at least this many periods
    pub min_half_life: f64,
    /// Optional ceiling on the half-life, inclusive
    pub max_half_life: Option<f64>,
    /// Zero crossings of the de-meaned spread must be at least this
    pub min_zero_crossings: usize,
    /// Hurst exponent must be strictly below this
    pub hurst_threshold: f64,
}

impl Default for PairThresholds {
    fn default() -> Self {
        Self {
            p_value_threshold: 0.05,
            min_half_life: 5.0,
            max_half_life: None,
            min_zero_crossings: 20,
            hurst_threshold: 0.5,
        }
    }
}

impl PairThresholds {
    /// Tight thresholds for short-horizon trading: 1% significance and a
    /// half-life window of one to thirty periods.
    pub fn strict() -> Self {
        Self {
            p_value_threshold: 0.01,
            min_half_life: 1.0,
            max_half_life: Some(30.0),
            min_zero_crossings: 12,
            hurst_threshold: 0.5,
        }
    }

    /// Loose thresholds for exploratory screening.
    pub fn relaxed() -> Self {
        Self {
            p_value_threshold: 0.10,
            min_half_life: 1.0,
            max_half_life: None,
            min_zero_crossings: 0,
            hurst_threshold: 0.5,
        }
    }

    /// Checks every threshold before a search starts.
    ///
    /// # Errors
    /// `InvalidParameter` for a p-value outside `(0, 1]`, a negative or
    /// non-finite half-life bound, a ceiling below the floor, or a non-positive
    /// Hurst ceiling.
    pub fn validate(&self) -> PairResult<()> {
        validate_parameter(self.p_value_threshold, 0.0, 1.0, "p_value_threshold")?;
        if self.p_value_threshold == 0.0 {
            return Err(PairAnalysisError::InvalidParameter {
                parameter: "p_value_threshold".to_string(),
                value: 0.0,
                constraint: "(0, 1]".to_string(),
            });
        }

        validate_parameter(self.min_half_life, 0.0, f64::MAX, "min_half_life")?;
        if let Some(max_half_life) = self.max_half_life {
            validate_parameter(max_half_life, self.min_half_life, f64::MAX, "max_half_life")?;
        }

        validate_parameter(self.hurst_threshold, 0.0, f64::MAX, "hurst_threshold")?;
        if self.hurst_threshold == 0.0 {
            return Err(PairAnalysisError::InvalidParameter {
                parameter: "hurst_threshold".to_string(),
                value: 0.0,
                constraint: "> 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Options of a pair search: filter thresholds and the unit-root test setup.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    pub thresholds: PairThresholds,
    pub adf: AdfConfig,
}

impl SearchConfig {
    /// Strict thresholds with BIC lag selection.
    pub fn strict() -> Self {
        Self {
            thresholds: PairThresholds::strict(),
            adf: AdfConfig {
                max_lag: None,
                autolag: AutoLag::Bic,
            },
        }
    }

    /// Relaxed thresholds with the default unit-root test.
    pub fn relaxed() -> Self {
        Self {
            thresholds: PairThresholds::relaxed(),
            adf: AdfConfig::default(),
        }
    }

    /// Preset named `profile`; unknown names fall back to the default preset.
    pub fn from_profile(profile: &str) -> Self {
        match profile.trim().to_ascii_lowercase().as_str() {
            "strict" => Self::strict(),
            "relaxed" | "exploratory" => Self::relaxed(),
            "default" | "" => Self::default(),
            other => {
                log::warn!("Unknown search profile '{}', using default thresholds", other);
                Self::default()
            }
        }
    }

    /// Preset selected by the `PAIRS_PROFILE` environment variable.
    pub fn from_environment() -> Self {
        let profile = std::env::var(PROFILE_ENV_VAR).unwrap_or_default();
        Self::from_profile(&profile)
    }

    pub fn with_thresholds(mut self, thresholds: PairThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_adf(mut self, adf: AdfConfig) -> Self {
        self.adf = adf;
        self
    }

    pub fn validate(&self) -> PairResult<()> {
        self.thresholds.validate()
    }
}
