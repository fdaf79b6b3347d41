//! The four-stage acceptance test applied to a pair's spread.
//!
//! Stages run in a fixed order (p-value, half-life, zero crossings, Hurst) and
//! the first failing stage decides the rejection.

use crate::config::PairThresholds;
use crate::mean_reversion::MeanReversionProfile;
use crate::stationarity::StationarityResult;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter stages, ordered as they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterStage {
    PValue,
    HalfLife,
    ZeroCrossings,
    Hurst,
}

/// Why a spread failed the acceptance test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterRejection {
    /// p-value not below the threshold
    PValue { p_value: f64, threshold: f64 },
    /// Half-life outside `[min, max]`
    HalfLife {
        half_life: f64,
        min: f64,
        max: Option<f64>,
    },
    /// Reversion speed is non-negative, so there is no half-life to check
    NonMeanReverting { reversion_speed: f64 },
    /// Too few crossings of the mean
    ZeroCrossings { count: usize, min: usize },
    /// Hurst exponent not below the ceiling
    Hurst { hurst_exponent: f64, threshold: f64 },
}

impl FilterRejection {
    /// The stage that produced the rejection.
    pub fn stage(&self) -> FilterStage {
        match self {
            FilterRejection::PValue { .. } => FilterStage::PValue,
            FilterRejection::HalfLife { .. } | FilterRejection::NonMeanReverting { .. } => {
                FilterStage::HalfLife
            }
            FilterRejection::ZeroCrossings { .. } => FilterStage::ZeroCrossings,
            FilterRejection::Hurst { .. } => FilterStage::Hurst,
        }
    }
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRejection::PValue { p_value, threshold } => {
                write!(f, "p-value {:.4} >= {}", p_value, threshold)
            }
            FilterRejection::HalfLife {
                half_life,
                min,
                max: Some(max),
            } => write!(f, "half-life {:.2} outside [{}, {}]", half_life, min, max),
            FilterRejection::HalfLife {
                half_life,
                min,
                max: None,
            } => write!(f, "half-life {:.2} < {}", half_life, min),
            FilterRejection::NonMeanReverting { reversion_speed } => {
                write!(f, "not mean-reverting (lambda {:.4})", reversion_speed)
            }
            FilterRejection::ZeroCrossings { count, min } => {
                write!(f, "{} zero crossings < {}", count, min)
            }
            FilterRejection::Hurst {
                hurst_exponent,
                threshold,
            } => write!(f, "Hurst {:.3} >= {}", hurst_exponent, threshold),
        }
    }
}

/// Applies the acceptance test, returning the first failing stage.
pub fn screen(
    stationarity: &StationarityResult,
    profile: &MeanReversionProfile,
    thresholds: &PairThresholds,
) -> Result<(), FilterRejection> {
    if stationarity.p_value.is_nan() || stationarity.p_value >= thresholds.p_value_threshold {
        return Err(FilterRejection::PValue {
            p_value: stationarity.p_value,
            threshold: thresholds.p_value_threshold,
        });
    }

    let half_life = profile
        .half_life
        .ok_or(FilterRejection::NonMeanReverting {
            reversion_speed: profile.reversion_speed,
        })?;
    let above_ceiling = thresholds.max_half_life.is_some_and(|max| half_life > max);
    if half_life < thresholds.min_half_life || above_ceiling {
        return Err(FilterRejection::HalfLife {
            half_life,
            min: thresholds.min_half_life,
            max: thresholds.max_half_life,
        });
    }

    if profile.zero_crossings < thresholds.min_zero_crossings {
        return Err(FilterRejection::ZeroCrossings {
            count: profile.zero_crossings,
            min: thresholds.min_zero_crossings,
        });
    }

    if profile.hurst_exponent.is_nan() || profile.hurst_exponent >= thresholds.hurst_threshold {
        return Err(FilterRejection::Hurst {
            hurst_exponent: profile.hurst_exponent,
            threshold: thresholds.hurst_threshold,
        });
    }

    Ok(())
}
