//! Boundary to the external symbol-clustering step.
//!
//! Dimensionality reduction and density clustering run outside this crate. What
//! crosses the boundary is a [`ClusterAssignment`]: one integer label per
//! symbol, where [`NOISE_LABEL`] marks symbols left out of every cluster. The
//! pair search only compares symbols that share a non-negative label.

use crate::errors::{validate_parameter, PairAnalysisError, PairResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Label of symbols excluded from every cluster.
pub const NOISE_LABEL: i32 = -1;

/// Symbols sharing one cluster label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    pub label: i32,
    /// Members in assignment order
    pub symbols: Vec<String>,
}

impl Cluster {
    /// Unordered pairs inside the cluster, `c (c - 1) / 2`.
    pub fn pair_count(&self) -> usize {
        let c = self.symbols.len();
        c * c.saturating_sub(1) / 2
    }
}

/// Symbol to cluster-label mapping, in assignment order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterAssignment {
    labels: Vec<(String, i32)>,
}

impl ClusterAssignment {
    /// # Errors
    /// `MalformedPanel` for a repeated symbol, `InvalidParameter` for a label
    /// below [`NOISE_LABEL`].
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = (S, i32)>) -> PairResult<Self> {
        let labels: Vec<(String, i32)> = labels
            .into_iter()
            .map(|(symbol, label)| (symbol.into(), label))
            .collect();

        let mut seen = HashSet::with_capacity(labels.len());
        for (symbol, label) in &labels {
            if *label < NOISE_LABEL {
                return Err(PairAnalysisError::InvalidParameter {
                    parameter: format!("cluster label of '{}'", symbol),
                    value: f64::from(*label),
                    constraint: format!(">= {}", NOISE_LABEL),
                });
            }
            if !seen.insert(symbol.as_str()) {
                return Err(PairAnalysisError::MalformedPanel {
                    reason: format!("symbol '{}' is assigned twice", symbol),
                });
            }
        }
        Ok(Self { labels })
    }

    /// Zips parallel symbol and label slices.
    pub fn from_labels<S: AsRef<str>>(symbols: &[S], labels: &[i32]) -> PairResult<Self> {
        if symbols.len() != labels.len() {
            return Err(PairAnalysisError::MalformedPanel {
                reason: format!(
                    "{} symbols but {} cluster labels",
                    symbols.len(),
                    labels.len()
                ),
            });
        }
        Self::new(
            symbols
                .iter()
                .zip(labels)
                .map(|(symbol, &label)| (symbol.as_ref().to_string(), label)),
        )
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, symbol: &str) -> Option<i32> {
        self.labels
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|&(_, label)| label)
    }

    /// Clusters with a non-negative label, ascending by label.
    pub fn clusters(&self) -> Vec<Cluster> {
        let mut grouped: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        for (symbol, label) in &self.labels {
            if *label != NOISE_LABEL {
                grouped.entry(*label).or_default().push(symbol.clone());
            }
        }
        grouped
            .into_iter()
            .map(|(label, symbols)| Cluster { label, symbols })
            .collect()
    }

    pub fn n_clusters(&self) -> usize {
        self.counts().len()
    }

    /// Members per non-noise label.
    pub fn counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for (_, label) in &self.labels {
            if *label != NOISE_LABEL {
                *counts.entry(*label).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Pairs a cluster-restricted search evaluates, `Σ c (c - 1) / 2`.
    pub fn pairs_to_evaluate(&self) -> usize {
        self.counts().values().map(|&c| c * c.saturating_sub(1) / 2).sum()
    }

    /// Symbols labelled as noise.
    pub fn noise_symbols(&self) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, label)| *label == NOISE_LABEL)
            .map(|(symbol, _)| symbol.as_str())
            .collect()
    }
}

/// Density clustering parameters handed to a provider.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusteringParams {
    /// Neighbourhood radius
    pub eps: f64,
    /// Points needed to form a dense region
    pub min_samples: usize,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            eps: 1.8,
            min_samples: 3,
        }
    }
}

impl ClusteringParams {
    pub fn validate(&self) -> PairResult<()> {
        validate_parameter(self.eps, 0.0, f64::MAX, "eps")?;
        if self.eps == 0.0 {
            return Err(PairAnalysisError::InvalidParameter {
                parameter: "eps".to_string(),
                value: 0.0,
                constraint: "> 0".to_string(),
            });
        }
        if self.min_samples == 0 {
            return Err(PairAnalysisError::InvalidParameter {
                parameter: "min_samples".to_string(),
                value: 0.0,
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Dimensionality reduction parameters of the feature step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReductionParams {
    pub n_components: usize,
}

impl ReductionParams {
    /// Requires `1 <= n_components <= n_observations`.
    pub fn validate(&self, n_observations: usize) -> PairResult<()> {
        if self.n_components == 0 || self.n_components > n_observations {
            return Err(PairAnalysisError::InvalidParameter {
                parameter: "n_components".to_string(),
                value: self.n_components as f64,
                constraint: format!("[1, {}]", n_observations),
            });
        }
        Ok(())
    }
}

/// Produces a cluster assignment for a symbol universe.
///
/// `features` holds one row per symbol, in the order of `symbols`.
pub trait ClusterProvider {
    fn assign(
        &self,
        symbols: &[String],
        features: &[Vec<f64>],
        params: &ClusteringParams,
    ) -> PairResult<ClusterAssignment>;
}

/// Provider returning labels computed elsewhere.
#[derive(Debug, Clone)]
pub struct PrecomputedClusters {
    assignment: ClusterAssignment,
}

impl PrecomputedClusters {
    pub fn new(assignment: ClusterAssignment) -> Self {
        Self { assignment }
    }
}

impl ClusterProvider for PrecomputedClusters {
    /// Restricts the stored labels to `symbols`, in that order.
    ///
    /// # Errors
    /// `SymbolNotFound` when a requested symbol has no stored label,
    /// `MalformedPanel` when `features` does not have one row per symbol.
    fn assign(
        &self,
        symbols: &[String],
        features: &[Vec<f64>],
        params: &ClusteringParams,
    ) -> PairResult<ClusterAssignment> {
        params.validate()?;
        if !features.is_empty() && features.len() != symbols.len() {
            return Err(PairAnalysisError::MalformedPanel {
                reason: format!(
                    "{} feature rows for {} symbols",
                    features.len(),
                    symbols.len()
                ),
            });
        }

        let labels = symbols
            .iter()
            .map(|symbol| {
                self.assignment
                    .label(symbol)
                    .map(|label| (symbol.clone(), label))
                    .ok_or_else(|| PairAnalysisError::SymbolNotFound {
                        symbol: symbol.clone(),
                    })
            })
            .collect::<PairResult<Vec<_>>>()?;
        ClusterAssignment::new(labels)
    }
}
