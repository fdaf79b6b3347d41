//! Aligned price panels and the chronological train/test split.
//!
//! A [`PricePanel`] is an ordered collection of equally long, finite
//! [`PriceSeries`] with unique symbols. The insertion order of the symbols is
//! the enumeration order of the pair search, so results are reproducible for a
//! given panel.

use crate::errors::{validate_all_finite, validate_parameter, PairAnalysisError, PairResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// A named, ordered sequence of finite prices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceSeries {
    name: String,
    values: Vec<f64>,
}

impl PriceSeries {
    /// Creates a series, rejecting NaN and infinite values.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> PairResult<Self> {
        let name = name.into();
        validate_all_finite(&values, &name)?;
        Ok(Self { name, values })
    }

    /// Symbol of the series.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observations in time order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The observations in `range`, keeping the symbol.
    ///
    /// Callers guarantee `range` lies within the series.
    fn window(&self, range: Range<usize>) -> Self {
        Self {
            name: self.name.clone(),
            values: self.values[range].to_vec(),
        }
    }
}

/// Equally long price series keyed by unique symbols, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePanel {
    series: Vec<PriceSeries>,
    index: HashMap<String, usize>,
    observations: usize,
}

impl PricePanel {
    /// Builds a panel from already validated series.
    ///
    /// # Errors
    /// `MalformedPanel` when there are no series, the series are empty or of
    /// different lengths, or a symbol repeats.
    pub fn new(series: Vec<PriceSeries>) -> PairResult<Self> {
        let first = series.first().ok_or_else(|| PairAnalysisError::MalformedPanel {
            reason: "panel has no symbols".to_string(),
        })?;
        let observations = first.len();
        if observations == 0 {
            return Err(PairAnalysisError::MalformedPanel {
                reason: format!("series '{}' is empty", first.name()),
            });
        }

        let mut index = HashMap::with_capacity(series.len());
        for (position, s) in series.iter().enumerate() {
            if s.len() != observations {
                return Err(PairAnalysisError::MalformedPanel {
                    reason: format!(
                        "series '{}' has {} observations but '{}' has {}",
                        s.name(),
                        s.len(),
                        first.name(),
                        observations
                    ),
                });
            }
            if index.insert(s.name().to_string(), position).is_some() {
                return Err(PairAnalysisError::MalformedPanel {
                    reason: format!("duplicate symbol '{}'", s.name()),
                });
            }
        }

        Ok(Self {
            series,
            index,
            observations,
        })
    }

    /// Builds a panel from `(symbol, values)` columns.
    ///
    /// # Example
    /// ```rust
    /// use pairs_cointegration::panel::PricePanel;
    ///
    /// let panel = PricePanel::from_columns(vec![
    ///     ("AAA", vec![1.0, 2.0, 3.0]),
    ///     ("BBB", vec![2.0, 4.0, 6.5]),
    /// ])
    /// .unwrap();
    /// assert_eq!(panel.n_symbols(), 2);
    /// assert_eq!(panel.n_observations(), 3);
    /// ```
    pub fn from_columns<S, I>(columns: I) -> PairResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let series = columns
            .into_iter()
            .map(|(name, values)| PriceSeries::new(name, values))
            .collect::<PairResult<Vec<_>>>()?;
        Self::new(series)
    }

    pub fn n_symbols(&self) -> usize {
        self.series.len()
    }

    pub fn n_observations(&self) -> usize {
        self.observations
    }

    /// Symbols in enumeration order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.iter().map(|s| s.name())
    }

    /// Series in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> + '_ {
        self.series.iter()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.index.get(symbol).map(|&i| &self.series[i])
    }

    /// The series for `symbol`, or `SymbolNotFound`.
    pub fn series(&self, symbol: &str) -> PairResult<&PriceSeries> {
        self.get(symbol)
            .ok_or_else(|| PairAnalysisError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    /// A panel restricted to `symbols`, in the order given.
    pub fn subset<S: AsRef<str>>(&self, symbols: &[S]) -> PairResult<Self> {
        let series = symbols
            .iter()
            .map(|symbol| self.series(symbol.as_ref()).cloned())
            .collect::<PairResult<Vec<_>>>()?;
        Self::new(series)
    }

    /// Observations `range` of every series.
    pub fn slice(&self, range: Range<usize>) -> PairResult<Self> {
        if range.start >= range.end || range.end > self.observations {
            return Err(PairAnalysisError::MalformedPanel {
                reason: format!(
                    "window {}..{} is empty or exceeds {} observations",
                    range.start, range.end, self.observations
                ),
            });
        }
        Self::new(self.series.iter().map(|s| s.window(range.clone())).collect())
    }

    /// Splits into the first `index` observations and the rest.
    ///
    /// Both halves keep every symbol and the test half strictly follows the
    /// train half in time.
    pub fn split_at(&self, index: usize) -> PairResult<(Self, Self)> {
        if index == 0 || index >= self.observations {
            return Err(PairAnalysisError::InvalidParameter {
                parameter: "split_index".to_string(),
                value: index as f64,
                constraint: format!("[1, {})", self.observations),
            });
        }
        Ok((self.slice(0..index)?, self.slice(index..self.observations)?))
    }

    /// Splits so that the train half holds `train_fraction` of the observations
    /// (rounded down).
    pub fn split_by_ratio(&self, train_fraction: f64) -> PairResult<(Self, Self)> {
        validate_parameter(train_fraction, 0.0, 1.0, "train_fraction")?;
        let index = (self.observations as f64 * train_fraction).floor() as usize;
        self.split_at(index)
    }

    /// Checks that `other` holds exactly the same symbols, in any order.
    pub fn ensure_same_universe(&self, other: &Self) -> PairResult<()> {
        let missing = self
            .symbols()
            .find(|s| !other.contains(s))
            .or_else(|| other.symbols().find(|s| !self.contains(s)));
        match missing {
            None => Ok(()),
            Some(symbol) => Err(PairAnalysisError::MalformedPanel {
                reason: format!("symbol '{}' is not shared by both panels", symbol),
            }),
        }
    }

    /// Simple returns `p[t] / p[t-1] - 1` of every series, symbol-major.
    ///
    /// This is the usual feature matrix handed to a clustering provider.
    pub fn returns(&self) -> PairResult<Vec<Vec<f64>>> {
        self.series
            .iter()
            .map(|s| {
                s.values()
                    .windows(2)
                    .map(|w| {
                        if w[0] == 0.0 {
                            Err(PairAnalysisError::Domain {
                                operation: "returns".to_string(),
                                reason: format!("zero price in series '{}'", s.name()),
                            })
                        } else {
                            Ok(w[1] / w[0] - 1.0)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
