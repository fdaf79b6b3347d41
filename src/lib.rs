//! # Pairs Cointegration
//!
//! Discovery of statistically mean-reverting price-series pairs for
//! statistical-arbitrage research.
//!
//! For every candidate pair the hedge regression is fitted in both directions,
//! each residual spread is tested for a unit root and profiled for mean
//! reversion, and the stronger direction is screened by a four-stage filter.
//! Surviving pairs are then refitted on a later, disjoint window and kept only
//! if the relationship still holds there.
//!
//! ## Key Features
//!
//! - **Unit-root testing**: augmented Dickey-Fuller with AIC/BIC lag selection,
//!   MacKinnon p-values and finite-sample critical values
//! - **Mean-reversion diagnostics**: half-life, Hurst exponent, zero crossings,
//!   variance ratio
//! - **Bidirectional cointegration**: both regression directions evaluated,
//!   strongest rejection kept
//! - **Pair search**: exhaustive or cluster-restricted, optionally parallel
//! - **Walk-forward validation**: independent out-of-sample refit of every
//!   candidate
//!
//! ## Quick Start
//!
//! ```rust
//! use pairs_cointegration::generators::{
//!     cointegrated_pair, random_walk, seeded_rng, CointegratedPairConfig,
//! };
//! use pairs_cointegration::{pairs_overlap, PairSearch, PairThresholds, PricePanel, SearchConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut rng = seeded_rng(7);
//!     let (a, b) = cointegrated_pair(&mut rng, &CointegratedPairConfig::default());
//!     let noise = random_walk(&mut rng, a.len(), 80.0, 1.0);
//!
//!     let panel = PricePanel::from_columns(vec![("AAA", a), ("BBB", b), ("CCC", noise)])?;
//!     let (train, test) = panel.split_by_ratio(0.5)?;
//!
//!     let config = SearchConfig::default().with_thresholds(PairThresholds::strict());
//!     let outcome = PairSearch::new(&config)?.find_pairs(&train, &test)?;
//!     for pair in &outcome.pairs {
//!         let summary = pair.summary();
//!         println!(
//!             "{} ~ {}: beta={:.3} p={:.4}",
//!             summary.dependent, summary.independent, summary.hedge_ratio, summary.p_value
//!         );
//!     }
//!
//!     let confirmed = pairs_overlap(&outcome.pairs, &config.thresholds)?;
//!     println!("{} pairs confirmed out-of-sample", confirmed.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! [`PairSearch`] drives the [`CointegrationEngine`] over a [`PricePanel`] and
//! screens each result with [`filters::screen`]; [`PairValidator`] repeats the
//! evaluation on the test window. Clustering happens outside the crate and
//! arrives as a [`ClusterAssignment`] through the [`ClusterProvider`] trait.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod linear_algebra;
pub mod math_utils;
pub mod panel;
pub mod results;

// Analysis methods
pub mod clustering;
pub mod cointegration;
pub mod filters;
pub mod generators;
pub mod mean_reversion;
pub mod pair_search;
pub mod stationarity;
pub mod validation;

// Re-exports for convenience - main public API
pub use clustering::{
    Cluster, ClusterAssignment, ClusterProvider, ClusteringParams, PrecomputedClusters,
    ReductionParams, NOISE_LABEL,
};
pub use cointegration::{
    CointegrationEngine, CointegrationOutcome, CointegrationResult, DirectionEvaluation,
    RegressionDirection, RegressionResult,
};
pub use config::{PairThresholds, SearchConfig};
pub use errors::{PairAnalysisError, PairResult};
pub use filters::{FilterRejection, FilterStage};
pub use mean_reversion::{
    half_life, hurst, variance_ratio, zero_crossings, zscore, MeanReversionProfile,
};
pub use pair_search::{
    find_pairs, get_candidate_pairs, CandidateSet, PairSearch, SearchOutcome, SearchStats,
};
pub use panel::{PricePanel, PriceSeries};
pub use results::{CandidatePair, PairSummary};
pub use stationarity::{
    adf_test, check_for_stationarity, AdfConfig, AutoLag, CriticalValues, StationarityResult,
};
pub use validation::{pairs_overlap, PairValidator, ValidatedPair};
