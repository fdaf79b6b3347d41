//! Seeded synthetic price series for tests and research fixtures.
//!
//! Every generator takes the random number generator explicitly, so a fixture
//! is reproducible from its seed alone and no generator touches global state.
//!
//! ## Available Generators
//!
//! - **White noise**: independent Gaussian draws
//! - **Random walk**: integrated white noise, the unit-root reference process
//! - **AR(1)**: `z_t = φ z_{t-1} + ε_t`, mean-reverting for `|φ| < 1`
//! - **Cointegrated pair**: a random-walk leg and a second leg equal to a
//!   linear function of the first plus AR(1) noise

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, StandardNormal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Deterministic ChaCha20 generator for `seed`.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let draw: f64 = StandardNormal.sample(rng);
    draw
}

/// Independent `N(0, sigma²)` draws.
pub fn white_noise<R: Rng + ?Sized>(rng: &mut R, length: usize, sigma: f64) -> Vec<f64> {
    (0..length).map(|_| sigma * gaussian(rng)).collect()
}

/// Random walk starting at `start` with `N(0, sigma²)` increments.
///
/// The first element is `start` itself.
pub fn random_walk<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    start: f64,
    sigma: f64,
) -> Vec<f64> {
    let mut walk = Vec::with_capacity(length);
    let mut position = start;
    for i in 0..length {
        if i > 0 {
            position += sigma * gaussian(rng);
        }
        walk.push(position);
    }
    walk
}

/// AR(1) process `z_t = phi z_{t-1} + e_t` with `e_t ~ N(0, sigma²)`.
///
/// For `|phi| < 1` the first value is drawn from the stationary distribution,
/// otherwise the process starts at zero. The reversion speed of the
/// differenced form `Δz_t = (phi - 1) z_{t-1} + e_t` is `phi - 1`.
pub fn ar1_process<R: Rng + ?Sized>(rng: &mut R, length: usize, phi: f64, sigma: f64) -> Vec<f64> {
    let mut series = Vec::with_capacity(length);
    if length == 0 {
        return series;
    }

    let mut value = if phi.abs() < 1.0 {
        sigma / (1.0 - phi * phi).sqrt() * gaussian(rng)
    } else {
        0.0
    };
    series.push(value);
    for _ in 1..length {
        value = phi * value + sigma * gaussian(rng);
        series.push(value);
    }
    series
}

/// Parameters of an engineered cointegrated pair `B = intercept + hedge_ratio·A + z`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CointegratedPairConfig {
    /// Number of observations
    pub length: usize,
    /// First value of leg A
    pub start_price: f64,
    /// Standard deviation of leg A's increments
    pub price_volatility: f64,
    /// Slope of B on A
    pub hedge_ratio: f64,
    /// Constant offset of B
    pub intercept: f64,
    /// AR(1) coefficient of the stationary spread
    pub spread_phi: f64,
    /// Innovation standard deviation of the spread
    pub spread_volatility: f64,
}

impl Default for CointegratedPairConfig {
    fn default() -> Self {
        Self {
            length: 1000,
            start_price: 50.0,
            price_volatility: 1.0,
            hedge_ratio: 2.0,
            intercept: 0.0,
            spread_phi: 0.7,
            spread_volatility: 1.0,
        }
    }
}

/// Generates `(A, B)` with `A` a random walk and `B - hedge_ratio·A` stationary.
pub fn cointegrated_pair<R: Rng + ?Sized>(
    rng: &mut R,
    config: &CointegratedPairConfig,
) -> (Vec<f64>, Vec<f64>) {
    let leg_a = random_walk(rng, config.length, config.start_price, config.price_volatility);
    let spread = ar1_process(rng, config.length, config.spread_phi, config.spread_volatility);
    let leg_b = leg_a
        .iter()
        .zip(&spread)
        .map(|(a, z)| config.intercept + config.hedge_ratio * a + z)
        .collect();
    (leg_a, leg_b)
}
