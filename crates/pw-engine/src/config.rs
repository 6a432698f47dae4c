//! Engine configuration.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::table::BASE_PAYOUT;

/// Tunables for recompute and draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed for deterministic spins.
    pub seed: u64,
    /// Raw weight given to every active spot.
    pub active_weight: f64,
    /// Allowed deviation of the probability sum from 1 before a warning.
    pub sum_tolerance: f64,
    /// Straight-up payout of an unmodified spot.
    pub base_payout: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            active_weight: 100.0,
            sum_tolerance: 1e-4,
            base_payout: BASE_PAYOUT,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the raw weight of an active spot.
    pub fn with_active_weight(mut self, weight: f64) -> Self {
        self.active_weight = weight;
        self
    }

    /// Set the probability-sum tolerance.
    pub fn with_sum_tolerance(mut self, tolerance: f64) -> Self {
        self.sum_tolerance = tolerance;
        self
    }

    /// Set the straight-up base payout.
    pub fn with_base_payout(mut self, payout: f64) -> Self {
        self.base_payout = payout;
        self
    }

    /// A generator seeded from [`Self::seed`].
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.active_weight.is_finite() && self.active_weight > 0.0) {
            return Err(EngineError::Scenario(format!(
                "active_weight must be positive, got {}",
                self.active_weight
            )));
        }
        if !(self.sum_tolerance.is_finite() && self.sum_tolerance >= 0.0) {
            return Err(EngineError::Scenario(format!(
                "sum_tolerance must not be negative, got {}",
                self.sum_tolerance
            )));
        }
        if !(self.base_payout.is_finite() && self.base_payout >= 0.0) {
            return Err(EngineError::Scenario(format!(
                "base_payout must not be negative, got {}",
                self.base_payout
            )));
        }
        Ok(())
    }
}
