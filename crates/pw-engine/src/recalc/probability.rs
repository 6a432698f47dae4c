//! Win-probability distribution over spots and numbers.
//!
//! Weight depends only on whether a spot is still active. Payout effects
//! never touch it. Spots that show the same number split that number's
//! mass equally.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, warn};

use crate::config::EngineConfig;
use crate::spot::Spot;
use crate::table::SpotId;

/// The per-number distribution produced by a recompute.
///
/// Returned from [`crate::recalc::recalculate_all`] and passed to the winner
/// draw, so the draw always works from the values it was handed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    numbers: BTreeMap<u8, f64>,
    holders: BTreeMap<u8, Vec<SpotId>>,
    total_weight: f64,
}

impl Distribution {
    /// True when no spot carries weight and no winner can be drawn.
    pub fn is_degenerate(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Probability mass of a displayed number (0 when no active spot shows it).
    pub fn number_probability(&self, number: u8) -> f64 {
        self.numbers.get(&number).copied().unwrap_or(0.0)
    }

    /// Mass per distinct active number, in ascending number order.
    pub fn numbers(&self) -> &BTreeMap<u8, f64> {
        &self.numbers
    }

    /// Active spots showing `number`, in id order.
    pub fn holders(&self, number: u8) -> &[SpotId] {
        self.holders.get(&number).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of raw weights before normalization.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Ascending numbers paired with their cumulative probability.
    pub fn cumulative(&self) -> Vec<(u8, f64)> {
        let mut running = 0.0;
        self.numbers
            .iter()
            .map(|(&number, &p)| {
                running += p;
                (number, running)
            })
            .collect()
    }
}

fn raw_weight(spot: &Spot, config: &EngineConfig) -> f64 {
    if spot.is_active() {
        config.active_weight
    } else {
        0.0
    }
}

/// The probability sum, if it is further than `tolerance` from 1.
///
/// Drift is reported, never corrected.
fn drift(spots: &[Spot], tolerance: f64) -> Option<f64> {
    let sum: f64 = spots.iter().map(Spot::probability).sum();
    ((sum - 1.0).abs() > tolerance).then_some(sum)
}

/// Assign every spot's probability and return the per-number distribution.
pub(crate) fn distribute(spots: &mut [Spot], config: &EngineConfig) -> Distribution {
    let weights: Vec<f64> = spots.iter().map(|s| raw_weight(s, config)).collect();
    let total_weight: f64 = weights.iter().sum();

    if total_weight <= 0.0 {
        for spot in spots.iter_mut() {
            spot.set_probability(0.0);
        }
        error!("every spot is destroyed; the distribution is degenerate");
        return Distribution {
            total_weight,
            ..Distribution::default()
        };
    }

    let mut numbers: BTreeMap<u8, f64> = BTreeMap::new();
    let mut holders: BTreeMap<u8, Vec<SpotId>> = BTreeMap::new();
    for (spot, weight) in spots.iter().zip(&weights) {
        if spot.is_active() {
            *numbers.entry(spot.number()).or_insert(0.0) += weight / total_weight;
            holders.entry(spot.number()).or_default().push(spot.id());
        }
    }

    for spot in spots.iter_mut() {
        let probability = if spot.is_active() {
            let mass = numbers.get(&spot.number()).copied().unwrap_or(0.0);
            let sharing = holders.get(&spot.number()).map_or(1, Vec::len);
            mass / sharing as f64
        } else {
            0.0
        };
        spot.set_probability(probability);
    }

    if let Some(sum) = drift(spots, config.sum_tolerance) {
        warn!(
            sum,
            tolerance = config.sum_tolerance,
            "probability mass drifted from 1"
        );
    }

    Distribution {
        numbers,
        holders,
        total_weight,
    }
}
