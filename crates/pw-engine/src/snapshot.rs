//! Read-only copies of spot state for rendering and turn history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::effect::EffectRecord;
use crate::spot::Spot;
use crate::table::{SpotColor, SpotId};

/// Everything a view needs to draw one spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotSnapshot {
    /// Physical spot id.
    pub id: SpotId,
    /// Displayed number.
    pub number: u8,
    /// Displayed color.
    pub color: SpotColor,
    /// Whether the spot is destroyed.
    pub destroyed: bool,
    /// Win probability.
    pub probability: f64,
    /// Straight-up payout multiplier.
    pub payout_multiplier: f64,
    /// Applied records, oldest first.
    pub lineage: Vec<EffectRecord>,
}

impl From<&Spot> for SpotSnapshot {
    fn from(spot: &Spot) -> Self {
        Self {
            id: spot.id(),
            number: spot.number(),
            color: spot.color(),
            destroyed: spot.is_destroyed(),
            probability: spot.probability(),
            payout_multiplier: spot.payout_multiplier(),
            lineage: spot.lineage().to_vec(),
        }
    }
}

/// All spots as they stood at one point in a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Turn the snapshot belongs to.
    pub turn: u32,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// One entry per spot, in id order.
    pub spots: Vec<SpotSnapshot>,
}

impl TurnSnapshot {
    /// Copy the given spots.
    pub fn capture(turn: u32, spots: &[Spot]) -> Self {
        Self {
            turn,
            taken_at: Utc::now(),
            spots: spots.iter().map(SpotSnapshot::from).collect(),
        }
    }

    /// Look up one spot.
    pub fn spot(&self, id: SpotId) -> Option<&SpotSnapshot> {
        self.spots.iter().find(|s| s.id == id)
    }

    /// Sum of all spot probabilities.
    pub fn total_probability(&self) -> f64 {
        self.spots.iter().map(|s| s.probability).sum()
    }
}
