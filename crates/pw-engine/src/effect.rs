//! Effect records: the append-only entries that shape a spot.
//!
//! Every item or charm applied to a spot collapses onto one of four
//! primitive [`Effect`]s. A spot's displayed identity is never stored
//! independently; it is rebuilt by replaying its records in order.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemId;
use crate::table::{SpotColor, SpotId};

/// Unique identifier of a record. Cloned records keep the id of the original,
/// so a copied lineage can be traced back to where each entry was first applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(pub Uuid);

impl EffectId {
    /// Generate a new random record id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The four primitive effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Show an absolute number (the value computed when the effect was applied).
    PlusNumber {
        /// Number shown after the effect.
        number: u8,
    },
    /// Take on another spot's number and color.
    CopyFrom {
        /// The spot that was copied.
        source: SpotId,
        /// The source's number at the time of the copy.
        number: u8,
        /// The source's color at the time of the copy.
        color: SpotColor,
    },
    /// Remove the spot from play.
    DestroySpot,
    /// Scale the spot's payout by the record's multiplier contribution.
    PayoutMultiply,
}

impl Effect {
    /// Short snake_case name of the effect kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::PlusNumber { .. } => "plus_number",
            Self::CopyFrom { .. } => "copy_from",
            Self::DestroySpot => "destroy_spot",
            Self::PayoutMultiply => "payout_multiply",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlusNumber { number } => write!(f, "plus_number -> {number}"),
            Self::CopyFrom {
                source,
                number,
                color,
            } => write!(f, "copy_from {source} -> {number} {color}"),
            Self::DestroySpot => write!(f, "destroy_spot"),
            Self::PayoutMultiply => write!(f, "payout_multiply"),
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum EffectOrigin {
    /// Applied directly through an engine entry point.
    #[default]
    Direct,
    /// Applied by a consumable item.
    Item(ItemId),
    /// Appended by a passive charm reacting to a trigger.
    Charm(String),
}

/// The spot's identity just before a record was appended.
///
/// Kept for tooltips and audits only. Replay never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedOver {
    /// Number shown before the effect.
    pub number: u8,
    /// Color shown before the effect.
    pub color: SpotColor,
    /// Payout multiplier before the effect.
    pub payout_multiplier: f64,
}

/// One immutable entry in a spot's lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    id: EffectId,
    effect: Effect,
    multiplier_contribution: f64,
    origin: EffectOrigin,
    applied_over: AppliedOver,
}

impl EffectRecord {
    /// Create a record with a neutral multiplier contribution of 1.0.
    pub fn new(effect: Effect, applied_over: AppliedOver) -> Self {
        Self {
            id: EffectId::new(),
            effect,
            multiplier_contribution: 1.0,
            origin: EffectOrigin::Direct,
            applied_over,
        }
    }

    /// Create a payout-multiply record contributing `factor`.
    pub fn payout_multiply(factor: f64, applied_over: AppliedOver) -> Self {
        Self {
            multiplier_contribution: factor,
            ..Self::new(Effect::PayoutMultiply, applied_over)
        }
    }

    /// Tag the record with its origin.
    pub fn with_origin(mut self, origin: EffectOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// The record id.
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// The primitive effect.
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Factor this record contributes to the payout multiplier.
    pub fn multiplier_contribution(&self) -> f64 {
        self.multiplier_contribution
    }

    /// What applied this record.
    pub fn origin(&self) -> &EffectOrigin {
        &self.origin
    }

    /// Diagnostic snapshot of the spot before this record.
    pub fn applied_over(&self) -> &AppliedOver {
        &self.applied_over
    }
}

impl fmt::Display for EffectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.effect)?;
        if (self.multiplier_contribution - 1.0).abs() > f64::EPSILON {
            write!(f, " x{}", self.multiplier_contribution)?;
        }
        Ok(())
    }
}
