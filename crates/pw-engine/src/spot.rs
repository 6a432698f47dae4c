//! Per-spot mutable state.
//!
//! A [`Spot`] owns its lineage and caches the values derived from it. Only
//! the engine writes the derived fields; callers see them read-only.

use serde::Serialize;

use crate::effect::{AppliedOver, EffectRecord};
use crate::table::{SpotColor, SpotId, SpotTableEntry};

/// Identity rebuilt by folding a lineage over a table entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Identity {
    pub number: u8,
    pub color: SpotColor,
    pub destroyed: bool,
}

/// One pocket's current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spot {
    id: SpotId,
    current_number: u8,
    current_color: SpotColor,
    destroyed: bool,
    current_probability: f64,
    current_payout_multiplier: f64,
    lineage: Vec<EffectRecord>,
}

impl Spot {
    /// Create a spot in its table-default state.
    ///
    /// Probability stays at 0 until the first recompute.
    pub fn new(entry: &SpotTableEntry) -> Self {
        Self {
            id: entry.id,
            current_number: entry.number(),
            current_color: entry.color,
            destroyed: false,
            current_probability: 0.0,
            current_payout_multiplier: entry.base_payout,
            lineage: Vec::new(),
        }
    }

    /// The physical spot id.
    pub fn id(&self) -> SpotId {
        self.id
    }

    /// The number this spot currently shows.
    pub fn number(&self) -> u8 {
        self.current_number
    }

    /// The color this spot currently shows.
    pub fn color(&self) -> SpotColor {
        self.current_color
    }

    /// True once a destroy effect has hit this spot.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True while the spot can still win.
    pub fn is_active(&self) -> bool {
        !self.destroyed
    }

    /// Win probability as of the last recompute.
    pub fn probability(&self) -> f64 {
        self.current_probability
    }

    /// Straight-up payout multiplier as of the last recompute.
    pub fn payout_multiplier(&self) -> f64 {
        self.current_payout_multiplier
    }

    /// Every record applied to this spot, oldest first.
    pub fn lineage(&self) -> &[EffectRecord] {
        &self.lineage
    }

    /// Snapshot of the current identity, stored on new records.
    pub(crate) fn applied_over(&self) -> AppliedOver {
        AppliedOver {
            number: self.current_number,
            color: self.current_color,
            payout_multiplier: self.current_payout_multiplier,
        }
    }

    pub(crate) fn append(&mut self, record: EffectRecord) {
        self.lineage.push(record);
    }

    pub(crate) fn extend_lineage(&mut self, records: &[EffectRecord]) {
        self.lineage.extend_from_slice(records);
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    /// Install a replayed identity. The destroyed flag only ever turns on here.
    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.current_number = identity.number;
        self.current_color = identity.color;
        self.destroyed |= identity.destroyed;
    }

    pub(crate) fn set_probability(&mut self, probability: f64) {
        self.current_probability = probability;
    }

    pub(crate) fn set_payout_multiplier(&mut self, multiplier: f64) {
        self.current_payout_multiplier = multiplier;
    }

    /// Return to the table-default state, clearing lineage and the sticky flag.
    pub(crate) fn reset(&mut self, entry: &SpotTableEntry) {
        *self = Self::new(entry);
    }
}
