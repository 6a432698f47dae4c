//! Item and charm definitions the engine interprets.
//!
//! The catalog itself lives outside the engine. An item definition only says
//! which primitive effect it maps to; a charm is a passive that reacts to
//! spot changes while it is held.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::SpotId;

/// Catalog identifier of an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an item id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The primitive effect an item applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemEffect {
    /// Raise the target's number by one.
    PlusNumber,
    /// Copy one spot onto another.
    CopyFrom,
    /// Destroy the target.
    Destroy,
    /// Multiply the payout of the target and its neighbours.
    PayoutMultiply {
        /// Factor applied to each affected spot.
        factor: f64,
        /// How many neighbours on each side are affected.
        #[serde(default)]
        radius: u8,
    },
}

/// An immutable item definition supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Catalog id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// What the item does.
    pub effect: ItemEffect,
}

impl ItemDefinition {
    /// Create an item definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            effect,
        }
    }
}

/// Where an item is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemTarget {
    /// A single spot (the centre, for area items).
    Spot(SpotId),
    /// A copy from `source` onto `dest`.
    Copy {
        /// Spot being copied.
        source: SpotId,
        /// Spot receiving the copy.
        dest: SpotId,
    },
}

/// The centre spot followed by its neighbours on the table line,
/// nearest first: `c, c-1, c+1, c-2, c+2, ...`. Ids outside the table are skipped.
pub fn neighborhood(center: SpotId, radius: u8) -> Vec<SpotId> {
    let c = i16::from(center.get());
    let mut spots = vec![center];
    for step in 1..=i16::from(radius) {
        for n in [c - step, c + step] {
            if let Some(id) = u8::try_from(n).ok().and_then(|n| SpotId::new(n).ok()) {
                spots.push(id);
            }
        }
    }
    spots
}

/// What wakes a charm up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "snake_case")]
pub enum CharmTrigger {
    /// A spot's number was changed by a plus-number or copy effect.
    /// The charm appends a payout-multiply record with `factor` to that spot.
    NumberChanged {
        /// Factor of the appended record.
        factor: f64,
    },
}

/// A passive effect held for the whole game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charm {
    /// Display name, recorded as the origin of the records it appends.
    pub name: String,
    /// When the charm fires.
    pub trigger: CharmTrigger,
}

impl Charm {
    /// A charm that multiplies payout whenever a spot's number changes.
    pub fn on_number_changed(name: impl Into<String>, factor: f64) -> Self {
        Self {
            name: name.into(),
            trigger: CharmTrigger::NumberChanged { factor },
        }
    }
}
