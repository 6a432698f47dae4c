//! Identity replay: fold a lineage over the table defaults.

use crate::effect::{Effect, EffectRecord};
use crate::spot::{Identity, Spot};
use crate::table::{SpotTable, SpotTableEntry};

/// Rebuild a spot's identity from its table entry and lineage.
///
/// Numbers are absolute, so the last number-setting record wins.
pub(crate) fn replay(entry: &SpotTableEntry, lineage: &[EffectRecord]) -> Identity {
    let start = Identity {
        number: entry.number(),
        color: entry.color,
        destroyed: false,
    };
    lineage
        .iter()
        .fold(start, |mut identity, record| {
            match *record.effect() {
                Effect::PlusNumber { number } => identity.number = number,
                Effect::CopyFrom { number, color, .. } => {
                    identity.number = number;
                    identity.color = color;
                }
                Effect::DestroySpot => identity.destroyed = true,
                Effect::PayoutMultiply => {}
            }
            identity
        })
}

/// Replay every spot in place.
pub(crate) fn replay_all(spots: &mut [Spot]) {
    let table = SpotTable::standard();
    for spot in spots.iter_mut() {
        let identity = replay(table.entry(spot.id()), spot.lineage());
        spot.set_identity(identity);
    }
}
