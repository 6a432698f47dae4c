//! Payout multiplier composition.

use crate::effect::EffectRecord;
use crate::spot::Spot;

/// Multiply the base payout by every record's contribution.
///
/// Records other than payout-multiply carry 1.0, so the fold is uniform.
pub(crate) fn compose(base: f64, lineage: &[EffectRecord]) -> f64 {
    lineage
        .iter()
        .map(EffectRecord::multiplier_contribution)
        .fold(base, |acc, factor| acc * factor)
}

/// Set every spot's multiplier. Destroyed spots pay nothing.
pub(crate) fn compose_all(spots: &mut [Spot], base: f64) {
    for spot in spots.iter_mut() {
        let multiplier = if spot.is_destroyed() {
            0.0
        } else {
            compose(base, spot.lineage())
        };
        spot.set_payout_multiplier(multiplier);
    }
}
