//! Full recompute of every spot.
//!
//! Runs in three passes over the whole spot set:
//! - **Replay**: fold each lineage over the table defaults
//! - **Probability**: weight active spots, aggregate per number, split shared mass
//! - **Payout**: compose each spot's multiplier from its lineage
//!
//! There is no dirty tracking. Every call touches all 36 spots and yields the
//! same result when no record was appended in between.

mod payout;
mod probability;
mod replay;

pub use probability::Distribution;

use tracing::debug;

use crate::config::EngineConfig;
use crate::spot::Spot;

/// Rebuild all derived spot fields and return the resulting distribution.
pub fn recalculate_all(spots: &mut [Spot], config: &EngineConfig) -> Distribution {
    replay::replay_all(spots);
    let distribution = probability::distribute(spots, config);
    payout::compose_all(spots, config.base_payout);
    debug!(
        active = spots.iter().filter(|s| s.is_active()).count(),
        numbers = distribution.numbers().len(),
        "spots recalculated"
    );
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Effect, EffectRecord};
    use crate::table::{SpotColor, SpotId, SpotTable};

    fn fresh() -> Vec<Spot> {
        SpotTable::standard().entries().iter().map(Spot::new).collect()
    }

    fn id(n: u8) -> SpotId {
        SpotId::new(n).unwrap()
    }

    fn spot_mut(spots: &mut [Spot], n: u8) -> &mut Spot {
        &mut spots[usize::from(n) - 1]
    }

    fn push(spots: &mut [Spot], n: u8, effect: Effect) {
        let spot = spot_mut(spots, n);
        let over = spot.applied_over();
        spot.append(EffectRecord::new(effect, over));
    }

    fn total(spots: &[Spot]) -> f64 {
        spots.iter().map(Spot::probability).sum()
    }

    #[test]
    fn fresh_table_sums_to_one() {
        let mut spots = fresh();
        let dist = recalculate_all(&mut spots, &EngineConfig::default());
        assert!((total(&spots) - 1.0).abs() < 1e-4);
        assert!(!dist.is_degenerate());
    }

    #[test]
    fn shared_number_splits_mass() {
        let mut spots = fresh();
        push(
            &mut spots,
            1,
            Effect::CopyFrom {
                source: id(2),
                number: 2,
                color: SpotColor::Black,
            },
        );
        let dist = recalculate_all(&mut spots, &EngineConfig::default());

        assert_eq!(dist.holders(2), &[id(1), id(2)]);
        assert_eq!(dist.number_probability(1), 0.0);
        assert!((dist.number_probability(2) - 2.0 / 36.0).abs() < 1e-12);
        assert!((spots[0].probability() - spots[1].probability()).abs() < 1e-12);
        assert!((spots[0].probability() - 1.0 / 36.0).abs() < 1e-12);
        assert!((total(&spots) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn payout_multiply_does_not_move_probability() {
        let mut spots = fresh();
        let config = EngineConfig::default();
        recalculate_all(&mut spots, &config);
        let before: Vec<f64> = spots.iter().map(Spot::probability).collect();

        for n in [10, 9, 11] {
            let spot = spot_mut(&mut spots, n);
            let over = spot.applied_over();
            spot.append(EffectRecord::payout_multiply(1.2, over));
        }
        recalculate_all(&mut spots, &config);

        for n in [10u8, 9, 11] {
            let spot = &spots[usize::from(n) - 1];
            assert!((spot.payout_multiplier() - 36.0 * 1.2).abs() < 1e-9);
        }
        let after: Vec<f64> = spots.iter().map(Spot::probability).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn destroying_sole_holder_removes_number() {
        let mut spots = fresh();
        push(&mut spots, 17, Effect::DestroySpot);
        let dist = recalculate_all(&mut spots, &EngineConfig::default());

        let destroyed = &spots[16];
        assert!(destroyed.is_destroyed());
        assert_eq!(destroyed.probability(), 0.0);
        assert_eq!(destroyed.payout_multiplier(), 0.0);
        assert!(!dist.numbers().contains_key(&17));
        assert_eq!(dist.numbers().len(), 35);
        assert!((spots[0].probability() - 1.0 / 35.0).abs() < 1e-12);
        assert!((total(&spots) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let mut spots = fresh();
        push(&mut spots, 5, Effect::PlusNumber { number: 6 });
        push(&mut spots, 20, Effect::DestroySpot);
        push(
            &mut spots,
            30,
            Effect::CopyFrom {
                source: id(6),
                number: 6,
                color: SpotColor::Black,
            },
        );
        let config = EngineConfig::default();
        let first = recalculate_all(&mut spots, &config);
        let snapshot = spots.clone();
        let second = recalculate_all(&mut spots, &config);
        assert_eq!(first, second);
        assert_eq!(snapshot, spots);
    }

    #[test]
    fn plus_number_replays_last_write() {
        let mut spots = fresh();
        push(&mut spots, 5, Effect::PlusNumber { number: 6 });
        push(&mut spots, 5, Effect::PlusNumber { number: 6 });
        recalculate_all(&mut spots, &EngineConfig::default());
        assert_eq!(spots[4].number(), 6);
    }

    #[test]
    fn all_destroyed_zeroes_everything() {
        let mut spots = fresh();
        for n in 1..=36 {
            push(&mut spots, n, Effect::DestroySpot);
        }
        let dist = recalculate_all(&mut spots, &EngineConfig::default());
        assert!(dist.is_degenerate());
        assert!(spots
            .iter()
            .all(|s| s.probability() == 0.0 && s.payout_multiplier() == 0.0));
    }
}
