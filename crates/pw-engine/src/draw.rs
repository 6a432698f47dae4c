//! Weighted winner selection.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, error};

use crate::error::{EngineError, EngineResult};
use crate::recalc::Distribution;
use crate::table::SpotId;

/// Draw the winning spot from a distribution.
///
/// One uniform draw picks a number by cumulative probability; a second picks
/// uniformly among the active spots that show it.
pub fn determine_winner(distribution: &Distribution, rng: &mut StdRng) -> EngineResult<SpotId> {
    if distribution.is_degenerate() {
        error!("cannot draw a winner from a degenerate distribution");
        return Err(EngineError::DegenerateDistribution);
    }

    let r: f64 = rng.random();
    let number = select_number(&distribution.cumulative(), r)
        .ok_or(EngineError::DegenerateDistribution)?;
    let winner = distribution
        .holders(number)
        .choose(rng)
        .copied()
        .ok_or(EngineError::DegenerateDistribution)?;

    debug!(r, number, spot = %winner, "winner drawn");
    Ok(winner)
}

/// First number whose cumulative probability reaches `r`.
///
/// Rounding can leave the final cumulative value a hair below 1; a draw past
/// it lands on the last number.
fn select_number(cumulative: &[(u8, f64)], r: f64) -> Option<u8> {
    cumulative
        .iter()
        .find(|(_, c)| *c >= r)
        .or_else(|| cumulative.last())
        .map(|(number, _)| *number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::config::EngineConfig;
    use crate::effect::{Effect, EffectRecord};
    use crate::recalc::recalculate_all;
    use crate::spot::Spot;
    use crate::table::{MAX_NUMBER, SpotColor, SpotTable};

    fn fresh() -> Vec<Spot> {
        SpotTable::standard().entries().iter().map(Spot::new).collect()
    }

    #[test]
    fn select_number_boundaries() {
        let cumulative = vec![(1, 0.25), (2, 0.5), (7, 0.999_999_9)];
        assert_eq!(select_number(&cumulative, 0.0), Some(1));
        assert_eq!(select_number(&cumulative, 0.25), Some(1));
        assert_eq!(select_number(&cumulative, 0.3), Some(2));
        assert_eq!(select_number(&cumulative, 0.9), Some(7));
        assert_eq!(select_number(&cumulative, 0.999_999_99), Some(7));
        assert_eq!(select_number(&[], 0.5), None);
    }

    #[test]
    fn fresh_table_draws_uniformly() {
        let mut spots = fresh();
        let dist = recalculate_all(&mut spots, &EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(42);

        let draws = 100_000;
        let mut counts = [0u32; MAX_NUMBER as usize];
        for _ in 0..draws {
            let winner = determine_winner(&dist, &mut rng).unwrap();
            counts[usize::from(winner.get()) - 1] += 1;
        }

        let expected = 1.0 / 36.0;
        for (i, &count) in counts.iter().enumerate() {
            let observed = f64::from(count) / f64::from(draws);
            assert!(
                (observed - expected).abs() < 0.004,
                "number {} drawn with frequency {observed}",
                i + 1
            );
        }
    }

    #[test]
    fn shared_number_picks_among_holders() {
        let mut spots = fresh();
        // Every spot copies spot 1, so only number 1 remains.
        for spot in spots.iter_mut().skip(1) {
            let over = spot.applied_over();
            spot.append(EffectRecord::new(
                Effect::CopyFrom {
                    source: SpotId::new(1).unwrap(),
                    number: 1,
                    color: SpotColor::Red,
                },
                over,
            ));
        }
        let dist = recalculate_all(&mut spots, &EngineConfig::default());
        assert_eq!(dist.numbers().len(), 1);

        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(determine_winner(&dist, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 36);
    }

    #[test]
    fn destroyed_spots_never_win() {
        let mut spots = fresh();
        for spot in spots.iter_mut().take(35) {
            let over = spot.applied_over();
            spot.append(EffectRecord::new(Effect::DestroySpot, over));
        }
        let dist = recalculate_all(&mut spots, &EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(determine_winner(&dist, &mut rng).unwrap().get(), 36);
        }
    }

    #[test]
    fn degenerate_distribution_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            determine_winner(&Distribution::default(), &mut rng),
            Err(EngineError::DegenerateDistribution)
        );
    }
}
