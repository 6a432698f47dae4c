//! Property tests over random effect sequences.
//!
//! Each case builds a fresh game, applies a random list of actions (some of
//! which are rejected), and checks the invariants that must hold after every
//! recompute.

use std::collections::BTreeMap;

use proptest::prelude::*;
use pw_engine::{Action, EngineError, GameState, Spot, SpotId};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn spot_id() -> impl Strategy<Value = SpotId> {
    (1u8..=36).prop_map(|n| SpotId::new(n).unwrap())
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => spot_id().prop_map(|spot| Action::PlusNumber { spot }),
        3 => (spot_id(), spot_id()).prop_map(|(source, dest)| Action::CopyFrom { source, dest }),
        2 => (prop::collection::vec(spot_id(), 1..4), 0.5f64..3.0)
            .prop_map(|(spots, factor)| Action::PayoutMultiply { spots, factor }),
        1 => spot_id().prop_map(|spot| Action::Destroy { spot }),
    ]
}

fn apply(state: &mut GameState, action: &Action) -> Result<(), EngineError> {
    match action {
        Action::PlusNumber { spot } => state.apply_plus_number(*spot),
        Action::CopyFrom { source, dest } => state.apply_copy_from(*source, *dest),
        Action::PayoutMultiply { spots, factor } => {
            state.apply_payout_multiply(spots, *factor).map(|_| ())
        }
        Action::Destroy { spot } => {
            state.apply_destroy(*spot);
            Ok(())
        }
        Action::UseItem { .. } | Action::NewTurn => Ok(()),
    }
}

fn play(actions: &[Action]) -> GameState {
    let mut state = GameState::default();
    for action in actions {
        let _ = apply(&mut state, action);
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Active probabilities sum to one; destroyed spots carry nothing.
    #[test]
    fn prop_probabilities_normalized(actions in prop::collection::vec(action(), 0..40)) {
        let state = play(&actions);
        let active = state.spots().iter().filter(|s| s.is_active()).count();
        let sum: f64 = state.spots().iter().map(Spot::probability).sum();

        if active > 0 {
            prop_assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
        } else {
            prop_assert_eq!(sum, 0.0);
        }
        for spot in state.spots() {
            prop_assert!(spot.probability() >= 0.0);
        }
    }

    /// Spots showing the same number split its mass evenly.
    #[test]
    fn prop_shared_numbers_split_equally(actions in prop::collection::vec(action(), 0..40)) {
        let state = play(&actions);
        let active = state.spots().iter().filter(|s| s.is_active()).count();
        prop_assume!(active > 0);

        let mut by_number: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
        for spot in state.spots().iter().filter(|s| s.is_active()) {
            by_number.entry(spot.number()).or_default().push(spot.probability());
        }
        for (number, probs) in by_number {
            let expected = 1.0 / active as f64;
            for p in &probs {
                prop_assert!((p - expected).abs() < 1e-9, "number {} holder had {}", number, p);
            }
        }
    }

    /// Destroyed spots have zero probability, zero payout, and never win.
    #[test]
    fn prop_destroyed_spots_excluded(
        actions in prop::collection::vec(action(), 0..40),
        seed in any::<u64>(),
    ) {
        let mut state = play(&actions);
        for spot in state.spots().iter().filter(|s| s.is_destroyed()) {
            prop_assert_eq!(spot.probability(), 0.0);
            prop_assert_eq!(spot.payout_multiplier(), 0.0);
        }

        let distribution = state.recalculate_all();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            match state.determine_winner(&distribution, &mut rng) {
                Ok(winner) => prop_assert!(state.spot(winner).is_active()),
                Err(err) => {
                    prop_assert_eq!(err, EngineError::DegenerateDistribution);
                    prop_assert!(state.spots().iter().all(Spot::is_destroyed));
                }
            }
        }
    }

    /// Recomputing without new records changes nothing.
    #[test]
    fn prop_recalculation_idempotent(actions in prop::collection::vec(action(), 0..40)) {
        let mut state = play(&actions);
        let before = state.clone();
        state.recalculate_all();
        prop_assert_eq!(&state, &before);
        state.reset_spots_for_new_turn();
        prop_assert_eq!(&state, &before);
    }

    /// A rejected action leaves the state untouched.
    #[test]
    fn prop_rejections_do_not_mutate(
        actions in prop::collection::vec(action(), 0..40),
        next in action(),
    ) {
        let mut state = play(&actions);
        let before = state.clone();
        if apply(&mut state, &next).is_err() {
            prop_assert_eq!(&state, &before);
        }
    }

    /// A copied spot shows its source's identity and carries its whole lineage.
    #[test]
    fn prop_copy_transfers_lineage(
        actions in prop::collection::vec(action(), 0..40),
        source in spot_id(),
        dest in spot_id(),
    ) {
        let mut state = play(&actions);
        prop_assume!(source != dest);
        prop_assume!(state.spot(source).is_active() && state.spot(dest).is_active());

        let inherited: Vec<_> = state.spot(source).lineage().iter().map(|r| r.id()).collect();
        state.apply_copy_from(source, dest).unwrap();

        let (src, dst) = (state.spot(source), state.spot(dest));
        prop_assert_eq!(dst.number(), src.number());
        prop_assert_eq!(dst.color(), src.color());
        prop_assert!((dst.probability() - src.probability()).abs() < 1e-12);

        let dest_ids: Vec<_> = dst.lineage().iter().map(|r| r.id()).collect();
        for id in inherited {
            prop_assert!(dest_ids.contains(&id));
        }
    }
}
