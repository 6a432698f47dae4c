//! The game aggregate and its mutation entry points.
//!
//! [`GameState`] owns the 36 spots, the item inventory, held charms, and turn
//! bookkeeping. Every entry point validates its target, appends records, and
//! then recomputes the whole table. A rejected application leaves the state
//! untouched and triggers no recompute.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::bet::{self, Bet, Settlement};
use crate::config::EngineConfig;
use crate::draw;
use crate::effect::{Effect, EffectOrigin, EffectRecord};
use crate::error::{EngineError, EngineResult};
use crate::item::{
    Charm, CharmTrigger, ItemDefinition, ItemEffect, ItemId, ItemTarget, neighborhood,
};
use crate::recalc::{self, Distribution};
use crate::snapshot::TurnSnapshot;
use crate::spot::Spot;
use crate::table::{MAX_NUMBER, SpotId, SpotTable};

/// Per-target outcome of a multi-target payout effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiplyReport {
    /// Targets that received a record.
    pub applied: Vec<SpotId>,
    /// Targets that were skipped, with the reason.
    pub rejected: Vec<(SpotId, EngineError)>,
}

impl MultiplyReport {
    /// True if at least one target received a record.
    pub fn any_applied(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// The result of one spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinOutcome {
    /// The spot the ball landed in.
    pub winner: SpotId,
    /// The number that spot showed.
    pub winning_number: u8,
    /// Total chips returned.
    pub payout: f64,
    /// How every bet settled.
    pub settlement: Settlement,
}

/// Game-wide state: spots, inventory, charms, and turn counters.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    spots: Vec<Spot>,
    inventory: BTreeMap<ItemId, u32>,
    charms: Vec<Charm>,
    current_turn: u32,
    available_chip_value: u64,
    config: EngineConfig,
}

impl GameState {
    /// Start a game on a fresh table.
    ///
    /// Fails if the configuration does not pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::fresh(config))
    }

    /// Start a game with [`EngineConfig::default`].
    pub fn with_default_config() -> Self {
        Self::fresh(EngineConfig::default())
    }

    fn fresh(config: EngineConfig) -> Self {
        let mut state = Self {
            spots: SpotTable::standard().entries().iter().map(Spot::new).collect(),
            inventory: BTreeMap::new(),
            charms: Vec::new(),
            current_turn: 1,
            available_chip_value: 0,
            config,
        };
        state.recalculate_all();
        state
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// All spots in id order.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// One spot.
    pub fn spot(&self, id: SpotId) -> &Spot {
        &self.spots[id.index()]
    }

    fn spot_mut(&mut self, id: SpotId) -> &mut Spot {
        &mut self.spots[id.index()]
    }

    /// The current turn, starting at 1.
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    /// Chip value the controller reported as available.
    pub fn available_chip_value(&self) -> u64 {
        self.available_chip_value
    }

    /// Record the chip value available to the player.
    pub fn set_available_chip_value(&mut self, value: u64) {
        self.available_chip_value = value;
    }

    // -----------------------------------------------------------------------
    // Inventory & charms
    // -----------------------------------------------------------------------

    /// Add `count` units of an item.
    pub fn add_item(&mut self, id: ItemId, count: u32) {
        if count > 0 {
            *self.inventory.entry(id).or_insert(0) += count;
        }
    }

    /// Units of an item held.
    pub fn item_count(&self, id: &ItemId) -> u32 {
        self.inventory.get(id).copied().unwrap_or(0)
    }

    /// The whole inventory.
    pub fn inventory(&self) -> &BTreeMap<ItemId, u32> {
        &self.inventory
    }

    fn consume(&mut self, id: &ItemId) {
        if let Some(count) = self.inventory.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.inventory.remove(id);
            }
        }
    }

    /// Hold a charm for the rest of the game.
    pub fn add_charm(&mut self, charm: Charm) {
        self.charms.push(charm);
    }

    /// Held charms.
    pub fn charms(&self) -> &[Charm] {
        &self.charms
    }

    // -----------------------------------------------------------------------
    // Effect entry points
    // -----------------------------------------------------------------------

    /// Raise a spot's number by one.
    ///
    /// Fails if the spot is destroyed or already shows the table maximum.
    pub fn apply_plus_number(&mut self, target: SpotId) -> EngineResult<()> {
        self.plus_number(target, EffectOrigin::Direct)
    }

    /// Copy `source`'s identity and whole lineage onto `dest`.
    ///
    /// Fails if either spot is destroyed or both are the same spot.
    pub fn apply_copy_from(&mut self, source: SpotId, dest: SpotId) -> EngineResult<()> {
        self.copy_from(source, dest, EffectOrigin::Direct)
    }

    /// Append a payout-multiply record to every target.
    ///
    /// Destroyed targets are skipped and listed in the report; the rest still
    /// receive the record. A negative or non-finite factor rejects the call.
    pub fn apply_payout_multiply(
        &mut self,
        targets: &[SpotId],
        factor: f64,
    ) -> EngineResult<MultiplyReport> {
        self.payout_multiply(targets, factor, EffectOrigin::Direct)
    }

    /// Destroy a spot. Repeating it appends another record and changes nothing else.
    pub fn apply_destroy(&mut self, target: SpotId) {
        self.destroy(target, EffectOrigin::Direct);
    }

    /// Use one unit of an item from the inventory.
    ///
    /// The unit is consumed only if the effect was applied.
    pub fn use_item(&mut self, item: &ItemDefinition, target: ItemTarget) -> EngineResult<()> {
        if self.item_count(&item.id) == 0 {
            return Err(rejected(EngineError::ItemNotHeld(item.id.clone())));
        }
        let origin = EffectOrigin::Item(item.id.clone());

        match (item.effect, target) {
            (ItemEffect::PlusNumber, ItemTarget::Spot(spot)) => self.plus_number(spot, origin)?,
            (ItemEffect::Destroy, ItemTarget::Spot(spot)) => self.destroy(spot, origin),
            (ItemEffect::CopyFrom, ItemTarget::Copy { source, dest }) => {
                self.copy_from(source, dest, origin)?
            }
            (ItemEffect::PayoutMultiply { factor, radius }, ItemTarget::Spot(center)) => {
                let targets = neighborhood(center, radius);
                let report = self.payout_multiply(&targets, factor, origin)?;
                if !report.any_applied() {
                    return Err(rejected(EngineError::NoValidTargets(item.id.clone())));
                }
            }
            (ItemEffect::CopyFrom, ItemTarget::Spot(_)) => {
                return Err(rejected(EngineError::TargetMismatch {
                    item: item.id.clone(),
                    expected: "a source and a destination",
                }));
            }
            (_, ItemTarget::Copy { .. }) => {
                return Err(rejected(EngineError::TargetMismatch {
                    item: item.id.clone(),
                    expected: "a single spot",
                }));
            }
        }

        self.consume(&item.id);
        debug!(item = %item.id, remaining = self.item_count(&item.id), "item used");
        Ok(())
    }

    fn plus_number(&mut self, target: SpotId, origin: EffectOrigin) -> EngineResult<()> {
        let spot = self.spot(target);
        if spot.is_destroyed() {
            return Err(rejected(EngineError::SpotDestroyed(target)));
        }
        if spot.number() >= MAX_NUMBER {
            return Err(rejected(EngineError::AtMaximum(target)));
        }

        let number = (spot.number() + 1).min(MAX_NUMBER);
        let record = EffectRecord::new(Effect::PlusNumber { number }, spot.applied_over())
            .with_origin(origin);
        self.spot_mut(target).append(record);
        debug!(spot = %target, number, "plus_number applied");

        self.recalculate_all();
        self.fire_number_changed(target);
        Ok(())
    }

    fn copy_from(&mut self, source: SpotId, dest: SpotId, origin: EffectOrigin) -> EngineResult<()> {
        for id in [source, dest] {
            if self.spot(id).is_destroyed() {
                return Err(rejected(EngineError::SpotDestroyed(id)));
            }
        }
        if source == dest {
            return Err(rejected(EngineError::SelfCopy(source)));
        }

        let src = self.spot(source);
        let effect = Effect::CopyFrom {
            source,
            number: src.number(),
            color: src.color(),
        };
        let inherited = src.lineage().to_vec();
        let record = EffectRecord::new(effect, self.spot(dest).applied_over()).with_origin(origin);

        let dst = self.spot_mut(dest);
        dst.append(record);
        dst.extend_lineage(&inherited);
        debug!(
            source = %source,
            dest = %dest,
            inherited = inherited.len(),
            "copy_from applied"
        );

        self.recalculate_all();
        self.fire_number_changed(dest);
        Ok(())
    }

    fn payout_multiply(
        &mut self,
        targets: &[SpotId],
        factor: f64,
        origin: EffectOrigin,
    ) -> EngineResult<MultiplyReport> {
        if !(factor.is_finite() && factor >= 0.0) {
            return Err(rejected(EngineError::InvalidFactor(factor)));
        }

        let mut report = MultiplyReport::default();
        for &target in targets {
            let spot = self.spot(target);
            if spot.is_destroyed() {
                report
                    .rejected
                    .push((target, rejected(EngineError::SpotDestroyed(target))));
                continue;
            }
            let record =
                EffectRecord::payout_multiply(factor, spot.applied_over()).with_origin(origin.clone());
            self.spot_mut(target).append(record);
            report.applied.push(target);
        }

        if report.any_applied() {
            debug!(factor, applied = report.applied.len(), "payout_multiply applied");
            self.recalculate_all();
        }
        Ok(report)
    }

    fn destroy(&mut self, target: SpotId, origin: EffectOrigin) {
        let spot = self.spot_mut(target);
        let record = EffectRecord::new(Effect::DestroySpot, spot.applied_over()).with_origin(origin);
        spot.append(record);
        spot.mark_destroyed();
        debug!(spot = %target, "spot destroyed");
        self.recalculate_all();
    }

    /// Let every held charm react to a changed number on `target`.
    ///
    /// Must run after the change has been recomputed, so each record sees the
    /// identity it stacks on. Each firing appends a new record, so repeated
    /// changes compound without bound.
    fn fire_number_changed(&mut self, target: SpotId) {
        if self.charms.is_empty() {
            return;
        }
        let mut over = self.spot(target).applied_over();
        let records: Vec<EffectRecord> = self
            .charms
            .iter()
            .map(|charm| match charm.trigger {
                CharmTrigger::NumberChanged { factor } => {
                    let record = EffectRecord::payout_multiply(factor, over)
                        .with_origin(EffectOrigin::Charm(charm.name.clone()));
                    over.payout_multiplier *= factor;
                    record
                }
            })
            .collect();

        let spot = self.spot_mut(target);
        for record in records {
            spot.append(record);
        }
        let compounded: f64 = spot
            .lineage()
            .iter()
            .filter(|r| matches!(r.origin(), EffectOrigin::Charm(_)))
            .map(EffectRecord::multiplier_contribution)
            .product();
        debug!(spot = %target, compounded, "charm multiplier compounded");
        self.recalculate_all();
    }

    // -----------------------------------------------------------------------
    // Recompute, draw, payout
    // -----------------------------------------------------------------------

    /// Rebuild every derived spot field from the lineages.
    pub fn recalculate_all(&mut self) -> Distribution {
        recalc::recalculate_all(&mut self.spots, &self.config)
    }

    /// Draw a winner from a distribution returned by [`Self::recalculate_all`].
    pub fn determine_winner(
        &self,
        distribution: &Distribution,
        rng: &mut StdRng,
    ) -> EngineResult<SpotId> {
        draw::determine_winner(distribution, rng)
    }

    /// Settle bets against the winning spot, bet by bet.
    pub fn settle_bets(&self, winner: SpotId, bets: &[Bet]) -> EngineResult<Settlement> {
        bet::settle_bets(self.spot(winner), bets)
    }

    /// Total chips returned for `bets` against the winning spot.
    pub fn calculate_total_payout(&self, winner: SpotId, bets: &[Bet]) -> EngineResult<f64> {
        bet::calculate_total_payout(self.spot(winner), bets)
    }

    /// Recompute, draw a winner, and settle `bets`.
    pub fn spin(&mut self, rng: &mut StdRng, bets: &[Bet]) -> EngineResult<SpinOutcome> {
        for bet in bets {
            bet.validate()?;
        }
        let distribution = self.recalculate_all();
        let winner = self.determine_winner(&distribution, rng)?;
        let settlement = self.settle_bets(winner, bets)?;
        debug!(
            spot = %winner,
            stake = settlement.total_stake,
            payout = settlement.total_payout,
            "spin settled"
        );
        Ok(SpinOutcome {
            winner,
            winning_number: self.spot(winner).number(),
            payout: settlement.total_payout,
            settlement,
        })
    }

    // -----------------------------------------------------------------------
    // Turns & resets
    // -----------------------------------------------------------------------

    /// Re-derive identity for a new turn. Lineages and destroyed flags stay.
    pub fn reset_spots_for_new_turn(&mut self) -> Distribution {
        self.recalculate_all()
    }

    /// Return every spot to its table default, clearing lineages and destroyed flags.
    pub fn reset_all_spots(&mut self) -> Distribution {
        let table = SpotTable::standard();
        for spot in self.spots.iter_mut() {
            let entry = table.entry(spot.id());
            spot.reset(entry);
        }
        self.recalculate_all()
    }

    /// Snapshot the finished turn, then move to the next one.
    pub fn advance_turn(&mut self) -> TurnSnapshot {
        let finished = self.snapshot();
        self.current_turn += 1;
        self.reset_spots_for_new_turn();
        finished
    }

    /// Start over: fresh spots, turn 1, empty inventory. Charms and chips stay.
    pub fn new_game(&mut self) {
        self.reset_all_spots();
        self.inventory.clear();
        self.current_turn = 1;
    }

    /// Read-only copy of every spot for the current turn.
    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot::capture(self.current_turn, &self.spots)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_default_config()
    }
}

fn rejected(err: EngineError) -> EngineError {
    warn!(%err, "effect rejected");
    err
}
