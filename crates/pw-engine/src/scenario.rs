//! Scripted action sequences loaded from JSON.
//!
//! A scenario bundles a configuration, held charms, an item catalog, a
//! starting inventory, and an ordered list of actions. Applying it never
//! stops at a rejection; every action gets its own [`ActionReport`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::item::{Charm, ItemDefinition, ItemId, ItemTarget};
use crate::state::GameState;
use crate::table::SpotId;

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Raise a spot's number by one.
    PlusNumber {
        /// Target spot.
        spot: SpotId,
    },
    /// Copy one spot onto another.
    CopyFrom {
        /// Spot being copied.
        source: SpotId,
        /// Spot receiving the copy.
        dest: SpotId,
    },
    /// Multiply the payout of several spots.
    PayoutMultiply {
        /// Target spots.
        spots: Vec<SpotId>,
        /// Factor applied to each.
        factor: f64,
    },
    /// Destroy a spot.
    Destroy {
        /// Target spot.
        spot: SpotId,
    },
    /// Use an item from the inventory.
    UseItem {
        /// Catalog id of the item.
        item: ItemId,
        /// Where the item is aimed.
        target: ItemTarget,
    },
    /// Finish the turn and start the next one.
    NewTurn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlusNumber { spot } => write!(f, "plus_number {spot}"),
            Self::CopyFrom { source, dest } => write!(f, "copy_from {source} -> {dest}"),
            Self::PayoutMultiply { spots, factor } => {
                let list: Vec<String> = spots.iter().map(ToString::to_string).collect();
                write!(f, "payout_multiply x{factor} [{}]", list.join(", "))
            }
            Self::Destroy { spot } => write!(f, "destroy {spot}"),
            Self::UseItem { item, target } => match target {
                ItemTarget::Spot(spot) => write!(f, "use_item {item} on {spot}"),
                ItemTarget::Copy { source, dest } => {
                    write!(f, "use_item {item} on {source} -> {dest}")
                }
            },
            Self::NewTurn => write!(f, "new_turn"),
        }
    }
}

/// Outcome of one action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    /// Position in the action list, starting at 0.
    pub index: usize,
    /// Human-readable form of the action.
    pub description: String,
    /// Why the action was rejected, if it was.
    pub error: Option<EngineError>,
}

impl ActionReport {
    /// True if the action took effect.
    pub fn is_applied(&self) -> bool {
        self.error.is_none()
    }
}

/// A scripted game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Engine configuration.
    pub config: EngineConfig,
    /// Charms held from the start.
    pub charms: Vec<Charm>,
    /// Item definitions `use_item` actions refer to.
    pub items: Vec<ItemDefinition>,
    /// Starting inventory by item id.
    pub inventory: BTreeMap<ItemId, u32>,
    /// Steps to run, in order.
    pub actions: Vec<Action>,
}

impl Scenario {
    /// Parse a scenario from JSON text.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let scenario: Self = serde_json::from_str(text)
            .map_err(|e| EngineError::Scenario(format!("invalid scenario JSON: {e}")))?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Scenario(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// A fresh game with this scenario's config, charms, and inventory.
    pub fn build_state(&self) -> EngineResult<GameState> {
        let mut state = GameState::new(self.config.clone())?;
        for charm in &self.charms {
            state.add_charm(charm.clone());
        }
        for (id, &count) in &self.inventory {
            state.add_item(id.clone(), count);
        }
        Ok(state)
    }

    /// Look up an item definition in the catalog.
    pub fn item(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Run every action against `state`.
    pub fn apply(&self, state: &mut GameState) -> Vec<ActionReport> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| {
                let error = self.apply_action(state, action).err();
                debug!(index, action = %action, applied = error.is_none(), "scenario step");
                ActionReport {
                    index,
                    description: action.to_string(),
                    error,
                }
            })
            .collect()
    }

    /// Build a fresh state and run every action against it.
    pub fn run(&self) -> EngineResult<(GameState, Vec<ActionReport>)> {
        let mut state = self.build_state()?;
        let reports = self.apply(&mut state);
        Ok((state, reports))
    }

    fn apply_action(&self, state: &mut GameState, action: &Action) -> EngineResult<()> {
        match action {
            Action::PlusNumber { spot } => state.apply_plus_number(*spot),
            Action::CopyFrom { source, dest } => state.apply_copy_from(*source, *dest),
            Action::PayoutMultiply { spots, factor } => {
                let report = state.apply_payout_multiply(spots, *factor)?;
                match report.rejected.into_iter().next() {
                    Some((_, err)) => Err(err),
                    None => Ok(()),
                }
            }
            Action::Destroy { spot } => {
                state.apply_destroy(*spot);
                Ok(())
            }
            Action::UseItem { item, target } => {
                let definition = self
                    .item(item)
                    .ok_or_else(|| EngineError::Scenario(format!("unknown item '{item}'")))?;
                state.use_item(definition, *target)
            }
            Action::NewTurn => {
                state.advance_turn();
                Ok(())
            }
        }
    }
}
