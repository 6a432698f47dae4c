//! Outcome engine for a roulette table whose pockets can be rewritten.
//!
//! Items and charms append effect records to spots. Every derived value
//! (displayed number, colour, destroyed state, win probability, payout
//! multiplier) is rebuilt by replaying those lineages, so a copied spot
//! stays in lockstep with its source and a destroyed spot never wins.
//! [`GameState`] is the entry point; [`Scenario`] scripts it from JSON.

pub mod bet;
pub mod config;
pub mod draw;
pub mod effect;
pub mod error;
pub mod item;
pub mod recalc;
pub mod scenario;
pub mod snapshot;
pub mod spot;
pub mod state;
pub mod table;

pub use bet::{Bet, BetKind, BetSettlement, Settlement, calculate_total_payout, settle_bets};
pub use config::EngineConfig;
pub use draw::determine_winner;
pub use effect::{AppliedOver, Effect, EffectId, EffectOrigin, EffectRecord};
pub use error::{EngineError, EngineResult};
pub use item::{Charm, CharmTrigger, ItemDefinition, ItemEffect, ItemId, ItemTarget};
pub use recalc::{Distribution, recalculate_all};
pub use scenario::{Action, ActionReport, Scenario};
pub use snapshot::{SpotSnapshot, TurnSnapshot};
pub use spot::Spot;
pub use state::{GameState, MultiplyReport, SpinOutcome};
pub use table::{SpotColor, SpotId, SpotTable, SpotTableEntry};
