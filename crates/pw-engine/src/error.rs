//! Error types for the outcome engine.

use crate::item::ItemId;
use crate::table::SpotId;

/// Errors that can occur while mutating spots or resolving a spin.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A raw spot id outside `1..=36` was supplied.
    #[error("unknown spot: {0}")]
    UnknownSpot(u8),

    /// The target spot has been destroyed and accepts no further effects.
    #[error("spot {0} is destroyed")]
    SpotDestroyed(SpotId),

    /// The target spot already shows the highest table number.
    #[error("spot {0} is already at the maximum number")]
    AtMaximum(SpotId),

    /// A spot was asked to copy itself.
    #[error("spot {0} cannot copy itself")]
    SelfCopy(SpotId),

    /// Every spot is destroyed, so no winner can be drawn.
    #[error("degenerate distribution: every spot is destroyed")]
    DegenerateDistribution,

    /// The item is not present in the inventory.
    #[error("item '{0}' is not in the inventory")]
    ItemNotHeld(ItemId),

    /// The item was used with a target of the wrong shape.
    #[error("item '{item}' expects {expected}")]
    TargetMismatch {
        /// The item that was used.
        item: ItemId,
        /// Human-readable description of the expected target.
        expected: &'static str,
    },

    /// None of the targets of a multi-target item accepted the effect.
    #[error("item '{0}' had no valid targets")]
    NoValidTargets(ItemId),

    /// A payout factor was negative or not finite.
    #[error("invalid payout factor: {0}")]
    InvalidFactor(f64),

    /// A bet is malformed.
    #[error("invalid bet: {0}")]
    InvalidBet(String),

    /// A scenario or configuration could not be loaded.
    #[error("scenario error: {0}")]
    Scenario(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
