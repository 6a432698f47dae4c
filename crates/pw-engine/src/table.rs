//! The static spot table.
//!
//! Every pocket has a fixed classification (color, parity, half, dozen,
//! column) that is a pure function of its id. The table is built once and
//! shared; spot state that changes during a game lives in [`crate::spot`].

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Lowest spot id and lowest displayable number.
pub const MIN_NUMBER: u8 = 1;
/// Highest spot id and highest displayable number.
pub const MAX_NUMBER: u8 = 36;
/// Number of spots on the table.
pub const SPOT_COUNT: usize = MAX_NUMBER as usize;
/// Straight-up payout factor of an unmodified spot.
pub const BASE_PAYOUT: f64 = 36.0;

const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

static STANDARD: LazyLock<SpotTable> = LazyLock::new(SpotTable::build);

/// Identifier of a physical spot, always within `1..=36`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpotId(u8);

impl SpotId {
    /// Validate a raw id.
    pub fn new(id: u8) -> EngineResult<Self> {
        if (MIN_NUMBER..=MAX_NUMBER).contains(&id) {
            Ok(Self(id))
        } else {
            Err(EngineError::UnknownSpot(id))
        }
    }

    /// The raw id.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Iterate every spot id in table order.
    pub fn all() -> impl Iterator<Item = SpotId> {
        (MIN_NUMBER..=MAX_NUMBER).map(SpotId)
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - MIN_NUMBER)
    }
}

impl TryFrom<u8> for SpotId {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpotId> for u8 {
    fn from(id: SpotId) -> Self {
        id.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pocket color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotColor {
    /// A red pocket.
    Red,
    /// A black pocket.
    Black,
}

impl SpotColor {
    /// The color a number has on an unmodified table.
    pub fn of_number(number: u8) -> Self {
        if RED_NUMBERS.contains(&number) {
            Self::Red
        } else {
            Self::Black
        }
    }
}

impl fmt::Display for SpotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// Fixed classification of one spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotTableEntry {
    /// The spot this entry describes.
    pub id: SpotId,
    /// Printed color.
    pub color: SpotColor,
    /// True for odd ids.
    pub is_odd: bool,
    /// True for ids 19..=36.
    pub is_high: bool,
    /// Dozen group, 1..=3.
    pub dozen: u8,
    /// Column group, 1..=3.
    pub column: u8,
    /// Straight-up payout factor before any effect.
    pub base_payout: f64,
}

impl SpotTableEntry {
    fn classify(id: SpotId) -> Self {
        let n = id.get();
        Self {
            id,
            color: SpotColor::of_number(n),
            is_odd: n % 2 == 1,
            is_high: n >= 19,
            dozen: (n - 1) / 12 + 1,
            column: (n - 1) % 3 + 1,
            base_payout: BASE_PAYOUT,
        }
    }

    /// The number this spot shows when no effect has touched it.
    pub fn number(&self) -> u8 {
        self.id.get()
    }
}

/// The full, immutable table of 36 entries.
#[derive(Debug)]
pub struct SpotTable {
    entries: Vec<SpotTableEntry>,
}

impl SpotTable {
    /// The shared standard table.
    pub fn standard() -> &'static SpotTable {
        &STANDARD
    }

    fn build() -> Self {
        Self {
            entries: SpotId::all().map(SpotTableEntry::classify).collect(),
        }
    }

    /// Look up the entry for a spot.
    pub fn entry(&self, id: SpotId) -> &SpotTableEntry {
        &self.entries[id.index()]
    }

    /// Classification of a displayed number.
    ///
    /// Bets on parity, halves, dozens, and columns are judged against the
    /// number a spot currently shows, which may differ from its id.
    pub fn classify_number(&self, number: u8) -> EngineResult<&SpotTableEntry> {
        SpotId::new(number).map(|id| self.entry(id))
    }

    /// All entries in id order.
    pub fn entries(&self) -> &[SpotTableEntry] {
        &self.entries
    }
}
