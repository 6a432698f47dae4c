//! Bets and payout settlement.
//!
//! Win predicates read the winning spot's *current* number and color, not
//! its table entry. A straight-up win pays the spot's live multiplier; group
//! bets pay fixed multiples.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::spot::Spot;
use crate::table::{MAX_NUMBER, MIN_NUMBER, SpotColor, SpotTable};

/// Multiplier for red/black, odd/even, and low/high bets.
pub const EVEN_MONEY_MULTIPLIER: f64 = 2.0;
/// Multiplier for dozen and column bets.
pub const GROUP_MULTIPLIER: f64 = 3.0;
/// Share of the stake returned by a losing consolation bet.
pub const CONSOLATION_RATE: f64 = 0.5;

/// What a bet covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BetKind {
    /// A single number.
    Straight(u8),
    /// Any red spot.
    Red,
    /// Any black spot.
    Black,
    /// Any odd number.
    Odd,
    /// Any even number.
    Even,
    /// Numbers 1..=18.
    Low,
    /// Numbers 19..=36.
    High,
    /// Dozen group 1..=3.
    Dozen(u8),
    /// Column group 1..=3.
    Column(u8),
}

impl BetKind {
    /// Whether this bet wins against the spot as it currently looks.
    pub fn wins(&self, winner: &Spot) -> bool {
        let Ok(class) = SpotTable::standard().classify_number(winner.number()) else {
            return false;
        };
        match *self {
            Self::Straight(n) => winner.number() == n,
            Self::Red => winner.color() == SpotColor::Red,
            Self::Black => winner.color() == SpotColor::Black,
            Self::Odd => class.is_odd,
            Self::Even => !class.is_odd,
            Self::Low => !class.is_high,
            Self::High => class.is_high,
            Self::Dozen(d) => class.dozen == d,
            Self::Column(c) => class.column == c,
        }
    }

    /// Multiplier paid on a win against `winner`.
    pub fn win_multiplier(&self, winner: &Spot) -> f64 {
        match self {
            Self::Straight(_) => winner.payout_multiplier(),
            Self::Red | Self::Black | Self::Odd | Self::Even | Self::Low | Self::High => {
                EVEN_MONEY_MULTIPLIER
            }
            Self::Dozen(_) | Self::Column(_) => GROUP_MULTIPLIER,
        }
    }

    fn validate(&self) -> EngineResult<()> {
        match *self {
            Self::Straight(n) if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) => Err(
                EngineError::InvalidBet(format!("straight number {n} is outside 1..=36")),
            ),
            Self::Dozen(g) | Self::Column(g) if !(1..=3).contains(&g) => Err(
                EngineError::InvalidBet(format!("group {g} is outside 1..=3")),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight(n) => write!(f, "straight {n}"),
            Self::Red => write!(f, "red"),
            Self::Black => write!(f, "black"),
            Self::Odd => write!(f, "odd"),
            Self::Even => write!(f, "even"),
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
            Self::Dozen(g) => write!(f, "dozen {g}"),
            Self::Column(g) => write!(f, "column {g}"),
        }
    }
}

/// A placed bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    /// What the bet covers.
    pub kind: BetKind,
    /// Stake in chips.
    pub amount: u64,
    /// Returns part of the stake on a loss.
    #[serde(default)]
    pub consolation: bool,
}

impl Bet {
    /// Create a plain bet.
    pub fn new(kind: BetKind, amount: u64) -> Self {
        Self {
            kind,
            amount,
            consolation: false,
        }
    }

    /// Mark the bet as a consolation bet.
    pub fn with_consolation(mut self) -> Self {
        self.consolation = true;
        self
    }

    /// Check the bet's target and stake.
    pub fn validate(&self) -> EngineResult<()> {
        if self.amount == 0 {
            return Err(EngineError::InvalidBet("stake must be positive".to_string()));
        }
        self.kind.validate()
    }
}

impl FromStr for Bet {
    type Err = EngineError;

    /// Parse `kind[:value]:amount[:consolation]`, e.g. `straight:17:10`,
    /// `red:5`, or `dozen:2:10:consolation`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |msg: &str| EngineError::InvalidBet(format!("'{s}': {msg}"));
        let mut parts = s.split(':').map(str::trim);
        let kind_str = parts.next().unwrap_or_default().to_lowercase();

        let mut group = |name: &str| -> Result<u8, EngineError> {
            parts
                .next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| invalid(&format!("{name} needs a numeric value")))
        };
        let kind = match kind_str.as_str() {
            "straight" => BetKind::Straight(group("straight")?),
            "dozen" => BetKind::Dozen(group("dozen")?),
            "column" => BetKind::Column(group("column")?),
            "red" => BetKind::Red,
            "black" => BetKind::Black,
            "odd" => BetKind::Odd,
            "even" => BetKind::Even,
            "low" => BetKind::Low,
            "high" => BetKind::High,
            other => return Err(invalid(&format!("unknown bet kind '{other}'"))),
        };

        let amount = parts
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| invalid("missing or invalid amount"))?;
        let consolation = match parts.next() {
            None => false,
            Some("consolation" | "c") => true,
            Some(other) => return Err(invalid(&format!("unexpected modifier '{other}'"))),
        };

        let bet = Self {
            kind,
            amount,
            consolation,
        };
        bet.validate()?;
        Ok(bet)
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.kind, self.amount)?;
        if self.consolation {
            write!(f, " (consolation)")?;
        }
        Ok(())
    }
}

/// The result of one bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetSettlement {
    /// The bet that was settled.
    pub bet: Bet,
    /// Whether the win predicate held.
    pub won: bool,
    /// Multiplier applied to the stake (0 for a plain loss).
    pub multiplier: f64,
    /// Chips returned for this bet.
    pub payout: f64,
}

/// The result of every bet on one spin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settlement {
    /// Per-bet results, in placement order.
    pub bets: Vec<BetSettlement>,
    /// Sum of all stakes.
    pub total_stake: u64,
    /// Sum of all payouts.
    pub total_payout: f64,
}

/// Settle every bet against the winning spot.
pub fn settle_bets(winner: &Spot, bets: &[Bet]) -> EngineResult<Settlement> {
    let mut settlement = Settlement::default();
    for bet in bets {
        bet.validate()?;
        let won = bet.kind.wins(winner);
        let multiplier = if won {
            bet.kind.win_multiplier(winner)
        } else if bet.consolation {
            CONSOLATION_RATE
        } else {
            0.0
        };
        let payout = bet.amount as f64 * multiplier;
        settlement.total_stake += bet.amount;
        settlement.total_payout += payout;
        settlement.bets.push(BetSettlement {
            bet: *bet,
            won,
            multiplier,
            payout,
        });
    }
    Ok(settlement)
}

/// Total chips returned for `bets` against the winning spot.
pub fn calculate_total_payout(winner: &Spot, bets: &[Bet]) -> EngineResult<f64> {
    settle_bets(winner, bets).map(|s| s.total_payout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::effect::{Effect, EffectRecord};
    use crate::recalc::recalculate_all;
    use crate::table::SpotId;

    fn table_spots() -> Vec<Spot> {
        let mut spots: Vec<Spot> = SpotTable::standard().entries().iter().map(Spot::new).collect();
        recalculate_all(&mut spots, &EngineConfig::default());
        spots
    }

    #[test]
    fn straight_pays_live_multiplier() {
        let mut spots = table_spots();
        let over = spots[16].applied_over();
        spots[16].append(EffectRecord::payout_multiply(1.5, over));
        recalculate_all(&mut spots, &EngineConfig::default());

        let winner = &spots[16];
        let payout = calculate_total_payout(winner, &[Bet::new(BetKind::Straight(17), 10)]).unwrap();
        assert!((payout - 10.0 * 36.0 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn group_bets_pay_fixed_multiples() {
        let spots = table_spots();
        // 17: black, odd, low, second dozen, second column.
        let winner = &spots[16];
        let bets = [
            Bet::new(BetKind::Black, 10),
            Bet::new(BetKind::Odd, 10),
            Bet::new(BetKind::Low, 10),
            Bet::new(BetKind::Dozen(2), 10),
            Bet::new(BetKind::Column(2), 10),
            Bet::new(BetKind::Red, 10),
            Bet::new(BetKind::High, 10),
        ];
        let settlement = settle_bets(winner, &bets).unwrap();
        let won: Vec<bool> = settlement.bets.iter().map(|b| b.won).collect();
        assert_eq!(won, vec![true, true, true, true, true, false, false]);
        assert_eq!(settlement.total_stake, 70);
        assert!((settlement.total_payout - (20.0 * 3.0 + 30.0 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn predicates_use_current_identity() {
        let mut spots = table_spots();
        // Spot 1 (red) copies spot 2 (black) and now shows 2.
        let over = spots[0].applied_over();
        spots[0].append(EffectRecord::new(
            Effect::CopyFrom {
                source: SpotId::new(2).unwrap(),
                number: 2,
                color: SpotColor::Black,
            },
            over,
        ));
        recalculate_all(&mut spots, &EngineConfig::default());
        let winner = &spots[0];

        assert!(BetKind::Straight(2).wins(winner));
        assert!(!BetKind::Straight(1).wins(winner));
        assert!(BetKind::Black.wins(winner));
        assert!(BetKind::Even.wins(winner));
        assert!(BetKind::Column(2).wins(winner));
    }

    #[test]
    fn consolation_returns_half_on_loss_only() {
        let spots = table_spots();
        let winner = &spots[0];
        let lose = Bet::new(BetKind::Black, 10).with_consolation();
        let win = Bet::new(BetKind::Red, 10).with_consolation();
        let settlement = settle_bets(winner, &[lose, win]).unwrap();
        assert!(!settlement.bets[0].won);
        assert!((settlement.bets[0].payout - 5.0).abs() < 1e-9);
        assert!(settlement.bets[1].won);
        assert!((settlement.bets[1].payout - 20.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_bets_are_rejected() {
        let spots = table_spots();
        assert!(settle_bets(&spots[0], &[Bet::new(BetKind::Straight(0), 10)]).is_err());
        assert!(settle_bets(&spots[0], &[Bet::new(BetKind::Dozen(4), 10)]).is_err());
        assert!(settle_bets(&spots[0], &[Bet::new(BetKind::Red, 0)]).is_err());
    }

    #[test]
    fn parse_bets() {
        assert_eq!(
            "straight:17:10".parse::<Bet>().unwrap(),
            Bet::new(BetKind::Straight(17), 10)
        );
        assert_eq!("red:5".parse::<Bet>().unwrap(), Bet::new(BetKind::Red, 5));
        assert_eq!(
            "Dozen:2:10:consolation".parse::<Bet>().unwrap(),
            Bet::new(BetKind::Dozen(2), 10).with_consolation()
        );
        assert!("straight:10".parse::<Bet>().is_err());
        assert!("purple:10".parse::<Bet>().is_err());
        assert!("column:5:10".parse::<Bet>().is_err());
        assert!("red:5:twice".parse::<Bet>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Bet::new(BetKind::Straight(3), 10).to_string(), "straight 3 for 10");
        assert_eq!(
            Bet::new(BetKind::Red, 1).with_consolation().to_string(),
            "red for 1 (consolation)"
        );
    }
}
