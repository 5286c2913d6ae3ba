//! Market bonus interface and the shared board the runtime publishes to.
//!
//! The bonus is external and read-only to the simulation: the runtime polls
//! the store and publishes what it learns; harvests read the multiplier.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use pond_types::MarketBonusSnapshot;

/// Read access to the time-limited market bonus.
pub trait MarketBonus: Send + Sync {
    /// Whether a bonus is in force right now.
    fn is_active(&self) -> bool;

    /// The bonus multiplier, meaningful only while active.
    fn current_multiplier(&self) -> Decimal;

    /// The multiplier a harvest should use: the bonus while active
    /// (never below 1), otherwise 1.
    fn active_multiplier(&self) -> Decimal {
        if self.is_active() {
            self.current_multiplier().max(Decimal::ONE)
        } else {
            Decimal::ONE
        }
    }
}

/// A market that never runs a bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBonus;

impl MarketBonus for NoBonus {
    fn is_active(&self) -> bool {
        false
    }

    fn current_multiplier(&self) -> Decimal {
        Decimal::ONE
    }
}

/// The latest known market bonus, shared between the poller and harvests.
#[derive(Debug, Default)]
pub struct BonusBoard {
    current: RwLock<Option<MarketBonusSnapshot>>,
}

impl BonusBoard {
    /// An empty board: no bonus known.
    pub const fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Replace the published bonus.
    pub fn publish(&self, bonus: Option<MarketBonusSnapshot>) {
        if let Ok(mut guard) = self.current.write() {
            if *guard != bonus {
                info!(
                    multiplier = bonus.as_ref().map(|b| b.multiplier.to_string()),
                    ends_at = bonus.as_ref().map(|b| b.ends_at.to_rfc3339()),
                    "Market bonus updated"
                );
            }
            *guard = bonus;
        }
    }

    /// The published bonus, whether or not it has ended.
    pub fn snapshot(&self) -> Option<MarketBonusSnapshot> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    /// Whether the published bonus is in force at `at`.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.snapshot().is_some_and(|bonus| at < bonus.ends_at)
    }
}

impl MarketBonus for BonusBoard {
    fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    fn current_multiplier(&self) -> Decimal {
        self.snapshot().map_or(Decimal::ONE, |bonus| bonus.multiplier)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn empty_board_pays_one() {
        let board = BonusBoard::new();
        assert!(!board.is_active());
        assert_eq!(board.active_multiplier(), Decimal::ONE);
    }

    #[test]
    fn live_bonus_is_applied() {
        let board = BonusBoard::new();
        board.publish(Some(MarketBonusSnapshot {
            multiplier: Decimal::TWO,
            ends_at: Utc::now() + Duration::minutes(5),
        }));
        assert!(board.is_active());
        assert_eq!(board.active_multiplier(), Decimal::TWO);
    }

    #[test]
    fn ended_bonus_is_ignored() {
        let board = BonusBoard::new();
        board.publish(Some(MarketBonusSnapshot {
            multiplier: Decimal::TWO,
            ends_at: Utc::now() - Duration::seconds(1),
        }));
        assert!(!board.is_active());
        assert_eq!(board.active_multiplier(), Decimal::ONE);
    }

    #[test]
    fn bonus_below_one_never_reduces_rewards() {
        let board = BonusBoard::new();
        board.publish(Some(MarketBonusSnapshot {
            multiplier: Decimal::new(5, 1),
            ends_at: Utc::now() + Duration::minutes(1),
        }));
        assert_eq!(board.active_multiplier(), Decimal::ONE);
    }
}
