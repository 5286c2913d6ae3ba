//! Harvest & reward calculator.
//!
//! Reward math is exact decimal: `round(harvest_value * multiplier)` with
//! midpoints rounded away from zero. The multiplier is 1 unless a market
//! bonus is active.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use pond_types::{RejectionReason, Slot, SlotDefaults, Stage};

use crate::error::LifeError;

/// What a successful harvest produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Grid index of the harvested slot.
    pub slot: usize,
    /// Species that was harvested.
    pub species: Option<String>,
    /// Coins to credit.
    pub reward: u64,
    /// Multiplier that was applied.
    pub multiplier: Decimal,
}

/// Compute the reward for a harvest value under a multiplier.
///
/// Multipliers below 1 are treated as 1.
pub fn reward(harvest_value: u32, multiplier: Decimal) -> Result<u64, LifeError> {
    let multiplier = multiplier.max(Decimal::ONE);
    Decimal::from(harvest_value)
        .checked_mul(multiplier)
        .map(|raw| raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_u64())
        .ok_or_else(|| LifeError::ArithmeticOverflow {
            context: format!("harvest reward {harvest_value} x {multiplier}"),
        })
}

/// Harvest a ready slot and reset it to empty.
///
/// A slot that is not ready is left untouched and the harvest is rejected.
pub fn harvest(
    slot: &mut Slot,
    multiplier: Decimal,
    defaults: SlotDefaults,
) -> Result<HarvestOutcome, LifeError> {
    if slot.stage != Stage::Ready || !slot.alive {
        return Err(RejectionReason::WrongStage.into());
    }
    let reward = reward(slot.harvest_value, multiplier)?;
    let outcome = HarvestOutcome {
        slot: slot.index,
        species: slot.species.take(),
        reward,
        multiplier: multiplier.max(Decimal::ONE),
    };
    slot.reset(defaults);
    info!(
        slot = outcome.slot,
        reward = outcome.reward,
        multiplier = %outcome.multiplier,
        "Slot harvested"
    );
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ready(value: u32) -> Slot {
        let mut slot = Slot::empty(1, SlotDefaults::default());
        slot.stage = Stage::Ready;
        slot.has_creature = true;
        slot.alive = true;
        slot.species = Some(String::from("Koi"));
        slot.harvest_value = value;
        slot.health = 40;
        slot
    }

    #[test]
    fn reward_without_bonus_is_the_value() {
        assert_eq!(reward(50, Decimal::ONE).unwrap(), 50);
    }

    #[test]
    fn reward_rounds_midpoint_away_from_zero() {
        assert_eq!(reward(5, Decimal::new(15, 1)).unwrap(), 8);
        assert_eq!(reward(3, Decimal::new(15, 1)).unwrap(), 5);
        assert_eq!(reward(10, Decimal::new(125, 2)).unwrap(), 13);
    }

    #[test]
    fn multiplier_below_one_is_ignored() {
        assert_eq!(reward(10, Decimal::new(5, 1)).unwrap(), 10);
    }

    #[test]
    fn doubled_harvest_pays_double_and_resets() {
        let mut slot = ready(50);
        let outcome = harvest(&mut slot, Decimal::TWO, SlotDefaults::default()).unwrap();
        assert_eq!(outcome.reward, 100);
        assert_eq!(outcome.species.as_deref(), Some("Koi"));
        assert_eq!(slot.stage, Stage::Empty);
        assert_eq!(slot.health, slot.max_health);
        assert!(!slot.hazards.any());
        assert_eq!(slot.harvest_value, SlotDefaults::default().harvest_value);
    }

    #[test]
    fn harvest_is_idempotent() {
        let mut slot = ready(50);
        harvest(&mut slot, Decimal::ONE, SlotDefaults::default()).unwrap();
        let after_first = slot.clone();
        let second = harvest(&mut slot, Decimal::ONE, SlotDefaults::default());
        assert_eq!(second.unwrap_err().rejection(), Some(RejectionReason::WrongStage));
        assert_eq!(slot, after_first);
    }

    #[test]
    fn adult_cannot_be_harvested() {
        let mut slot = ready(50);
        slot.stage = Stage::Adult;
        let before = slot.clone();
        assert!(harvest(&mut slot, Decimal::ONE, SlotDefaults::default()).is_err());
        assert_eq!(slot, before);
    }
}
