//! Enumeration types for the pond simulation.
//!
//! Lifecycle stages, environmental hazards, day/night phases, death causes,
//! caretaker rejection reasons, and the remote slot action vocabulary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Lifecycle position of a slot's occupant.
///
/// The derived ordering follows the natural progression
/// `Empty < Egg < Adult < Ready`. `Dead` sorts last but is not part of the
/// progression: it is a terminal jump reachable from `Egg` or `Adult` and is
/// only left through explicit removal back to `Empty`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Stage {
    /// Nothing lives in the slot.
    #[default]
    Empty,
    /// A freshly stocked egg, not yet hatched.
    Egg,
    /// A growing adult creature.
    Adult,
    /// A fully grown creature awaiting harvest. Inert.
    Ready,
    /// A dead occupant awaiting removal by the player.
    Dead,
}

impl Stage {
    /// Whether the stage is one where the creature grows and can be harmed.
    pub const fn is_growing(self) -> bool {
        matches!(self, Self::Egg | Self::Adult)
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Egg => write!(f, "egg"),
            Self::Adult => write!(f, "adult"),
            Self::Ready => write!(f, "ready"),
            Self::Dead => write!(f, "dead"),
        }
    }
}

// ---------------------------------------------------------------------------
// Hazards
// ---------------------------------------------------------------------------

/// One of the four independent environmental faults a slot can suffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum HazardKind {
    /// Water acidity out of range.
    Ph,
    /// Dissolved oxygen too low.
    Oxygen,
    /// Water temperature out of range.
    Temperature,
    /// Dirty water, applied once per night by the cycle controller.
    WaterQuality,
}

impl HazardKind {
    /// The hazards driven by the repeating hazard timers.
    pub const SCHEDULED: [Self; 3] = [Self::Ph, Self::Oxygen, Self::Temperature];

    /// Every hazard kind, in death-cause priority order.
    pub const ALL: [Self; 4] = [Self::Ph, Self::Oxygen, Self::Temperature, Self::WaterQuality];
}

impl core::fmt::Display for HazardKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ph => write!(f, "ph"),
            Self::Oxygen => write!(f, "oxygen"),
            Self::Temperature => write!(f, "temperature"),
            Self::WaterQuality => write!(f, "water_quality"),
        }
    }
}

// ---------------------------------------------------------------------------
// Day / night
// ---------------------------------------------------------------------------

/// Phase of the pond's day/night cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DayPhase {
    /// Daylight. The cycle starts here on day 1.
    #[default]
    Day,
    /// Night. Dirty water is applied on entry.
    Night,
}

impl core::fmt::Display for DayPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Night => write!(f, "night"),
        }
    }
}

// ---------------------------------------------------------------------------
// Death
// ---------------------------------------------------------------------------

/// Why a creature died, fixed at the moment of death.
///
/// Variants are listed in the priority order used to pick the label when
/// several conditions hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DeathCause {
    /// Killed by a pH hazard.
    Ph,
    /// Suffocated by an oxygen hazard.
    Oxygen,
    /// Killed by a temperature hazard.
    Temperature,
    /// Killed by dirty water.
    WaterQuality,
    /// Starved while hungry.
    Hunger,
    /// Health ran out with no other active condition.
    HealthExhausted,
    /// No condition could be identified (e.g. death reported by the store).
    Unknown,
}

impl From<HazardKind> for DeathCause {
    fn from(kind: HazardKind) -> Self {
        match kind {
            HazardKind::Ph => Self::Ph,
            HazardKind::Oxygen => Self::Oxygen,
            HazardKind::Temperature => Self::Temperature,
            HazardKind::WaterQuality => Self::WaterQuality,
        }
    }
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ph => write!(f, "ph"),
            Self::Oxygen => write!(f, "oxygen"),
            Self::Temperature => write!(f, "temperature"),
            Self::WaterQuality => write!(f, "water_quality"),
            Self::Hunger => write!(f, "hunger"),
            Self::HealthExhausted => write!(f, "health_exhausted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Caretaker rejections
// ---------------------------------------------------------------------------

/// Why a caretaker intent was refused. Rejections never mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// The slot index does not exist in the pond grid.
    NoSuchSlot,
    /// Stocking requires an empty slot.
    SlotOccupied,
    /// The slot holds no living creature.
    NoLivingCreature,
    /// The creature is still an egg.
    CreatureIsEgg,
    /// The creature is dead.
    CreatureIsDead,
    /// The slot is not in the stage the intent requires.
    WrongStage,
    /// The creature is not hungry.
    NotHungry,
    /// The daily feeding budget is spent.
    FeedLimitReached,
    /// An active hazard blocks the intent.
    HazardBlocking,
    /// The hazard to resolve is not active on the slot.
    HazardNotActive,
    /// The named item is not in the catalog, or is of the wrong kind.
    UnknownItem,
}

impl core::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::NoSuchSlot => "there is no such slot",
            Self::SlotOccupied => "the slot is already occupied",
            Self::NoLivingCreature => "the slot has no living creature",
            Self::CreatureIsEgg => "the creature is still an egg",
            Self::CreatureIsDead => "the creature is dead",
            Self::WrongStage => "the creature is not at the right stage",
            Self::NotHungry => "the creature is not hungry",
            Self::FeedLimitReached => "the creature has been fed enough today",
            Self::HazardBlocking => "the water must be cleaned first",
            Self::HazardNotActive => "that problem is not present",
            Self::UnknownItem => "that item is not available",
        };
        f.write_str(text)
    }
}

impl std::error::Error for RejectionReason {}

// ---------------------------------------------------------------------------
// Remote slot actions
// ---------------------------------------------------------------------------

/// Action names understood by the external pond store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum SlotActionKind {
    /// A creature was stocked into an empty slot.
    Stock,
    /// The creature was fed.
    Feed,
    /// A plant item was placed on the slot.
    Plant,
    /// A supplement item was applied.
    Supplement,
    /// A ready creature was harvested.
    Harvest,
    /// The creature died (or a dead occupant was removed).
    MarkDead,
    /// The creature advanced to its next stage.
    Advance,
    /// A hazard was resolved by the caretaker.
    ResolveIssue,
    /// A hazard was raised on the slot by the simulation.
    Hazard,
}

impl core::fmt::Display for SlotActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::Stock => "stock",
            Self::Feed => "feed",
            Self::Plant => "plant",
            Self::Supplement => "supplement",
            Self::Harvest => "harvest",
            Self::MarkDead => "mark-dead",
            Self::Advance => "advance",
            Self::ResolveIssue => "resolve-issue",
            Self::Hazard => "hazard",
        };
        f.write_str(text)
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Direction of a wallet ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LedgerEntryType {
    /// Coins added to the balance (e.g. harvest reward).
    Credit,
    /// Coins removed from the balance (e.g. market purchase).
    Debit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_progression_is_ordered() {
        assert!(Stage::Empty < Stage::Egg);
        assert!(Stage::Egg < Stage::Adult);
        assert!(Stage::Adult < Stage::Ready);
    }

    #[test]
    fn only_egg_and_adult_grow() {
        assert!(Stage::Egg.is_growing());
        assert!(Stage::Adult.is_growing());
        assert!(!Stage::Empty.is_growing());
        assert!(!Stage::Ready.is_growing());
        assert!(!Stage::Dead.is_growing());
    }

    #[test]
    fn action_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&SlotActionKind::MarkDead).ok();
        assert_eq!(json.as_deref(), Some("\"mark-dead\""));
        let json = serde_json::to_string(&SlotActionKind::ResolveIssue).ok();
        assert_eq!(json.as_deref(), Some("\"resolve-issue\""));
    }

    #[test]
    fn hazard_kind_converts_to_death_cause() {
        assert_eq!(DeathCause::from(HazardKind::Oxygen), DeathCause::Oxygen);
        assert_eq!(
            DeathCause::from(HazardKind::WaterQuality),
            DeathCause::WaterQuality
        );
    }
}
