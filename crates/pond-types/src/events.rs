//! Lifecycle signals produced for UI and notification collaborators.
//!
//! Signals are informational only. Nothing in the simulation depends on a
//! signal being delivered.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DayPhase, DeathCause, HazardKind, Stage};

/// Something noteworthy that happened during a tick or an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LifecycleEvent {
    /// A creature moved to its next stage.
    StageAdvanced {
        /// Grid index of the slot.
        slot: usize,
        /// Stage left.
        from: Stage,
        /// Stage entered.
        to: Stage,
    },
    /// A creature died.
    CreatureDied {
        /// Grid index of the slot.
        slot: usize,
        /// Stage the creature died in.
        stage: Stage,
        /// Cause fixed at the moment of death.
        cause: DeathCause,
    },
    /// A creature became hungry.
    BecameHungry {
        /// Grid index of the slot.
        slot: usize,
    },
    /// A plant effect attached to a slot.
    PlantEffectActivated {
        /// Grid index of the slot.
        slot: usize,
        /// Plant name.
        plant: String,
        /// Simulated second at which the effect ends.
        expires_at: u64,
    },
    /// A plant effect expired and detached.
    PlantEffectEnded {
        /// Grid index of the slot.
        slot: usize,
        /// Plant name.
        plant: String,
    },
    /// A hazard was raised on every occupied slot.
    HazardTriggered {
        /// The hazard.
        hazard: HazardKind,
        /// Grid indices of the affected slots.
        slots: Vec<usize>,
    },
    /// The day/night cycle changed phase.
    PhaseChanged {
        /// Phase entered.
        phase: DayPhase,
        /// In-game day after the change.
        day: u32,
    },
}

impl LifecycleEvent {
    /// The slot this event concerns, for single-slot events.
    pub const fn slot(&self) -> Option<usize> {
        match self {
            Self::StageAdvanced { slot, .. }
            | Self::CreatureDied { slot, .. }
            | Self::BecameHungry { slot }
            | Self::PlantEffectActivated { slot, .. }
            | Self::PlantEffectEnded { slot, .. } => Some(*slot),
            Self::HazardTriggered { .. } | Self::PhaseChanged { .. } => None,
        }
    }
}
