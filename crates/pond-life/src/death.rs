//! Death procedure shared by the simulator, the dawn neglect rule and
//! reconciliation.
//!
//! The cause is fixed at the moment of death from the slot's state as it is
//! then, before anything is cleared, so it never depends on what happens to
//! the slot later.

use tracing::info;

use pond_types::{DeathCause, HazardKind, LifecycleEvent, Slot, Stage};

/// Select the death-cause label for a slot about to die.
///
/// Effective hazards are checked in priority order pH, oxygen, temperature,
/// water quality; then hunger, then exhausted health.
pub fn select_cause(slot: &Slot) -> DeathCause {
    if let Some(kind) = HazardKind::ALL
        .into_iter()
        .find(|kind| slot.hazard_effective(*kind))
    {
        return DeathCause::from(kind);
    }
    if slot.hungry {
        DeathCause::Hunger
    } else if slot.health == 0 {
        DeathCause::HealthExhausted
    } else {
        DeathCause::Unknown
    }
}

/// A death that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    /// Grid index of the slot.
    pub slot: usize,
    /// Stage the creature died in.
    pub stage: Stage,
    /// Cause fixed at the moment of death.
    pub cause: DeathCause,
}

impl Death {
    /// The lifecycle signal announcing this death.
    pub const fn event(self) -> LifecycleEvent {
        LifecycleEvent::CreatureDied {
            slot: self.slot,
            stage: self.stage,
            cause: self.cause,
        }
    }
}

/// Kill the slot's occupant.
///
/// The slot keeps `has_creature` (the body stays until removed) and loses
/// its hazards, hunger and plant effect.
pub fn kill(slot: &mut Slot) -> Death {
    let cause = select_cause(slot);
    kill_with_cause(slot, cause)
}

/// Kill the slot's occupant with an already known cause.
pub fn kill_with_cause(slot: &mut Slot, cause: DeathCause) -> Death {
    let stage = slot.stage;
    slot.stage = Stage::Dead;
    slot.alive = false;
    slot.has_creature = true;
    slot.hazards.clear_all();
    slot.hungry = false;
    slot.hungry_since = None;
    slot.last_hunger_damage_at = None;
    slot.plant_effect = None;
    slot.death_cause = Some(cause);

    info!(slot = slot.index, stage = %stage, cause = %cause, "Creature died");
    Death {
        slot: slot.index,
        stage,
        cause,
    }
}
