//! Apply authoritative store snapshots to local slots.
//!
//! The store always wins. Local-only timing (when hunger began, when the
//! creature was last fed or hurt) survives when the snapshot still
//! describes the same occupant, and is dropped otherwise.

use pond_types::{DeathCause, PlantEffect, PlantEffectSnapshot, Slot, SlotSnapshot, Stage};

use crate::config::LifeConfig;

/// Overwrite `slot` with the store's view of it.
///
/// The result always satisfies the slot invariants, whatever the snapshot
/// says: an empty stage yields a fully reset slot, a dead stage always has a
/// cause, a ready stage carries no hazards or hunger, and a plant effect
/// never outlives the configured maximum.
pub fn apply_snapshot(slot: &mut Slot, snapshot: &SlotSnapshot, now: u64, config: &LifeConfig) {
    let same_occupant = slot.stage != Stage::Empty
        && slot.stage <= snapshot.stage
        && slot.species == snapshot.species;
    let previous = slot.clone();

    slot.reset(config.slot_defaults());
    if let Some(remote_id) = snapshot.slot_id {
        slot.remote_id = Some(remote_id);
    }
    if snapshot.stage == Stage::Empty {
        return;
    }

    slot.stage = snapshot.stage;
    slot.has_creature = true;
    slot.alive = snapshot.stage != Stage::Dead;
    slot.species.clone_from(&snapshot.species);
    slot.max_health = snapshot.max_health.max(1);
    slot.health = snapshot.health.min(slot.max_health);
    slot.stage_elapsed = if snapshot.stage_elapsed.is_finite() {
        snapshot.stage_elapsed.max(0.0)
    } else {
        0.0
    };
    slot.egg_stage_duration = snapshot.egg_stage_duration;
    slot.adult_stage_duration = snapshot.adult_stage_duration;
    slot.feed_count = snapshot.feed_count;
    slot.max_feed_count = snapshot.max_feed_count;
    slot.harvest_value = snapshot.harvest_value;

    match snapshot.stage {
        Stage::Dead => {
            slot.death_cause = Some(snapshot.death_cause.unwrap_or(DeathCause::Unknown));
            return;
        }
        Stage::Egg | Stage::Adult => {
            slot.hazards = snapshot.hazards;
            slot.hungry = snapshot.hungry;
        }
        Stage::Ready | Stage::Empty => {}
    }

    slot.plant_effect = snapshot
        .plant_effect
        .as_ref()
        .and_then(|effect| restore_effect(effect, now, config));

    if same_occupant {
        slot.last_fed_at = previous.last_fed_at;
        if slot.hungry {
            slot.hungry_since = previous.hungry_since;
            slot.last_hunger_damage_at = previous.last_hunger_damage_at;
        }
    }
    if slot.hungry && slot.hungry_since.is_none() {
        slot.hungry_since = Some(now);
    }
}

/// Rebuild an attached effect from its remaining lifetime.
///
/// An effect with no lifetime left is not restored.
fn restore_effect(
    snapshot: &PlantEffectSnapshot,
    now: u64,
    config: &LifeConfig,
) -> Option<PlantEffect> {
    if snapshot.remaining_secs == 0 {
        return None;
    }
    let remaining = snapshot.remaining_secs.min(config.max_plant_lifetime_secs);
    let growth_multiplier =
        if snapshot.growth_multiplier.is_finite() && snapshot.growth_multiplier >= 0.0 {
            snapshot.growth_multiplier
        } else {
            1.0
        };
    Some(PlantEffect {
        plant: snapshot.plant.clone(),
        growth_multiplier,
        oxygen_immune: snapshot.oxygen_immune,
        temperature_immune: snapshot.temperature_immune,
        health_regen_per_activation: snapshot.health_regen_per_activation,
        attached_at: now,
        expires_at: now.saturating_add(remaining),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pond_types::{HazardFlags, SlotDefaults, SlotId};

    use super::*;

    fn snapshot(stage: Stage) -> SlotSnapshot {
        SlotSnapshot {
            slot_id: Some(SlotId::new()),
            index: 0,
            stage,
            species: Some(String::from("Koi")),
            health: 70,
            max_health: 100,
            stage_elapsed: 12.0,
            egg_stage_duration: 120.0,
            adult_stage_duration: 300.0,
            hazards: HazardFlags {
                ph: true,
                ..HazardFlags::CLEAR
            },
            hungry: true,
            feed_count: 1,
            max_feed_count: 3,
            plant_effect: None,
            harvest_value: 50,
            death_cause: None,
        }
    }

    fn effect(remaining_secs: u64) -> PlantEffectSnapshot {
        PlantEffectSnapshot {
            plant: String::from("Elodea"),
            growth_multiplier: 1.0,
            oxygen_immune: true,
            temperature_immune: false,
            health_regen_per_activation: 0,
            remaining_secs,
        }
    }

    #[test]
    fn adult_snapshot_is_applied() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        let remote = snapshot(Stage::Adult);
        apply_snapshot(&mut slot, &remote, 40, &config);

        assert_eq!(slot.stage, Stage::Adult);
        assert!(slot.alive && slot.has_creature);
        assert_eq!(slot.remote_id, remote.slot_id);
        assert_eq!(slot.health, 70);
        assert!(slot.hazards.ph);
        assert!(slot.hungry);
        assert_eq!(slot.hungry_since, Some(40));
    }

    #[test]
    fn empty_snapshot_resets_the_slot() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        apply_snapshot(&mut slot, &snapshot(Stage::Adult), 1, &config);

        let mut remote = snapshot(Stage::Empty);
        remote.slot_id = None;
        let remote_id = slot.remote_id;
        apply_snapshot(&mut slot, &remote, 2, &config);
        assert_eq!(slot.stage, Stage::Empty);
        assert!(!slot.has_creature);
        assert!(!slot.hazards.any());
        assert_eq!(slot.health, slot.max_health);
        assert_eq!(slot.remote_id, remote_id);
    }

    #[test]
    fn dead_snapshot_without_cause_is_unknown() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        apply_snapshot(&mut slot, &snapshot(Stage::Dead), 1, &config);
        assert_eq!(slot.stage, Stage::Dead);
        assert!(!slot.alive);
        assert!(slot.has_creature);
        assert!(!slot.hazards.any());
        assert_eq!(slot.death_cause, Some(DeathCause::Unknown));
    }

    #[test]
    fn ready_snapshot_drops_hazards_and_hunger() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        apply_snapshot(&mut slot, &snapshot(Stage::Ready), 1, &config);
        assert!(!slot.hazards.any());
        assert!(!slot.hungry);
    }

    #[test]
    fn remaining_lifetime_is_reclamped() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        let mut remote = snapshot(Stage::Adult);
        remote.plant_effect = Some(effect(99_999));
        apply_snapshot(&mut slot, &remote, 10, &config);
        let restored = slot.plant_effect.unwrap();
        assert_eq!(restored.expires_at, 10 + config.max_plant_lifetime_secs);
    }

    #[test]
    fn spent_effect_is_not_restored() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        let mut remote = snapshot(Stage::Adult);
        remote.plant_effect = Some(effect(0));
        apply_snapshot(&mut slot, &remote, 10, &config);
        assert!(slot.plant_effect.is_none());
    }

    #[test]
    fn local_timing_survives_for_the_same_occupant() {
        let config = LifeConfig::default();
        let mut slot = Slot::empty(0, SlotDefaults::default());
        apply_snapshot(&mut slot, &snapshot(Stage::Adult), 5, &config);
        slot.last_fed_at = Some(3);
        slot.last_hunger_damage_at = Some(9);

        apply_snapshot(&mut slot, &snapshot(Stage::Adult), 20, &config);
        assert_eq!(slot.last_fed_at, Some(3));
        assert_eq!(slot.hungry_since, Some(5));
        assert_eq!(slot.last_hunger_damage_at, Some(9));
    }
}
