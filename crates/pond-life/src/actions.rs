//! Local validation and mutation for caretaker intents.
//!
//! Each function checks its preconditions first and returns a
//! [`RejectionReason`] without touching the slot when one fails. Plants and
//! harvest live in [`crate::plant`] and [`crate::harvest`].

use tracing::info;

use pond_types::{
    CreatureSpec, HazardKind, LifecycleEvent, RejectionReason, Slot, SlotDefaults, Stage,
    SupplementSpec,
};

/// Require a living egg or adult.
pub const fn require_growing(slot: &Slot) -> Result<(), RejectionReason> {
    match slot.stage {
        Stage::Dead => Err(RejectionReason::CreatureIsDead),
        Stage::Empty => Err(RejectionReason::NoLivingCreature),
        Stage::Ready => Err(RejectionReason::WrongStage),
        Stage::Egg | Stage::Adult => {
            if slot.has_creature && slot.alive {
                Ok(())
            } else {
                Err(RejectionReason::NoLivingCreature)
            }
        }
    }
}

/// Require any living creature.
pub const fn require_living(slot: &Slot) -> Result<(), RejectionReason> {
    match slot.stage {
        Stage::Dead => Err(RejectionReason::CreatureIsDead),
        Stage::Empty => Err(RejectionReason::NoLivingCreature),
        Stage::Egg | Stage::Adult | Stage::Ready => {
            if slot.has_creature && slot.alive {
                Ok(())
            } else {
                Err(RejectionReason::NoLivingCreature)
            }
        }
    }
}

/// Stock an empty slot with a fresh egg of `spec`.
pub fn stock(slot: &mut Slot, spec: &CreatureSpec) -> Result<LifecycleEvent, RejectionReason> {
    if slot.stage != Stage::Empty || slot.has_creature {
        return Err(RejectionReason::SlotOccupied);
    }
    let remote_id = slot.remote_id;
    *slot = Slot::empty(
        slot.index,
        SlotDefaults {
            max_health: spec.max_health,
            harvest_value: spec.harvest_value,
            max_feed_count: spec.max_feed_count,
        },
    );
    slot.remote_id = remote_id;
    slot.stage = Stage::Egg;
    slot.has_creature = true;
    slot.alive = true;
    slot.species = Some(spec.name.clone());
    slot.egg_stage_duration = spec.egg_stage_secs;
    slot.adult_stage_duration = spec.adult_stage_secs;

    info!(slot = slot.index, species = %spec.name, "Slot stocked");
    Ok(LifecycleEvent::StageAdvanced {
        slot: slot.index,
        from: Stage::Empty,
        to: Stage::Egg,
    })
}

/// Feed a hungry creature.
///
/// Requires a living egg or adult that is hungry, has feeding budget left,
/// and does not sit in dirty water.
pub fn feed(slot: &mut Slot, now: u64) -> Result<(), RejectionReason> {
    require_growing(slot)?;
    if !slot.hungry {
        return Err(RejectionReason::NotHungry);
    }
    if slot.feed_count >= slot.max_feed_count {
        return Err(RejectionReason::FeedLimitReached);
    }
    if slot.hazards.water_quality {
        return Err(RejectionReason::HazardBlocking);
    }
    slot.hungry = false;
    slot.hungry_since = None;
    slot.feed_count = slot.feed_count.saturating_add(1);
    slot.last_fed_at = Some(now);
    slot.last_hunger_damage_at = None;
    info!(slot = slot.index, feed_count = slot.feed_count, "Creature fed");
    Ok(())
}

/// Apply a supplement: restore health and clear the hazards it lists.
///
/// Returns the hazards that were actually cleared.
pub fn apply_supplement(
    slot: &mut Slot,
    spec: &SupplementSpec,
) -> Result<Vec<HazardKind>, RejectionReason> {
    require_growing(slot)?;
    slot.health = slot
        .health
        .saturating_add(spec.health_restore)
        .min(slot.max_health);
    let mut cleared = Vec::new();
    for kind in &spec.clears {
        if slot.hazards.get(*kind) {
            slot.hazards.set(*kind, false);
            cleared.push(*kind);
        }
    }
    info!(
        slot = slot.index,
        supplement = %spec.name,
        health = slot.health,
        cleared = cleared.len(),
        "Supplement applied"
    );
    Ok(cleared)
}

/// Clear one active hazard on a living creature's slot.
pub fn resolve_hazard(slot: &mut Slot, kind: HazardKind) -> Result<(), RejectionReason> {
    require_living(slot)?;
    if !slot.hazards.get(kind) {
        return Err(RejectionReason::HazardNotActive);
    }
    slot.hazards.set(kind, false);
    info!(slot = slot.index, hazard = %kind, "Hazard resolved");
    Ok(())
}

/// Remove a dead occupant, returning the slot to empty.
pub fn remove_dead(slot: &mut Slot, defaults: SlotDefaults) -> Result<(), RejectionReason> {
    if slot.stage != Stage::Dead {
        return Err(RejectionReason::WrongStage);
    }
    slot.reset(defaults);
    info!(slot = slot.index, "Dead occupant removed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::death;

    fn koi() -> CreatureSpec {
        CreatureSpec {
            name: String::from("Koi"),
            egg_stage_secs: 120.0,
            adult_stage_secs: 240.0,
            max_health: 120,
            harvest_value: 50,
            max_feed_count: 2,
        }
    }

    fn stocked() -> Slot {
        let mut slot = Slot::empty(0, SlotDefaults::default());
        stock(&mut slot, &koi()).unwrap();
        slot
    }

    #[test]
    fn stock_takes_values_from_the_species() {
        let slot = stocked();
        assert_eq!(slot.stage, Stage::Egg);
        assert!(slot.alive && slot.has_creature);
        assert_eq!(slot.health, 120);
        assert_eq!(slot.max_health, 120);
        assert_eq!(slot.harvest_value, 50);
        assert_eq!(slot.max_feed_count, 2);
        assert_eq!(slot.species.as_deref(), Some("Koi"));
    }

    #[test]
    fn stock_rejects_occupied_slot() {
        let mut slot = stocked();
        let before = slot.clone();
        assert_eq!(stock(&mut slot, &koi()), Err(RejectionReason::SlotOccupied));
        assert_eq!(slot, before);
    }

    #[test]
    fn feed_preconditions() {
        let mut slot = stocked();
        assert_eq!(feed(&mut slot, 1), Err(RejectionReason::NotHungry));

        slot.hungry = true;
        slot.hazards.water_quality = true;
        assert_eq!(feed(&mut slot, 1), Err(RejectionReason::HazardBlocking));

        slot.hazards.water_quality = false;
        slot.feed_count = 2;
        assert_eq!(feed(&mut slot, 1), Err(RejectionReason::FeedLimitReached));
        assert!(slot.hungry);
    }

    #[test]
    fn feed_clears_hunger_and_counts() {
        let mut slot = stocked();
        slot.hungry = true;
        slot.hungry_since = Some(3);
        slot.last_hunger_damage_at = Some(8);
        feed(&mut slot, 9).unwrap();
        assert!(!slot.hungry);
        assert_eq!(slot.feed_count, 1);
        assert_eq!(slot.last_fed_at, Some(9));
        assert_eq!(slot.last_hunger_damage_at, None);
    }

    #[test]
    fn supplement_heals_and_clears_listed_hazards() {
        let mut slot = stocked();
        slot.health = 100;
        slot.hazards.ph = true;
        slot.hazards.oxygen = true;
        let spec = SupplementSpec {
            name: String::from("pH Buffer"),
            health_restore: 50,
            clears: vec![HazardKind::Ph, HazardKind::Temperature],
        };
        let cleared = apply_supplement(&mut slot, &spec).unwrap();
        assert_eq!(cleared, vec![HazardKind::Ph]);
        assert_eq!(slot.health, 120);
        assert!(slot.hazards.oxygen);
    }

    #[test]
    fn resolve_requires_an_active_hazard() {
        let mut slot = stocked();
        assert_eq!(
            resolve_hazard(&mut slot, HazardKind::WaterQuality),
            Err(RejectionReason::HazardNotActive)
        );
        slot.hazards.water_quality = true;
        resolve_hazard(&mut slot, HazardKind::WaterQuality).unwrap();
        assert!(!slot.hazards.water_quality);
    }

    #[test]
    fn dead_slots_reject_care_and_accept_removal() {
        let mut slot = stocked();
        slot.hazards.ph = true;
        death::kill(&mut slot);
        assert_eq!(feed(&mut slot, 1), Err(RejectionReason::CreatureIsDead));
        assert_eq!(
            resolve_hazard(&mut slot, HazardKind::Ph),
            Err(RejectionReason::CreatureIsDead)
        );

        remove_dead(&mut slot, SlotDefaults::default()).unwrap();
        assert_eq!(slot.stage, Stage::Empty);
        assert!(!slot.has_creature);
        assert_eq!(
            remove_dead(&mut slot, SlotDefaults::default()),
            Err(RejectionReason::WrongStage)
        );
    }
}
