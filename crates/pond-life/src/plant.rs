//! Plant effect subsystem: attach and expire time-bounded modifiers.
//!
//! A plant item carries a typed [`PlantEffectDescriptor`] resolved at
//! catalog load. Attaching it builds a [`PlantEffect`] with an absolute
//! expiry on the simulated clock; the growth simulator expires it.

use tracing::{debug, info};

use pond_types::{
    LifecycleEvent, PlantEffect, PlantEffectDescriptor, PlantSpec, RejectionReason, Slot, Stage,
};

use crate::config::LifeConfig;

/// Check that a slot can take a plant: a living adult or ready creature.
pub const fn can_attach(slot: &Slot) -> Result<(), RejectionReason> {
    match slot.stage {
        Stage::Dead => Err(RejectionReason::CreatureIsDead),
        Stage::Egg => Err(RejectionReason::CreatureIsEgg),
        Stage::Empty => Err(RejectionReason::NoLivingCreature),
        Stage::Adult | Stage::Ready => {
            if slot.has_creature && slot.alive {
                Ok(())
            } else {
                Err(RejectionReason::NoLivingCreature)
            }
        }
    }
}

/// Build the effect a descriptor produces when attached at `now`.
///
/// The lifetime is clamped to `max_lifetime_secs` and a negative or
/// non-finite multiplier falls back to neutral.
pub fn build_effect(
    plant: &str,
    descriptor: &PlantEffectDescriptor,
    now: u64,
    max_lifetime_secs: u64,
) -> PlantEffect {
    let lifetime = descriptor.lifetime_secs.min(max_lifetime_secs);
    let growth_multiplier =
        if descriptor.growth_multiplier.is_finite() && descriptor.growth_multiplier >= 0.0 {
            descriptor.growth_multiplier
        } else {
            1.0
        };
    PlantEffect {
        plant: plant.to_owned(),
        growth_multiplier,
        oxygen_immune: descriptor.oxygen_immune,
        temperature_immune: descriptor.temperature_immune,
        health_regen_per_activation: descriptor.health_regen,
        attached_at: now,
        expires_at: now.saturating_add(lifetime),
    }
}

/// Attach a plant's effect to a slot, replacing any effect already there.
///
/// Health regeneration is applied once, clamped to the slot's maximum.
pub fn attach(
    slot: &mut Slot,
    spec: &PlantSpec,
    now: u64,
    config: &LifeConfig,
) -> Result<LifecycleEvent, RejectionReason> {
    can_attach(slot)?;

    let effect = build_effect(&spec.name, &spec.effect, now, config.max_plant_lifetime_secs);
    slot.health = slot
        .health
        .saturating_add(effect.health_regen_per_activation)
        .min(slot.max_health);

    let event = LifecycleEvent::PlantEffectActivated {
        slot: slot.index,
        plant: effect.plant.clone(),
        expires_at: effect.expires_at,
    };
    info!(
        slot = slot.index,
        plant = %effect.plant,
        expires_at = effect.expires_at,
        "Plant effect attached"
    );
    slot.plant_effect = Some(effect);
    Ok(event)
}

/// Detach the slot's effect if it has expired by `now`.
///
/// Returns the "effect ended" signal exactly once: the effect is gone after
/// the call, so later ticks have nothing to announce.
pub fn expire(slot: &mut Slot, now: u64) -> Option<LifecycleEvent> {
    let expired = slot
        .plant_effect
        .as_ref()
        .is_some_and(|effect| now >= effect.expires_at);
    if !expired {
        return None;
    }
    let effect = slot.plant_effect.take()?;
    debug!(slot = slot.index, plant = %effect.plant, "Plant effect expired");
    Some(LifecycleEvent::PlantEffectEnded {
        slot: slot.index,
        plant: effect.plant,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pond_types::SlotDefaults;

    use super::*;

    fn slot_at(stage: Stage) -> Slot {
        let mut slot = Slot::empty(2, SlotDefaults::default());
        slot.stage = stage;
        slot.has_creature = stage != Stage::Empty;
        slot.alive = stage != Stage::Dead && stage != Stage::Empty;
        slot
    }

    fn hornwort(lifetime_secs: u64, health_regen: u32) -> PlantSpec {
        PlantSpec {
            name: String::from("Hornwort"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 2.0,
                oxygen_immune: true,
                temperature_immune: false,
                health_regen,
                lifetime_secs,
            },
        }
    }

    #[test]
    fn attach_rejects_egg_dead_and_empty() {
        let config = LifeConfig::default();
        let spec = hornwort(60, 0);
        for (stage, reason) in [
            (Stage::Egg, RejectionReason::CreatureIsEgg),
            (Stage::Dead, RejectionReason::CreatureIsDead),
            (Stage::Empty, RejectionReason::NoLivingCreature),
        ] {
            let mut slot = slot_at(stage);
            let before = slot.clone();
            assert_eq!(attach(&mut slot, &spec, 5, &config), Err(reason));
            assert_eq!(slot, before);
        }
    }

    #[test]
    fn lifetime_is_clamped_to_maximum() {
        let config = LifeConfig::default();
        let mut slot = slot_at(Stage::Adult);
        attach(&mut slot, &hornwort(10_000, 0), 40, &config).unwrap();
        let effect = slot.plant_effect.unwrap();
        assert_eq!(effect.expires_at, 40 + config.max_plant_lifetime_secs);
        assert!(effect.expires_at.saturating_sub(40) <= config.max_plant_lifetime_secs);
    }

    #[test]
    fn regen_is_applied_once_and_clamped() {
        let config = LifeConfig::default();
        let mut slot = slot_at(Stage::Ready);
        slot.health = 95;
        attach(&mut slot, &hornwort(60, 20), 0, &config).unwrap();
        assert_eq!(slot.health, 100);
    }

    #[test]
    fn new_plant_replaces_old_effect() {
        let config = LifeConfig::default();
        let mut slot = slot_at(Stage::Adult);
        attach(&mut slot, &hornwort(60, 0), 0, &config).unwrap();
        let lily = PlantSpec {
            name: String::from("Water Lily"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 1.0,
                oxygen_immune: false,
                temperature_immune: true,
                health_regen: 0,
                lifetime_secs: 30,
            },
        };
        attach(&mut slot, &lily, 10, &config).unwrap();
        let effect = slot.plant_effect.unwrap();
        assert_eq!(effect.plant, "Water Lily");
        assert!(!effect.oxygen_immune);
        assert_eq!(effect.expires_at, 40);
    }

    #[test]
    fn expiry_fires_once_at_deadline() {
        let config = LifeConfig::default();
        let mut slot = slot_at(Stage::Adult);
        attach(&mut slot, &hornwort(30, 0), 0, &config).unwrap();

        assert!(expire(&mut slot, 29).is_none());
        assert!(slot.oxygen_immune());

        let ended = expire(&mut slot, 30);
        assert!(matches!(ended, Some(LifecycleEvent::PlantEffectEnded { slot: 2, .. })));
        assert!(slot.plant_effect.is_none());
        assert!(!slot.oxygen_immune());
        assert!((slot.growth_multiplier() - 1.0).abs() < f64::EPSILON);

        assert!(expire(&mut slot, 31).is_none());
    }

    #[test]
    fn invalid_multiplier_falls_back_to_neutral() {
        let descriptor = PlantEffectDescriptor {
            growth_multiplier: f64::NAN,
            oxygen_immune: false,
            temperature_immune: false,
            health_regen: 0,
            lifetime_secs: 10,
        };
        let effect = build_effect("Weed", &descriptor, 0, 300);
        assert!((effect.growth_multiplier - 1.0).abs() < f64::EPSILON);
    }
}
