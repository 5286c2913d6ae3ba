//! Growth & hunger simulator, run once per simulated second per slot.
//!
//! # Order of operations
//!
//! 1. Expire the plant effect (whatever the creature's state)
//! 2. Stop unless the creature is alive and growing
//! 3. Classify the slot as fouled (any non-immune hazard)
//! 4. Apply hazard damage; a fouled, hurt creature turns hungry; death stops
//! 5. Stop if fouled: hazards block growth
//! 6. Accumulate growth, scaled by the plant multiplier
//! 7. Adult hunger onset and periodic starvation damage; death stops
//! 8. Stage transition (egg to adult, adult to ready)
//!
//! Slots are independent: simulating one never reads another.

use tracing::{debug, info};

use pond_types::{LifecycleEvent, Slot, Stage};

use crate::config::LifeConfig;
use crate::death::{self, Death};
use crate::hazard;
use crate::plant;

/// Outcome of one simulated second for one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTickResult {
    /// Signals produced, in the order they happened.
    pub events: Vec<LifecycleEvent>,
    /// The death that happened this second, if any.
    pub death: Option<Death>,
}

impl SlotTickResult {
    fn died(mut self, death: Death) -> Self {
        self.events.push(death.event());
        self.death = Some(death);
        self
    }
}

/// Advance one slot by one simulated second ending at `now`.
pub fn simulate_slot(slot: &mut Slot, now: u64, config: &LifeConfig) -> SlotTickResult {
    let mut result = SlotTickResult::default();

    // 1. Plant expiry
    if let Some(ended) = plant::expire(slot, now) {
        result.events.push(ended);
    }

    // 2. Only living eggs and adults go further
    if !slot.alive || !slot.has_creature || !slot.stage.is_growing() {
        return result;
    }

    // 3. Fouled
    let fouled = slot.is_fouled();

    // 4. Hazard damage
    let damage = hazard::tick_damage(slot, config);
    if damage > 0 {
        slot.health = slot.health.saturating_sub(damage);
        debug!(slot = slot.index, damage, health = slot.health, "Hazard damage");
    }
    if fouled
        && below_hunger_threshold(slot, config)
        && slot.feed_count < slot.max_feed_count
        && !slot.hungry
    {
        become_hungry(slot, now, &mut result);
    }
    if slot.health == 0 {
        return result.died(death::kill(slot));
    }

    // 5. Hazards block growth
    if fouled {
        return result;
    }

    // 6. Growth
    slot.stage_elapsed += slot.growth_multiplier();

    // 7. Hunger and starvation (adults only)
    if slot.stage == Stage::Adult && slot.feed_count < slot.max_feed_count {
        let since_fed = slot
            .last_fed_at
            .map_or(slot.stage_elapsed, |fed_at| secs(now.saturating_sub(fed_at)));
        if since_fed > secs(config.hunger_onset_secs) && !slot.hungry {
            become_hungry(slot, now, &mut result);
        }
        if slot.hungry {
            let reference = slot
                .last_hunger_damage_at
                .or(slot.hungry_since)
                .unwrap_or(now);
            if now.saturating_sub(reference) >= config.hunger_damage_interval_secs {
                slot.health = slot.health.saturating_sub(config.hunger_damage);
                slot.last_hunger_damage_at = Some(now);
                debug!(slot = slot.index, health = slot.health, "Hunger damage");
                if slot.health == 0 {
                    return result.died(death::kill(slot));
                }
            }
        }
    }

    // 8. Stage transition
    if let Some(event) = advance_stage(slot) {
        result.events.push(event);
    }

    result
}

/// Move the slot to its next stage if its growth is complete.
fn advance_stage(slot: &mut Slot) -> Option<LifecycleEvent> {
    let from = slot.stage;
    match from {
        Stage::Egg if slot.stage_elapsed >= slot.egg_stage_duration => {
            slot.stage = Stage::Adult;
            slot.stage_elapsed = 0.0;
            slot.feed_count = 0;
            slot.hungry = false;
            slot.hungry_since = None;
            slot.last_fed_at = None;
            slot.last_hunger_damage_at = None;
        }
        Stage::Adult if slot.stage_elapsed >= slot.adult_stage_duration => {
            slot.stage = Stage::Ready;
            slot.stage_elapsed = 0.0;
            slot.hazards.clear_all();
            slot.hungry = false;
            slot.hungry_since = None;
            slot.last_hunger_damage_at = None;
        }
        _ => return None,
    }
    info!(slot = slot.index, from = %from, to = %slot.stage, "Stage advanced");
    Some(LifecycleEvent::StageAdvanced {
        slot: slot.index,
        from,
        to: slot.stage,
    })
}

fn become_hungry(slot: &mut Slot, now: u64, result: &mut SlotTickResult) {
    slot.hungry = true;
    slot.hungry_since = Some(now);
    debug!(slot = slot.index, "Creature became hungry");
    result.events.push(LifecycleEvent::BecameHungry { slot: slot.index });
}

/// Whether health is strictly below the hunger threshold percentage.
fn below_hunger_threshold(slot: &Slot, config: &LifeConfig) -> bool {
    let scaled_health = u64::from(slot.health).saturating_mul(100);
    let threshold = u64::from(slot.max_health).saturating_mul(u64::from(config.hunger_health_threshold_pct));
    scaled_health < threshold
}

/// Seconds as a float, saturating beyond `u32::MAX`.
fn secs(value: u64) -> f64 {
    u32::try_from(value).map_or(f64::from(u32::MAX), f64::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pond_types::{DeathCause, PlantEffectDescriptor, PlantSpec, SlotDefaults};

    use super::*;

    fn stocked(egg: f64, adult: f64) -> Slot {
        let mut slot = Slot::empty(0, SlotDefaults::default());
        slot.stage = Stage::Egg;
        slot.has_creature = true;
        slot.alive = true;
        slot.species = Some(String::from("Koi"));
        slot.egg_stage_duration = egg;
        slot.adult_stage_duration = adult;
        slot
    }

    fn run(slot: &mut Slot, from: u64, to: u64, config: &LifeConfig) -> Vec<LifecycleEvent> {
        (from..=to)
            .flat_map(|now| simulate_slot(slot, now, config).events)
            .collect()
    }

    #[test]
    fn egg_hatches_after_its_stage_duration() {
        let config = LifeConfig::default();
        let mut slot = stocked(120.0, 240.0);
        run(&mut slot, 1, 119, &config);
        assert_eq!(slot.stage, Stage::Egg);

        let events = run(&mut slot, 120, 120, &config);
        assert_eq!(slot.stage, Stage::Adult);
        assert!(slot.stage_elapsed.abs() < f64::EPSILON);
        assert_eq!(slot.feed_count, 0);
        assert!(!slot.hungry);
        assert!(events.contains(&LifecycleEvent::StageAdvanced {
            slot: 0,
            from: Stage::Egg,
            to: Stage::Adult,
        }));
    }

    #[test]
    fn oxygen_hazard_hurts_and_blocks_growth() {
        let config = LifeConfig::default();
        let mut slot = stocked(120.0, 240.0);
        slot.stage_elapsed = 10.0;
        slot.hazards.oxygen = true;

        simulate_slot(&mut slot, 1, &config);
        assert!(slot.health <= 97);
        assert!((slot.stage_elapsed - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fouled_and_hurt_creature_turns_hungry() {
        let config = LifeConfig::default();
        let mut slot = stocked(120.0, 240.0);
        slot.health = 91;
        slot.hazards.ph = true;

        let result = simulate_slot(&mut slot, 1, &config);
        assert_eq!(slot.health, 89);
        assert!(slot.hungry);
        assert_eq!(slot.hungry_since, Some(1));
        assert!(result.events.contains(&LifecycleEvent::BecameHungry { slot: 0 }));
    }

    #[test]
    fn health_floor_kills_and_clears_everything() {
        let config = LifeConfig::default();
        let mut slot = stocked(120.0, 240.0);
        slot.health = 2;
        slot.hazards.ph = true;
        slot.hazards.water_quality = true;

        let result = simulate_slot(&mut slot, 7, &config);
        let death = result.death.unwrap();
        assert_eq!(death.cause, DeathCause::Ph);
        assert_eq!(slot.stage, Stage::Dead);
        assert!(!slot.alive);
        assert!(slot.has_creature);
        assert!(!slot.hazards.any());
        assert!(slot.plant_effect.is_none());
        assert_eq!(slot.health, 0);
    }

    #[test]
    fn dead_and_ready_slots_are_inert() {
        let config = LifeConfig::default();
        let mut slot = stocked(1.0, 1.0);
        slot.stage = Stage::Ready;
        slot.health = 50;
        let before = slot.clone();
        assert!(simulate_slot(&mut slot, 1, &config).events.is_empty());
        assert_eq!(slot, before);

        death::kill(&mut slot);
        let before = slot.clone();
        simulate_slot(&mut slot, 2, &config);
        assert_eq!(slot, before);
    }

    #[test]
    fn plant_multiplier_speeds_growth() {
        let config = LifeConfig::default();
        let mut slot = stocked(10.0, 100.0);
        slot.stage = Stage::Adult;
        let spec = PlantSpec {
            name: String::from("Duckweed"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 2.0,
                oxygen_immune: false,
                temperature_immune: false,
                health_regen: 0,
                lifetime_secs: 100,
            },
        };
        plant::attach(&mut slot, &spec, 0, &config).unwrap();
        run(&mut slot, 1, 5, &config);
        assert!((slot.stage_elapsed - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn plant_expires_once_on_its_deadline() {
        let config = LifeConfig::default();
        let mut slot = stocked(100.0, 100.0);
        slot.stage = Stage::Adult;
        let spec = PlantSpec {
            name: String::from("Elodea"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 1.0,
                oxygen_immune: true,
                temperature_immune: false,
                health_regen: 0,
                lifetime_secs: 3,
            },
        };
        plant::attach(&mut slot, &spec, 0, &config).unwrap();
        let events = run(&mut slot, 1, 3, &config);
        assert!(slot.plant_effect.is_none());
        let ended = events
            .iter()
            .filter(|event| matches!(event, LifecycleEvent::PlantEffectEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn starving_adult_takes_periodic_damage() {
        let config = LifeConfig::default();
        let mut slot = stocked(1.0, 10_000.0);
        slot.stage = Stage::Adult;
        slot.last_fed_at = Some(0);

        run(&mut slot, 1, config.hunger_onset_secs, &config);
        assert!(!slot.hungry);
        assert_eq!(slot.health, 100);

        let onset = config.hunger_onset_secs + 1;
        run(&mut slot, onset, onset, &config);
        assert!(slot.hungry);
        assert_eq!(slot.health, 100);

        let first_hit = onset + config.hunger_damage_interval_secs;
        run(&mut slot, onset + 1, first_hit, &config);
        assert_eq!(slot.health, 100 - config.hunger_damage);
        assert_eq!(slot.last_hunger_damage_at, Some(first_hit));
    }

    #[test]
    fn starvation_death_is_labelled_hunger() {
        let config = LifeConfig::default();
        let mut slot = stocked(1.0, 10_000.0);
        slot.stage = Stage::Adult;
        slot.hungry = true;
        slot.hungry_since = Some(0);
        slot.health = config.hunger_damage;

        let result = simulate_slot(&mut slot, config.hunger_damage_interval_secs, &config);
        assert_eq!(result.death.map(|death| death.cause), Some(DeathCause::Hunger));
    }

    #[test]
    fn exhausted_feed_budget_stops_hunger() {
        let config = LifeConfig::default();
        let mut slot = stocked(1.0, 10_000.0);
        slot.stage = Stage::Adult;
        slot.feed_count = slot.max_feed_count;
        run(&mut slot, 1, 500, &config);
        assert!(!slot.hungry);
        assert_eq!(slot.health, 100);
    }

    #[test]
    fn ready_clears_hazards_and_hunger() {
        let config = LifeConfig::default();
        let mut slot = stocked(1.0, 2.0);
        slot.stage = Stage::Adult;
        slot.stage_elapsed = 1.0;
        slot.hungry = true;
        slot.hungry_since = Some(0);
        simulate_slot(&mut slot, 1, &config);
        assert_eq!(slot.stage, Stage::Ready);
        assert!(!slot.hungry);
        assert!(!slot.hazards.any());
    }

    #[test]
    fn stage_never_moves_backwards() {
        let config = LifeConfig::default();
        let mut slot = stocked(30.0, 60.0);
        let mut last = slot.stage;
        for now in 1..=200 {
            simulate_slot(&mut slot, now, &config);
            assert!(slot.stage >= last);
            last = slot.stage;
        }
        assert_eq!(slot.stage, Stage::Ready);
    }
}
