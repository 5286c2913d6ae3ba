//! Integration tests for the engine's day/night cycle.
//!
//! A short day is configured so a full day/night turn fits in a handful of
//! ticks: night fouls the water, dawn kills whoever was left in it.

#![allow(clippy::unwrap_used)]

use pond_core::{PondConfig, PondSimulationEngine, TickError};
use pond_types::{DayPhase, DeathCause, HazardKind, LifecycleEvent, PlayerId, Stage};

fn short_day_engine() -> PondSimulationEngine {
    let mut config = PondConfig::default();
    config.pond.rows = 1;
    config.pond.cols = 3;
    config.cycle.day_secs = 5;
    config.cycle.night_secs = 3;
    let mut engine = PondSimulationEngine::new(&config, PlayerId::new()).unwrap();
    engine.start();
    engine
}

fn run(engine: &mut PondSimulationEngine, ticks: u32) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(engine.tick().unwrap().events);
    }
    events
}

#[test]
fn neglected_water_kills_at_dawn() {
    let mut engine = short_day_engine();
    engine.stock(0, "Goldfish").unwrap();

    let events = run(&mut engine, 5);
    assert_eq!(engine.cycle_state().phase, DayPhase::Night);
    assert!(events.contains(&LifecycleEvent::HazardTriggered {
        hazard: HazardKind::WaterQuality,
        slots: vec![0],
    }));
    assert!(engine.slot(0).unwrap().hazards.water_quality);
    // Empty slots are never fouled.
    assert!(!engine.slot(1).unwrap().hazards.water_quality);

    let events = run(&mut engine, 3);
    assert_eq!(engine.cycle_state().phase, DayPhase::Day);
    assert_eq!(engine.cycle_state().current_day, 2);
    assert!(events.contains(&LifecycleEvent::CreatureDied {
        slot: 0,
        stage: Stage::Egg,
        cause: DeathCause::WaterQuality,
    }));

    let slot = engine.slot(0).unwrap();
    assert_eq!(slot.stage, Stage::Dead);
    assert!(slot.has_creature);
    assert!(!slot.hazards.any());

    engine.remove_dead(0).unwrap();
    assert_eq!(engine.slot(0).unwrap().stage, Stage::Empty);
}

#[test]
fn cleaned_water_survives_the_night() {
    let mut engine = short_day_engine();
    engine.stock(0, "Goldfish").unwrap();
    run(&mut engine, 5);

    engine.resolve_hazard(0, HazardKind::WaterQuality).unwrap();
    run(&mut engine, 3);

    let slot = engine.slot(0).unwrap();
    assert_eq!(slot.stage, Stage::Egg);
    assert!(slot.alive);
    assert_eq!(engine.cycle_state().current_day, 2);
}

#[test]
fn water_is_fouled_once_per_night() {
    let mut engine = short_day_engine();
    engine.stock(0, "Goldfish").unwrap();
    run(&mut engine, 5);
    engine.resolve_hazard(0, HazardKind::WaterQuality).unwrap();

    let events = run(&mut engine, 2);
    assert!(!engine.slot(0).unwrap().hazards.water_quality);
    assert!(!events
        .iter()
        .any(|event| matches!(event, LifecycleEvent::HazardTriggered { .. })));
}

#[test]
fn stopped_engine_does_not_advance() {
    let mut engine = short_day_engine();
    engine.stock(0, "Goldfish").unwrap();
    run(&mut engine, 2);
    engine.stop();

    let before = engine.slot(0).unwrap().clone();
    assert_eq!(engine.tick().unwrap_err(), TickError::Stopped);
    assert_eq!(engine.now(), 2);
    assert_eq!(engine.slot(0).unwrap(), &before);
}
