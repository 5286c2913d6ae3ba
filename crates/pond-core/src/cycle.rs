//! Day/night cycle controller.
//!
//! `Day --(phase over)--> Night --(phase over)--> Day ...`
//!
//! Entering night fouls the water of every occupied slot once per day.
//! Entering day applies the overnight neglect rule (a growing creature still
//! sitting in dirty water, bad pH or, unless immune, low oxygen dies), then
//! starts a new day: the day counter increments, every per-day latch
//! reopens and feeding budgets refill.

use tracing::info;

use pond_life::Death;
use pond_life::death;
use pond_life::hazard;
use pond_types::{DayPhase, HazardKind, LifecycleEvent, Pond, PondCycleState};

use crate::config::CycleConfig;
use crate::scheduler::HazardScheduler;

/// What one second of the cycle produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStep {
    /// Signals, in the order they happened.
    pub events: Vec<LifecycleEvent>,
    /// Creatures that died of overnight neglect.
    pub deaths: Vec<Death>,
}

/// The day/night state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNightCycle {
    state: PondCycleState,
    day_secs: u64,
    night_secs: u64,
}

impl DayNightCycle {
    /// Start on the first second of day 1.
    pub const fn new(config: &CycleConfig) -> Self {
        Self {
            state: PondCycleState {
                phase: DayPhase::Day,
                phase_remaining: config.day_secs,
                current_day: 1,
                dirt_applied_today: false,
            },
            day_secs: config.day_secs,
            night_secs: config.night_secs,
        }
    }

    /// Current cycle state.
    pub const fn state(&self) -> PondCycleState {
        self.state
    }

    /// Current in-game day.
    pub const fn current_day(&self) -> u32 {
        self.state.current_day
    }

    /// Current phase.
    pub const fn phase(&self) -> DayPhase {
        self.state.phase
    }

    /// Jump to the start of `day` (used when the store reports the day).
    pub const fn restart_at_day(&mut self, day: u32) {
        self.state = PondCycleState {
            phase: DayPhase::Day,
            phase_remaining: self.day_secs,
            current_day: if day == 0 { 1 } else { day },
            dirt_applied_today: false,
        };
    }

    /// Count one second, changing phase when the current one runs out.
    pub fn advance(&mut self, pond: &mut Pond, scheduler: &mut HazardScheduler) -> CycleStep {
        self.state.phase_remaining = self.state.phase_remaining.saturating_sub(1);
        if self.state.phase_remaining > 0 {
            return CycleStep::default();
        }
        match self.state.phase {
            DayPhase::Day => self.enter_night(pond),
            DayPhase::Night => self.enter_day(pond, scheduler),
        }
    }

    fn enter_night(&mut self, pond: &mut Pond) -> CycleStep {
        self.state.phase = DayPhase::Night;
        self.state.phase_remaining = self.night_secs;
        info!(day = self.state.current_day, phase = %DayPhase::Night, "Night falls");

        let mut step = CycleStep::default();
        step.events.push(LifecycleEvent::PhaseChanged {
            phase: DayPhase::Night,
            day: self.state.current_day,
        });
        if !self.state.dirt_applied_today {
            self.state.dirt_applied_today = true;
            let slots = hazard::raise(pond, HazardKind::WaterQuality);
            step.events.push(LifecycleEvent::HazardTriggered {
                hazard: HazardKind::WaterQuality,
                slots,
            });
        }
        step
    }

    fn enter_day(&mut self, pond: &mut Pond, scheduler: &mut HazardScheduler) -> CycleStep {
        let mut step = CycleStep::default();

        // Neglect is judged before any latch reopens.
        for slot in &mut pond.slots {
            if slot.is_occupied() && hazard::neglected_overnight(slot) {
                let died = death::kill(slot);
                step.events.push(died.event());
                step.deaths.push(died);
            }
        }

        self.state.current_day = self.state.current_day.saturating_add(1);
        self.state.dirt_applied_today = false;
        scheduler.reset_latches();
        for slot in &mut pond.slots {
            slot.feed_count = 0;
        }

        self.state.phase = DayPhase::Day;
        self.state.phase_remaining = self.day_secs;
        info!(
            day = self.state.current_day,
            phase = %DayPhase::Day,
            neglect_deaths = step.deaths.len(),
            "Dawn"
        );
        step.events.push(LifecycleEvent::PhaseChanged {
            phase: DayPhase::Day,
            day: self.state.current_day,
        });
        step
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pond_types::{DeathCause, PlantEffect, PlayerId, SlotDefaults, Stage};

    use super::*;
    use crate::config::HazardConfig;

    fn short_cycle() -> DayNightCycle {
        DayNightCycle::new(&CycleConfig {
            day_secs: 3,
            night_secs: 2,
            tick_interval_ms: 1000,
        })
    }

    fn pond() -> Pond {
        let mut pond = Pond::new(PlayerId::new(), 1, 3, SlotDefaults::default());
        for slot in &mut pond.slots {
            slot.stage = Stage::Adult;
            slot.has_creature = true;
            slot.alive = true;
        }
        pond
    }

    fn scheduler() -> HazardScheduler {
        HazardScheduler::new(&HazardConfig::default())
    }

    fn run(cycle: &mut DayNightCycle, pond: &mut Pond, sched: &mut HazardScheduler, secs: u32) -> CycleStep {
        let mut all = CycleStep::default();
        for _ in 0..secs {
            let step = cycle.advance(pond, sched);
            all.events.extend(step.events);
            all.deaths.extend(step.deaths);
        }
        all
    }

    #[test]
    fn night_fouls_water_once() {
        let mut cycle = short_cycle();
        let mut pond = pond();
        let mut sched = scheduler();

        let step = run(&mut cycle, &mut pond, &mut sched, 3);
        assert_eq!(cycle.phase(), DayPhase::Night);
        assert!(pond.slots.iter().all(|slot| slot.hazards.water_quality));
        assert!(step.events.contains(&LifecycleEvent::PhaseChanged {
            phase: DayPhase::Night,
            day: 1,
        }));
        assert!(cycle.state().dirt_applied_today);
    }

    #[test]
    fn repeated_night_transition_does_not_foul_again() {
        let mut cycle = short_cycle();
        let mut pond = pond();
        let mut sched = scheduler();

        run(&mut cycle, &mut pond, &mut sched, 3);
        assert_eq!(cycle.phase(), DayPhase::Night);
        for slot in &mut pond.slots {
            slot.hazards.water_quality = false;
        }

        let again = cycle.enter_night(&mut pond);
        assert_eq!(cycle.phase(), DayPhase::Night);
        assert_eq!(cycle.current_day(), 1);
        assert!(pond.slots.iter().all(|slot| !slot.hazards.water_quality));
        assert!(
            !again
                .events
                .iter()
                .any(|event| matches!(event, LifecycleEvent::HazardTriggered { .. }))
        );
    }

    #[test]
    fn dawn_kills_neglected_creatures_and_starts_a_new_day() {
        let mut cycle = short_cycle();
        let mut pond = pond();
        let mut sched = scheduler();

        run(&mut cycle, &mut pond, &mut sched, 3);
        // Slot 0 is cleaned, slot 1 stays dirty, slot 2 is cleaned but has bad pH.
        pond.slot_mut(0).unwrap().hazards.water_quality = false;
        pond.slot_mut(2).unwrap().hazards.water_quality = false;
        pond.slot_mut(2).unwrap().hazards.ph = true;
        pond.slot_mut(0).unwrap().feed_count = 2;

        let step = run(&mut cycle, &mut pond, &mut sched, 2);
        assert_eq!(cycle.phase(), DayPhase::Day);
        assert_eq!(cycle.current_day(), 2);
        assert!(!cycle.state().dirt_applied_today);
        assert_eq!(pond.slot(0).unwrap().stage, Stage::Adult);
        assert_eq!(pond.slot(0).unwrap().feed_count, 0);
        assert_eq!(pond.slot(1).unwrap().death_cause, Some(DeathCause::WaterQuality));
        assert_eq!(pond.slot(2).unwrap().death_cause, Some(DeathCause::Ph));
        assert_eq!(step.deaths.len(), 2);
    }

    #[test]
    fn oxygen_immunity_survives_dawn() {
        let mut cycle = short_cycle();
        let mut pond = pond();
        let mut sched = scheduler();
        run(&mut cycle, &mut pond, &mut sched, 3);
        let slot = pond.slot_mut(0).unwrap();
        slot.hazards.water_quality = false;
        slot.hazards.oxygen = true;
        slot.plant_effect = Some(PlantEffect {
            plant: String::from("Elodea"),
            growth_multiplier: 1.0,
            oxygen_immune: true,
            temperature_immune: false,
            health_regen_per_activation: 0,
            attached_at: 0,
            expires_at: 1_000,
        });
        run(&mut cycle, &mut pond, &mut sched, 2);
        assert_eq!(pond.slot(0).unwrap().stage, Stage::Adult);
    }

    #[test]
    fn ready_slots_are_spared_at_night_and_dawn() {
        let mut cycle = short_cycle();
        let mut pond = pond();
        pond.slot_mut(1).unwrap().stage = Stage::Ready;
        let mut sched = scheduler();
        run(&mut cycle, &mut pond, &mut sched, 5);
        let slot = pond.slot(1).unwrap();
        assert_eq!(slot.stage, Stage::Ready);
        assert!(!slot.hazards.any());
    }

    #[test]
    fn dawn_reopens_hazard_latches() {
        let mut cycle = short_cycle();
        let mut pond = pond();
        let mut sched = scheduler();
        sched.on_hazard_interval(&mut pond, HazardKind::Temperature);
        assert!(sched.triggered_today(HazardKind::Temperature));
        run(&mut cycle, &mut pond, &mut sched, 5);
        assert!(!sched.triggered_today(HazardKind::Temperature));
    }
}
