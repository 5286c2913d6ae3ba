//! The pond simulation engine: one pond, one clock, one tick at a time.
//!
//! [`PondSimulationEngine`] owns the [`Pond`] and every scheduled component
//! that mutates it. Each [`tick`](PondSimulationEngine::tick) is synchronous
//! and deterministic for a given pond state:
//!
//! 1. Refuse to run when stopped
//! 2. Advance the clock by one second
//! 3. Advance the hazard timers (pH, oxygen, temperature)
//! 4. Advance the day/night cycle
//! 5. Simulate every slot in index order
//!
//! Caretaker intents and store snapshots are applied through the same
//! value, so nothing else ever writes to the pond.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use pond_life::{Catalog, CatalogError, LifeConfig, LifeError, actions, harvest, plant, reconcile};
use pond_types::{
    DayPhase, HazardKind, LifecycleEvent, PlayerId, Pond, PondCycleState, PondSnapshot, Slot,
    SlotSnapshot,
};

use crate::clock::{ClockError, PondClock};
use crate::config::PondConfig;
use crate::cycle::DayNightCycle;
use crate::intent::{Intent, IntentOutcome};
use crate::scheduler::HazardScheduler;

/// Errors that can occur during tick execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    /// The engine is stopped and will not advance.
    #[error("engine is stopped")]
    Stopped,

    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The simulated second that was executed.
    pub tick: u64,
    /// In-game day at the end of the tick.
    pub day: u32,
    /// Phase at the end of the tick.
    pub phase: DayPhase,
    /// Living creatures at the end of the tick.
    pub living: u32,
    /// Every signal produced, in order.
    pub events: Vec<LifecycleEvent>,
}

/// The simulation engine for one player's pond.
#[derive(Debug, Clone)]
pub struct PondSimulationEngine {
    pond: Pond,
    clock: PondClock,
    scheduler: HazardScheduler,
    cycle: DayNightCycle,
    life: LifeConfig,
    catalog: Catalog,
    running: bool,
}

impl PondSimulationEngine {
    /// Build a stopped engine with an empty pond for `player_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the configured catalog is invalid.
    pub fn new(config: &PondConfig, player_id: PlayerId) -> Result<Self, CatalogError> {
        let catalog = Catalog::from_items(config.catalog.clone())?;
        let pond = Pond::new(
            player_id,
            config.pond.rows,
            config.pond.cols,
            config.life.slot_defaults(),
        );
        Ok(Self::from_parts(pond, config, catalog))
    }

    /// Build a stopped engine around an existing pond and catalog.
    pub fn from_parts(pond: Pond, config: &PondConfig, catalog: Catalog) -> Self {
        Self {
            pond,
            clock: PondClock::new(),
            scheduler: HazardScheduler::new(&config.hazards),
            cycle: DayNightCycle::new(&config.cycle),
            life: config.life,
            catalog,
            running: false,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Allow ticks to run.
    pub fn start(&mut self) {
        if !self.running {
            info!(slots = self.pond.len(), day = self.cycle.current_day(), "Engine started");
        }
        self.running = true;
    }

    /// Refuse further ticks until started again.
    pub fn stop(&mut self) {
        if self.running {
            info!(now = self.clock.now(), "Engine stopped");
        }
        self.running = false;
    }

    /// Whether ticks are allowed.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the pond by one simulated second.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Stopped`] without mutating anything when the
    /// engine is stopped, or [`TickError::Clock`] on clock overflow.
    pub fn tick(&mut self) -> Result<TickSummary, TickError> {
        if !self.running {
            return Err(TickError::Stopped);
        }
        let now = self.clock.advance()?;
        let mut events = self.scheduler.advance(&mut self.pond);

        let step = self.cycle.advance(&mut self.pond, &mut self.scheduler);
        events.extend(step.events);

        for slot in &mut self.pond.slots {
            let result = pond_life::simulate_slot(slot, now, &self.life);
            events.extend(result.events);
        }

        let living = self
            .pond
            .slots
            .iter()
            .filter(|slot| slot.alive && slot.has_creature)
            .count();
        let summary = TickSummary {
            tick: now,
            day: self.cycle.current_day(),
            phase: self.cycle.phase(),
            living: u32::try_from(living).unwrap_or(u32::MAX),
            events,
        };
        debug!(tick = now, day = summary.day, events = summary.events.len(), "Tick complete");
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Replace local state with the store's view of the pond.
    ///
    /// `None` means the store has no pond for this player: every slot is
    /// emptied and the day counter restarts at 1. Whenever the day restarts
    /// the hazard latches reopen with it.
    pub fn reconcile(&mut self, snapshot: Option<&PondSnapshot>) {
        let now = self.clock.now();
        let Some(snapshot) = snapshot else {
            let defaults = self.life.slot_defaults();
            self.pond.pond_id = None;
            for slot in &mut self.pond.slots {
                slot.reset(defaults);
                slot.remote_id = None;
            }
            self.cycle.restart_at_day(1);
            self.scheduler.reset_latches();
            info!("Reconciled with no remote pond: reset to empty");
            return;
        };

        self.pond.pond_id = Some(snapshot.pond_id);
        for remote in &snapshot.slots {
            if remote.index >= self.pond.len() {
                warn!(index = remote.index, slots = self.pond.len(), "Ignoring snapshot slot outside the grid");
            }
        }
        let defaults = self.life.slot_defaults();
        for slot in &mut self.pond.slots {
            match snapshot.slots.iter().find(|remote| remote.index == slot.index) {
                Some(remote) => reconcile::apply_snapshot(slot, remote, now, &self.life),
                None => slot.reset(defaults),
            }
        }
        if let Some(day) = snapshot.current_day
            && day != self.cycle.current_day()
        {
            self.cycle.restart_at_day(day);
            self.scheduler.reset_latches();
        }
        info!(
            pond_id = %snapshot.pond_id,
            slots = snapshot.slots.len(),
            day = self.cycle.current_day(),
            "Reconciled pond with store"
        );
    }

    /// Apply the store's view of a single slot, leaving every other slot
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::SlotOutOfRange`] if the index is not in the grid.
    pub fn apply_slot_snapshot(&mut self, snapshot: &SlotSnapshot) -> Result<(), LifeError> {
        let now = self.clock.now();
        let life = self.life;
        let slot = self.slot_mut(snapshot.index)?;
        reconcile::apply_snapshot(slot, snapshot, now, &life);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Caretaker intents
    // -----------------------------------------------------------------------

    /// Validate and apply an intent to one slot.
    ///
    /// `multiplier` is the market bonus in force, used only by harvests.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::Rejected`] (or [`LifeError::SlotOutOfRange`])
    /// without mutating anything when a precondition fails.
    pub fn apply_intent(
        &mut self,
        index: usize,
        intent: &Intent,
        multiplier: Decimal,
    ) -> Result<IntentOutcome, LifeError> {
        match intent {
            Intent::Stock { creature } => self.stock(index, creature),
            Intent::Feed => self.feed(index),
            Intent::ApplyPlant { plant } => self.apply_plant(index, plant),
            Intent::ApplySupplement { supplement } => self.apply_supplement(index, supplement),
            Intent::ResolveHazard { hazard } => self.resolve_hazard(index, *hazard),
            Intent::Harvest => self.harvest(index, multiplier),
            Intent::RemoveDead => self.remove_dead(index),
        }
    }

    /// Stock an empty slot with a catalog creature.
    ///
    /// # Errors
    ///
    /// Rejects unknown creatures and occupied slots.
    pub fn stock(&mut self, index: usize, creature: &str) -> Result<IntentOutcome, LifeError> {
        let spec = self.catalog.creature(creature)?.clone();
        let slot = self.slot_mut(index)?;
        let event = actions::stock(slot, &spec)?;
        Ok(IntentOutcome {
            events: vec![event],
            reward: None,
        })
    }

    /// Feed a hungry creature.
    ///
    /// # Errors
    ///
    /// Rejects per [`actions::feed`].
    pub fn feed(&mut self, index: usize) -> Result<IntentOutcome, LifeError> {
        let now = self.clock.now();
        actions::feed(self.slot_mut(index)?, now)?;
        Ok(IntentOutcome::default())
    }

    /// Attach a catalog plant's effect.
    ///
    /// # Errors
    ///
    /// Rejects unknown plants, eggs, dead and empty slots.
    pub fn apply_plant(&mut self, index: usize, name: &str) -> Result<IntentOutcome, LifeError> {
        let spec = self.catalog.plant(name)?.clone();
        let now = self.clock.now();
        let life = self.life;
        let event = plant::attach(self.slot_mut(index)?, &spec, now, &life)?;
        Ok(IntentOutcome {
            events: vec![event],
            reward: None,
        })
    }

    /// Apply a catalog supplement.
    ///
    /// # Errors
    ///
    /// Rejects unknown supplements and slots without a growing creature.
    pub fn apply_supplement(&mut self, index: usize, name: &str) -> Result<IntentOutcome, LifeError> {
        let spec = self.catalog.supplement(name)?.clone();
        actions::apply_supplement(self.slot_mut(index)?, &spec)?;
        Ok(IntentOutcome::default())
    }

    /// Clear one active hazard.
    ///
    /// # Errors
    ///
    /// Rejects slots without a living creature or without that hazard.
    pub fn resolve_hazard(&mut self, index: usize, kind: HazardKind) -> Result<IntentOutcome, LifeError> {
        actions::resolve_hazard(self.slot_mut(index)?, kind)?;
        Ok(IntentOutcome::default())
    }

    /// Harvest a ready creature under `multiplier`, resetting the slot.
    ///
    /// # Errors
    ///
    /// Rejects slots that are not ready; fails on reward overflow.
    pub fn harvest(&mut self, index: usize, multiplier: Decimal) -> Result<IntentOutcome, LifeError> {
        let defaults = self.life.slot_defaults();
        let outcome = harvest::harvest(self.slot_mut(index)?, multiplier, defaults)?;
        Ok(IntentOutcome {
            events: Vec::new(),
            reward: Some(outcome.reward),
        })
    }

    /// Remove a dead occupant.
    ///
    /// # Errors
    ///
    /// Rejects slots that are not dead.
    pub fn remove_dead(&mut self, index: usize) -> Result<IntentOutcome, LifeError> {
        let defaults = self.life.slot_defaults();
        actions::remove_dead(self.slot_mut(index)?, defaults)?;
        Ok(IntentOutcome::default())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The pond.
    pub const fn pond(&self) -> &Pond {
        &self.pond
    }

    /// One slot, if the index is in the grid.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.pond.slot(index)
    }

    /// The current simulated second.
    pub const fn now(&self) -> u64 {
        self.clock.now()
    }

    /// The day/night state.
    pub const fn cycle_state(&self) -> PondCycleState {
        self.cycle.state()
    }

    /// The hazard scheduler.
    pub const fn scheduler(&self) -> &HazardScheduler {
        &self.scheduler
    }

    /// Fire the timer for `kind` now, outside its interval.
    pub fn fire_hazard(&mut self, kind: HazardKind) -> Option<LifecycleEvent> {
        self.scheduler.on_hazard_interval(&mut self.pond, kind)
    }

    /// The item catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Slot-level tunables.
    pub const fn life_config(&self) -> &LifeConfig {
        &self.life
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Slot, LifeError> {
        let len = self.pond.len();
        self.pond
            .slot_mut(index)
            .ok_or(LifeError::SlotOutOfRange { index, len })
    }
}
