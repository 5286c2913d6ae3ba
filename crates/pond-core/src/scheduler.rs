//! Hazard scheduler: three repeating timers with once-per-day latches.
//!
//! pH, oxygen and temperature each have their own interval and their own
//! triggered-today latch, so they can co-occur. When a timer fires and its
//! latch is still open, the hazard is raised on every occupied slot and the
//! latch closes until the cycle controller reopens it at dawn.

use tracing::{debug, info};

use pond_types::{HazardKind, LifecycleEvent, Pond};

use crate::config::HazardConfig;

/// One repeating hazard timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardTimer {
    /// The hazard this timer drives.
    pub kind: HazardKind,
    /// Seconds between firings (0 = disabled).
    pub interval_secs: u64,
    /// Seconds since the last firing.
    pub elapsed_secs: u64,
    /// Whether the hazard was already raised today.
    pub triggered_today: bool,
}

impl HazardTimer {
    /// A fresh timer with an open latch.
    pub const fn new(kind: HazardKind, interval_secs: u64) -> Self {
        Self {
            kind,
            interval_secs,
            elapsed_secs: 0,
            triggered_today: false,
        }
    }

    /// Count one second. Returns true when the interval elapses.
    fn advance(&mut self) -> bool {
        if self.interval_secs == 0 {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        if self.elapsed_secs >= self.interval_secs {
            self.elapsed_secs = 0;
            true
        } else {
            false
        }
    }
}

/// The three scheduled hazard timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardScheduler {
    timers: Vec<HazardTimer>,
}

impl HazardScheduler {
    /// Build the timers from configuration, in order pH, oxygen, temperature.
    pub fn new(config: &HazardConfig) -> Self {
        let timers = HazardKind::SCHEDULED
            .into_iter()
            .map(|kind| HazardTimer::new(kind, config.interval_for(kind).unwrap_or(0)))
            .collect();
        Self { timers }
    }

    /// Advance every timer by one second and fire the ones that elapsed.
    pub fn advance(&mut self, pond: &mut Pond) -> Vec<LifecycleEvent> {
        let due: Vec<HazardKind> = self
            .timers
            .iter_mut()
            .filter_map(|timer| timer.advance().then_some(timer.kind))
            .collect();
        due.into_iter()
            .filter_map(|kind| self.on_hazard_interval(pond, kind))
            .collect()
    }

    /// Handle one firing of the timer for `kind`.
    ///
    /// Raises the hazard on every occupied slot unless it was already raised
    /// today. Returns the trigger signal when the hazard was raised.
    pub fn on_hazard_interval(&mut self, pond: &mut Pond, kind: HazardKind) -> Option<LifecycleEvent> {
        let timer = self.timers.iter_mut().find(|timer| timer.kind == kind)?;
        if timer.triggered_today {
            debug!(hazard = %kind, "Hazard already triggered today");
            return None;
        }
        timer.triggered_today = true;
        let slots = pond_life::hazard::raise(pond, kind);
        info!(hazard = %kind, slots = slots.len(), "Hazard triggered");
        Some(LifecycleEvent::HazardTriggered { hazard: kind, slots })
    }

    /// Whether `kind` was already raised today.
    pub fn triggered_today(&self, kind: HazardKind) -> bool {
        self.timers
            .iter()
            .any(|timer| timer.kind == kind && timer.triggered_today)
    }

    /// Reopen every latch. Called by the cycle controller at dawn.
    pub fn reset_latches(&mut self) {
        for timer in &mut self.timers {
            timer.triggered_today = false;
        }
    }
}
