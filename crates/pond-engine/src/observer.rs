//! Tick observer that writes lifecycle signals to the log.

use tracing::{debug, info, warn};

use pond_core::{LifecycleObserver, TickSummary};
use pond_types::LifecycleEvent;

/// Logs every tick at `debug` and each notable signal at `info`/`warn`.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    deaths: u64,
}

impl LoggingObserver {
    /// Deaths seen since startup.
    pub const fn deaths(&self) -> u64 {
        self.deaths
    }
}

impl LifecycleObserver for LoggingObserver {
    fn on_tick(&mut self, summary: &TickSummary) {
        debug!(
            tick = summary.tick,
            day = summary.day,
            phase = %summary.phase,
            living = summary.living,
            "Tick"
        );
        for event in &summary.events {
            match event {
                LifecycleEvent::CreatureDied { slot, stage, cause } => {
                    self.deaths = self.deaths.saturating_add(1);
                    warn!(slot, stage = %stage, cause = %cause, "Creature died");
                }
                LifecycleEvent::StageAdvanced { slot, from, to } => {
                    info!(slot, from = %from, to = %to, "Creature advanced");
                }
                LifecycleEvent::BecameHungry { slot } => {
                    info!(slot, "Creature is hungry");
                }
                LifecycleEvent::PlantEffectEnded { slot, plant } => {
                    info!(slot, plant = %plant, "Plant effect ended");
                }
                LifecycleEvent::HazardTriggered { hazard, slots } => {
                    info!(hazard = %hazard, slots = slots.len(), "Hazard triggered");
                }
                LifecycleEvent::PhaseChanged { .. } | LifecycleEvent::PlantEffectActivated { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pond_types::{DayPhase, DeathCause, Stage};

    use super::*;

    #[test]
    fn counts_deaths() {
        let mut observer = LoggingObserver::default();
        observer.on_tick(&TickSummary {
            tick: 9,
            day: 2,
            phase: DayPhase::Day,
            living: 0,
            events: vec![LifecycleEvent::CreatureDied {
                slot: 0,
                stage: Stage::Adult,
                cause: DeathCause::Hunger,
            }],
        });
        assert_eq!(observer.deaths(), 1);
    }
}
