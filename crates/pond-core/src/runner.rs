//! Timer-driven async runtime around the engine.
//!
//! [`PondRuntime::start`] spawns one task that owns every timer:
//!
//! - **Tick timer**: one engine tick per `cycle.tick_interval_ms`
//! - **Bonus poll**: refreshes the [`BonusBoard`] every
//!   `store.bonus_poll_secs` (only with a store)
//! - **Signal forwarding**: each tick's store-relevant signals are pushed in
//!   a background task tracked by a `JoinSet`
//!
//! [`PondRuntime::stop`] tears all of them down together: the loop leaves
//! its `select!`, the intervals are dropped, in-flight forwards are
//! aborted, and the engine is stopped so no further tick can run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use pond_ledger::Wallet;

use crate::bonus::BonusBoard;
use crate::config::PondConfig;
use crate::engine::{TickError, TickSummary};
use crate::gateway::SlotGateway;
use crate::store::PondStore;

/// Errors that end the runtime loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// The runtime task panicked or was cancelled.
    #[error("runtime task failed: {message}")]
    Task {
        /// Join error text.
        message: String,
    },
}

/// Result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed by this runtime.
    pub total_ticks: u64,
    /// In-game day when the runtime stopped.
    pub final_day: u32,
}

/// Callback invoked after each tick completes.
pub trait LifecycleObserver: Send {
    /// Called with every successful tick's summary.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// An observer that ignores everything.
pub struct NoOpObserver;

impl LifecycleObserver for NoOpObserver {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Timer periods for the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Real time between engine ticks.
    pub tick_interval: Duration,
    /// Real time between market bonus polls. `None` disables polling.
    pub bonus_poll: Option<Duration>,
}

impl RuntimeSettings {
    /// Derive timer periods from configuration. A zero bonus poll period
    /// disables polling.
    pub fn from_config(config: &PondConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.cycle.tick_interval_ms.max(1)),
            bonus_poll: (config.store.bonus_poll_secs > 0)
                .then(|| Duration::from_secs(config.store.bonus_poll_secs)),
        }
    }
}

/// Stop and pause flags shared between the runtime task and its owner.
///
/// Atomic fields keep the tick path lock-free; the [`Notify`] wakes the
/// loop when a stop is requested.
#[derive(Debug, Default)]
pub struct ControlState {
    stop_requested: AtomicBool,
    paused: AtomicBool,
    notify: Notify,
}

impl ControlState {
    /// Fresh state: running, not paused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a clean stop and wake the loop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Skip ticks until resumed. Timers keep running.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume ticking.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// Whether ticks are being skipped.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Resolve once a stop has been requested.
    pub async fn wait_for_stop(&self) {
        loop {
            // Register before checking so a concurrent request is not lost.
            let notified = self.notify.notified();
            if self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }
}

/// Handle to a running pond.
pub struct PondRuntime {
    control: Arc<ControlState>,
    handle: JoinHandle<Result<RunSummary, RunnerError>>,
}

impl PondRuntime {
    /// Start the engine and spawn the timer loop.
    pub fn start<S, W, O>(
        gateway: Arc<SlotGateway<S, W>>,
        board: Arc<BonusBoard>,
        settings: RuntimeSettings,
        observer: O,
    ) -> Self
    where
        S: PondStore + 'static,
        W: Wallet + Send + Sync + 'static,
        O: LifecycleObserver + 'static,
    {
        let control = Arc::new(ControlState::new());
        let handle = tokio::spawn(run_loop(
            gateway,
            board,
            settings,
            observer,
            Arc::clone(&control),
        ));
        Self { control, handle }
    }

    /// Shared pause/stop controls.
    pub fn control(&self) -> Arc<ControlState> {
        Arc::clone(&self.control)
    }

    /// Whether the loop has already exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Tear down every timer and wait for the loop to exit.
    ///
    /// # Errors
    ///
    /// Returns the [`RunnerError`] that ended the loop, or
    /// [`RunnerError::Task`] if the task itself failed.
    pub async fn stop(self) -> Result<RunSummary, RunnerError> {
        self.control.request_stop();
        self.handle.await.map_err(|e| RunnerError::Task {
            message: e.to_string(),
        })?
    }
}

async fn run_loop<S, W, O>(
    gateway: Arc<SlotGateway<S, W>>,
    board: Arc<BonusBoard>,
    settings: RuntimeSettings,
    mut observer: O,
    control: Arc<ControlState>,
) -> Result<RunSummary, RunnerError>
where
    S: PondStore + 'static,
    W: Wallet + Send + Sync + 'static,
    O: LifecycleObserver,
{
    if gateway.has_store() {
        if let Err(e) = gateway.resync().await {
            warn!(error = %e, "Initial pond fetch failed, starting local-only");
        }
        gateway.refresh_bonus(&board).await;
    }
    gateway.engine().lock().await.start();

    info!(
        tick_interval_ms = u64::try_from(settings.tick_interval.as_millis()).unwrap_or(u64::MAX),
        bonus_poll_secs = settings.bonus_poll.map(|d| d.as_secs()),
        "Pond runtime starting"
    );

    let mut ticker = tokio::time::interval(settings.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of an interval completes immediately.
    ticker.tick().await;

    let mut bonus_poll = settings.bonus_poll.filter(|_| gateway.has_store()).map(|period| {
        let mut poll = tokio::time::interval(period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The store was just polled above.
        poll.reset();
        poll
    });

    let mut forwards: JoinSet<()> = JoinSet::new();
    let mut total_ticks: u64 = 0;

    let outcome = loop {
        tokio::select! {
            biased;

            () = control.wait_for_stop() => {
                info!("Pond runtime stop requested");
                break Ok(());
            }

            Some(joined) = forwards.join_next(), if !forwards.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "Signal forwarding task failed");
                }
            }

            _ = ticker.tick() => {
                if control.is_paused() {
                    continue;
                }
                let result = gateway.engine().lock().await.tick();
                let summary = match result {
                    Ok(summary) => summary,
                    Err(e) => break Err(RunnerError::from(e)),
                };
                total_ticks = total_ticks.saturating_add(1);
                observer.on_tick(&summary);

                if gateway.has_store() && !summary.events.is_empty() {
                    let gateway = Arc::clone(&gateway);
                    let events = summary.events;
                    forwards.spawn(async move { gateway.forward_signals(&events).await });
                }
            }

            () = next_poll(&mut bonus_poll) => {
                debug!("Polling market bonus");
                gateway.refresh_bonus(&board).await;
            }
        }
    };

    drop(bonus_poll);
    drop(ticker);
    forwards.shutdown().await;

    let final_day = {
        let mut engine = gateway.engine().lock().await;
        engine.stop();
        engine.cycle_state().current_day
    };
    info!(total_ticks, final_day, "Pond runtime stopped");

    outcome.map(|()| RunSummary {
        total_ticks,
        final_day,
    })
}

async fn next_poll(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut config = PondConfig::default();
        config.cycle.tick_interval_ms = 250;
        config.store.bonus_poll_secs = 0;
        let settings = RuntimeSettings::from_config(&config);
        assert_eq!(settings.tick_interval, Duration::from_millis(250));
        assert_eq!(settings.bonus_poll, None);
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let mut config = PondConfig::default();
        config.cycle.tick_interval_ms = 0;
        let settings = RuntimeSettings::from_config(&config);
        assert_eq!(settings.tick_interval, Duration::from_millis(1));
    }

    #[tokio::test]
    async fn stop_wakes_a_waiter() {
        let control = Arc::new(ControlState::new());
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { control.wait_for_stop().await })
        };
        tokio::task::yield_now().await;
        control.request_stop();
        waiter.await.unwrap();
        assert!(control.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let control = ControlState::new();
        assert!(!control.is_paused());
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }
}
