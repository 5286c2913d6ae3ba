//! Clock, timers, engine and store reconciliation for the pond simulation.
//!
//! This crate drives one pond through simulated time. A tick advances the
//! clock, the hazard timers, the day/night cycle, and then every slot in
//! index order. Caretaker intents enter through the [`SlotGateway`], which
//! applies them locally and reconciles with the external store.
//!
//! # Modules
//!
//! - [`bonus`] -- [`MarketBonus`] trait and the shared [`BonusBoard`].
//! - [`clock`] -- Simulated-second clock.
//! - [`config`] -- Configuration loading from `pond-config.yaml` into
//!   strongly-typed structs.
//! - [`cycle`] -- Day/night cycle controller.
//! - [`engine`] -- [`PondSimulationEngine`]: `start`, `stop`, `tick`,
//!   `reconcile`.
//! - [`gateway`] -- The Slot Action Gateway.
//! - [`intent`] -- Caretaker intents and their store action names.
//! - [`runner`] -- Timer-driven async runtime with clean teardown.
//! - [`scheduler`] -- pH, oxygen and temperature hazard timers.
//! - [`store`] -- [`PondStore`] trait and an in-memory implementation.

pub mod bonus;
pub mod clock;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod gateway;
pub mod intent;
pub mod runner;
pub mod scheduler;
pub mod store;

pub use bonus::{BonusBoard, MarketBonus, NoBonus};
pub use config::{ConfigError, PondConfig};
pub use engine::{PondSimulationEngine, TickError, TickSummary};
pub use gateway::{ActionReceipt, GatewayError, SlotGateway, SyncMode, SyncOutcome};
pub use intent::{Intent, IntentOutcome};
pub use runner::{LifecycleObserver, NoOpObserver, PondRuntime, RunSummary, RunnerError, RuntimeSettings};
pub use store::{MemoryPondStore, PondStore, StoreError};
