//! Slot life-cycle logic for the pond simulation.
//!
//! Everything here operates on [`pond_types::Slot`] and
//! [`pond_types::Pond`] values without I/O or clocks of its own: callers pass
//! the simulated second `now`. The orchestration layer (`pond-core`) owns the
//! clock, the timers and the remote store.
//!
//! # Modules
//!
//! - [`actions`] -- Caretaker intents: stock, feed, supplement, resolve, remove
//! - [`catalog`] -- Validated item catalog ([`Catalog`])
//! - [`config`] -- Damage constants, hunger timing, plant limits ([`LifeConfig`])
//! - [`death`] -- Death-cause selection and the shared death procedure
//! - [`error`] -- Error types ([`LifeError`], [`CatalogError`])
//! - [`growth`] -- The per-second growth & hunger simulator
//! - [`harvest`] -- Reward calculation and slot reset
//! - [`hazard`] -- Hazard damage and raising hazards on occupied slots
//! - [`plant`] -- Plant effect attach and expiry
//! - [`reconcile`] -- Applying authoritative store snapshots to slots

pub mod actions;
pub mod catalog;
pub mod config;
pub mod death;
pub mod error;
pub mod growth;
pub mod harvest;
pub mod hazard;
pub mod plant;
pub mod reconcile;

// Re-export primary types at crate root for convenience.
pub use catalog::{Catalog, starter_items};
pub use config::LifeConfig;
pub use death::Death;
pub use error::{CatalogError, LifeError};
pub use growth::{SlotTickResult, simulate_slot};
pub use harvest::HarvestOutcome;
