//! Shared type definitions for the pond life-cycle simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types flow to `TypeScript` via `ts-rs` for the UI
//! collaborators (pond grid, notifications).
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for players, ponds, slots
//! - [`enums`] -- Stages, hazards, phases, death causes, rejections
//! - [`structs`] -- `Slot`, `Pond`, `PlantEffect`, cycle state, catalog items
//! - [`wire`] -- Snapshots and action payloads exchanged with the pond store
//! - [`events`] -- Lifecycle signals for UI and notification collaborators

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;
pub mod wire;

// Re-export all public types at crate root for convenience.
pub use enums::{DayPhase, DeathCause, HazardKind, LedgerEntryType, RejectionReason, SlotActionKind, Stage};
pub use events::LifecycleEvent;
pub use ids::{LedgerEntryId, PlayerId, PondId, SlotId};
pub use structs::{
    CatalogItem, CreatureSpec, HazardFlags, PlantEffect, PlantEffectDescriptor, PlantSpec, Pond,
    PondCycleState, Slot, SlotDefaults, SupplementSpec,
};
pub use wire::{
    MarketBonusSnapshot, PlantEffectSnapshot, PondSnapshot, SlotActionRequest,
    SlotActionResponse, SlotSnapshot,
};
