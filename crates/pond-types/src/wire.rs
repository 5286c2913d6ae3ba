//! Wire payloads exchanged with the external pond store.
//!
//! The store speaks camelCase JSON. Slot snapshots carry a plant effect's
//! remaining lifetime rather than an absolute expiry, because the store
//! knows nothing about the engine's simulated clock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DeathCause, SlotActionKind, Stage};
use crate::ids::{PlayerId, PondId, SlotId};
use crate::structs::{HazardFlags, PlantEffect, Slot};

/// A plant effect as reported by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantEffectSnapshot {
    /// Name of the plant.
    pub plant: String,
    /// Growth speed factor.
    pub growth_multiplier: f64,
    /// Oxygen hazard immunity.
    pub oxygen_immune: bool,
    /// Temperature hazard immunity.
    pub temperature_immune: bool,
    /// Health restored when the effect attached.
    #[serde(default)]
    pub health_regen_per_activation: u32,
    /// Seconds of lifetime left.
    pub remaining_secs: u64,
}

impl PlantEffectSnapshot {
    /// Capture an attached effect relative to the simulated time `now`.
    pub fn capture(effect: &PlantEffect, now: u64) -> Self {
        Self {
            plant: effect.plant.clone(),
            growth_multiplier: effect.growth_multiplier,
            oxygen_immune: effect.oxygen_immune,
            temperature_immune: effect.temperature_immune,
            health_regen_per_activation: effect.health_regen_per_activation,
            remaining_secs: effect.expires_at.saturating_sub(now),
        }
    }
}

/// Authoritative state of one slot as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SlotSnapshot {
    /// Store identifier of the slot.
    pub slot_id: Option<SlotId>,
    /// Grid index of the slot.
    pub index: usize,
    /// Lifecycle stage.
    pub stage: Stage,
    /// Species of the occupant.
    #[serde(default)]
    pub species: Option<String>,
    /// Current health.
    pub health: u32,
    /// Health pool size.
    pub max_health: u32,
    /// Growth accumulated in the current stage.
    #[serde(default)]
    pub stage_elapsed: f64,
    /// Growth needed to hatch.
    #[serde(default)]
    pub egg_stage_duration: f64,
    /// Growth needed to become ready.
    #[serde(default)]
    pub adult_stage_duration: f64,
    /// Active hazards.
    #[serde(default)]
    pub hazards: HazardFlags,
    /// Whether the creature is hungry.
    #[serde(default)]
    pub hungry: bool,
    /// Feedings given today.
    #[serde(default)]
    pub feed_count: u32,
    /// Feedings allowed per day.
    pub max_feed_count: u32,
    /// Attached plant effect.
    #[serde(default)]
    pub plant_effect: Option<PlantEffectSnapshot>,
    /// Coins paid at harvest.
    pub harvest_value: u32,
    /// Recorded cause of death.
    #[serde(default)]
    pub death_cause: Option<DeathCause>,
}

impl SlotSnapshot {
    /// Capture a local slot for sending to the store.
    pub fn capture(slot: &Slot, now: u64) -> Self {
        Self {
            slot_id: slot.remote_id,
            index: slot.index,
            stage: slot.stage,
            species: slot.species.clone(),
            health: slot.health,
            max_health: slot.max_health,
            stage_elapsed: slot.stage_elapsed,
            egg_stage_duration: slot.egg_stage_duration,
            adult_stage_duration: slot.adult_stage_duration,
            hazards: slot.hazards,
            hungry: slot.hungry,
            feed_count: slot.feed_count,
            max_feed_count: slot.max_feed_count,
            plant_effect: slot
                .plant_effect
                .as_ref()
                .map(|effect| PlantEffectSnapshot::capture(effect, now)),
            harvest_value: slot.harvest_value,
            death_cause: slot.death_cause,
        }
    }
}

/// Authoritative state of a whole pond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PondSnapshot {
    /// Store identifier of the pond.
    pub pond_id: PondId,
    /// Owner of the pond.
    pub player_id: PlayerId,
    /// In-game day known to the store, if it tracks one.
    #[serde(default)]
    pub current_day: Option<u32>,
    /// Slots, matched to the local grid by index.
    pub slots: Vec<SlotSnapshot>,
}

/// A slot action posted to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SlotActionRequest {
    /// The action name.
    pub action: SlotActionKind,
    /// Action-specific payload.
    pub payload: serde_json::Value,
}

/// The store's answer to a slot action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SlotActionResponse {
    /// The slot after the store applied the action.
    pub slot: SlotSnapshot,
    /// Coins the store credited to the player, for harvests.
    #[serde(default)]
    pub credited: Option<u64>,
}

/// A time-limited market bonus published by the economy subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MarketBonusSnapshot {
    /// Reward multiplier while active (>= 1).
    #[ts(as = "String")]
    pub multiplier: Decimal,
    /// Wall-clock instant at which the bonus ends.
    pub ends_at: DateTime<Utc>,
}
