//! Tunable parameters for the slot life cycle.
//!
//! [`LifeConfig`] is the `life` section of `pond-config.yaml`. Every field
//! has a default, so a partial section only overrides what it names.

use serde::{Deserialize, Serialize};

use pond_types::{HazardKind, SlotDefaults};

/// Configuration for the per-second slot simulation and caretaker intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Health lost per second to dirty water (default: 1).
    pub water_quality_damage: u32,

    /// Health lost per second to a pH hazard (default: 2).
    pub ph_damage: u32,

    /// Health lost per second to an oxygen hazard (default: 3).
    pub oxygen_damage: u32,

    /// Health lost per second to a temperature hazard (default: 1).
    pub temperature_damage: u32,

    /// Seconds without food before an adult becomes hungry (default: 90).
    pub hunger_onset_secs: u64,

    /// Seconds between two hunger damage applications (default: 10).
    pub hunger_damage_interval_secs: u64,

    /// Health lost per hunger damage application (default: 5).
    pub hunger_damage: u32,

    /// Health percentage below which a fouled creature turns hungry
    /// (default: 90).
    pub hunger_health_threshold_pct: u32,

    /// Upper bound on any plant effect lifetime, in seconds (default: 300).
    pub max_plant_lifetime_secs: u64,

    /// Health pool of an empty slot (default: 100).
    pub default_max_health: u32,

    /// Harvest value of an empty slot (default: 10).
    pub default_harvest_value: u32,

    /// Feeding budget of an empty slot (default: 3).
    pub default_max_feed_count: u32,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            water_quality_damage: 1,
            ph_damage: 2,
            oxygen_damage: 3,
            temperature_damage: 1,
            hunger_onset_secs: 90,
            hunger_damage_interval_secs: 10,
            hunger_damage: 5,
            hunger_health_threshold_pct: 90,
            max_plant_lifetime_secs: 300,
            default_max_health: 100,
            default_harvest_value: 10,
            default_max_feed_count: 3,
        }
    }
}

impl LifeConfig {
    /// Per-second damage dealt by one hazard kind.
    pub const fn damage_for(&self, kind: HazardKind) -> u32 {
        match kind {
            HazardKind::Ph => self.ph_damage,
            HazardKind::Oxygen => self.oxygen_damage,
            HazardKind::Temperature => self.temperature_damage,
            HazardKind::WaterQuality => self.water_quality_damage,
        }
    }

    /// Values a slot returns to when emptied.
    pub const fn slot_defaults(&self) -> SlotDefaults {
        SlotDefaults {
            max_health: self.default_max_health,
            harvest_value: self.default_harvest_value,
            max_feed_count: self.default_max_feed_count,
        }
    }
}
