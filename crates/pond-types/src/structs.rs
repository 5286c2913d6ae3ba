//! Core entity structs for the pond simulation.
//!
//! Covers the per-cell [`Slot`], its [`HazardFlags`] and optional
//! [`PlantEffect`], the [`Pond`] aggregate that owns every slot, the
//! [`PondCycleState`] of the day/night controller, and the catalog item
//! descriptions that caretaker intents name.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DayPhase, DeathCause, HazardKind, Stage};
use crate::ids::{PlayerId, PondId, SlotId};

// ---------------------------------------------------------------------------
// Hazard flags
// ---------------------------------------------------------------------------

/// The four independent hazard flags of a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HazardFlags {
    /// pH out of range.
    pub ph: bool,
    /// Oxygen depleted.
    pub oxygen: bool,
    /// Temperature out of range.
    pub temperature: bool,
    /// Dirty water.
    pub water_quality: bool,
}

impl HazardFlags {
    /// No hazard set.
    pub const CLEAR: Self = Self {
        ph: false,
        oxygen: false,
        temperature: false,
        water_quality: false,
    };

    /// Read the flag for one hazard kind.
    pub const fn get(&self, kind: HazardKind) -> bool {
        match kind {
            HazardKind::Ph => self.ph,
            HazardKind::Oxygen => self.oxygen,
            HazardKind::Temperature => self.temperature,
            HazardKind::WaterQuality => self.water_quality,
        }
    }

    /// Set or clear the flag for one hazard kind.
    pub const fn set(&mut self, kind: HazardKind, value: bool) {
        match kind {
            HazardKind::Ph => self.ph = value,
            HazardKind::Oxygen => self.oxygen = value,
            HazardKind::Temperature => self.temperature = value,
            HazardKind::WaterQuality => self.water_quality = value,
        }
    }

    /// Whether any flag is set, ignoring immunities.
    pub const fn any(&self) -> bool {
        self.ph || self.oxygen || self.temperature || self.water_quality
    }

    /// Clear every flag.
    pub const fn clear_all(&mut self) {
        *self = Self::CLEAR;
    }
}

// ---------------------------------------------------------------------------
// Plant effects
// ---------------------------------------------------------------------------

/// Typed effect descriptor of a plant item, resolved once at catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantEffectDescriptor {
    /// Growth speed factor while attached (1 = unchanged).
    #[serde(default = "default_growth_multiplier")]
    pub growth_multiplier: f64,
    /// Suppresses oxygen hazard damage and fouling.
    #[serde(default)]
    pub oxygen_immune: bool,
    /// Suppresses temperature hazard damage and fouling.
    #[serde(default)]
    pub temperature_immune: bool,
    /// Health restored once when the effect attaches.
    #[serde(default)]
    pub health_regen: u32,
    /// Requested lifetime in seconds, clamped to the engine maximum.
    pub lifetime_secs: u64,
}

/// Default growth multiplier for descriptors that do not set one.
const fn default_growth_multiplier() -> f64 {
    1.0
}

/// A time-bounded modifier bundle attached to a slot by a plant item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantEffect {
    /// Name of the plant that produced the effect.
    pub plant: String,
    /// Growth speed factor (>= 0).
    pub growth_multiplier: f64,
    /// Oxygen hazard immunity.
    pub oxygen_immune: bool,
    /// Temperature hazard immunity.
    pub temperature_immune: bool,
    /// Health restored when the effect attached.
    pub health_regen_per_activation: u32,
    /// Simulated second at which the effect attached.
    pub attached_at: u64,
    /// Simulated second at which the effect expires.
    pub expires_at: u64,
}

// ---------------------------------------------------------------------------
// Catalog items
// ---------------------------------------------------------------------------

/// A stockable creature species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreatureSpec {
    /// Species name shown to the caretaker.
    pub name: String,
    /// Growth seconds needed to hatch.
    pub egg_stage_secs: f64,
    /// Growth seconds needed to become harvestable.
    pub adult_stage_secs: f64,
    /// Health pool of the creature.
    pub max_health: u32,
    /// Coins paid at harvest before any market bonus.
    pub harvest_value: u32,
    /// Feedings allowed per day.
    pub max_feed_count: u32,
}

/// A plant item placed on a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantSpec {
    /// Plant name shown to the caretaker.
    pub name: String,
    /// The effect the plant attaches.
    pub effect: PlantEffectDescriptor,
}

/// A consumable supplement applied to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SupplementSpec {
    /// Supplement name shown to the caretaker.
    pub name: String,
    /// Health restored on use, clamped to the maximum.
    #[serde(default)]
    pub health_restore: u32,
    /// Hazards the supplement clears.
    #[serde(default)]
    pub clears: Vec<HazardKind>,
}

/// A catalog entry, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CatalogItem {
    /// A creature that can be stocked.
    Creature(CreatureSpec),
    /// A plant that attaches an effect.
    Plant(PlantSpec),
    /// A supplement that heals or clears hazards.
    Supplement(SupplementSpec),
}

impl CatalogItem {
    /// The display name of the item.
    pub fn name(&self) -> &str {
        match self {
            Self::Creature(spec) => &spec.name,
            Self::Plant(spec) => &spec.name,
            Self::Supplement(spec) => &spec.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Values an empty slot is reset to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDefaults {
    /// Health pool of an empty slot.
    pub max_health: u32,
    /// Harvest value of an empty slot.
    pub harvest_value: u32,
    /// Feeding budget of an empty slot.
    pub max_feed_count: u32,
}

impl Default for SlotDefaults {
    fn default() -> Self {
        Self {
            max_health: 100,
            harvest_value: 10,
            max_feed_count: 3,
        }
    }
}

/// One grid cell of the pond.
///
/// Invariants maintained by the life-cycle logic:
/// - `Empty` implies no hazards, no plant effect, full health and
///   `has_creature == false`.
/// - `alive` is false only when `stage == Dead`.
/// - `Ready` slots carry no hazards and no hunger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Slot {
    /// Position in the grid, row-major.
    pub index: usize,
    /// Identifier assigned by the pond store, if known yet.
    pub remote_id: Option<SlotId>,
    /// Lifecycle stage.
    pub stage: Stage,
    /// Whether an occupant (living or dead) is in the slot.
    pub has_creature: bool,
    /// False only for dead occupants.
    pub alive: bool,
    /// Species of the occupant.
    pub species: Option<String>,
    /// Current health.
    pub health: u32,
    /// Health pool size.
    pub max_health: u32,
    /// Growth accumulated within the current stage.
    pub stage_elapsed: f64,
    /// Growth needed to hatch.
    pub egg_stage_duration: f64,
    /// Growth needed to become ready.
    pub adult_stage_duration: f64,
    /// Active hazards.
    pub hazards: HazardFlags,
    /// Whether the creature is hungry.
    pub hungry: bool,
    /// Simulated second at which hunger set in.
    pub hungry_since: Option<u64>,
    /// Feedings given today.
    pub feed_count: u32,
    /// Feedings allowed per day.
    pub max_feed_count: u32,
    /// Simulated second of the last feeding.
    pub last_fed_at: Option<u64>,
    /// Simulated second of the last hunger damage.
    pub last_hunger_damage_at: Option<u64>,
    /// Attached plant effect.
    pub plant_effect: Option<PlantEffect>,
    /// Coins paid at harvest before any market bonus.
    pub harvest_value: u32,
    /// Cause recorded when the occupant died.
    pub death_cause: Option<DeathCause>,
}

impl Slot {
    /// Create an empty slot at the given grid index.
    pub const fn empty(index: usize, defaults: SlotDefaults) -> Self {
        Self {
            index,
            remote_id: None,
            stage: Stage::Empty,
            has_creature: false,
            alive: false,
            species: None,
            health: defaults.max_health,
            max_health: defaults.max_health,
            stage_elapsed: 0.0,
            egg_stage_duration: 0.0,
            adult_stage_duration: 0.0,
            hazards: HazardFlags::CLEAR,
            hungry: false,
            hungry_since: None,
            feed_count: 0,
            max_feed_count: defaults.max_feed_count,
            last_fed_at: None,
            last_hunger_damage_at: None,
            plant_effect: None,
            harvest_value: defaults.harvest_value,
            death_cause: None,
        }
    }

    /// Reset the slot to empty, keeping its grid index and remote id.
    pub fn reset(&mut self, defaults: SlotDefaults) {
        let index = self.index;
        let remote_id = self.remote_id;
        *self = Self::empty(index, defaults);
        self.remote_id = remote_id;
    }

    /// Whether the slot holds a living egg or adult, the only occupants that
    /// hazards affect.
    pub const fn is_occupied(&self) -> bool {
        self.has_creature && self.alive && self.stage.is_growing()
    }

    /// Growth multiplier of the attached plant effect, 1 when none.
    pub fn growth_multiplier(&self) -> f64 {
        self.plant_effect
            .as_ref()
            .map_or(1.0, |effect| effect.growth_multiplier)
    }

    /// Whether an attached plant effect grants oxygen immunity.
    pub fn oxygen_immune(&self) -> bool {
        self.plant_effect
            .as_ref()
            .is_some_and(|effect| effect.oxygen_immune)
    }

    /// Whether an attached plant effect grants temperature immunity.
    pub fn temperature_immune(&self) -> bool {
        self.plant_effect
            .as_ref()
            .is_some_and(|effect| effect.temperature_immune)
    }

    /// Whether a hazard currently affects the slot, honoring immunities.
    ///
    /// pH and water quality are never suppressible.
    pub fn hazard_effective(&self, kind: HazardKind) -> bool {
        match kind {
            HazardKind::Ph => self.hazards.ph,
            HazardKind::Oxygen => self.hazards.oxygen && !self.oxygen_immune(),
            HazardKind::Temperature => self.hazards.temperature && !self.temperature_immune(),
            HazardKind::WaterQuality => self.hazards.water_quality,
        }
    }

    /// Whether any non-immune hazard is active.
    pub fn is_fouled(&self) -> bool {
        HazardKind::ALL
            .into_iter()
            .any(|kind| self.hazard_effective(kind))
    }
}

// ---------------------------------------------------------------------------
// Pond
// ---------------------------------------------------------------------------

/// The pond aggregate: one per player, owning every slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Pond {
    /// Identifier assigned by the pond store, if fetched.
    pub pond_id: Option<PondId>,
    /// Owner of the pond.
    pub player_id: PlayerId,
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Slots in row-major order.
    pub slots: Vec<Slot>,
}

impl Pond {
    /// Create a pond of `rows * cols` empty slots.
    pub fn new(player_id: PlayerId, rows: u32, cols: u32, defaults: SlotDefaults) -> Self {
        let count = usize::try_from(rows.saturating_mul(cols)).unwrap_or(0);
        Self {
            pond_id: None,
            player_id,
            rows,
            cols,
            slots: (0..count).map(|index| Slot::empty(index, defaults)).collect(),
        }
    }

    /// Number of slots in the grid.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow the slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Mutably borrow the slot at `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }
}

// ---------------------------------------------------------------------------
// Cycle state
// ---------------------------------------------------------------------------

/// State of the day/night cycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PondCycleState {
    /// Current phase.
    pub phase: DayPhase,
    /// Seconds left in the current phase.
    pub phase_remaining: u64,
    /// Current in-game day, starting at 1.
    pub current_day: u32,
    /// Whether dirty water was already applied today.
    pub dirt_applied_today: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn adult_slot() -> Slot {
        let mut slot = Slot::empty(0, SlotDefaults::default());
        slot.stage = Stage::Adult;
        slot.has_creature = true;
        slot.alive = true;
        slot
    }

    fn effect(oxygen_immune: bool, temperature_immune: bool) -> PlantEffect {
        PlantEffect {
            plant: String::from("Hornwort"),
            growth_multiplier: 1.5,
            oxygen_immune,
            temperature_immune,
            health_regen_per_activation: 0,
            attached_at: 0,
            expires_at: 60,
        }
    }

    #[test]
    fn empty_slot_holds_invariants() {
        let slot = Slot::empty(3, SlotDefaults::default());
        assert_eq!(slot.stage, Stage::Empty);
        assert!(!slot.has_creature);
        assert!(!slot.hazards.any());
        assert!(slot.plant_effect.is_none());
        assert_eq!(slot.health, slot.max_health);
        assert!(!slot.is_occupied());
    }

    #[test]
    fn reset_keeps_index_and_remote_id() {
        let mut slot = adult_slot();
        slot.index = 7;
        let remote = SlotId::new();
        slot.remote_id = Some(remote);
        slot.hazards.ph = true;
        slot.reset(SlotDefaults::default());
        assert_eq!(slot.index, 7);
        assert_eq!(slot.remote_id, Some(remote));
        assert_eq!(slot.stage, Stage::Empty);
        assert!(!slot.hazards.any());
    }

    #[test]
    fn immunity_suppresses_only_oxygen_and_temperature() {
        let mut slot = adult_slot();
        slot.plant_effect = Some(effect(true, true));
        slot.hazards.oxygen = true;
        slot.hazards.temperature = true;
        assert!(!slot.is_fouled());

        slot.hazards.ph = true;
        assert!(slot.is_fouled());
        slot.hazards.ph = false;
        slot.hazards.water_quality = true;
        assert!(slot.is_fouled());
    }

    #[test]
    fn growth_multiplier_defaults_to_one() {
        let mut slot = adult_slot();
        assert!((slot.growth_multiplier() - 1.0).abs() < f64::EPSILON);
        slot.plant_effect = Some(effect(false, false));
        assert!((slot.growth_multiplier() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn pond_grid_is_row_major() {
        let pond = Pond::new(PlayerId::new(), 4, 6, SlotDefaults::default());
        assert_eq!(pond.len(), 24);
        assert_eq!(pond.slot(23).unwrap().index, 23);
        assert!(pond.slot(24).is_none());
        assert!(pond.slots.iter().all(|slot| !slot.is_occupied()));
    }

    #[test]
    fn catalog_item_is_tagged_by_kind() {
        let json = r#"{"kind":"plant","name":"Elodea","effect":{"oxygenImmune":true,"lifetimeSecs":120}}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        let CatalogItem::Plant(spec) = item else {
            panic!("expected a plant");
        };
        assert!(spec.effect.oxygen_immune);
        assert!(!spec.effect.temperature_immune);
        assert!((spec.effect.growth_multiplier - 1.0).abs() < f64::EPSILON);
    }
}
