//! Item catalog: creatures, plants and supplements, validated once at load.
//!
//! Caretaker intents name items; the catalog resolves the name to a typed
//! descriptor so nothing downstream inspects item names to decide behavior.

use std::collections::BTreeMap;

use pond_types::{
    CatalogItem, CreatureSpec, HazardKind, PlantEffectDescriptor, PlantSpec, RejectionReason,
    SupplementSpec,
};

use crate::error::CatalogError;

/// Validated lookup tables for every item the caretaker can use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    creatures: BTreeMap<String, CreatureSpec>,
    plants: BTreeMap<String, PlantSpec>,
    supplements: BTreeMap<String, SupplementSpec>,
}

impl Catalog {
    /// Validate and index a list of items.
    ///
    /// Names must be unique across all kinds.
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for item in items {
            validate(&item)?;
            let name = item.name().to_owned();
            if catalog.contains(&name) {
                return Err(CatalogError::DuplicateItem(name));
            }
            match item {
                CatalogItem::Creature(spec) => {
                    catalog.creatures.insert(name, spec);
                }
                CatalogItem::Plant(spec) => {
                    catalog.plants.insert(name, spec);
                }
                CatalogItem::Supplement(spec) => {
                    catalog.supplements.insert(name, spec);
                }
            }
        }
        Ok(catalog)
    }

    /// Whether any item has this name.
    pub fn contains(&self, name: &str) -> bool {
        self.creatures.contains_key(name)
            || self.plants.contains_key(name)
            || self.supplements.contains_key(name)
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.creatures
            .len()
            .saturating_add(self.plants.len())
            .saturating_add(self.supplements.len())
    }

    /// Whether the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a creature by name.
    pub fn creature(&self, name: &str) -> Result<&CreatureSpec, RejectionReason> {
        self.creatures.get(name).ok_or(RejectionReason::UnknownItem)
    }

    /// Look up a plant by name.
    pub fn plant(&self, name: &str) -> Result<&PlantSpec, RejectionReason> {
        self.plants.get(name).ok_or(RejectionReason::UnknownItem)
    }

    /// Look up a supplement by name.
    pub fn supplement(&self, name: &str) -> Result<&SupplementSpec, RejectionReason> {
        self.supplements.get(name).ok_or(RejectionReason::UnknownItem)
    }
}

fn invalid(name: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidItem {
        name: name.to_owned(),
        reason: reason.to_owned(),
    }
}

fn validate(item: &CatalogItem) -> Result<(), CatalogError> {
    let name = item.name();
    if name.trim().is_empty() {
        return Err(invalid(name, "name is empty"));
    }
    match item {
        CatalogItem::Creature(spec) => {
            if !(spec.egg_stage_secs.is_finite() && spec.egg_stage_secs > 0.0) {
                return Err(invalid(name, "egg stage duration must be positive"));
            }
            if !(spec.adult_stage_secs.is_finite() && spec.adult_stage_secs > 0.0) {
                return Err(invalid(name, "adult stage duration must be positive"));
            }
            if spec.max_health == 0 {
                return Err(invalid(name, "max health must be positive"));
            }
        }
        CatalogItem::Plant(spec) => {
            let multiplier = spec.effect.growth_multiplier;
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(invalid(name, "growth multiplier must be finite and non-negative"));
            }
            if spec.effect.lifetime_secs == 0 {
                return Err(invalid(name, "effect lifetime must be positive"));
            }
        }
        CatalogItem::Supplement(_) => {}
    }
    Ok(())
}

/// The items a fresh pond ships with.
pub fn starter_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::Creature(CreatureSpec {
            name: String::from("Goldfish"),
            egg_stage_secs: 60.0,
            adult_stage_secs: 120.0,
            max_health: 100,
            harvest_value: 10,
            max_feed_count: 3,
        }),
        CatalogItem::Creature(CreatureSpec {
            name: String::from("Koi"),
            egg_stage_secs: 120.0,
            adult_stage_secs: 300.0,
            max_health: 100,
            harvest_value: 50,
            max_feed_count: 3,
        }),
        CatalogItem::Creature(CreatureSpec {
            name: String::from("Crayfish"),
            egg_stage_secs: 90.0,
            adult_stage_secs: 180.0,
            max_health: 80,
            harvest_value: 25,
            max_feed_count: 2,
        }),
        CatalogItem::Plant(PlantSpec {
            name: String::from("Elodea"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 1.0,
                oxygen_immune: true,
                temperature_immune: false,
                health_regen: 0,
                lifetime_secs: 180,
            },
        }),
        CatalogItem::Plant(PlantSpec {
            name: String::from("Water Lily"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 1.0,
                oxygen_immune: false,
                temperature_immune: true,
                health_regen: 10,
                lifetime_secs: 180,
            },
        }),
        CatalogItem::Plant(PlantSpec {
            name: String::from("Duckweed"),
            effect: PlantEffectDescriptor {
                growth_multiplier: 1.5,
                oxygen_immune: false,
                temperature_immune: false,
                health_regen: 0,
                lifetime_secs: 120,
            },
        }),
        CatalogItem::Supplement(SupplementSpec {
            name: String::from("pH Buffer"),
            health_restore: 10,
            clears: vec![HazardKind::Ph],
        }),
        CatalogItem::Supplement(SupplementSpec {
            name: String::from("Air Stone"),
            health_restore: 0,
            clears: vec![HazardKind::Oxygen],
        }),
        CatalogItem::Supplement(SupplementSpec {
            name: String::from("Pond Tonic"),
            health_restore: 40,
            clears: Vec::new(),
        }),
    ]
}
