//! Hazard damage and hazard raising.
//!
//! Four independent hazards can foul a slot. pH and dirty water always hurt;
//! oxygen and temperature are suppressed by a matching plant immunity.

use tracing::debug;

use pond_types::{HazardKind, Pond, Slot};

use crate::config::LifeConfig;

/// Health lost this second to the hazards active on `slot`.
///
/// Immune hazards contribute nothing.
pub fn tick_damage(slot: &Slot, config: &LifeConfig) -> u32 {
    HazardKind::ALL
        .into_iter()
        .filter(|kind| slot.hazard_effective(*kind))
        .fold(0_u32, |total, kind| {
            total.saturating_add(config.damage_for(kind))
        })
}

/// Raise `kind` on every occupied slot of the pond.
///
/// Empty, ready and dead slots are left alone. Returns the indices of the
/// slots that now carry the flag.
pub fn raise(pond: &mut Pond, kind: HazardKind) -> Vec<usize> {
    let mut affected = Vec::new();
    for slot in pond.slots.iter_mut().filter(|slot| slot.is_occupied()) {
        slot.hazards.set(kind, true);
        affected.push(slot.index);
    }
    debug!(hazard = %kind, slots = affected.len(), "Hazard raised");
    affected
}

/// Whether the slot is fouled by one of the hazards that kill at dawn.
///
/// Dirty water, pH and (unless immune) oxygen count. Temperature does not.
pub fn neglected_overnight(slot: &Slot) -> bool {
    slot.hazard_effective(HazardKind::WaterQuality)
        || slot.hazard_effective(HazardKind::Ph)
        || slot.hazard_effective(HazardKind::Oxygen)
}
