//! Caretaker intents and their remote action encoding.

use serde_json::json;

use pond_types::{HazardKind, LifecycleEvent, SlotActionKind, SlotActionRequest};

/// Something the caretaker asked to do to one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Stock an empty slot with a creature from the catalog.
    Stock {
        /// Catalog name of the creature.
        creature: String,
    },
    /// Feed a hungry creature.
    Feed,
    /// Place a plant from the catalog.
    ApplyPlant {
        /// Catalog name of the plant.
        plant: String,
    },
    /// Apply a supplement from the catalog.
    ApplySupplement {
        /// Catalog name of the supplement.
        supplement: String,
    },
    /// Clear one active hazard. Cleaning the water is
    /// `ResolveHazard { hazard: WaterQuality }`.
    ResolveHazard {
        /// The hazard to clear.
        hazard: HazardKind,
    },
    /// Harvest a ready creature.
    Harvest,
    /// Remove a dead occupant.
    RemoveDead,
}

impl Intent {
    /// The store action this intent is forwarded as.
    pub const fn action(&self) -> SlotActionKind {
        match self {
            Self::Stock { .. } => SlotActionKind::Stock,
            Self::Feed => SlotActionKind::Feed,
            Self::ApplyPlant { .. } => SlotActionKind::Plant,
            Self::ApplySupplement { .. } => SlotActionKind::Supplement,
            Self::ResolveHazard { .. } => SlotActionKind::ResolveIssue,
            Self::Harvest => SlotActionKind::Harvest,
            Self::RemoveDead => SlotActionKind::MarkDead,
        }
    }

    /// Encode the intent as a store request.
    pub fn to_request(&self) -> SlotActionRequest {
        let payload = match self {
            Self::Stock { creature } => json!({ "creature": creature }),
            Self::Feed | Self::Harvest => json!({}),
            Self::ApplyPlant { plant } => json!({ "plant": plant }),
            Self::ApplySupplement { supplement } => json!({ "supplement": supplement }),
            Self::ResolveHazard { hazard } => json!({ "hazard": hazard }),
            Self::RemoveDead => json!({ "remove": true }),
        };
        SlotActionRequest {
            action: self.action(),
            payload,
        }
    }
}

/// What a locally applied intent produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentOutcome {
    /// Signals produced by the intent.
    pub events: Vec<LifecycleEvent>,
    /// Reward earned, for harvests.
    pub reward: Option<u64>,
}
