//! Error types for the pond-life crate.
//!
//! Caretaker validation failures are [`RejectionReason`]s: expected, non-fatal
//! and carried in results. [`LifeError`] covers everything else.

use pond_types::RejectionReason;

/// Errors raised by life-cycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifeError {
    /// A caretaker intent failed validation. Nothing was mutated.
    #[error("intent rejected: {0}")]
    Rejected(#[from] RejectionReason),

    /// An arithmetic overflow occurred.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// A slot index outside the pond grid.
    #[error("slot {index} out of range (pond has {len} slots)")]
    SlotOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of slots in the pond.
        len: usize,
    },
}

impl LifeError {
    /// The rejection reason, if this error is a validation rejection.
    pub const fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            Self::SlotOutOfRange { .. } => Some(RejectionReason::NoSuchSlot),
            Self::ArithmeticOverflow { .. } => None,
        }
    }
}

/// Errors raised while loading the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// An item's descriptor is unusable.
    #[error("invalid catalog item '{name}': {reason}")]
    InvalidItem {
        /// Name of the offending item.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two items share a name.
    #[error("duplicate catalog item '{0}'")]
    DuplicateItem(String),
}
