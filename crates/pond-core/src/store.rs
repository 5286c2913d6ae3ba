//! The external pond store: source of truth for ponds, slots and coins.
//!
//! [`PondStore`] abstracts the transport. The engine binary provides an HTTP
//! implementation; [`MemoryPondStore`] is an in-process store that applies
//! actions with the same life-cycle rules, used by tests and local play.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use pond_life::{Catalog, LifeConfig, actions, death, harvest, plant};
use pond_types::{
    DeathCause, HazardKind, MarketBonusSnapshot, PlayerId, Pond, PondId, PondSnapshot, Slot,
    SlotActionKind, SlotActionRequest, SlotActionResponse, SlotId, SlotSnapshot, Stage,
};

/// Errors returned by a pond store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The request never got an answer.
    #[error("store transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The store answered with a failure status.
    #[error("store returned status {status}: {body}")]
    Status {
        /// HTTP-style status code.
        status: u16,
        /// Response body, for the log.
        body: String,
    },

    /// The answer could not be decoded.
    #[error("failed to decode store response: {message}")]
    Decode {
        /// Description of the failure.
        message: String,
    },

    /// The store refused the action.
    #[error("store rejected {action}: {message}")]
    Rejected {
        /// The refused action.
        action: SlotActionKind,
        /// The store's explanation.
        message: String,
    },
}

/// Read/write access to the authoritative pond store.
pub trait PondStore: Send + Sync {
    /// Fetch the player's pond. `None` means the player has no pond yet.
    fn fetch_pond(
        &self,
        player_id: PlayerId,
    ) -> impl Future<Output = Result<Option<PondSnapshot>, StoreError>> + Send;

    /// Apply an action to one slot and return the slot as the store sees it.
    fn post_slot_action(
        &self,
        pond_id: PondId,
        slot_id: SlotId,
        request: SlotActionRequest,
    ) -> impl Future<Output = Result<SlotActionResponse, StoreError>> + Send;

    /// Fetch the current market bonus, if one is published.
    fn fetch_market_bonus(
        &self,
    ) -> impl Future<Output = Result<Option<MarketBonusSnapshot>, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    pond: Option<Pond>,
    current_day: Option<u32>,
    bonus: Option<MarketBonusSnapshot>,
    posted: Vec<(SlotId, SlotActionRequest)>,
    credited: u64,
}

/// An in-process pond store.
///
/// It validates currency-bearing actions (a harvest needs a ready slot) and
/// applies the rest leniently, the way a remote store that only trusts its
/// own ledger would. Failures can be switched on to exercise resync paths.
#[derive(Debug)]
pub struct MemoryPondStore {
    state: Mutex<MemoryState>,
    catalog: Catalog,
    life: LifeConfig,
    fail_actions: AtomicBool,
    fail_fetches: AtomicBool,
}

impl MemoryPondStore {
    /// A store with no ponds.
    pub fn new(catalog: Catalog, life: LifeConfig) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            catalog,
            life,
            fail_actions: AtomicBool::new(false),
            fail_fetches: AtomicBool::new(false),
        }
    }

    /// Create an empty pond for `player_id`, giving every slot a store id.
    pub fn create_pond(&self, player_id: PlayerId, rows: u32, cols: u32) -> Result<PondId, StoreError> {
        let mut pond = Pond::new(player_id, rows, cols, self.life.slot_defaults());
        let pond_id = PondId::new();
        pond.pond_id = Some(pond_id);
        for slot in &mut pond.slots {
            slot.remote_id = Some(SlotId::new());
        }
        let mut state = self.lock()?;
        state.pond = Some(pond);
        state.current_day = Some(1);
        Ok(pond_id)
    }

    /// Overwrite one slot of the stored pond, keeping its store id.
    pub fn seed_slot(&self, slot: Slot) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let stored = state
            .pond
            .as_mut()
            .and_then(|pond| pond.slot_mut(slot.index))
            .ok_or_else(|| transport("no such stored slot"))?;
        let remote_id = stored.remote_id;
        *stored = slot;
        stored.remote_id = remote_id;
        Ok(())
    }

    /// Forget a slot's store id, as a store that lost track of it would.
    pub fn drop_slot_id(&self, index: usize) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if let Some(slot) = state.pond.as_mut().and_then(|pond| pond.slot_mut(index)) {
            slot.remote_id = None;
        }
        Ok(())
    }

    /// Publish (or clear) the market bonus.
    pub fn set_market_bonus(&self, bonus: Option<MarketBonusSnapshot>) -> Result<(), StoreError> {
        self.lock()?.bonus = bonus;
        Ok(())
    }

    /// Make every slot action fail with a transport error.
    pub fn fail_actions(&self, fail: bool) {
        self.fail_actions.store(fail, Ordering::Release);
    }

    /// Make every fetch fail with a transport error.
    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::Release);
    }

    /// Every action received, in order.
    pub fn posted(&self) -> Vec<(SlotId, SlotActionRequest)> {
        self.state
            .lock()
            .map(|state| state.posted.clone())
            .unwrap_or_default()
    }

    /// Total coins credited by harvests.
    pub fn credited(&self) -> u64 {
        self.state.lock().map_or(0, |state| state.credited)
    }

    /// The stored slot at `index`.
    pub fn stored_slot(&self, index: usize) -> Option<Slot> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.pond.as_ref().and_then(|pond| pond.slot(index).cloned()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|e| transport(&e.to_string()))
    }

    fn snapshot(state: &MemoryState) -> Option<PondSnapshot> {
        let pond = state.pond.as_ref()?;
        Some(PondSnapshot {
            pond_id: pond.pond_id?,
            player_id: pond.player_id,
            current_day: state.current_day,
            slots: pond
                .slots
                .iter()
                .map(|slot| SlotSnapshot::capture(slot, 0))
                .collect(),
        })
    }

    fn apply(
        &self,
        pond_id: PondId,
        slot_id: SlotId,
        request: &SlotActionRequest,
    ) -> Result<SlotActionResponse, StoreError> {
        let mut state = self.lock()?;
        state.posted.push((slot_id, request.clone()));
        let multiplier = state
            .bonus
            .as_ref()
            .filter(|bonus| Utc::now() < bonus.ends_at)
            .map_or(Decimal::ONE, |bonus| bonus.multiplier);

        let pond = state
            .pond
            .as_mut()
            .filter(|pond| pond.pond_id == Some(pond_id))
            .ok_or_else(|| not_found("pond"))?;
        let slot = pond
            .slots
            .iter_mut()
            .find(|slot| slot.remote_id == Some(slot_id))
            .ok_or_else(|| not_found("slot"))?;

        let action = request.action;
        let rejected = |message: String| StoreError::Rejected { action, message };
        let payload = &request.payload;
        let mut credited = None;

        match action {
            SlotActionKind::Stock => {
                let spec = text(payload, "creature")
                    .and_then(|name| self.catalog.creature(name).ok())
                    .ok_or_else(|| rejected(String::from("unknown creature")))?;
                actions::stock(slot, spec).map_err(|reason| rejected(reason.to_string()))?;
            }
            SlotActionKind::Feed => {
                slot.hungry = false;
                slot.feed_count = slot.feed_count.saturating_add(1);
            }
            SlotActionKind::Plant => {
                let spec = text(payload, "plant")
                    .and_then(|name| self.catalog.plant(name).ok())
                    .ok_or_else(|| rejected(String::from("unknown plant")))?;
                plant::attach(slot, spec, 0, &self.life)
                    .map_err(|reason| rejected(reason.to_string()))?;
            }
            SlotActionKind::Supplement => {
                let spec = text(payload, "supplement")
                    .and_then(|name| self.catalog.supplement(name).ok())
                    .ok_or_else(|| rejected(String::from("unknown supplement")))?;
                actions::apply_supplement(slot, spec)
                    .map_err(|reason| rejected(reason.to_string()))?;
            }
            SlotActionKind::ResolveIssue | SlotActionKind::Hazard => {
                let kind: HazardKind = field(payload, "hazard")
                    .ok_or_else(|| rejected(String::from("missing hazard")))?;
                slot.hazards.set(kind, action == SlotActionKind::Hazard);
            }
            SlotActionKind::Harvest => {
                let outcome = harvest::harvest(slot, multiplier, self.life.slot_defaults())
                    .map_err(|e| rejected(e.to_string()))?;
                credited = Some(outcome.reward);
            }
            SlotActionKind::MarkDead => {
                if payload.get("remove").and_then(Value::as_bool) == Some(true) {
                    slot.reset(self.life.slot_defaults());
                } else {
                    let cause: DeathCause = field(payload, "cause").unwrap_or(DeathCause::Unknown);
                    death::kill_with_cause(slot, cause);
                }
            }
            SlotActionKind::Advance => {
                let to: Stage = field(payload, "to")
                    .ok_or_else(|| rejected(String::from("missing target stage")))?;
                slot.stage = to;
                slot.stage_elapsed = 0.0;
                if to == Stage::Ready {
                    slot.hazards.clear_all();
                    slot.hungry = false;
                }
            }
        }

        let response = SlotActionResponse {
            slot: SlotSnapshot::capture(slot, 0),
            credited,
        };
        if let Some(amount) = credited {
            state.credited = state.credited.saturating_add(amount);
        }
        debug!(action = %action, slot = response.slot.index, "Memory store applied action");
        Ok(response)
    }
}

impl PondStore for MemoryPondStore {
    fn fetch_pond(
        &self,
        player_id: PlayerId,
    ) -> impl Future<Output = Result<Option<PondSnapshot>, StoreError>> + Send {
        let result = if self.fail_fetches.load(Ordering::Acquire) {
            Err(transport("fetch failed"))
        } else {
            self.lock().map(|state| {
                Self::snapshot(&state).filter(|snapshot| snapshot.player_id == player_id)
            })
        };
        async move { result }
    }

    fn post_slot_action(
        &self,
        pond_id: PondId,
        slot_id: SlotId,
        request: SlotActionRequest,
    ) -> impl Future<Output = Result<SlotActionResponse, StoreError>> + Send {
        let result = if self.fail_actions.load(Ordering::Acquire) {
            Err(transport("action failed"))
        } else {
            self.apply(pond_id, slot_id, &request)
        };
        async move { result }
    }

    fn fetch_market_bonus(
        &self,
    ) -> impl Future<Output = Result<Option<MarketBonusSnapshot>, StoreError>> + Send {
        let result = if self.fail_fetches.load(Ordering::Acquire) {
            Err(transport("bonus fetch failed"))
        } else {
            self.lock().map(|state| state.bonus.clone())
        };
        async move { result }
    }
}

fn transport(message: &str) -> StoreError {
    StoreError::Transport {
        message: message.to_owned(),
    }
}

fn not_found(what: &str) -> StoreError {
    StoreError::Status {
        status: 404,
        body: format!("{what} not found"),
    }
}

fn text<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

fn field<T: serde::de::DeserializeOwned>(payload: &Value, key: &str) -> Option<T> {
    payload
        .get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}
