//! Slot Action Gateway: caretaker intents in, local mutation plus store
//! reconciliation out.
//!
//! Every intent is validated and applied locally first, under the engine
//! lock, and the lock is released before any remote call. Then:
//!
//! - no store configured: the intent is final and harvests credit locally
//! - store answers: the returned slot replaces the local one (that slot
//!   only) and harvests credit exactly what the store confirms
//! - store fails: the whole pond is re-fetched and reconciled; if that
//!   fetch fails too, the gateway drops to [`SyncMode::LocalOnly`]
//! - local-only with a store configured: the intent is applied locally and
//!   reported as [`SyncOutcome::Unsynced`], and nothing is credited until
//!   the store confirms a harvest
//!
//! A slot with no store id triggers one fetch+reconcile before the action.
//! If the id is still missing the action stays local and is reported as
//! [`SyncOutcome::Unsynced`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use pond_ledger::Wallet;
use pond_life::LifeError;
use pond_types::{
    HazardKind, LifecycleEvent, PlayerId, PondId, RejectionReason, SlotActionKind,
    SlotActionRequest, SlotId, Stage,
};

use crate::bonus::{BonusBoard, MarketBonus};
use crate::engine::PondSimulationEngine;
use crate::intent::{Intent, IntentOutcome};
use crate::store::{PondStore, StoreError};

/// Errors returned to the caretaker by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The intent failed validation; nothing changed.
    #[error("slot {slot}: {reason}")]
    Rejected {
        /// Grid index of the slot.
        slot: usize,
        /// Why the intent was refused.
        reason: RejectionReason,
    },

    /// The intent passed validation but could not be applied.
    #[error("slot {slot}: {source}")]
    Life {
        /// Grid index of the slot.
        slot: usize,
        /// The underlying error.
        source: LifeError,
    },
}

impl GatewayError {
    fn from_life(slot: usize, error: LifeError) -> Self {
        match error.rejection() {
            Some(reason) => Self::Rejected { slot, reason },
            None => Self::Life { slot, source: error },
        }
    }

    /// The rejection reason, if this is a validation failure.
    pub const fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Rejected { reason, .. } => Some(*reason),
            Self::Life { .. } => None,
        }
    }
}

/// Whether the gateway currently trusts the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Remote calls are being made and reconciled.
    Online,
    /// The last resync failed; intents are applied and credited locally
    /// until a fetch succeeds again.
    LocalOnly,
}

/// How an applied intent relates to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No store involved.
    Local,
    /// The store applied the action and its slot state was adopted.
    Confirmed,
    /// The store failed; the pond was re-fetched (or the gateway went
    /// local-only) and the local change may have been overwritten.
    Resynced,
    /// The change exists only locally: the slot has no store id, or the
    /// store is unreachable in local-only mode. Nothing is credited.
    Unsynced,
}

/// What the caretaker gets back from a successful intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    /// Grid index of the slot.
    pub slot: usize,
    /// The store action the intent maps to.
    pub action: SlotActionKind,
    /// Signals produced by the intent.
    pub events: Vec<LifecycleEvent>,
    /// Coins credited to the wallet.
    pub credited: u64,
    /// Relationship with the store.
    pub sync: SyncOutcome,
}

/// The only writer that both mutates the pond and talks to the store.
pub struct SlotGateway<S, W> {
    engine: Arc<Mutex<PondSimulationEngine>>,
    store: Option<Arc<S>>,
    wallet: Arc<Mutex<W>>,
    bonus: Arc<dyn MarketBonus>,
    player_id: PlayerId,
    local_only: AtomicBool,
}

impl<S, W> SlotGateway<S, W>
where
    S: PondStore + 'static,
    W: Wallet + Send + Sync + 'static,
{
    /// Wire a gateway. `store = None` means local-only play.
    pub fn new(
        engine: Arc<Mutex<PondSimulationEngine>>,
        store: Option<Arc<S>>,
        wallet: Arc<Mutex<W>>,
        bonus: Arc<dyn MarketBonus>,
        player_id: PlayerId,
    ) -> Self {
        Self {
            engine,
            store,
            wallet,
            bonus,
            player_id,
            local_only: AtomicBool::new(false),
        }
    }

    /// The shared engine.
    pub const fn engine(&self) -> &Arc<Mutex<PondSimulationEngine>> {
        &self.engine
    }

    /// The shared wallet.
    pub const fn wallet(&self) -> &Arc<Mutex<W>> {
        &self.wallet
    }

    /// Whether a store is configured.
    pub const fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Current sync mode.
    pub fn mode(&self) -> SyncMode {
        if self.local_only.load(Ordering::Acquire) {
            SyncMode::LocalOnly
        } else {
            SyncMode::Online
        }
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Stock an empty slot.
    pub async fn stock(&self, slot: usize, creature: &str) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::Stock {
            creature: creature.to_owned(),
        })
        .await
    }

    /// Feed a hungry creature.
    pub async fn feed(&self, slot: usize) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::Feed).await
    }

    /// Place a plant.
    pub async fn apply_plant(&self, slot: usize, plant: &str) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::ApplyPlant {
            plant: plant.to_owned(),
        })
        .await
    }

    /// Apply a supplement.
    pub async fn apply_supplement(
        &self,
        slot: usize,
        supplement: &str,
    ) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::ApplySupplement {
            supplement: supplement.to_owned(),
        })
        .await
    }

    /// Clear an active hazard.
    pub async fn resolve_hazard(
        &self,
        slot: usize,
        hazard: HazardKind,
    ) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::ResolveHazard { hazard }).await
    }

    /// Harvest a ready creature.
    pub async fn harvest(&self, slot: usize) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::Harvest).await
    }

    /// Remove a dead occupant.
    pub async fn remove_dead(&self, slot: usize) -> Result<ActionReceipt, GatewayError> {
        self.perform(slot, Intent::RemoveDead).await
    }

    /// Validate, apply locally, then reconcile with the store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the intent fails local validation. Store
    /// failures are not errors: they are reflected in the receipt's
    /// [`SyncOutcome`].
    pub async fn perform(&self, slot: usize, intent: Intent) -> Result<ActionReceipt, GatewayError> {
        let action = intent.action();
        let multiplier = self.bonus.active_multiplier();

        let Some(store) = self.store.clone() else {
            let outcome = self.apply_locally(slot, &intent, multiplier).await?;
            let credited = self.credit(outcome.reward.unwrap_or(0), slot).await;
            return Ok(receipt(slot, action, outcome, credited, SyncOutcome::Local));
        };

        if self.mode() == SyncMode::LocalOnly && self.resync().await.is_err() {
            let outcome = self.apply_locally(slot, &intent, multiplier).await?;
            if outcome.reward.is_some() {
                warn!(slot, action = %action, "Store unreachable, harvest not credited");
            }
            return Ok(receipt(slot, action, outcome, 0, SyncOutcome::Unsynced));
        }

        let mut target = self.remote_target(slot).await;
        if target.is_none() {
            warn!(slot, action = %action, "Slot has no store id, resyncing before action");
            if self.resync().await.is_ok() {
                target = self.remote_target(slot).await;
            }
        }

        let outcome = self.apply_locally(slot, &intent, multiplier).await?;
        let Some((pond_id, slot_id)) = target else {
            warn!(slot, action = %action, "Slot still has no store id, change kept locally");
            return Ok(receipt(slot, action, outcome, 0, SyncOutcome::Unsynced));
        };

        match store.post_slot_action(pond_id, slot_id, intent.to_request()).await {
            Ok(response) => {
                self.local_only.store(false, Ordering::Release);
                if let Err(e) = self.engine.lock().await.apply_slot_snapshot(&response.slot) {
                    warn!(slot, error = %e, "Store returned a slot outside the grid");
                }
                let credited = if intent == Intent::Harvest {
                    self.credit(response.credited.unwrap_or(0), slot).await
                } else {
                    0
                };
                Ok(receipt(slot, action, outcome, credited, SyncOutcome::Confirmed))
            }
            Err(e) => {
                warn!(slot, action = %action, error = %e, "Store action failed, resyncing pond");
                if let Err(e) = self.resync().await {
                    warn!(error = %e, "Resync failed, continuing local-only");
                }
                Ok(receipt(slot, action, outcome, 0, SyncOutcome::Resynced))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Fetch the whole pond from the store and reconcile the engine with it.
    ///
    /// Success returns the gateway to [`SyncMode::Online`]; failure drops it
    /// to [`SyncMode::LocalOnly`].
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the failed fetch.
    pub async fn resync(&self) -> Result<(), StoreError> {
        let Some(store) = self.store.clone() else {
            return Ok(());
        };
        match store.fetch_pond(self.player_id).await {
            Ok(snapshot) => {
                self.engine.lock().await.reconcile(snapshot.as_ref());
                if self.local_only.swap(false, Ordering::AcqRel) {
                    info!("Store reachable again, back online");
                }
                Ok(())
            }
            Err(e) => {
                if !self.local_only.swap(true, Ordering::AcqRel) {
                    warn!(error = %e, "Store unreachable, switching to local-only");
                }
                Err(e)
            }
        }
    }

    /// Poll the store's market bonus into `board`. Failures keep the last
    /// known bonus.
    pub async fn refresh_bonus(&self, board: &BonusBoard) {
        let Some(store) = self.store.clone() else {
            return;
        };
        match store.fetch_market_bonus().await {
            Ok(bonus) => board.publish(bonus),
            Err(e) => warn!(error = %e, "Market bonus poll failed"),
        }
    }

    /// Push tick signals to the store: stage advances, deaths and hazard
    /// triggers. Failures are logged and never touch local state.
    pub async fn forward_signals(&self, events: &[LifecycleEvent]) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let (pond_id, requests) = {
            let engine = self.engine.lock().await;
            let Some(pond_id) = engine.pond().pond_id else {
                return;
            };
            let remote = |index: usize| engine.slot(index).and_then(|slot| slot.remote_id);
            (pond_id, signal_requests(events, remote))
        };
        if requests.is_empty() {
            return;
        }

        let calls = requests.into_iter().map(|(slot_id, request)| {
            let store = Arc::clone(&store);
            async move {
                let action = request.action;
                (action, slot_id, store.post_slot_action(pond_id, slot_id, request).await)
            }
        });
        for (action, slot_id, result) in join_all(calls).await {
            if let Err(e) = result {
                warn!(action = %action, slot_id = %slot_id, error = %e, "Forwarding to store failed");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn apply_locally(
        &self,
        slot: usize,
        intent: &Intent,
        multiplier: rust_decimal::Decimal,
    ) -> Result<IntentOutcome, GatewayError> {
        self.engine
            .lock()
            .await
            .apply_intent(slot, intent, multiplier)
            .map_err(|e| GatewayError::from_life(slot, e))
    }

    async fn remote_target(&self, slot: usize) -> Option<(PondId, SlotId)> {
        let engine = self.engine.lock().await;
        let pond_id = engine.pond().pond_id?;
        let slot_id = engine.slot(slot)?.remote_id?;
        Some((pond_id, slot_id))
    }

    async fn credit(&self, amount: u64, slot: usize) -> u64 {
        if amount == 0 {
            return 0;
        }
        let memo = format!("harvest of slot {slot}");
        match self.wallet.lock().await.credit(amount, &memo) {
            Ok(_) => amount,
            Err(e) => {
                warn!(slot, amount, error = %e, "Wallet credit failed");
                0
            }
        }
    }
}

fn receipt(
    slot: usize,
    action: SlotActionKind,
    outcome: IntentOutcome,
    credited: u64,
    sync: SyncOutcome,
) -> ActionReceipt {
    ActionReceipt {
        slot,
        action,
        events: outcome.events,
        credited,
        sync,
    }
}

/// Store requests for the tick signals that the store tracks.
fn signal_requests(
    events: &[LifecycleEvent],
    remote: impl Fn(usize) -> Option<SlotId>,
) -> Vec<(SlotId, SlotActionRequest)> {
    let mut requests = Vec::new();
    for event in events {
        match event {
            LifecycleEvent::StageAdvanced { slot, from, to } if *from != Stage::Empty => {
                if let Some(slot_id) = remote(*slot) {
                    requests.push((slot_id, SlotActionRequest {
                        action: SlotActionKind::Advance,
                        payload: json!({ "from": from, "to": to }),
                    }));
                }
            }
            LifecycleEvent::CreatureDied { slot, cause, .. } => {
                if let Some(slot_id) = remote(*slot) {
                    requests.push((slot_id, SlotActionRequest {
                        action: SlotActionKind::MarkDead,
                        payload: json!({ "cause": cause }),
                    }));
                }
            }
            LifecycleEvent::HazardTriggered { hazard, slots } => {
                for slot_id in slots.iter().filter_map(|slot| remote(*slot)) {
                    requests.push((slot_id, SlotActionRequest {
                        action: SlotActionKind::Hazard,
                        payload: json!({ "hazard": hazard }),
                    }));
                }
            }
            _ => {}
        }
    }
    requests
}
