//! # Lookup Controller
//!
//! Turns submitted barcodes into [`LookupState`] changes.
//!
//! ## Thread Safety
//! The tracker (generation counter + state) sits behind one `Mutex`, so
//! "is this ticket still current?" and "apply its result" happen in a single
//! critical section. Observers never touch the lock; they read a
//! `watch` channel that is updated inside the same critical section.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  submit("B") ──lock──► tracker.begin("B") → gen 2, state = Loading      │
//! │                        publish(Loading)                                 │
//! │                 spawn ─────────────────────────────┐                    │
//! │                                                    ▼                    │
//! │                          timeout(api.read_by_barcode("B"))              │
//! │                                                    │                    │
//! │                 ◄──lock── tracker.complete(ticket gen 2, outcome)       │
//! │                           current? → apply + publish                    │
//! │                           stale?   → drop silently                      │
//! │                                                                         │
//! │  Errors end here: every failure becomes LookupState::Error(message).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use pricecheck_core::{Barcode, LookupOutcome, LookupState, LookupTicket, LookupTracker};

use crate::client::{HttpInventoryClient, InventoryApi};
use crate::config::InventorySettings;
use crate::error::{LookupError, LookupResult};

/// State shared between the controller handle and its spawned lookups.
struct Shared {
    tracker: Mutex<LookupTracker>,
    state_tx: watch::Sender<LookupState>,
}

impl Shared {
    fn with_tracker_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut LookupTracker, &watch::Sender<LookupState>) -> R,
    {
        let mut tracker = self.tracker.lock().expect("Lookup mutex poisoned");
        f(&mut tracker, &self.state_tx)
    }

    fn complete(&self, ticket: &LookupTicket, outcome: LookupOutcome) {
        let applied = self.with_tracker_mut(|tracker, tx| {
            if !tracker.complete(ticket, outcome) {
                return None;
            }
            tx.send_replace(tracker.state().clone());
            Some(tracker.state().status())
        });

        if let Some(status) = applied {
            debug!(
                barcode = %ticket.barcode(),
                generation = ticket.generation(),
                status,
                "Lookup result applied"
            );
        } else {
            debug!(
                barcode = %ticket.barcode(),
                generation = ticket.generation(),
                "Discarding stale lookup result"
            );
        }
    }
}

/// Owns the lookup state and the inventory client.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct LookupController {
    api: Arc<dyn InventoryApi>,
    shared: Arc<Shared>,
    timeout: Duration,
}

impl LookupController {
    /// Creates a controller in the `Idle` state.
    ///
    /// `timeout` bounds each request; an elapsed timeout becomes `Error`.
    pub fn new(api: Arc<dyn InventoryApi>, timeout: Duration) -> Self {
        let (state_tx, _) = watch::channel(LookupState::Idle);
        LookupController {
            api,
            shared: Arc::new(Shared {
                tracker: Mutex::new(LookupTracker::new()),
                state_tx,
            }),
            timeout,
        }
    }

    /// Creates a controller backed by [`HttpInventoryClient`].
    pub fn from_settings(settings: &InventorySettings) -> LookupResult<Self> {
        let client = HttpInventoryClient::new(settings)?;
        info!(endpoint = %client.endpoint(), "Inventory client ready");
        Ok(Self::new(Arc::new(client), settings.timeout()))
    }

    /// Starts a lookup for `barcode`.
    ///
    /// The state moves to `Loading` before this returns. Any lookup still in
    /// flight is superseded: its result will be dropped when it arrives.
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// resolves once the result has been applied or discarded.
    pub fn submit(&self, barcode: Barcode) -> JoinHandle<()> {
        let ticket = self.shared.with_tracker_mut(|tracker, tx| {
            let ticket = tracker.begin(barcode);
            tx.send_replace(LookupState::Loading);
            ticket
        });

        info!(
            barcode = %ticket.barcode(),
            generation = ticket.generation(),
            "Looking up product"
        );

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let timeout = self.timeout;

        tokio::spawn(async move {
            let outcome =
                match tokio::time::timeout(timeout, api.read_by_barcode(ticket.barcode())).await {
                    Ok(Ok(page)) => LookupOutcome::Answered(page),
                    Ok(Err(e)) => {
                        warn!(barcode = %ticket.barcode(), error = %e, "Lookup failed");
                        LookupOutcome::Failed(e.to_string())
                    }
                    Err(_) => {
                        let e = LookupError::Timeout(timeout);
                        warn!(barcode = %ticket.barcode(), error = %e, "Lookup failed");
                        LookupOutcome::Failed(e.to_string())
                    }
                };

            shared.complete(&ticket, outcome);
        })
    }

    /// Current state snapshot.
    pub fn state(&self) -> LookupState {
        self.shared.state_tx.borrow().clone()
    }

    /// The most recently submitted barcode, if any.
    pub fn last_barcode(&self) -> Option<Barcode> {
        self.shared
            .with_tracker_mut(|tracker, _| tracker.current_barcode().cloned())
    }

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.shared.state_tx.subscribe()
    }

    /// Returns to `Idle`; lookups still in flight are dropped on arrival.
    pub fn reset(&self) {
        self.shared.with_tracker_mut(|tracker, tx| {
            tracker.reset();
            tx.send_replace(LookupState::Idle);
        });
        debug!("Lookup state reset");
    }
}

impl std::fmt::Debug for LookupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupController")
            .field("state", &self.state())
            .field("timeout", &self.timeout)
            .finish()
    }
}
