//! # Lookup State Machine
//!
//! The observable state of a product lookup and the bookkeeping that keeps
//! overlapping lookups from clobbering each other.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            begin(code)                complete(ticket, outcome)         │
//! │   ┌──────┐ ──────────► ┌─────────┐ ──────────────────────────┐          │
//! │   │ Idle │             │ Loading │                           │          │
//! │   └──────┘ ◄──reset─── └─────────┘                           ▼          │
//! │      ▲                      ▲        ┌────────────┬──────────┬───────┐  │
//! │      │                      │        │ Found(rec) │ NotFound │ Error │  │
//! │      └────────reset─────────┴─begin──┴────────────┴──────────┴───────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Responses
//! Every `begin` hands out a ticket stamped with a new generation. A
//! completion is applied only if its ticket carries the current generation;
//! anything older is dropped, whatever order the responses arrive in.
//! ```text
//!   begin(A) → gen 1      begin(B) → gen 2
//!   B answers (gen 2) ✔ applied
//!   A answers (gen 1) ✘ dropped
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::barcode::Barcode;
use crate::types::{ProductPage, ProductRecord};

/// Message used when a failure arrives without a description.
const UNKNOWN_FAILURE: &str = "Lookup failed";

// =============================================================================
// Lookup State
// =============================================================================

/// What the kiosk shows right now. Exactly one variant holds at a time.
///
/// ## Serialization
/// ```json
/// { "status": "found", "data": { "Nombre": "Leche 1L", ... } }
/// { "status": "error", "data": "Request timed out after 10s" }
/// { "status": "not_found" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LookupState {
    /// Nothing scanned yet.
    #[default]
    Idle,
    /// A request for the current barcode is in flight.
    Loading,
    /// The API returned a product with a usable name.
    Found(ProductRecord),
    /// The API answered but matched nothing usable.
    NotFound,
    /// The request failed; the message is meant for display.
    Error(String),
}

impl LookupState {
    /// Returns true while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    /// The found product, if any.
    pub fn product(&self) -> Option<&ProductRecord> {
        match self {
            LookupState::Found(record) => Some(record),
            _ => None,
        }
    }

    /// Short machine-friendly name of the variant.
    pub fn status(&self) -> &'static str {
        match self {
            LookupState::Idle => "idle",
            LookupState::Loading => "loading",
            LookupState::Found(_) => "found",
            LookupState::NotFound => "not_found",
            LookupState::Error(_) => "error",
        }
    }
}

// =============================================================================
// Lookup Outcome
// =============================================================================

/// How one request ended, before it's turned into a state.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The API answered with a page of results.
    Answered(ProductPage),
    /// The request failed (network, HTTP status, decode, timeout).
    Failed(String),
}

impl LookupOutcome {
    /// Maps the outcome to the state the kiosk should show.
    ///
    /// ## Rules
    /// - First result with a non-blank name → `Found`
    /// - No results, or first result without a name → `NotFound`
    /// - Failure → `Error` with a non-empty message
    pub fn into_state(self) -> LookupState {
        match self {
            LookupOutcome::Answered(page) => match page.into_first() {
                Some(record) if record.has_usable_name() => LookupState::Found(record),
                _ => LookupState::NotFound,
            },
            LookupOutcome::Failed(message) => {
                let message = message.trim();
                if message.is_empty() {
                    LookupState::Error(UNKNOWN_FAILURE.to_string())
                } else {
                    LookupState::Error(message.to_string())
                }
            }
        }
    }
}

// =============================================================================
// Lookup Tracker
// =============================================================================

/// Proof that a lookup was started; needed to apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    barcode: Barcode,
}

impl LookupTicket {
    /// Generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The barcode this lookup is for.
    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }
}

/// Owns the lookup state and the current generation.
#[derive(Debug, Clone, Default)]
pub struct LookupTracker {
    generation: u64,
    current: Option<Barcode>,
    state: LookupState,
}

impl LookupTracker {
    /// Creates a tracker in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The state to render.
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// The most recently submitted barcode, if any.
    pub fn current_barcode(&self) -> Option<&Barcode> {
        self.current.as_ref()
    }

    /// The current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a lookup: moves to `Loading` and supersedes any in-flight one.
    pub fn begin(&mut self, barcode: Barcode) -> LookupTicket {
        self.generation = self.generation.wrapping_add(1);
        self.current = Some(barcode.clone());
        self.state = LookupState::Loading;
        LookupTicket {
            generation: self.generation,
            barcode,
        }
    }

    /// Returns true if results for `ticket` may still change the state.
    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a finished lookup.
    ///
    /// Returns `false` (and changes nothing) when the ticket is stale.
    pub fn complete(&mut self, ticket: &LookupTicket, outcome: LookupOutcome) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = outcome.into_state();
        true
    }

    /// Back to `Idle`; results still in flight will be dropped.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.current = None;
        self.state = LookupState::Idle;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
