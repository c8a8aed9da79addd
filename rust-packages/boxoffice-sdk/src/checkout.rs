//! Checkout save-point and selection restore.
//!
//! Beginning checkout only snapshots the priced selection into session
//! storage and hands control on. No payment or inventory call happens here.

use tracing::{debug, info, warn};

use crate::calculator::{OrderCalculator, OrderSummary};
use crate::catalog::Event;
use crate::constants::CHECKOUT_ROUTE_PREFIX;
use crate::errors::CheckoutError;
use crate::fees::FeePolicy;
use crate::intent::{storage_key, CheckoutIntent};
use crate::store::SessionStore;
use crate::tier::Selection;

/// Where control goes after the intent is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// A caller-supplied continuation received the intent.
    Continued,
    /// No continuation; show the checkout view at this path.
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutStarted {
    pub intent: CheckoutIntent,
    pub handoff: Handoff,
    /// False when the session store refused the write. Checkout still proceeds.
    pub persisted: bool,
    /// Informational hold window shown to the buyer. Not enforced.
    pub reservation_minutes: u32,
}

pub type Continuation<'a> = &'a mut dyn FnMut(&CheckoutIntent, u64);

pub fn checkout_path(event_id: &str) -> String {
    format!("{}{}", CHECKOUT_ROUTE_PREFIX, event_id)
}

/// Snapshot `summary` for `event`, save it under `checkout:<event id>` and hand off.
///
/// Fails only when nothing is selected. Storage failures are logged and
/// swallowed.
pub fn begin_checkout<S: SessionStore + ?Sized>(
    store: &mut S,
    event: &Event,
    selection: &Selection,
    summary: &OrderSummary,
    policy: &FeePolicy,
    continuation: Option<Continuation<'_>>,
) -> Result<CheckoutStarted, CheckoutError> {
    if summary.count == 0 {
        return Err(CheckoutError::InvalidState {
            event_id: event.id.clone(),
        });
    }

    let intent = CheckoutIntent::build(event, selection, summary, policy);
    let persisted = persist(store, &intent);

    let handoff = match continuation {
        Some(next) => {
            next(&intent, intent.grand_total);
            Handoff::Continued
        }
        None => Handoff::Navigate(checkout_path(&event.id)),
    };

    info!(
        event_id = %intent.event_id,
        tickets = summary.count,
        grand_total = intent.grand_total,
        persisted,
        "checkout started"
    );

    Ok(CheckoutStarted {
        intent,
        handoff,
        persisted,
        reservation_minutes: policy.reservation_minutes,
    })
}

fn persist<S: SessionStore + ?Sized>(store: &mut S, intent: &CheckoutIntent) -> bool {
    let payload = match intent.to_json() {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "could not encode checkout intent");
            return false;
        }
    };
    match store.set(&intent.storage_key(), &payload) {
        Ok(()) => true,
        Err(err) => {
            warn!(event_id = %intent.event_id, error = %err, "checkout intent not saved");
            false
        }
    }
}

/// Saved intent for `event_id`, if any readable one exists.
pub fn load_intent<S: SessionStore + ?Sized>(store: &S, event_id: &str) -> Option<CheckoutIntent> {
    let raw = match store.get(&storage_key(event_id)) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(event_id, error = %err, "session storage unreadable");
            return None;
        }
    };
    let intent = CheckoutIntent::from_json(&raw)?;
    if intent.event_id != event_id {
        debug!(event_id, stored = %intent.event_id, "ignoring intent saved for another event");
        return None;
    }
    Some(intent)
}

/// Selection to start the event view with: the saved one, or empty.
pub fn restore_selection<S: SessionStore + ?Sized>(store: &S, event_id: &str) -> Selection {
    match load_intent(store, event_id) {
        Some(intent) => {
            debug!(event_id, "restored saved selection");
            intent.selection
        }
        None => Selection::new(),
    }
}

/// Ticket selector for one event, wired to session storage.
#[derive(Debug, Clone)]
pub struct EventCheckout {
    event: Event,
    calculator: OrderCalculator,
}

impl EventCheckout {
    /// Enter the event view, restoring any selection saved earlier in the session.
    pub fn open<S: SessionStore + ?Sized>(store: &S, event: Event, policy: FeePolicy) -> Self {
        let selection = restore_selection(store, &event.id);
        let calculator = OrderCalculator::with_selection(event.ticket_tiers.clone(), policy, selection);
        Self { event, calculator }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn calculator(&self) -> &OrderCalculator {
        &self.calculator
    }

    pub fn set_quantity(&mut self, tier_id: &str, requested: i64) -> u32 {
        self.calculator.set_quantity(tier_id, requested)
    }

    pub fn summary(&self) -> &OrderSummary {
        self.calculator.summary()
    }

    pub fn begin_checkout<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        continuation: Option<Continuation<'_>>,
    ) -> Result<CheckoutStarted, CheckoutError> {
        begin_checkout(
            store,
            &self.event,
            self.calculator.selection(),
            self.calculator.summary(),
            self.calculator.policy(),
            continuation,
        )
    }
}
