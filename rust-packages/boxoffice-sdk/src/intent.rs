use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculator::{OrderLine, OrderSummary};
use crate::catalog::Event;
use crate::constants::CHECKOUT_KEY_PREFIX;
use crate::fees::FeePolicy;
use crate::tier::Selection;

/// Snapshot of a priced selection, saved when the buyer starts checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutIntent {
    pub event_id: String,
    pub event_title: String,
    pub venue_name: String,
    pub starts_at: Option<String>,
    pub selection: Selection,
    pub lines: Vec<OrderLine>,
    pub ticket_subtotal: u64,
    pub fees: u64,
    pub grand_total: u64,
    pub currency: String,
    pub fee_formula: String,
    pub count_paid: u32,
}

impl CheckoutIntent {
    pub fn build(event: &Event, selection: &Selection, summary: &OrderSummary, policy: &FeePolicy) -> Self {
        Self {
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            venue_name: event.venue_name.clone().unwrap_or_default(),
            starts_at: event.start_date.clone(),
            selection: selection.clone(),
            lines: summary.lines.clone(),
            ticket_subtotal: summary.ticket_subtotal,
            fees: summary.fees,
            grand_total: summary.grand_total,
            currency: policy.currency.clone(),
            fee_formula: policy.formula(),
            count_paid: summary.count_paid,
        }
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.event_id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a stored payload. Anything that does not match the current
    /// layout is treated as no intent at all.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(intent) => Some(intent),
            Err(err) => {
                warn!(error = %err, "discarding unreadable checkout intent");
                None
            }
        }
    }
}

pub fn storage_key(event_id: &str) -> String {
    format!("{}{}", CHECKOUT_KEY_PREFIX, event_id)
}
