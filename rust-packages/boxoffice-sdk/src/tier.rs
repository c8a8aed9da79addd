use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named class of ticket with its own price and inventory cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTier {
    pub id: String,
    pub name: String,
    /// Whole currency units.
    pub price: u64,
    /// `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl TicketTier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            available_quantity: None,
            description: None,
            access: None,
        }
    }

    pub fn with_available(mut self, quantity: u32) -> Self {
        self.available_quantity = Some(quantity);
        self
    }

    pub fn is_paid(&self) -> bool {
        self.price > 0
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_quantity == Some(0)
    }

    /// Clamp a requested quantity into `[0, available_quantity]`.
    pub fn clamp_quantity(&self, requested: i64) -> u32 {
        let floor = requested.max(0);
        let capped = match self.available_quantity {
            Some(cap) => floor.min(cap as i64),
            None => floor.min(u32::MAX as i64),
        };
        capped as u32
    }
}

/// Chosen quantity per tier id. A missing key is a quantity of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, u32>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tier_id: &str) -> u32 {
        self.0.get(tier_id).copied().unwrap_or(0)
    }

    /// Raw write. Callers are expected to have clamped `quantity` already.
    pub(crate) fn put(&mut self, tier_id: &str, quantity: u32) {
        self.0.insert(tier_id.to_string(), quantity);
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&q| q == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Re-clamp every entry against `tiers`, dropping ids the event no longer sells.
    pub fn normalized(&self, tiers: &[TicketTier]) -> Selection {
        let mut out = Selection::new();
        for (id, quantity) in self.iter() {
            if let Some(tier) = tiers.iter().find(|t| t.id == id) {
                out.put(id, tier.clamp_quantity(quantity as i64));
            }
        }
        out
    }
}

impl FromIterator<(String, u32)> for Selection {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Selection(iter.into_iter().collect())
    }
}

/// True when the event has tiers and every one of them is sold out.
pub fn all_sold_out(tiers: &[TicketTier]) -> bool {
    !tiers.is_empty() && tiers.iter().all(TicketTier::is_sold_out)
}
