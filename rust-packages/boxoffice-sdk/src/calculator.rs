//! Ticket selection and order pricing.
//!
//! [`recompute`] is the single pricing function. [`OrderCalculator`] keeps a
//! selection for one event and calls it after every mutation, so the summary
//! it exposes is never stale.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fees::{safe_add, safe_mul, FeePolicy};
use crate::tier::{all_sold_out, Selection, TicketTier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub tier_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub subtotal: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub count: u32,
    pub count_paid: u32,
    pub ticket_subtotal: u64,
    pub fees: u64,
    pub grand_total: u64,
}

impl OrderSummary {
    pub fn can_checkout(&self) -> bool {
        self.count > 0
    }

    pub fn checkout_label(&self) -> &'static str {
        if self.count == 0 {
            "Select tickets"
        } else {
            "Proceed to checkout"
        }
    }
}

/// Price `selection` against `tiers`.
///
/// Lines follow catalog order. Selection entries for ids not in `tiers` are
/// ignored. Amounts saturate at `u64::MAX` instead of wrapping.
pub fn recompute(tiers: &[TicketTier], selection: &Selection, policy: &FeePolicy) -> OrderSummary {
    let mut summary = OrderSummary::default();

    for tier in tiers {
        let quantity = selection.get(&tier.id);
        if quantity == 0 {
            continue;
        }
        let subtotal = safe_mul(tier.price, quantity as u64);
        summary.count = summary.count.saturating_add(quantity);

        if tier.is_paid() {
            summary.ticket_subtotal = safe_add(summary.ticket_subtotal, subtotal);
            summary.count_paid = summary.count_paid.saturating_add(quantity);
            summary.fees = safe_add(summary.fees, policy.line_fee(tier.price, quantity));
        }

        summary.lines.push(OrderLine {
            tier_id: tier.id.clone(),
            name: tier.name.clone(),
            quantity,
            unit_price: tier.price,
            subtotal,
        });
    }

    summary.grand_total = safe_add(summary.ticket_subtotal, summary.fees);
    summary
}

/// Working selection for one event's ticket tiers.
#[derive(Debug, Clone)]
pub struct OrderCalculator {
    tiers: Vec<TicketTier>,
    selection: Selection,
    policy: FeePolicy,
    summary: OrderSummary,
}

impl OrderCalculator {
    pub fn new(tiers: Vec<TicketTier>, policy: FeePolicy) -> Self {
        Self::with_selection(tiers, policy, Selection::new())
    }

    /// Seed the calculator with a previously saved selection. Entries are
    /// re-clamped against the current caps.
    pub fn with_selection(tiers: Vec<TicketTier>, policy: FeePolicy, selection: Selection) -> Self {
        let selection = selection.normalized(&tiers);
        let summary = recompute(&tiers, &selection, &policy);
        Self {
            tiers,
            selection,
            policy,
            summary,
        }
    }

    /// Store `requested` for `tier_id`, clamped to the tier's availability.
    ///
    /// Returns the stored quantity. Sold out and unknown tiers stay at 0.
    pub fn set_quantity(&mut self, tier_id: &str, requested: i64) -> u32 {
        let Some(tier) = self.tiers.iter().find(|t| t.id == tier_id) else {
            debug!(tier_id, "ignoring quantity for unknown tier");
            return 0;
        };
        if tier.is_sold_out() {
            return 0;
        }
        let stored = tier.clamp_quantity(requested);
        if stored as i64 != requested {
            debug!(tier_id, requested, stored, "quantity clamped");
        }
        self.selection.put(tier_id, stored);
        self.refresh();
        stored
    }

    pub fn increment(&mut self, tier_id: &str) -> u32 {
        let current = self.selection.get(tier_id) as i64;
        self.set_quantity(tier_id, current + 1)
    }

    pub fn decrement(&mut self, tier_id: &str) -> u32 {
        let current = self.selection.get(tier_id) as i64;
        self.set_quantity(tier_id, current - 1)
    }

    pub fn quantity(&self, tier_id: &str) -> u32 {
        self.selection.get(tier_id)
    }

    /// Whether the increment control for `tier_id` should be enabled.
    pub fn can_increment(&self, tier_id: &str) -> bool {
        self.tiers
            .iter()
            .find(|t| t.id == tier_id)
            .map(|t| match t.available_quantity {
                Some(cap) => self.selection.get(tier_id) < cap,
                None => true,
            })
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.selection = Selection::new();
        self.refresh();
    }

    pub fn tiers(&self) -> &[TicketTier] {
        &self.tiers
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    pub fn all_sold_out(&self) -> bool {
        all_sold_out(&self.tiers)
    }

    fn refresh(&mut self) {
        self.summary = recompute(&self.tiers, &self.selection, &self.policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn festival_tiers() -> Vec<TicketTier> {
        vec![
            TicketTier::new("early", "Early Bird", 5_000).with_available(120),
            TicketTier::new("vip", "VIP", 20_000).with_available(30),
        ]
    }

    #[test]
    fn test_end_to_end_pricing() {
        let mut calc = OrderCalculator::new(festival_tiers(), FeePolicy::default());
        calc.set_quantity("early", 2);
        calc.set_quantity("vip", 1);

        let summary = calc.summary();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].tier_id, "early");
        assert_eq!(summary.lines[0].quantity, 2);
        assert_eq!(summary.lines[0].subtotal, 10_000);
        assert_eq!(summary.lines[1].tier_id, "vip");
        assert_eq!(summary.lines[1].subtotal, 20_000);
        assert_eq!(summary.ticket_subtotal, 30_000);
        assert_eq!(summary.fees, 1_800);
        assert_eq!(summary.grand_total, 31_800);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.count_paid, 3);
    }

    #[test]
    fn test_empty_selection() {
        let tiers = vec![TicketTier::new("a", "A", 5_000).with_available(10)];
        let summary = recompute(&tiers, &Selection::new(), &FeePolicy::default());
        assert_eq!(summary, OrderSummary::default());
        assert!(!summary.can_checkout());
        assert_eq!(summary.checkout_label(), "Select tickets");
    }

    #[test]
    fn test_free_tier_lines_without_fees() {
        let tiers = vec![
            TicketTier::new("free", "Community", 0),
            TicketTier::new("paid", "Standard", 1_000),
        ];
        let mut calc = OrderCalculator::new(tiers, FeePolicy::default());
        calc.set_quantity("free", 4);
        calc.set_quantity("paid", 3);

        let summary = calc.summary();
        assert_eq!(summary.count, 7);
        assert_eq!(summary.count_paid, 3);
        assert_eq!(summary.ticket_subtotal, 3_000);
        assert_eq!(summary.fees, 450);
        assert_eq!(summary.grand_total, 3_450);
        assert_eq!(summary.lines[0].subtotal, 0);
        assert_eq!(summary.checkout_label(), "Proceed to checkout");
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut calc = OrderCalculator::new(festival_tiers(), FeePolicy::default());
        assert_eq!(calc.set_quantity("vip", 99), 30);
        assert_eq!(calc.set_quantity("vip", -4), 0);
        assert_eq!(calc.quantity("vip"), 0);
    }

    #[test]
    fn test_set_quantity_leaves_other_tiers() {
        let mut calc = OrderCalculator::new(festival_tiers(), FeePolicy::default());
        calc.set_quantity("early", 5);
        calc.set_quantity("vip", 2);
        calc.set_quantity("vip", 0);
        assert_eq!(calc.quantity("early"), 5);
        assert_eq!(calc.quantity("vip"), 0);
    }

    #[test]
    fn test_sold_out_tier_is_noop() {
        let tiers = vec![TicketTier::new("vip", "VIP", 20_000).with_available(0)];
        let mut calc = OrderCalculator::new(tiers, FeePolicy::default());
        assert_eq!(calc.set_quantity("vip", 3), 0);
        assert_eq!(calc.increment("vip"), 0);
        assert!(!calc.can_increment("vip"));
        assert!(calc.all_sold_out());
        assert_eq!(calc.summary().count, 0);
    }

    #[test]
    fn test_unknown_tier_is_noop() {
        let mut calc = OrderCalculator::new(festival_tiers(), FeePolicy::default());
        assert_eq!(calc.set_quantity("backstage", 2), 0);
        assert!(calc.selection().is_empty());
    }

    #[test]
    fn test_increment_stops_at_cap() {
        let tiers = vec![TicketTier::new("a", "A", 1_000).with_available(2)];
        let mut calc = OrderCalculator::new(tiers, FeePolicy::default());
        assert_eq!(calc.increment("a"), 1);
        assert!(calc.can_increment("a"));
        assert_eq!(calc.increment("a"), 2);
        assert!(!calc.can_increment("a"));
        assert_eq!(calc.increment("a"), 2);
        assert_eq!(calc.decrement("a"), 1);
        assert_eq!(calc.decrement("a"), 0);
        assert_eq!(calc.decrement("a"), 0);
    }

    #[test]
    fn test_summary_tracks_every_mutation() {
        let mut calc = OrderCalculator::new(festival_tiers(), FeePolicy::default());
        calc.set_quantity("early", 1);
        assert_eq!(calc.summary().grand_total, 5_350);
        calc.clear();
        assert_eq!(calc.summary().grand_total, 0);
    }

    #[test]
    fn test_with_selection_reclamps() {
        let saved: Selection = vec![("vip".to_string(), 50)].into_iter().collect();
        let calc = OrderCalculator::with_selection(festival_tiers(), FeePolicy::default(), saved);
        assert_eq!(calc.quantity("vip"), 30);
        assert_eq!(calc.summary().count, 30);
    }

    #[test]
    fn test_custom_policy() {
        let policy = FeePolicy::new(1_000, 0, "USD").unwrap();
        let tiers = vec![TicketTier::new("a", "A", 2_500)];
        let mut calc = OrderCalculator::new(tiers, policy);
        calc.set_quantity("a", 2);
        assert_eq!(calc.summary().fees, 500);
        assert_eq!(calc.summary().grand_total, 5_500);
    }
}
