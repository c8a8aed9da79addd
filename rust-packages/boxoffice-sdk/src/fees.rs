use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::ConfigError;

/// Pricing policy applied on top of ticket prices.
///
/// Every paid ticket carries `round(price * percent_bps / 10_000 + flat_fee)`.
/// Free tickets never carry a fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePolicy {
    pub percent_bps: u32,
    pub flat_fee: u64,
    pub currency: String,
    pub reservation_minutes: u32,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            percent_bps: DEFAULT_FEE_BPS,
            flat_fee: DEFAULT_FLAT_FEE,
            currency: DEFAULT_CURRENCY.to_string(),
            reservation_minutes: DEFAULT_RESERVATION_MINUTES,
        }
    }
}

impl FeePolicy {
    pub fn new(percent_bps: u32, flat_fee: u64, currency: impl Into<String>) -> Result<Self, ConfigError> {
        if percent_bps > MAX_FEE_BPS {
            return Err(ConfigError::FeeTooHigh(percent_bps));
        }
        Ok(Self {
            percent_bps,
            flat_fee,
            currency: currency.into(),
            reservation_minutes: DEFAULT_RESERVATION_MINUTES,
        })
    }

    pub fn with_reservation_minutes(mut self, minutes: u32) -> Self {
        self.reservation_minutes = minutes;
        self
    }

    /// Fee for a single ticket at `unit_price`. Zero for free tickets.
    ///
    /// Rounds half up, which matches `Math.round` on the non-negative amounts
    /// the storefront shows. The flat fee is whole, so adding it before or
    /// after rounding gives the same result.
    pub fn per_ticket_fee(&self, unit_price: u64) -> u64 {
        if unit_price == 0 {
            return 0;
        }
        let scaled = unit_price as u128 * self.percent_bps as u128 + (BPS_DENOMINATOR as u128 / 2);
        let percent_part = scaled / BPS_DENOMINATOR as u128;
        clamp_u64(percent_part + self.flat_fee as u128)
    }

    /// Fee contribution of `quantity` tickets at `unit_price`.
    ///
    /// The unit fee is rounded first and then multiplied, never the other way
    /// around.
    pub fn line_fee(&self, unit_price: u64, quantity: u32) -> u64 {
        clamp_u64(self.per_ticket_fee(unit_price) as u128 * quantity as u128)
    }

    /// Human readable formula, e.g. `5% + ₦100 per paid ticket`.
    pub fn formula(&self) -> String {
        format!(
            "{} + {}{} per paid ticket",
            format_percent(self.percent_bps),
            currency_symbol(&self.currency),
            self.flat_fee
        )
    }
}

pub fn safe_add(a: u64, b: u64) -> u64 {
    a.saturating_add(b)
}

pub fn safe_mul(a: u64, b: u64) -> u64 {
    a.saturating_mul(b)
}

fn clamp_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn format_percent(bps: u32) -> String {
    let whole = bps / 100;
    let frac = bps % 100;
    if frac == 0 {
        format!("{}%", whole)
    } else {
        let frac = format!("{:02}", frac);
        format!("{}.{}%", whole, frac.trim_end_matches('0'))
    }
}

pub fn currency_symbol(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "NGN" => "₦".to_string(),
        "USD" => "$".to_string(),
        "GBP" => "£".to_string(),
        "EUR" => "€".to_string(),
        other => format!("{} ", other),
    }
}
