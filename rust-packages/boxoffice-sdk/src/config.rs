use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};

use crate::constants::*;
use crate::errors::ConfigError;
use crate::fees::FeePolicy;

impl FeePolicy {
    /// Load the policy from `BOXOFFICE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the policy through `lookup`. Unset keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let percent_bps: u32 = try_load(&lookup, ENV_FEE_BPS, DEFAULT_FEE_BPS)?;
        let flat_fee: u64 = try_load(&lookup, ENV_FLAT_FEE, DEFAULT_FLAT_FEE)?;
        let currency: String = try_load(&lookup, ENV_CURRENCY, DEFAULT_CURRENCY.to_string())?;
        let reservation_minutes: u32 =
            try_load(&lookup, ENV_RESERVATION_MINUTES, DEFAULT_RESERVATION_MINUTES)?;

        Ok(FeePolicy::new(percent_bps, flat_fee, currency.to_ascii_uppercase())?
            .with_reservation_minutes(reservation_minutes))
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue { key, value: raw.clone() }
        }),
    }
}
