//! Configuration for the hub and its spokes

use crate::domain::RemittanceError;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, BlockHeight};
use std::env;

/// Remittance configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemittanceConfig {
    /// Fee paid to the hub owner on each release
    pub fee_amount: Amount,
    /// Smallest accepted deposit, must exceed the fee
    pub min_deposit: Amount,
    /// Longest accepted expiry window, in blocks (one week at 15s)
    pub max_expiry_offset: BlockHeight,
}

impl Default for RemittanceConfig {
    fn default() -> Self {
        Self {
            fee_amount: 1,
            min_deposit: 2,
            max_expiry_offset: 40_320,
        }
    }
}

impl RemittanceConfig {
    /// Read `RH_FEE_AMOUNT`, `RH_MIN_DEPOSIT` and `RH_MAX_EXPIRY_OFFSET`,
    /// falling back to defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fee_amount: env_or("RH_FEE_AMOUNT", defaults.fee_amount),
            min_deposit: env_or("RH_MIN_DEPOSIT", defaults.min_deposit),
            max_expiry_offset: env_or("RH_MAX_EXPIRY_OFFSET", defaults.max_expiry_offset),
        }
    }

    /// Reject configurations under which no deposit could ever be released.
    pub fn validate(&self) -> Result<(), RemittanceError> {
        if self.min_deposit <= self.fee_amount {
            return Err(RemittanceError::InvalidConfig(format!(
                "min_deposit ({}) must exceed fee_amount ({})",
                self.min_deposit, self.fee_amount
            )));
        }
        if self.max_expiry_offset == 0 {
            return Err(RemittanceError::InvalidConfig(
                "max_expiry_offset must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
