//! # Fee Arithmetic

use crate::domain::RemittanceError;
use shared_types::Amount;

/// Split a released amount into `(net, fee)`.
///
/// The fee must leave a positive net amount.
pub fn split_fee(amount: Amount, fee: Amount) -> Result<(Amount, Amount), RemittanceError> {
    if fee >= amount {
        return Err(RemittanceError::FeeExceedsAmount { amount, fee });
    }
    Ok((amount - fee, fee))
}

/// Smallest deposit a spoke accepts: the configured minimum, but never less
/// than `fee + 1`.
pub fn minimum_deposit(configured: Amount, fee: Amount) -> Amount {
    configured.max(fee.saturating_add(1))
}
