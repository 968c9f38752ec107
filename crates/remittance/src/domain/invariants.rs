//! # Domain Invariants
//!
//! Input rules checked before any state is touched.

use super::errors::RemittanceError;
use shared_types::{is_zero_address, Address, Amount, BlockHeight, CallContext, Hash, ZERO_HASH};

/// Accounts named in a call must not be the null account.
pub fn invariant_nonzero_address(address: &Address) -> Result<(), RemittanceError> {
    if is_zero_address(address) {
        return Err(RemittanceError::ZeroAddress);
    }
    Ok(())
}

/// A commitment key of all zeros is never stored.
pub fn invariant_nonzero_puzzle(puzzle: &Hash) -> Result<(), RemittanceError> {
    if *puzzle == ZERO_HASH {
        return Err(RemittanceError::ZeroPuzzle);
    }
    Ok(())
}

/// Expiry offset must be in `1..=max`.
pub fn invariant_expiry_offset(
    offset: BlockHeight,
    max: BlockHeight,
) -> Result<(), RemittanceError> {
    if offset == 0 || offset > max {
        return Err(RemittanceError::InvalidExpiryOffset { offset, max });
    }
    Ok(())
}

/// Deposit must reach the minimum.
pub fn invariant_min_deposit(value: Amount, minimum: Amount) -> Result<(), RemittanceError> {
    if value < minimum {
        return Err(RemittanceError::DepositTooSmall { value, minimum });
    }
    Ok(())
}

/// Release, withdraw, reclaim and instance creation carry no value.
pub fn invariant_non_payable(ctx: &CallContext) -> Result<(), RemittanceError> {
    if ctx.is_payable() {
        return Err(RemittanceError::NonPayable { value: ctx.value });
    }
    Ok(())
}
