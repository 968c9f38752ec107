//! # Domain Errors
//!
//! Error types for the hub and its spokes. Every rejected operation leaves
//! commitments, balances, the ledger and the event bus untouched.

use shared_types::{Address, Amount, BlockHeight, Hash};
use thiserror::Error;

/// Failure reported by the value-transfer primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Source account cannot cover the transfer.
    #[error("Insufficient funds in {account:?}: available={available}, requested={requested}")]
    InsufficientFunds {
        /// Debited account.
        account: Address,
        /// Balance at the time of the transfer.
        available: Amount,
        /// Requested amount.
        requested: Amount,
    },

    /// Destination refused the value.
    #[error("Transfer rejected by {0:?}")]
    Rejected(Address),

    /// Destination is the null account.
    #[error("Transfer to the zero address")]
    ZeroDestination,

    /// Source and destination are the same account.
    #[error("Transfer from {0:?} to itself")]
    SelfTransfer(Address),

    /// Destination balance would overflow.
    #[error("Balance overflow at {0:?}")]
    Overflow(Address),
}

/// Coarse error classes, stable across variants. Used for metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    InvalidInput,
    /// The puzzle is already in use.
    Conflict,
    /// No commitment matches.
    NotFound,
    /// The commitment is already terminal.
    AlreadyCompleted,
    /// The release window has closed.
    Expired,
    /// Caller or instance not permitted.
    Unauthorized,
    /// Nothing to withdraw.
    InsufficientBalance,
    /// The value-transfer primitive failed.
    TransferFailed,
}

impl ErrorKind {
    /// Label form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyCompleted => "AlreadyCompleted",
            ErrorKind::Expired => "Expired",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::InsufficientBalance => "InsufficientBalance",
            ErrorKind::TransferFailed => "TransferFailed",
        }
    }
}

/// Remittance error types.
#[derive(Debug, Error)]
pub enum RemittanceError {
    /// The secret is all zeros.
    #[error("Secret must not be zero")]
    ZeroSecret,

    /// The zero address was supplied where an account is required.
    #[error("Zero address")]
    ZeroAddress,

    /// The puzzle is all zeros.
    #[error("Puzzle must not be zero")]
    ZeroPuzzle,

    /// Expiry offset is zero or beyond the configured maximum.
    #[error("Invalid expiry offset {offset} (max {max})")]
    InvalidExpiryOffset {
        /// Requested offset.
        offset: BlockHeight,
        /// Configured maximum.
        max: BlockHeight,
    },

    /// Attached value is below the minimum deposit.
    #[error("Deposit too small: {value} < {minimum}")]
    DepositTooSmall {
        /// Attached value.
        value: Amount,
        /// Minimum accepted deposit.
        minimum: Amount,
    },

    /// Value attached to a call that does not accept value.
    #[error("Operation does not accept value (got {value})")]
    NonPayable {
        /// Attached value.
        value: Amount,
    },

    /// The hub fee would consume the whole commitment.
    #[error("Fee {fee} exceeds amount {amount}")]
    FeeExceedsAmount {
        /// Committed amount.
        amount: Amount,
        /// Hub fee.
        fee: Amount,
    },

    /// A withdrawable balance would overflow.
    #[error("Balance overflow")]
    BalanceOverflow,

    /// The puzzle already has a commitment.
    #[error("Puzzle already exists: {0:?}")]
    PuzzleExists(Hash),

    /// No commitment for this puzzle.
    #[error("Puzzle not found: {0:?}")]
    PuzzleNotFound(Hash),

    /// Commitment already released or reclaimed.
    #[error("Commitment already completed: {0:?}")]
    AlreadyCompleted(Hash),

    /// Release attempted after expiry.
    #[error("Commitment expired at {expiry} (now {current})")]
    Expired {
        /// Expiry height.
        expiry: BlockHeight,
        /// Current height.
        current: BlockHeight,
    },

    /// Reclaim attempted before expiry.
    #[error("Commitment not expired until {expiry} (now {current})")]
    NotExpired {
        /// Expiry height.
        expiry: BlockHeight,
        /// Current height.
        current: BlockHeight,
    },

    /// The instance was not deployed by its hub.
    #[error("Instance not authorized by hub: {0:?}")]
    UnauthorizedInstance(Address),

    /// Caller is not allowed to perform this operation.
    #[error("Unauthorized caller")]
    UnauthorizedCaller,

    /// Nothing to withdraw.
    #[error("Insufficient balance for {0:?}")]
    InsufficientBalance(Address),

    /// The value-transfer primitive failed.
    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    /// The instance was named as the depositor of its own commitment.
    #[error("Instance cannot deposit into itself: {0:?}")]
    SelfDeposit(Address),

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The hub was dropped while still in use.
    #[error("Hub unavailable")]
    HubUnavailable,
}

impl RemittanceError {
    /// Map onto the coarse error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroSecret
            | Self::ZeroAddress
            | Self::ZeroPuzzle
            | Self::InvalidExpiryOffset { .. }
            | Self::DepositTooSmall { .. }
            | Self::NonPayable { .. }
            | Self::FeeExceedsAmount { .. }
            | Self::BalanceOverflow
            | Self::SelfDeposit(_)
            | Self::InvalidConfig(_)
            | Self::HubUnavailable => ErrorKind::InvalidInput,
            Self::PuzzleExists(_) => ErrorKind::Conflict,
            Self::PuzzleNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyCompleted(_) => ErrorKind::AlreadyCompleted,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::NotExpired { .. } | Self::UnauthorizedInstance(_) | Self::UnauthorizedCaller => {
                ErrorKind::Unauthorized
            }
            Self::InsufficientBalance(_) => ErrorKind::InsufficientBalance,
            Self::TransferFailed(_) => ErrorKind::TransferFailed,
        }
    }
}
