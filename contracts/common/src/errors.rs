//! Error Types for the LPFarm Core
//!
//! Typed, structured errors surfaced synchronously to the caller.
//! Nothing is swallowed or retried inside the core; a failed call
//! leaves all core state exactly as before the call.

use crate::types::{Address, AssetId, PoolId};

/// Result type alias for farm operations
pub type FarmResult<T> = Result<T, FarmError>;

/// Main error enum for all farm operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmError {
    // ============ Pool Errors ============
    /// Pool id is out of range
    UnknownPool { pool_id: PoolId, pool_count: u32 },

    /// Pool set is full
    PoolLimitReached { count: usize, max: usize },

    /// Pool weight exceeds the configured bound
    ExcessiveWeight { weight: u64, max: u64 },

    // ============ Amount Errors ============
    /// Invalid amount provided
    InvalidAmount { amount: u64, reason: AmountErrorReason },

    /// Withdraw exceeds the caller's staked amount (never partial-fills)
    InsufficientBalance { available: u64, requested: u64 },

    /// Emission rate outside the accepted range
    InvalidRewardRate { rate: u64, max: u64 },

    // ============ Collaborator Errors ============
    /// Staked-asset movement failed; the call aborts with no state mutated
    TransferFailed {
        asset: AssetId,
        user: Address,
        amount: u64,
    },

    /// Reward payout failed; the call aborts with no state mutated
    PayoutFailed { user: Address, amount: u64 },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,

    // ============ Bookkeeping Errors ============
    /// Custody ledger diverged from pool totals (internal invariant)
    BalanceMismatch { custodied: u64, total_staked: u64 },
}

/// Reasons for amount-related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountErrorReason {
    /// Amount is zero when non-zero required
    Zero,
    /// Amount exceeds maximum
    TooLarge,
    /// Amount doesn't match expected
    Mismatch,
}

impl FarmError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownPool { .. } => "E001_UNKNOWN_POOL",
            Self::PoolLimitReached { .. } => "E002_POOL_LIMIT",
            Self::ExcessiveWeight { .. } => "E003_EXCESSIVE_WEIGHT",
            Self::InvalidAmount { .. } => "E010_INVALID_AMOUNT",
            Self::InsufficientBalance { .. } => "E011_INSUFFICIENT_BALANCE",
            Self::InvalidRewardRate { .. } => "E012_INVALID_REWARD_RATE",
            Self::TransferFailed { .. } => "E020_TRANSFER_FAILED",
            Self::PayoutFailed { .. } => "E021_PAYOUT_FAILED",
            Self::Overflow => "E030_OVERFLOW",
            Self::Underflow => "E031_UNDERFLOW",
            Self::DivisionByZero => "E032_DIV_ZERO",
            Self::BalanceMismatch { .. } => "E040_BALANCE_MISMATCH",
        }
    }

    /// Returns true if this error is recoverable (the caller can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidAmount { .. } => true,     // Pick a valid amount
            Self::InsufficientBalance { .. } => true, // Withdraw less
            Self::TransferFailed { .. } => true,    // Fund the account
            Self::PayoutFailed { .. } => true,      // Refill the reward source
            _ => false,
        }
    }
}
