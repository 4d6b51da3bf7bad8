//! Collaborator Contracts
//!
//! The farm core never moves assets itself; it drives these narrow
//! traits and treats every call as a synchronous, fallible step that
//! must complete (or fail outright) before any core state is written.

use crate::errors::FarmResult;
use crate::types::{Address, AssetId};

/// Supplies the current discrete time step ("block number").
///
/// Implementations must be monotone non-decreasing; the engine relies
/// on that to keep every pool's `last_accrual_step` moving forward.
pub trait Clock {
    /// Current step
    fn current_step(&self) -> u64;
}

/// Custody of the staked assets.
///
/// `pull_from` moves principal from the user into farm custody,
/// `push_to` returns it. Failures surface as
/// [`crate::FarmError::TransferFailed`] and are never retried by the
/// core; retry policy belongs to the caller layer.
pub trait AssetTransfer {
    /// Transfer `amount` of `asset` from `user` into custody
    fn pull_from(&mut self, asset: AssetId, user: Address, amount: u64) -> FarmResult<()>;

    /// Transfer `amount` of `asset` from custody back to `user`
    fn push_to(&mut self, asset: AssetId, user: Address, amount: u64) -> FarmResult<()>;
}

/// Source of reward-asset units.
///
/// May mint or transfer from a reserve; authorization to mint is an
/// external concern. Failures surface as
/// [`crate::FarmError::PayoutFailed`].
pub trait RewardSource {
    /// Pay `amount` of the reward asset to `user`
    fn payout(&mut self, user: Address, amount: u64) -> FarmResult<()>;
}
