//! Core Types for the LPFarm Ledger
//!
//! Fundamental data structures shared by the engine and its callers.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for staked-asset identifiers
pub type AssetId = [u8; 32];

/// Pool identifier: index into the append-only pool set
pub type PoolId = u32;

// ============ Pool State ============

/// Per-pool accounting state.
///
/// `acc_reward_per_share` is the cumulative reward earned per staked
/// base unit, scaled by [`crate::constants::precision::ACC_SCALE`]. It
/// only ever moves forward, and only while the pool has stake; reward
/// allocated to an empty interval is forgone, not deferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Pool {
    /// Identifier of the staked-asset type (immutable after creation)
    pub asset_id: AssetId,
    /// Allocation weight; the pool's share of global emission is
    /// `weight / total_weight`
    pub weight: u64,
    /// Sum of all users' staked amounts in this pool
    pub total_staked: u64,
    /// Last step at which the accumulator was advanced
    pub last_accrual_step: u64,
    /// Cumulative scaled reward per staked base unit
    pub acc_reward_per_share: u128,
}

impl Pool {
    /// Creates a new empty pool anchored at the current step
    pub fn new(asset_id: AssetId, weight: u64, current_step: u64) -> Self {
        Self {
            asset_id,
            weight,
            total_staked: 0,
            last_accrual_step: current_step,
            acc_reward_per_share: 0,
        }
    }

    /// Returns true if nobody is staked in this pool
    pub fn is_empty(&self) -> bool {
        self.total_staked == 0
    }
}

// ============ User Position ============

/// Per (pool, user) accounting state.
///
/// Created lazily on first deposit and never deleted; an all-zero
/// position reads the same as "never deposited" through the query
/// surface, but stays in the map for audit simplicity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct UserPosition {
    /// Principal currently deposited by this user in this pool
    pub staked: u64,
    /// Snapshot of `staked * acc_reward_per_share / ACC_SCALE` at the
    /// last interaction; reward already accounted for
    pub reward_debt: u64,
    /// Step of the user's last interaction with this pool
    pub last_updated_step: u64,
}

impl UserPosition {
    /// Creates an empty position
    pub fn new() -> Self {
        Self::default()
    }
}

// ============ Introspection Views ============

/// Snapshot of a pool's externally visible state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolInfo {
    /// Staked-asset identifier
    pub asset_id: AssetId,
    /// Allocation weight
    pub weight: u64,
    /// Total staked principal
    pub total_staked: u64,
    /// Scaled reward-per-share accumulator
    pub acc_reward_per_share: u128,
    /// Last accrual step
    pub last_accrual_step: u64,
}

impl From<&Pool> for PoolInfo {
    fn from(pool: &Pool) -> Self {
        Self {
            asset_id: pool.asset_id,
            weight: pool.weight,
            total_staked: pool.total_staked,
            acc_reward_per_share: pool.acc_reward_per_share,
            last_accrual_step: pool.last_accrual_step,
        }
    }
}

/// Snapshot of a user's position in a pool.
///
/// A user who never deposited reads as all zeros, indistinguishable
/// here from a fully-withdrawn position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct UserInfo {
    /// Staked principal
    pub staked: u64,
    /// Reward-debt snapshot
    pub reward_debt: u64,
}

impl From<&UserPosition> for UserInfo {
    fn from(position: &UserPosition) -> Self {
        Self {
            staked: position.staked,
            reward_debt: position.reward_debt,
        }
    }
}
