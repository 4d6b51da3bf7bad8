//! Principal Ledger
//!
//! Custody-side bookkeeping for staked principal, one balance per
//! pool. Mirrors `Pool::total_staked` from the asset side; the engine
//! checks both after every commit.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use lpfarm_common::{
    math::{safe_add, safe_sub},
    FarmError, FarmResult, PoolId,
};

/// Per-pool custodied principal balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PrincipalLedger {
    balances: Vec<u64>,
}

impl PrincipalLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a custody balance for a newly appended pool
    pub fn add_pool(&mut self) {
        self.balances.push(0);
    }

    /// Number of pools tracked
    pub fn pool_count(&self) -> usize {
        self.balances.len()
    }

    /// Custodied principal for a pool (zero for unknown pools)
    pub fn custodied(&self, pool_id: PoolId) -> u64 {
        self.balances.get(pool_id as usize).copied().unwrap_or(0)
    }

    /// Sum of custodied principal across all pools
    pub fn total_custodied(&self) -> u64 {
        self.balances.iter().sum()
    }

    /// Record principal entering custody
    pub fn record_deposit(&mut self, pool_id: PoolId, amount: u64) -> FarmResult<()> {
        let balance = self
            .balances
            .get_mut(pool_id as usize)
            .ok_or(FarmError::UnknownPool {
                pool_id,
                pool_count: 0,
            })?;
        *balance = safe_add(*balance, amount)?;
        Ok(())
    }

    /// Record principal leaving custody
    pub fn record_withdraw(&mut self, pool_id: PoolId, amount: u64) -> FarmResult<()> {
        let balance = self
            .balances
            .get_mut(pool_id as usize)
            .ok_or(FarmError::UnknownPool {
                pool_id,
                pool_count: 0,
            })?;
        *balance = safe_sub(*balance, amount)?;
        Ok(())
    }

    /// Verify custody matches the pool's staked total
    pub fn check_against(&self, pool_id: PoolId, total_staked: u64) -> FarmResult<()> {
        let custodied = self.custodied(pool_id);
        if custodied != total_staked {
            return Err(FarmError::BalanceMismatch {
                custodied,
                total_staked,
            });
        }
        Ok(())
    }
}
