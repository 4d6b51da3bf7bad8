//! Pool Accrual
//!
//! The reward-per-share accumulator. `project` computes what a pool's
//! accumulator will be at a given step as a pure function of four
//! integers; `accrue` commits that projection. Every mutating engine
//! call accrues first, so the accumulator is always current at the
//! moment any downstream computation reads it — no scheduler needed.

use lpfarm_common::{
    math::{per_share_increment, pool_emission},
    FarmResult, Pool,
};

/// Result of projecting a pool's accrual to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// Accumulator value after the interval
    pub acc_reward_per_share: u128,
    /// Reward emitted to the pool over the interval (0 while empty)
    pub reward_emitted: u64,
}

/// Project a pool's accumulator to `current_step` without mutating it.
///
/// For `current_step <= last_accrual_step` the projection is the
/// stored accumulator unchanged. An empty pool's accumulator does not
/// advance: the emission for that interval is forgone, not deferred.
pub fn project(
    pool: &Pool,
    current_step: u64,
    reward_per_step: u64,
    total_weight: u64,
) -> FarmResult<Projection> {
    if current_step <= pool.last_accrual_step || pool.total_staked == 0 {
        return Ok(Projection {
            acc_reward_per_share: pool.acc_reward_per_share,
            reward_emitted: 0,
        });
    }

    let elapsed = current_step - pool.last_accrual_step;
    let reward = pool_emission(reward_per_step, elapsed, pool.weight, total_weight)?;
    let increment = per_share_increment(reward, pool.total_staked)?;

    Ok(Projection {
        acc_reward_per_share: pool
            .acc_reward_per_share
            .checked_add(increment)
            .ok_or(lpfarm_common::FarmError::Overflow)?,
        reward_emitted: reward,
    })
}

/// Advance a pool's accumulator to `current_step`.
///
/// Idempotent: calling twice at the same step changes nothing the
/// second time. Returns the reward emitted for the interval.
pub fn accrue(
    pool: &mut Pool,
    current_step: u64,
    reward_per_step: u64,
    total_weight: u64,
) -> FarmResult<u64> {
    let projection = project(pool, current_step, reward_per_step, total_weight)?;

    pool.acc_reward_per_share = projection.acc_reward_per_share;
    if current_step > pool.last_accrual_step {
        pool.last_accrual_step = current_step;
    }

    Ok(projection.reward_emitted)
}
