//! Fixed-Point Reward Math
//!
//! Checked integer arithmetic for the reward-per-share accumulator.
//! Division truncates; the resulting dust is an accepted, bounded
//! leakage and is never redistributed.

use crate::constants::precision::ACC_SCALE;
use crate::errors::{FarmError, FarmResult};

/// Calculate a pool's emission for an elapsed interval.
///
/// `reward_per_step * elapsed * weight / total_weight`, computed in
/// `u128` with truncating division. A zero `total_weight` emits
/// nothing rather than dividing by zero (only reachable while no pool
/// carries weight).
pub fn pool_emission(
    reward_per_step: u64,
    elapsed: u64,
    weight: u64,
    total_weight: u64,
) -> FarmResult<u64> {
    if total_weight == 0 || weight == 0 {
        return Ok(0);
    }

    let emitted = (reward_per_step as u128)
        .checked_mul(elapsed as u128)
        .ok_or(FarmError::Overflow)?
        .checked_mul(weight as u128)
        .ok_or(FarmError::Overflow)?
        / total_weight as u128;

    u64::try_from(emitted).map_err(|_| FarmError::Overflow)
}

/// Calculate the accumulator increment for a reward spread over the
/// pool's staked principal: `reward * ACC_SCALE / total_staked`.
pub fn per_share_increment(reward: u64, total_staked: u64) -> FarmResult<u128> {
    if total_staked == 0 {
        return Err(FarmError::DivisionByZero);
    }

    let increment = (reward as u128)
        .checked_mul(ACC_SCALE)
        .ok_or(FarmError::Overflow)?
        / total_staked as u128;

    Ok(increment)
}

/// Reward accounted to `staked` units under the given accumulator:
/// `staked * acc_reward_per_share / ACC_SCALE`.
pub fn accumulated(staked: u64, acc_reward_per_share: u128) -> FarmResult<u64> {
    let total = (staked as u128)
        .checked_mul(acc_reward_per_share)
        .ok_or(FarmError::Overflow)?
        / ACC_SCALE;

    u64::try_from(total).map_err(|_| FarmError::Overflow)
}

/// Pending reward for a position: accumulated value minus the
/// reward-debt snapshot. Non-negative whenever the accumulator is
/// monotone and the debt was snapshotted from it.
pub fn pending_amount(staked: u64, acc_reward_per_share: u128, reward_debt: u64) -> FarmResult<u64> {
    let total = accumulated(staked, acc_reward_per_share)?;
    total.checked_sub(reward_debt).ok_or(FarmError::Underflow)
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> FarmResult<u64> {
    a.checked_add(b).ok_or(FarmError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u64, b: u64) -> FarmResult<u64> {
    a.checked_sub(b).ok_or(FarmError::Underflow)
}
