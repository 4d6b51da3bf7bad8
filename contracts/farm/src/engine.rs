//! Farm Engine
//!
//! Orchestration of the farm's operation surface: validate inputs,
//! bring the target pool's accumulator up to date, settle the caller's
//! pending reward, move assets through the collaborators, and commit.
//!
//! The engine is a single writer. Mutating operations take `&mut self`
//! and run to completion; queries take `&self`. Every fallible
//! collaborator call happens before any core state is written, so a
//! failed call leaves accumulators, positions and balances exactly as
//! they were (all-or-nothing per call).
//!
//! Elapsed time is measured against the clock as-is: when the clock
//! has already advanced by the time a mutating call is processed, the
//! call's own step counts toward the interval. This matches the
//! transaction-occupies-a-block behavior the reference deployment had.

use lpfarm_common::{
    constants::{
        emission::MAX_REWARD_PER_STEP,
        limits::{MAX_POOLS, MAX_POOL_WEIGHT},
    },
    math::{accumulated, pending_amount, safe_add, safe_sub},
    Address, AmountErrorReason, AssetId, AssetTransfer, Clock, EventLog, FarmError, FarmEvent,
    FarmResult, Pool, PoolId, PoolInfo, RewardSource, UserInfo, UserPosition,
};
use std::collections::BTreeMap;

use crate::accrual::{self, Projection};
use crate::ledger::PrincipalLedger;

// ============ Outcomes ============

/// Result of a deposit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositOutcome {
    /// Pending reward settled by this deposit
    pub reward_paid: u64,
    /// User's staked amount after the deposit
    pub new_staked: u64,
    /// Pool's total staked principal after the deposit
    pub pool_total_staked: u64,
}

/// Result of a withdraw operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOutcome {
    /// Principal returned to the user
    pub withdrawn: u64,
    /// Pending reward settled by this withdrawal
    pub reward_paid: u64,
    /// User's staked amount after the withdrawal
    pub new_staked: u64,
    /// Pool's total staked principal after the withdrawal
    pub pool_total_staked: u64,
}

/// Result of a claim operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// Reward paid out (zero when nothing was pending)
    pub reward_paid: u64,
}

/// Settled view of a position against a projected accumulator
struct Settlement {
    projection: Projection,
    position: UserPosition,
    pending: u64,
}

// ============ Engine ============

/// The farm's accounting state machine.
///
/// Owns the pool set, all user positions, the principal custody
/// ledger, and the collaborators it is driven through. Pools are
/// append-only; positions are created lazily on first deposit and
/// never deleted.
#[derive(Debug)]
pub struct FarmEngine<C, T, R> {
    pools: Vec<Pool>,
    positions: BTreeMap<(PoolId, Address), UserPosition>,
    ledger: PrincipalLedger,
    total_weight: u64,
    reward_per_step: u64,
    clock: C,
    transfer: T,
    rewards: R,
    events: EventLog,
}

impl<C: Clock, T: AssetTransfer, R: RewardSource> FarmEngine<C, T, R> {
    /// Create an engine with no pools and a fixed global emission rate
    pub fn new(reward_per_step: u64, clock: C, transfer: T, rewards: R) -> FarmResult<Self> {
        if reward_per_step > MAX_REWARD_PER_STEP {
            return Err(FarmError::InvalidRewardRate {
                rate: reward_per_step,
                max: MAX_REWARD_PER_STEP,
            });
        }

        Ok(Self {
            pools: Vec::new(),
            positions: BTreeMap::new(),
            ledger: PrincipalLedger::new(),
            total_weight: 0,
            reward_per_step,
            clock,
            transfer,
            rewards,
            events: EventLog::new(),
        })
    }

    // ============ Administration ============

    /// Append a new pool for `asset` with the given allocation weight.
    ///
    /// All existing pools are accrued first so the weight change never
    /// retroactively alters an already-elapsed emission split.
    pub fn add_pool(&mut self, asset: AssetId, weight: u64) -> FarmResult<PoolId> {
        if self.pools.len() >= MAX_POOLS {
            return Err(FarmError::PoolLimitReached {
                count: self.pools.len(),
                max: MAX_POOLS,
            });
        }
        if weight > MAX_POOL_WEIGHT {
            return Err(FarmError::ExcessiveWeight {
                weight,
                max: MAX_POOL_WEIGHT,
            });
        }

        let new_total_weight = safe_add(self.total_weight, weight)?;
        self.mass_accrue()?;

        let step = self.clock.current_step();
        let pool_id = self.pools.len() as PoolId;
        self.pools.push(Pool::new(asset, weight, step));
        self.ledger.add_pool();
        self.total_weight = new_total_weight;

        self.events.emit(FarmEvent::PoolAdded {
            pool_id,
            asset_id: asset,
            weight,
            total_weight: self.total_weight,
            step,
        });

        Ok(pool_id)
    }

    /// Change a pool's allocation weight, accruing all pools first so
    /// the new split only applies from the current step onward.
    pub fn set_pool_weight(&mut self, pool_id: PoolId, weight: u64) -> FarmResult<()> {
        let old_weight = self.pool(pool_id)?.weight;
        if weight > MAX_POOL_WEIGHT {
            return Err(FarmError::ExcessiveWeight {
                weight,
                max: MAX_POOL_WEIGHT,
            });
        }

        let new_total_weight = safe_add(safe_sub(self.total_weight, old_weight)?, weight)?;
        self.mass_accrue()?;

        let step = self.clock.current_step();
        self.pools[pool_id as usize].weight = weight;
        self.total_weight = new_total_weight;

        self.events.emit(FarmEvent::PoolWeightChanged {
            pool_id,
            old_weight,
            new_weight: weight,
            total_weight: self.total_weight,
            step,
        });

        Ok(())
    }

    /// Change the global emission rate, accruing all pools first so
    /// the new rate only applies from the current step onward.
    pub fn set_reward_per_step(&mut self, rate: u64) -> FarmResult<()> {
        if rate > MAX_REWARD_PER_STEP {
            return Err(FarmError::InvalidRewardRate {
                rate,
                max: MAX_REWARD_PER_STEP,
            });
        }

        self.mass_accrue()?;

        let old_rate = self.reward_per_step;
        self.reward_per_step = rate;
        self.events.emit(FarmEvent::EmissionRateChanged {
            old_rate,
            new_rate: rate,
            step: self.clock.current_step(),
        });

        Ok(())
    }

    /// Force accrual on every pool, materializing reward without a
    /// user-triggered event. Every pool's `last_accrual_step` ends at
    /// the current step; accumulators of empty pools are unaffected.
    pub fn mass_accrue(&mut self) -> FarmResult<()> {
        let step = self.clock.current_step();
        for (index, pool) in self.pools.iter_mut().enumerate() {
            let stale = step > pool.last_accrual_step;
            let reward_emitted = accrual::accrue(pool, step, self.reward_per_step, self.total_weight)?;
            if stale {
                self.events.emit(FarmEvent::PoolAccrued {
                    pool_id: index as PoolId,
                    reward_emitted,
                    step,
                });
            }
        }
        Ok(())
    }

    // ============ User Operations ============

    /// Deposit `amount` of the pool's asset for `user`.
    ///
    /// Any pending reward is settled first, even on a pure top-up.
    pub fn deposit(&mut self, pool_id: PoolId, amount: u64, user: Address) -> FarmResult<DepositOutcome> {
        if amount == 0 {
            return Err(FarmError::InvalidAmount {
                amount,
                reason: AmountErrorReason::Zero,
            });
        }
        let asset = self.pool(pool_id)?.asset_id;

        let step = self.clock.current_step();
        let settlement = self.settle(pool_id, user, step)?;
        let pool_total = self.pools[pool_id as usize].total_staked;

        let new_staked = safe_add(settlement.position.staked, amount)?;
        let new_pool_total = safe_add(pool_total, amount)?;
        let new_debt = accumulated(new_staked, settlement.projection.acc_reward_per_share)?;

        // External effects, in order; nothing core is written yet
        if settlement.pending > 0 {
            self.rewards.payout(user, settlement.pending)?;
        }
        self.transfer.pull_from(asset, user, amount)?;

        // Commit
        self.commit_pool(pool_id, &settlement.projection, step);
        self.pools[pool_id as usize].total_staked = new_pool_total;
        self.positions.insert(
            (pool_id, user),
            UserPosition {
                staked: new_staked,
                reward_debt: new_debt,
                last_updated_step: step,
            },
        );
        self.ledger.record_deposit(pool_id, amount)?;
        self.ledger.check_against(pool_id, new_pool_total)?;

        self.events.emit(FarmEvent::Deposited {
            pool_id,
            user,
            amount,
            reward_paid: settlement.pending,
            new_staked,
            step,
        });

        Ok(DepositOutcome {
            reward_paid: settlement.pending,
            new_staked,
            pool_total_staked: new_pool_total,
        })
    }

    /// Withdraw `amount` of staked principal for `user`.
    ///
    /// Never partial-fills: a request beyond the staked amount fails
    /// outright. Pending reward is settled first.
    pub fn withdraw(&mut self, pool_id: PoolId, amount: u64, user: Address) -> FarmResult<WithdrawOutcome> {
        let asset = self.pool(pool_id)?.asset_id;
        if amount == 0 {
            return Err(FarmError::InvalidAmount {
                amount,
                reason: AmountErrorReason::Zero,
            });
        }

        let staked = self
            .positions
            .get(&(pool_id, user))
            .map(|p| p.staked)
            .unwrap_or(0);
        if amount > staked {
            return Err(FarmError::InsufficientBalance {
                available: staked,
                requested: amount,
            });
        }

        let step = self.clock.current_step();
        let settlement = self.settle(pool_id, user, step)?;
        let pool_total = self.pools[pool_id as usize].total_staked;

        let new_staked = safe_sub(settlement.position.staked, amount)?;
        let new_pool_total = safe_sub(pool_total, amount)?;
        let new_debt = accumulated(new_staked, settlement.projection.acc_reward_per_share)?;

        // External effects, in order; nothing core is written yet
        if settlement.pending > 0 {
            self.rewards.payout(user, settlement.pending)?;
        }
        self.transfer.push_to(asset, user, amount)?;

        // Commit
        self.commit_pool(pool_id, &settlement.projection, step);
        self.pools[pool_id as usize].total_staked = new_pool_total;
        self.positions.insert(
            (pool_id, user),
            UserPosition {
                staked: new_staked,
                reward_debt: new_debt,
                last_updated_step: step,
            },
        );
        self.ledger.record_withdraw(pool_id, amount)?;
        self.ledger.check_against(pool_id, new_pool_total)?;

        self.events.emit(FarmEvent::Withdrawn {
            pool_id,
            user,
            amount,
            reward_paid: settlement.pending,
            new_staked,
            step,
        });

        Ok(WithdrawOutcome {
            withdrawn: amount,
            reward_paid: settlement.pending,
            new_staked,
            pool_total_staked: new_pool_total,
        })
    }

    /// Pay out `user`'s pending reward for a pool, leaving principal
    /// untouched. Immediately afterwards, pending reward is exactly 0.
    pub fn claim(&mut self, pool_id: PoolId, user: Address) -> FarmResult<ClaimOutcome> {
        self.pool(pool_id)?;

        // A user who never deposited has nothing to settle and gets no
        // position created.
        if !self.positions.contains_key(&(pool_id, user)) {
            return Ok(ClaimOutcome { reward_paid: 0 });
        }

        let step = self.clock.current_step();
        let settlement = self.settle(pool_id, user, step)?;
        let new_debt = accumulated(
            settlement.position.staked,
            settlement.projection.acc_reward_per_share,
        )?;

        if settlement.pending > 0 {
            self.rewards.payout(user, settlement.pending)?;
        }

        // Commit
        self.commit_pool(pool_id, &settlement.projection, step);
        self.positions.insert(
            (pool_id, user),
            UserPosition {
                staked: settlement.position.staked,
                reward_debt: new_debt,
                last_updated_step: step,
            },
        );

        self.events.emit(FarmEvent::RewardsClaimed {
            pool_id,
            user,
            reward_paid: settlement.pending,
            step,
        });

        Ok(ClaimOutcome {
            reward_paid: settlement.pending,
        })
    }

    // ============ Queries ============

    /// Reward accrued but not yet paid to `user` for a pool.
    ///
    /// Pure projection: returns exactly what a mutating call at the
    /// same step would settle, without touching any state.
    pub fn pending_rewards(&self, pool_id: PoolId, user: Address) -> FarmResult<u64> {
        let pool = self.pool(pool_id)?;
        let projection = accrual::project(
            pool,
            self.clock.current_step(),
            self.reward_per_step,
            self.total_weight,
        )?;

        let position = self
            .positions
            .get(&(pool_id, user))
            .cloned()
            .unwrap_or_default();
        pending_amount(
            position.staked,
            projection.acc_reward_per_share,
            position.reward_debt,
        )
    }

    /// Externally visible snapshot of a pool
    pub fn pool_info(&self, pool_id: PoolId) -> FarmResult<PoolInfo> {
        Ok(PoolInfo::from(self.pool(pool_id)?))
    }

    /// Externally visible snapshot of a user's position.
    ///
    /// Absent positions read as zeros, indistinguishable from a fully
    /// withdrawn position.
    pub fn user_info(&self, pool_id: PoolId, user: Address) -> FarmResult<UserInfo> {
        self.pool(pool_id)?;
        Ok(self
            .positions
            .get(&(pool_id, user))
            .map(UserInfo::from)
            .unwrap_or_default())
    }

    /// Sum of all pools' allocation weights
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Global emission rate per step
    pub fn reward_per_step(&self) -> u64 {
        self.reward_per_step
    }

    /// Number of pools in the append-only set
    pub fn pool_count(&self) -> u32 {
        self.pools.len() as u32
    }

    /// Returns true if the user has a (possibly zero) recorded position
    pub fn has_position(&self, pool_id: PoolId, user: Address) -> bool {
        self.positions.contains_key(&(pool_id, user))
    }

    /// Custodied principal for a pool
    pub fn custodied(&self, pool_id: PoolId) -> u64 {
        self.ledger.custodied(pool_id)
    }

    // ============ Collaborator Access ============

    /// The engine's clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock access (advancing time between calls)
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The asset-custody collaborator
    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Mutable custody access (funding users in a harness)
    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    /// The reward-source collaborator
    pub fn rewards(&self) -> &R {
        &self.rewards
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drain all emitted events
    pub fn take_events(&mut self) -> Vec<FarmEvent> {
        core::mem::take(&mut self.events).into_events()
    }

    // ============ Internals ============

    fn pool(&self, pool_id: PoolId) -> FarmResult<&Pool> {
        self.pools
            .get(pool_id as usize)
            .ok_or(FarmError::UnknownPool {
                pool_id,
                pool_count: self.pools.len() as u32,
            })
    }

    /// Project the pool's accumulator to `step` and compute the user's
    /// pending reward against it. Pure: nothing is written.
    fn settle(&self, pool_id: PoolId, user: Address, step: u64) -> FarmResult<Settlement> {
        let pool = self.pool(pool_id)?;
        let projection = accrual::project(pool, step, self.reward_per_step, self.total_weight)?;
        let position = self
            .positions
            .get(&(pool_id, user))
            .cloned()
            .unwrap_or_default();
        let pending = pending_amount(
            position.staked,
            projection.acc_reward_per_share,
            position.reward_debt,
        )?;

        Ok(Settlement {
            projection,
            position,
            pending,
        })
    }

    /// Write a projected accumulator back to the pool.
    fn commit_pool(&mut self, pool_id: PoolId, projection: &Projection, step: u64) {
        let pool = &mut self.pools[pool_id as usize];
        pool.acc_reward_per_share = projection.acc_reward_per_share;
        if step > pool.last_accrual_step {
            pool.last_accrual_step = step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpfarm_common::constants::token::ONE;
    use lpfarm_token::{AssetBank, MintingRewardSource, StepClock};

    const REWARD_PER_STEP: u64 = 200 * ONE;

    fn user1() -> Address {
        [2u8; 32]
    }

    fn farm_custody() -> Address {
        [0xFFu8; 32]
    }

    fn lp_a() -> AssetId {
        [0xA1u8; 32]
    }

    fn lp_b() -> AssetId {
        [0xB1u8; 32]
    }

    fn new_engine() -> FarmEngine<StepClock, AssetBank, MintingRewardSource> {
        FarmEngine::new(
            REWARD_PER_STEP,
            StepClock::starting_at(100),
            AssetBank::new(farm_custody()),
            MintingRewardSource::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_add_pool_sums_weights() {
        let mut engine = new_engine();
        assert_eq!(engine.add_pool(lp_a(), 50).unwrap(), 0);
        assert_eq!(engine.add_pool(lp_b(), 30).unwrap(), 1);
        assert_eq!(engine.total_weight(), 80);
        assert_eq!(engine.pool_count(), 2);

        let info = engine.pool_info(1).unwrap();
        assert_eq!(info.weight, 30);
        assert_eq!(info.total_staked, 0);
        assert_eq!(info.last_accrual_step, 100);
        assert_eq!(info.acc_reward_per_share, 0);
    }

    #[test]
    fn test_unknown_pool_rejected() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();

        let result = engine.deposit(5, ONE, user1());
        assert_eq!(
            result,
            Err(FarmError::UnknownPool {
                pool_id: 5,
                pool_count: 1,
            })
        );
        assert!(engine.pending_rewards(5, user1()).is_err());
        assert!(engine.pool_info(5).is_err());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();

        assert!(matches!(
            engine.deposit(0, 0, user1()),
            Err(FarmError::InvalidAmount { .. })
        ));
        assert!(matches!(
            engine.withdraw(0, 0, user1()),
            Err(FarmError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_excessive_weight_rejected() {
        let mut engine = new_engine();
        assert!(matches!(
            engine.add_pool(lp_a(), MAX_POOL_WEIGHT + 1),
            Err(FarmError::ExcessiveWeight { .. })
        ));
        assert_eq!(engine.pool_count(), 0);
        assert_eq!(engine.total_weight(), 0);
    }

    #[test]
    fn test_reward_rate_bound() {
        let result = FarmEngine::new(
            MAX_REWARD_PER_STEP + 1,
            StepClock::starting_at(0),
            AssetBank::new(farm_custody()),
            MintingRewardSource::new(),
        );
        assert!(matches!(result, Err(FarmError::InvalidRewardRate { .. })));
    }

    #[test]
    fn test_set_pool_weight_adjusts_total() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();
        engine.add_pool(lp_b(), 30).unwrap();

        engine.set_pool_weight(1, 70).unwrap();
        assert_eq!(engine.total_weight(), 120);
        assert_eq!(engine.pool_info(1).unwrap().weight, 70);
    }

    #[test]
    fn test_user_info_zero_for_unknown_user() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();

        let info = engine.user_info(0, user1()).unwrap();
        assert_eq!(info.staked, 0);
        assert_eq!(info.reward_debt, 0);
        assert!(!engine.has_position(0, user1()));
    }

    #[test]
    fn test_claim_without_position_is_noop() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();
        engine.clock_mut().advance(10);

        let outcome = engine.claim(0, user1()).unwrap();
        assert_eq!(outcome.reward_paid, 0);
        assert!(!engine.has_position(0, user1()));
        assert_eq!(engine.rewards().total_paid(), 0);
    }

    #[test]
    fn test_deposit_updates_position_and_custody() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();
        engine
            .transfer_mut()
            .fund(lp_a(), user1(), 1_000 * ONE)
            .unwrap();

        let outcome = engine.deposit(0, 500 * ONE, user1()).unwrap();
        assert_eq!(outcome.reward_paid, 0);
        assert_eq!(outcome.new_staked, 500 * ONE);
        assert_eq!(outcome.pool_total_staked, 500 * ONE);

        assert_eq!(engine.custodied(0), 500 * ONE);
        assert_eq!(engine.transfer().balance_of(&lp_a(), &user1()), 500 * ONE);
        assert!(engine.has_position(0, user1()));
    }

    #[test]
    fn test_deposit_events() {
        let mut engine = new_engine();
        engine.add_pool(lp_a(), 50).unwrap();
        engine
            .transfer_mut()
            .fund(lp_a(), user1(), 1_000 * ONE)
            .unwrap();
        engine.take_events();

        engine.deposit(0, 500 * ONE, user1()).unwrap();

        let events = engine.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            FarmEvent::Deposited {
                pool_id: 0,
                amount,
                ..
            } if amount == 500 * ONE
        ));
    }

    #[test]
    fn test_pool_limit() {
        let mut engine = new_engine();
        for i in 0..MAX_POOLS {
            let mut asset = [0u8; 32];
            asset[0] = (i % 256) as u8;
            asset[1] = (i / 256) as u8;
            engine.add_pool(asset, 1).unwrap();
        }
        assert!(matches!(
            engine.add_pool([0xEEu8; 32], 1),
            Err(FarmError::PoolLimitReached { .. })
        ));
    }
}
