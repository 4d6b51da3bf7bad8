//! LPFarm Token Collaborators
//!
//! In-memory fungible-token bookkeeping plus the reference
//! implementations of the collaborator traits the farm engine is
//! driven through:
//!
//! - [`TokenLedger`] — balances, supply tracking, mint with a supply cap
//! - [`AssetBank`] — multi-asset custody implementing `AssetTransfer`
//! - [`MintingRewardSource`] — mints reward units on payout
//! - [`StepClock`] — a manually advanced monotone step counter
//!
//! These are balance maps, not asset-transfer mechanics: an on-chain
//! deployment would substitute real token contracts behind the same
//! traits.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lpfarm_common::{
    constants::token,
    errors::{FarmError, FarmResult},
    traits::{AssetTransfer, Clock, RewardSource},
    types::{Address, AssetId},
};

/// Maximum supply a single ledger will mint (10 billion tokens;
/// 10^19 base units still fits in u64)
pub const MAX_SUPPLY: u64 = 10_000_000_000 * token::ONE;

// ============ Token Ledger ============

/// One fungible token's balance map with supply tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenLedger {
    /// Balance per holder
    balances: BTreeMap<Address, u64>,
    /// Current total supply
    pub total_supply: u64,
    /// Cumulative minted amount
    pub total_minted: u64,
}

impl TokenLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with an initial supply credited to `owner`
    pub fn with_initial_supply(owner: Address, amount: u64) -> FarmResult<Self> {
        let mut ledger = Self::new();
        ledger.mint(owner, amount)?;
        Ok(ledger)
    }

    /// Balance of a holder (zero if never credited)
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Check if a holder can cover `amount`
    pub fn has_sufficient(&self, owner: &Address, amount: u64) -> bool {
        self.balance_of(owner) >= amount
    }

    /// Check if a mint would stay under the supply cap
    pub fn can_mint(&self, amount: u64) -> bool {
        self.total_supply.saturating_add(amount) <= MAX_SUPPLY
    }

    /// Mint new units to `to`
    pub fn mint(&mut self, to: Address, amount: u64) -> FarmResult<()> {
        if !self.can_mint(amount) {
            return Err(FarmError::Overflow);
        }

        let balance = self.balances.entry(to).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(FarmError::Overflow)?;
        self.total_supply += amount;
        self.total_minted += amount;
        Ok(())
    }

    /// Move units between two holders, failing without mutation when
    /// the sender cannot cover the amount
    pub fn transfer(&mut self, from: Address, to: Address, amount: u64) -> FarmResult<()> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(FarmError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        // Self-transfer is a no-op at this point
        if from == to {
            return Ok(());
        }

        self.balances.insert(from, available - amount);
        let to_balance = self.balances.entry(to).or_insert(0);
        *to_balance = to_balance.checked_add(amount).ok_or(FarmError::Overflow)?;
        Ok(())
    }

    /// Number of holders with a recorded balance entry
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }
}

// ============ Asset Bank ============

/// Multi-asset custody: one [`TokenLedger`] per staked-asset class,
/// with a dedicated custody address holding the farm's principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetBank {
    /// Address balances are custodied under
    custody: Address,
    /// Ledger per asset class
    ledgers: BTreeMap<AssetId, TokenLedger>,
}

impl AssetBank {
    /// Create a bank custodying under `custody`
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            ledgers: BTreeMap::new(),
        }
    }

    /// Register an asset class (idempotent)
    pub fn add_asset(&mut self, asset: AssetId) {
        self.ledgers.entry(asset).or_default();
    }

    /// Credit `user` with freshly minted units of `asset`; registers
    /// the asset if needed
    pub fn fund(&mut self, asset: AssetId, user: Address, amount: u64) -> FarmResult<()> {
        self.ledgers.entry(asset).or_default().mint(user, amount)
    }

    /// A user's free balance of `asset`
    pub fn balance_of(&self, asset: &AssetId, user: &Address) -> u64 {
        self.ledgers
            .get(asset)
            .map(|ledger| ledger.balance_of(user))
            .unwrap_or(0)
    }

    /// Amount of `asset` currently under farm custody
    pub fn custodied(&self, asset: &AssetId) -> u64 {
        self.balance_of(asset, &self.custody)
    }
}

impl AssetTransfer for AssetBank {
    fn pull_from(&mut self, asset: AssetId, user: Address, amount: u64) -> FarmResult<()> {
        let custody = self.custody;
        let ledger = self
            .ledgers
            .get_mut(&asset)
            .ok_or(FarmError::TransferFailed { asset, user, amount })?;
        ledger
            .transfer(user, custody, amount)
            .map_err(|_| FarmError::TransferFailed { asset, user, amount })
    }

    fn push_to(&mut self, asset: AssetId, user: Address, amount: u64) -> FarmResult<()> {
        let custody = self.custody;
        let ledger = self
            .ledgers
            .get_mut(&asset)
            .ok_or(FarmError::TransferFailed { asset, user, amount })?;
        ledger
            .transfer(custody, user, amount)
            .map_err(|_| FarmError::TransferFailed { asset, user, amount })
    }
}

// ============ Reward Source ============

/// Reward emission by minting: every payout mints fresh units of the
/// reward token, up to an optional reserve cap below [`MAX_SUPPLY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct MintingRewardSource {
    /// The reward token's ledger
    pub ledger: TokenLedger,
    /// Optional cap on cumulative payouts
    pub payout_cap: Option<u64>,
}

impl MintingRewardSource {
    /// Unbounded (up to `MAX_SUPPLY`) reward source
    pub fn new() -> Self {
        Self::default()
    }

    /// Reward source that refuses payouts past `cap` cumulative units
    pub fn with_cap(cap: u64) -> Self {
        Self {
            ledger: TokenLedger::new(),
            payout_cap: Some(cap),
        }
    }

    /// Reward units paid out so far
    pub fn total_paid(&self) -> u64 {
        self.ledger.total_minted
    }

    /// A user's reward-token balance
    pub fn balance_of(&self, user: &Address) -> u64 {
        self.ledger.balance_of(user)
    }
}

impl RewardSource for MintingRewardSource {
    fn payout(&mut self, user: Address, amount: u64) -> FarmResult<()> {
        if let Some(cap) = self.payout_cap {
            if self.ledger.total_minted.saturating_add(amount) > cap {
                return Err(FarmError::PayoutFailed { user, amount });
            }
        }
        self.ledger
            .mint(user, amount)
            .map_err(|_| FarmError::PayoutFailed { user, amount })
    }
}

// ============ Step Clock ============

/// Manually advanced monotone step counter.
///
/// `tick` models a mutating call occupying its own step, the way a
/// transaction occupies its own block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepClock {
    step: u64,
}

impl StepClock {
    /// Clock starting at `step`
    pub fn starting_at(step: u64) -> Self {
        Self { step }
    }

    /// Advance by `steps`
    pub fn advance(&mut self, steps: u64) {
        self.step += steps;
    }

    /// Advance by a single step
    pub fn tick(&mut self) {
        self.advance(1);
    }
}

impl Clock for StepClock {
    fn current_step(&self) -> u64 {
        self.step
    }
}
