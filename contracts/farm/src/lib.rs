//! LPFarm Core
//!
//! Multi-pool staking/reward-farming accounting engine. Users deposit
//! a pool-specific asset, accrue a shared reward asset proportional to
//! a per-pool allocation weight, and can withdraw principal or claim
//! accrued rewards at any point.
//!
//! The engine never iterates over users. Each pool carries a lazily
//! advanced reward-per-share accumulator; every state-changing call
//! first brings the target pool's accumulator up to date, settles the
//! caller's pending reward against it, and only then touches principal
//! and snapshots. This keeps every operation O(1) per pool regardless
//! of participant count.
//!
//! ## Modules
//!
//! - [`accrual`] — the accumulator math: lazy advance and pure
//!   projection
//! - [`ledger`] — per-pool custody bookkeeping for staked principal
//! - [`engine`] — the [`FarmEngine`] orchestration and operation
//!   surface
//!
//! Asset movement is delegated to the collaborator traits defined in
//! `lpfarm-common`; the engine is a single-writer, sequentially
//! consistent state machine driven by a discrete external clock.

pub mod accrual;
pub mod engine;
pub mod ledger;


pub use engine::{ClaimOutcome, DepositOutcome, FarmEngine, WithdrawOutcome};
pub use ledger::PrincipalLedger;
