//! LPFarm Common Library
//!
//! Shared types, constants, and utilities for the LPFarm reward-farming
//! core. This crate carries everything the engine and the token
//! collaborators agree on:
//!
//! - **Constants**: token units, emission defaults, fixed-point scale
//! - **Errors**: the full typed error taxonomy for farm operations
//! - **Types**: pool and position state, introspection views
//! - **Math**: checked fixed-point reward arithmetic
//! - **Events**: indexable protocol events with a collecting log
//! - **Traits**: the narrow collaborator contracts (clock, asset
//!   custody, reward emission) the engine is driven through
//!
//! All amounts are integers in the smallest unit of their asset; the
//! reward-per-share accumulator is a `u128` scaled by
//! [`constants::precision::ACC_SCALE`]. No floating point anywhere.
//!
//! This crate is `no_std` compatible when built without the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collection types for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use traits::*;
pub use types::*;
