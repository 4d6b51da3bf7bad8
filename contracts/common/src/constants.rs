//! Farm Constants
//!
//! All magic numbers and configuration values for the LPFarm core.
//! Amounts follow the 8-decimal base-unit convention; the accumulator
//! scale is chosen so that per-share precision survives integer
//! division even for large pools.

/// Token unit configuration
pub mod token {
    /// Decimal places for all farm-handled assets
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 token = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
}

/// Reward emission configuration
pub mod emission {
    use super::token;

    /// Default reward emitted per step across all pools (200 tokens)
    pub const DEFAULT_REWARD_PER_STEP: u64 = 200 * token::ONE;

    /// Maximum reward rate accepted by the engine (sanity bound,
    /// 1 million tokens per step)
    pub const MAX_REWARD_PER_STEP: u64 = 1_000_000 * token::ONE;
}

/// Fixed-point precision for the reward-per-share accumulator
pub mod precision {
    /// Accumulator scale (1e12). `acc_reward_per_share` stores reward
    /// base units earned per staked base unit, multiplied by this.
    pub const ACC_SCALE: u128 = 1_000_000_000_000;
}

/// Structural limits
pub mod limits {
    /// Maximum number of pools the engine will manage
    pub const MAX_POOLS: usize = 256;

    /// Maximum allocation weight for a single pool
    pub const MAX_POOL_WEIGHT: u64 = 1_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_covers_default_emission() {
        // One step of default emission spread over the largest
        // plausible pool still moves the accumulator.
        let huge_pool: u128 = u64::MAX as u128;
        let per_share = emission::DEFAULT_REWARD_PER_STEP as u128 * precision::ACC_SCALE / huge_pool;
        assert!(per_share >= 1);
    }

    #[test]
    fn test_emission_bounds() {
        assert!(emission::DEFAULT_REWARD_PER_STEP <= emission::MAX_REWARD_PER_STEP);
    }
}
