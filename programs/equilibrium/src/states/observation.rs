use crate::states::MAX_ACTIVE_FARMS;
use anchor_lang::prelude::*;

/// One farm's reading inside an observation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolSample {
    /// Farm that was sampled.
    pub farm: Pubkey,
    /// Locked stake converted to the comparable unit (0 when unpriced).
    pub value: u128,
    /// Signed distance from the mean of the priced values.
    pub delta: i128,
    /// Whether the price feed produced a usable value this round.
    pub priced: bool,
}

impl PoolSample {
    pub const LEN: usize = 32 + 16 + 16 + 1;
}

/// Immutable snapshot appended by every `update`, derived from
/// `OBSERVATION_SEED + core + index`.
#[account]
#[derive(Default, Debug)]
pub struct Observation {
    pub bump: u8,
    pub core: Pubkey,
    /// Position in the core's observation sequence.
    pub index: u64,
    pub timestamp: u64,
    pub score: u8,
    /// Core accumulator value at `timestamp`.
    pub accumulated_score: u128,
    /// Sum of the priced values.
    pub total_value: u128,
    pub samples: Vec<PoolSample>,
}

impl Observation {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32: core
    /// - 8 * 2: index, timestamp
    /// - 1: score
    /// - 16 * 2: two `u128` fields
    /// - 4 + MAX_ACTIVE_FARMS samples
    pub const LEN: usize = 8 + 1 + 32 + 8 * 2 + 1 + 16 * 2 + 4 + MAX_ACTIVE_FARMS * PoolSample::LEN;
}
