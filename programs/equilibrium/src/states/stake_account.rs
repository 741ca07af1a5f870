use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakeAccount
// ──────────────────────────────────────────────────────────────────────────────
//

/// Per-depositor position in one farm, derived from
/// `STAKE_ACCOUNT_SEED + farm + owner`.
///
/// Created lazily on first deposit and never closed; the balance may drop to
/// zero while accrued rewards remain claimable.
#[account]
#[derive(Default, Debug)]
pub struct StakeAccount {
    /// PDA bump for this account.
    pub bump: u8,

    /// Depositor this record belongs to.
    pub owner: Pubkey,

    /// Farm this record belongs to.
    pub farm: Pubkey,

    /// Stake tokens currently deposited.
    pub balance: u64,

    /// Farm reward index at the owner's last interaction.
    pub reward_per_token_paid: u128,

    /// Rewards booked but not yet claimed.
    pub rewards_accrued: u64,

    /// Lifetime rewards claimed.
    pub total_claimed: u64,
}

impl StakeAccount {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: owner, farm
    /// - 8 * 3: three `u64` fields
    /// - 16: one `u128` field
    pub const LEN: usize = 8 + 1 + 32 * 2 + 8 * 3 + 16;
}
