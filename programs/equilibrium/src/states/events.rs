use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to follow farms and the score
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when a core is created.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct CoreInitialized {
    pub core: Pubkey,
    pub admin: Pubkey,
    /// Authority whose price feeds the core trusts.
    pub oracle_authority: Pubkey,
    pub permissionless_update: bool,
}

/// Emitted whenever a core parameter is modified via `update_config`.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigUpdated {
    pub core: Pubkey,
    /// Admin after the update (may be unchanged).
    pub admin: Pubkey,
    pub oracle_authority: Pubkey,
    pub permissionless_update: bool,
}

/// Emitted when a farm and its vaults are created.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FarmInitialized {
    pub farm: Pubkey,
    /// Deploying core, default for standalone farms.
    pub core: Pubkey,
    pub pair: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub epoch_duration: u64,
}

/// Emitted when a pair → farm mapping is added to a core registry.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FarmRegistered {
    pub core: Pubkey,
    pub pair: Pubkey,
    pub farm: Pubkey,
    /// Position in the registry.
    pub index: u64,
}

/// Emitted when the active group is replaced.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ActiveFarmsSet {
    pub core: Pubkey,
    pub farms: Vec<Pubkey>,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Deposited {
    pub farm: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    /// Owner balance after the deposit.
    pub balance: u64,
    pub total_supply: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Withdrawn {
    pub farm: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub total_supply: u64,
}

/// Emitted when accrued rewards leave the reward vault.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardPaid {
    pub farm: Pubkey,
    pub owner: Pubkey,
    pub reward: u64,
}

/// Emitted when a new emission period starts.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct EpochNotified {
    pub farm: Pubkey,
    pub reward_amount: u64,
    /// Rate after folding in the unpaid remainder of the previous epoch.
    pub reward_rate: u64,
    pub epoch_start: u64,
    pub epoch_finish: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PricePublished {
    pub price_feed: Pubkey,
    pub farm: Pubkey,
    pub publisher: Pubkey,
    pub price: u64,
    pub publish_time: u64,
}

/// Emitted for every appended observation.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ScoreUpdated {
    pub core: Pubkey,
    pub index: u64,
    pub timestamp: u64,
    pub score: u8,
    pub accumulated_score: u128,
    pub total_value: u128,
}
