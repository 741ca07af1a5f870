use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Not approved")]
    InvalidOwner,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Withdraw amount exceeds staked balance")]
    InsufficientStake,

    #[msg("Token account balance is insufficient for the transfer")]
    InsufficientFunds,

    #[msg("Reward vault cannot cover the notified emission")]
    InsufficientRewardReserve,

    #[msg("Epoch duration must be greater than zero")]
    InvalidEpochDuration,

    #[msg("No farm is registered for this pair")]
    UnregisteredPool,

    #[msg("Pair is already registered to another farm")]
    PairAlreadyRegistered,

    #[msg("Farm registry is full")]
    RegistryFull,

    #[msg("At least one active farm is required")]
    NoActiveFarms,

    #[msg("Too many active farms")]
    TooManyActiveFarms,

    #[msg("Farm account does not match the active group")]
    InvalidActiveFarm,

    #[msg("Price feed is not the oracle authority's feed for the farm")]
    InvalidPriceFeed,

    #[msg("Score update is restricted to the admin")]
    UpdateNotPermitted,

    #[msg("Observation window must move forward in time")]
    InvalidWindow,

    #[msg("Invalid timestamp conversion")]
    InvalidTimestamp,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("Invalid parameter provided")]
    InvalidParam,
}
