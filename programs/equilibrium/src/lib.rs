use anchor_lang::prelude::*;

declare_id!("BxD3JWsx5CeXPHZhoyk6hn2e59LFEvcYGL5UmVLttGai");

#[cfg(not(feature = "no-entrypoint"))]
solana_security_txt::security_txt! {
    name: "Equilibrium",
    project_url: "https://github.com/equilibrium-finance/equilibrium",
    contacts: "email:security@equilibrium.finance",
    policy: "https://github.com/equilibrium-finance/equilibrium/blob/main/SECURITY.md"
}

pub const CORE_SEED: &str = "core";
pub const FARM_SEED: &str = "farm";
pub const FARM_AUTH_SEED: &str = "farm_authority";
pub const STAKE_VAULT_SEED: &str = "stake_vault";
pub const REWARD_VAULT_SEED: &str = "reward_vault";
pub const STAKE_ACCOUNT_SEED: &str = "stake_account";
pub const OBSERVATION_SEED: &str = "observation";
pub const PRICE_FEED_SEED: &str = "price_feed";

/// Fixed-point scale of the reward-per-token accumulator.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;
/// Fixed-point scale of `PriceFeed::price`.
pub const PRICE_PRECISION: u128 = 1_000_000_000;

pub mod error;
pub mod instructions;
pub mod math;
pub mod states;
pub mod utils;

use instructions::*;

#[program]
pub mod equilibrium {

    use super::*;

    // ── Core ────────────────────────────────────────────────

    pub fn initialise_core(
        ctx: Context<InitialiseCore>,
        oracle_authority: Pubkey,
        permissionless_update: bool,
    ) -> Result<()> {
        instructions::initialise_core(ctx, oracle_authority, permissionless_update)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    pub fn deploy(
        ctx: Context<Deploy>,
        pair: Pubkey,
        token_a: Pubkey,
        token_b: Pubkey,
        epoch_duration: u64,
    ) -> Result<()> {
        instructions::deploy(ctx, pair, token_a, token_b, epoch_duration)
    }

    pub fn set_active_farms<'info>(
        ctx: Context<'_, '_, 'info, 'info, SetActiveFarms<'info>>,
    ) -> Result<()> {
        instructions::set_active_farms(ctx)
    }

    pub fn update<'info>(ctx: Context<'_, '_, 'info, 'info, Update<'info>>) -> Result<()> {
        instructions::update(ctx)
    }

    pub fn score(ctx: Context<CoreView>) -> Result<u8> {
        instructions::score(ctx)
    }

    pub fn observations_length(ctx: Context<CoreView>) -> Result<u64> {
        instructions::observations_length(ctx)
    }

    pub fn farm_by_pair(ctx: Context<CoreView>, pair: Pubkey) -> Result<Pubkey> {
        instructions::farm_by_pair(ctx, pair)
    }

    pub fn farm_at(ctx: Context<CoreView>, index: u64) -> Result<Pubkey> {
        instructions::farm_at(ctx, index)
    }

    pub fn consult(ctx: Context<Consult>) -> Result<u64> {
        instructions::consult(ctx)
    }

    pub fn publish_price(ctx: Context<PublishPrice>, price: u64) -> Result<()> {
        instructions::publish_price(ctx, price)
    }

    // ── Farm ────────────────────────────────────────────────

    pub fn initialise_farm(
        ctx: Context<InitialiseFarm>,
        pair: Pubkey,
        token_a: Pubkey,
        token_b: Pubkey,
        epoch_duration: u64,
    ) -> Result<()> {
        instructions::initialise_farm(ctx, pair, token_a, token_b, epoch_duration)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit(ctx, amount)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw(ctx, amount)
    }

    pub fn get_reward(ctx: Context<GetReward>) -> Result<()> {
        instructions::get_reward(ctx)
    }

    pub fn exit(ctx: Context<Exit>) -> Result<()> {
        instructions::exit(ctx)
    }

    pub fn notify_epoch(ctx: Context<NotifyEpoch>, reward_amount: u64, start_time: u64) -> Result<()> {
        instructions::notify_epoch(ctx, reward_amount, start_time)
    }

    pub fn earned(ctx: Context<Earned>) -> Result<u64> {
        instructions::earned(ctx)
    }
}
