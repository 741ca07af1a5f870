use crate::error::ErrorCode;
use crate::states::{Core, Farm, FarmInitialized, FarmParams, FarmRegistered};
use crate::{FARM_AUTH_SEED, FARM_SEED, REWARD_VAULT_SEED, STAKE_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `deploy`.
///
/// Same account set as `initialise_farm`, except the farm is a PDA of the
/// core (`FARM_SEED + core + pair`) and is registered in the core right away.
#[derive(Accounts)]
#[instruction(pair: Pubkey)]
pub struct Deploy<'info> {
    /// Core admin; becomes the farm admin as well.
    #[account(
        mut,
        constraint = admin.key() == core.admin @ ErrorCode::InvalidOwner
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub core: Box<Account<'info, Core>>,

    #[account(
        init,
        seeds = [FARM_SEED.as_bytes(), core.key().as_ref(), pair.as_ref()],
        bump,
        payer = admin,
        space = Farm::LEN
    )]
    pub farm: Box<Account<'info, Farm>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [FARM_AUTH_SEED.as_bytes(), farm.key().as_ref()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        seeds = [STAKE_VAULT_SEED.as_bytes(), farm.key().as_ref()],
        bump,
        payer = admin,
        token::mint = stake_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        seeds = [REWARD_VAULT_SEED.as_bytes(), farm.key().as_ref()],
        bump,
        payer = admin,
        token::mint = reward_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Deploys a farm for `pair` and appends it to the core registry.
///
/// Steps:
/// 1. Initialize the farm state with the core as its owner.
/// 2. Register `pair → farm`; the registry keeps deployment order.
/// 3. Emit `FarmInitialized` and `FarmRegistered`.
pub fn deploy(
    ctx: Context<Deploy>,
    pair: Pubkey,
    token_a: Pubkey,
    token_b: Pubkey,
    epoch_duration: u64,
) -> Result<()> {
    let core = &mut ctx.accounts.core;
    let farm = &mut ctx.accounts.farm;

    farm.init(
        FarmParams {
            admin: ctx.accounts.admin.key(),
            core: core.key(),
            pair,
            token_a,
            token_b,
            stake_mint: ctx.accounts.stake_mint.key(),
            reward_mint: ctx.accounts.reward_mint.key(),
            stake_vault: ctx.accounts.stake_vault.key(),
            reward_vault: ctx.accounts.reward_vault.key(),
            epoch_duration,
        },
        ctx.bumps.farm,
        ctx.bumps.authority,
    )?;

    core.register(pair, farm.key())?;
    let index = core.farms.len().saturating_sub(1) as u64;
    msg!("Farm deployed at registry index {}", index);

    emit!(FarmInitialized {
        farm: farm.key(),
        core: core.key(),
        pair,
        stake_mint: farm.stake_mint,
        reward_mint: farm.reward_mint,
        epoch_duration,
    });
    emit!(FarmRegistered {
        core: core.key(),
        pair,
        farm: farm.key(),
        index,
    });
    Ok(())
}
