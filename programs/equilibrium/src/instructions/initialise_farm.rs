use crate::error::ErrorCode;
use crate::states::{Farm, FarmInitialized, FarmParams};
use crate::{FARM_AUTH_SEED, REWARD_VAULT_SEED, STAKE_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialise_farm`.
///
/// Creates a standalone farm at a fresh keypair address, outside any core.
/// Both vaults are PDAs of the farm and owned by the farm authority PDA
/// (`FARM_AUTH_SEED + farm`), which signs every outgoing transfer.
#[derive(Accounts)]
pub struct InitialiseFarm<'info> {
    /// Farm admin (may notify epochs); pays for every account created here.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// New farm account; its keypair must co-sign.
    #[account(init, payer = admin, space = Farm::LEN)]
    pub farm: Box<Account<'info, Farm>>,

    /// Farm authority PDA owning both vaults.
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [FARM_AUTH_SEED.as_bytes(), farm.key().as_ref()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Mint of the token depositors stake.
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Mint of the token emitted as reward.
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

pub fn initialise_farm(
    ctx: Context<InitialiseFarm>,
    pair: Pubkey,
    token_a: Pubkey,
    token_b: Pubkey,
    epoch_duration: u64,
) -> Result<()> {
    require_gt!(epoch_duration, 0, ErrorCode::InvalidEpochDuration);

    let params = FarmParams {
        admin: ctx.accounts.admin.key(),
        core: Pubkey::default(),
        pair,
        token_a,
        token_b,
        stake_mint: ctx.accounts.stake_mint.key(),
        reward_mint: ctx.accounts.reward_mint.key(),
        stake_vault: ctx.accounts.stake_vault.key(),
        reward_vault: ctx.accounts.reward_vault.key(),
        epoch_duration,
    };
    let farm = &mut ctx.accounts.farm;
    farm.init(params, 0, ctx.bumps.authority)?;
    msg!("Farm initialized");

    emit!(FarmInitialized {
        farm: farm.key(),
        core: farm.core,
        pair,
        stake_mint: farm.stake_mint,
        reward_mint: farm.reward_mint,
        epoch_duration,
    });
    Ok(())
}
