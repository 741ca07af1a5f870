use crate::states::{Farm, RewardPaid, StakeAccount};
use crate::utils::{current_timestamp, transfer_from_pool_vault_to_user};
use crate::{FARM_AUTH_SEED, STAKE_ACCOUNT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Claim accrued rewards from a farm.
///
/// Reward math overview:
/// - Global index: `farm.reward_per_token_stored`, scaled by `PRECISION`.
/// - Per-account checkpoint: `stake_account.reward_per_token_paid`.
/// - Claimable = `rewards_accrued + balance * (index - checkpoint) / PRECISION`.
///
/// Funds movement: reward vault → owner's reward ATA (created on demand).
#[derive(Accounts)]
pub struct GetReward<'info> {
    /// Claimer (payer for ATA creation if needed).
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(mut)]
    pub farm: Box<Account<'info, Farm>>,

    #[account(
        mut,
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            farm.key().as_ref(),
            owner.key().as_ref()
        ],
        bump = stake_account.bump,
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [FARM_AUTH_SEED.as_bytes(), farm.key().as_ref()],
        bump = farm.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = farm.reward_mint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Owner's reward ATA; created on demand to receive rewards.
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = reward_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_reward_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = farm.reward_vault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Settles the caller and pays out everything accrued. With nothing accrued
/// the call succeeds without a transfer.
pub fn get_reward(ctx: Context<GetReward>) -> Result<()> {
    let now = current_timestamp()?;
    let farm = &mut ctx.accounts.farm;
    let stake_account = &mut ctx.accounts.stake_account;

    let reward = farm.take_reward(stake_account, now)?;
    if reward == 0 {
        msg!("Nothing to claim");
        return Ok(());
    }

    let farm_key = farm.key();
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_reward_token.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        reward,
        ctx.accounts.reward_mint.decimals,
        &[&[
            FARM_AUTH_SEED.as_bytes(),
            farm_key.as_ref(),
            &[farm.authority_bump],
        ]],
    )?;

    emit!(RewardPaid {
        farm: farm_key,
        owner: stake_account.owner,
        reward,
    });
    Ok(())
}
