use crate::states::{Farm, StakeAccount, Withdrawn};
use crate::utils::{current_timestamp, transfer_from_pool_vault_to_user};
use crate::{FARM_AUTH_SEED, STAKE_ACCOUNT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required to unstake from a farm.
#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    /// Farm authority PDA (token authority of the stake vault).
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [FARM_AUTH_SEED.as_bytes(), farm.key().as_ref()],
        bump = farm.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = farm.stake_mint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Receives the withdrawn stake tokens.
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = owner,
    )]
    pub owner_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = farm.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Settles the caller, reduces their balance by `amount` and returns the
/// tokens from the stake vault. Accrued rewards stay claimable.
pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let now = current_timestamp()?;
    let farm = &mut ctx.accounts.farm;
    let stake_account = &mut ctx.accounts.stake_account;

    farm.unstake(stake_account, amount, now)?;

    let farm_key = farm.key();
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.owner_stake_token.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.stake_mint.decimals,
        &[&[
            FARM_AUTH_SEED.as_bytes(),
            farm_key.as_ref(),
            &[farm.authority_bump],
        ]],
    )?;

    emit!(Withdrawn {
        farm: farm_key,
        owner: stake_account.owner,
        amount,
        balance: stake_account.balance,
        total_supply: farm.total_supply,
    });
    Ok(())
}
