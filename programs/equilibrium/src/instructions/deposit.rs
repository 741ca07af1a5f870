use crate::error::ErrorCode;
use crate::states::{Deposited, Farm, StakeAccount};
use crate::utils::{current_timestamp, transfer_from_user_to_pool_vault};
use crate::STAKE_ACCOUNT_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required to stake into a farm.
///
/// Flow summary:
/// 1) Settle the farm index and the depositor's accrual.
/// 2) Book the new balance on the stake account (created lazily) and farm.
/// 3) Move stake tokens from the depositor into the stake vault.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Depositor; pays for the stake account on first deposit.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(mut)]
    pub farm: Box<Account<'info, Farm>>,

    /// Per-depositor position (created lazily).
    #[account(
        init_if_needed,
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            farm.key().as_ref(),
            owner.key().as_ref()
        ],
        bump,
        payer = owner,
        space = StakeAccount::LEN
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    #[account(address = farm.stake_mint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Depositor's stake token account, debited by `amount`.
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = owner,
    )]
    pub owner_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = farm.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require_gt!(amount, 0, ErrorCode::ZeroAmount);
    require_gte!(
        ctx.accounts.owner_stake_token.amount,
        amount,
        ErrorCode::InsufficientFunds
    );
    let now = current_timestamp()?;

    let farm = &mut ctx.accounts.farm;
    let stake_account = &mut ctx.accounts.stake_account;

    // First deposit: bind the position to its owner and farm.
    if stake_account.owner == Pubkey::default() {
        stake_account.bump = ctx.bumps.stake_account;
        stake_account.owner = ctx.accounts.owner.key();
        stake_account.farm = farm.key();
        stake_account.reward_per_token_paid = farm.reward_per_token(now)?;
        farm.depositor_count = farm
            .depositor_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    farm.stake(stake_account, amount, now)?;

    transfer_from_user_to_pool_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_stake_token.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.stake_mint.decimals,
    )?;

    emit!(Deposited {
        farm: farm.key(),
        owner: stake_account.owner,
        amount,
        balance: stake_account.balance,
        total_supply: farm.total_supply,
    });
    Ok(())
}
