use crate::states::{Farm, RewardPaid, StakeAccount, Withdrawn};
use crate::utils::{current_timestamp, transfer_from_pool_vault_to_user};
use crate::{FARM_AUTH_SEED, STAKE_ACCOUNT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Withdraw the full balance and claim in one instruction.
#[derive(Accounts)]
pub struct Exit<'info> {
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

    #[account(address = farm.stake_mint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = owner,
    )]
    pub owner_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = farm.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = farm.reward_mint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

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

pub fn exit(ctx: Context<Exit>) -> Result<()> {
    let now = current_timestamp()?;
    let farm = &mut ctx.accounts.farm;
    let stake_account = &mut ctx.accounts.stake_account;
    let farm_key = farm.key();
    let bump = [farm.authority_bump];
    let seeds: &[&[u8]] = &[FARM_AUTH_SEED.as_bytes(), farm_key.as_ref(), &bump];
    let signer_seeds = &[seeds];

    // --- 1) Withdraw everything still staked ---
    let amount = stake_account.balance;
    if amount > 0 {
        farm.unstake(stake_account, amount, now)?;
        transfer_from_pool_vault_to_user(
            ctx.accounts.authority.to_account_info(),
            ctx.accounts.stake_vault.to_account_info(),
            ctx.accounts.owner_stake_token.to_account_info(),
            ctx.accounts.stake_mint.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            amount,
            ctx.accounts.stake_mint.decimals,
            signer_seeds,
        )?;
        emit!(Withdrawn {
            farm: farm_key,
            owner: stake_account.owner,
            amount,
            balance: 0,
            total_supply: farm.total_supply,
        });
    }

    // --- 2) Claim ---
    let reward = farm.take_reward(stake_account, now)?;
    if reward > 0 {
        transfer_from_pool_vault_to_user(
            ctx.accounts.authority.to_account_info(),
            ctx.accounts.reward_vault.to_account_info(),
            ctx.accounts.owner_reward_token.to_account_info(),
            ctx.accounts.reward_mint.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            reward,
            ctx.accounts.reward_mint.decimals,
            signer_seeds,
        )?;
        emit!(RewardPaid {
            farm: farm_key,
            owner: stake_account.owner,
            reward,
        });
    }
    msg!("Exited: {} withdrawn, {} claimed", amount, reward);
    Ok(())
}
