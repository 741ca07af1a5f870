use crate::error::ErrorCode;
use crate::states::{EpochNotified, Farm};
use crate::utils::current_timestamp;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

/// Accounts context for `notify_epoch`.
///
/// The reward vault must already hold enough to cover the full epoch plus
/// everything stakers earned and have not claimed; use a plain token transfer
/// to fund it beforehand.
#[derive(Accounts)]
pub struct NotifyEpoch<'info> {
    /// Farm admin.
    #[account(
        constraint = admin.key() == farm.admin @ ErrorCode::InvalidOwner
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub farm: Box<Account<'info, Farm>>,

    #[account(address = farm.reward_vault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

/// Starts a new emission period of `reward_amount` over `epoch_duration`
/// seconds, beginning at `max(start_time, now)`.
///
/// # Errors
/// - `InvalidOwner`: caller is not the farm admin.
/// - `ZeroAmount`: the resulting rate rounds down to zero.
/// - `InsufficientRewardReserve`: the reward vault cannot cover the epoch on
///   top of unclaimed rewards.
pub fn notify_epoch(ctx: Context<NotifyEpoch>, reward_amount: u64, start_time: u64) -> Result<()> {
    let now = current_timestamp()?;
    let reserve = ctx.accounts.reward_vault.amount;
    let farm = &mut ctx.accounts.farm;

    let reward_rate = farm.start_epoch(reward_amount, start_time, now, reserve)?;
    msg!("Epoch notified: rate {} until {}", reward_rate, farm.epoch_finish);

    emit!(EpochNotified {
        farm: farm.key(),
        reward_amount,
        reward_rate,
        epoch_start: farm.last_update_time,
        epoch_finish: farm.epoch_finish,
    });
    Ok(())
}
