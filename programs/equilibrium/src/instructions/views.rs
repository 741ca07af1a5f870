//! Read-only instructions. Each returns its result through Anchor return
//! data so clients can simulate them instead of decoding accounts.

use crate::error::ErrorCode;
use crate::math;
use crate::states::{Core, Farm, Observation, StakeAccount};
use crate::utils::current_timestamp;
use crate::STAKE_ACCOUNT_SEED;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CoreView<'info> {
    pub core: Box<Account<'info, Core>>,
}

/// Two observations of the same core bounding a consult window.
#[derive(Accounts)]
pub struct Consult<'info> {
    pub core: Box<Account<'info, Core>>,

    #[account(constraint = observation_start.core == core.key() @ ErrorCode::InvalidWindow)]
    pub observation_start: Box<Account<'info, Observation>>,

    #[account(constraint = observation_end.core == core.key() @ ErrorCode::InvalidWindow)]
    pub observation_end: Box<Account<'info, Observation>>,
}

#[derive(Accounts)]
pub struct Earned<'info> {
    pub farm: Box<Account<'info, Farm>>,

    #[account(
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            farm.key().as_ref(),
            stake_account.owner.as_ref()
        ],
        bump = stake_account.bump,
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,
}

/// Score of the latest observation.
pub fn score(ctx: Context<CoreView>) -> Result<u8> {
    Ok(ctx.accounts.core.last_score)
}

pub fn observations_length(ctx: Context<CoreView>) -> Result<u64> {
    Ok(ctx.accounts.core.observation_count)
}

pub fn farm_by_pair(ctx: Context<CoreView>, pair: Pubkey) -> Result<Pubkey> {
    ctx.accounts
        .core
        .farm_by_pair(&pair)
        .ok_or(error!(ErrorCode::UnregisteredPool))
}

pub fn farm_at(ctx: Context<CoreView>, index: u64) -> Result<Pubkey> {
    let index = usize::try_from(index).map_err(|_| error!(ErrorCode::UnregisteredPool))?;
    ctx.accounts
        .core
        .farm_at(index)
        .ok_or(error!(ErrorCode::UnregisteredPool))
}

/// Time-weighted average score between two observations.
pub fn consult(ctx: Context<Consult>) -> Result<u64> {
    let start = &ctx.accounts.observation_start;
    let end = &ctx.accounts.observation_end;
    math::time_weighted_average(
        start.accumulated_score,
        start.timestamp,
        end.accumulated_score,
        end.timestamp,
    )
}

/// Rewards claimable by the stake account owner right now.
pub fn earned(ctx: Context<Earned>) -> Result<u64> {
    let now = current_timestamp()?;
    ctx.accounts.farm.earned(&ctx.accounts.stake_account, now)
}
