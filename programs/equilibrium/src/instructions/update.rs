use crate::error::ErrorCode;
use crate::states::{Core, Farm, Observation, PoolSample, PriceFeed, ScoreUpdated};
use crate::utils::current_timestamp;
use crate::OBSERVATION_SEED;
use anchor_lang::prelude::*;

/// Accounts context for `update`.
///
/// `remaining_accounts` must hold `[farm, price_feed]` for every active slot,
/// in slot order, where `price_feed` is the oracle authority's feed for that
/// farm. The observation PDA is indexed by the core's current
/// `observation_count`, so each call creates exactly one new account.
#[derive(Accounts)]
pub struct Update<'info> {
    /// Pays for the observation; must be the admin unless updates are open.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut)]
    pub core: Box<Account<'info, Core>>,

    #[account(
        init,
        seeds = [
            OBSERVATION_SEED.as_bytes(),
            core.key().as_ref(),
            &core.observation_count.to_le_bytes()
        ],
        bump,
        payer = payer,
        space = Observation::LEN
    )]
    pub observation: Box<Account<'info, Observation>>,

    pub system_program: Program<'info, System>,
}

/// Samples every active farm, scores the group and appends an observation.
///
/// Steps:
/// 1. Check the caller may update and the active group is non-empty.
/// 2. For each slot, verify the farm and its feed match, then value the
///    farm's locked stake at the feed price.
/// 3. Score the priced values and advance the accumulator.
/// 4. Write the observation and emit `ScoreUpdated`.
///
/// A feed that was never published, is not program-owned or is priced at
/// zero leaves its farm unpriced for this round rather than failing
/// the whole update.
pub fn update<'info>(ctx: Context<'_, '_, 'info, 'info, Update<'info>>) -> Result<()> {
    let now = current_timestamp()?;
    let core = &mut ctx.accounts.core;

    // --- 1) Authorization & group ---
    if !core.permissionless_update {
        require_keys_eq!(
            ctx.accounts.payer.key(),
            core.admin,
            ErrorCode::UpdateNotPermitted
        );
    }
    require!(!core.active_farms.is_empty(), ErrorCode::NoActiveFarms);
    require!(
        ctx.remaining_accounts.len() >= core.active_farms.len() * 2,
        ErrorCode::MissingRemainingAccount
    );

    // --- 2) Sample each active farm ---
    let mut samples = Vec::with_capacity(core.active_farms.len());
    for (slot, accounts) in core
        .active_farms
        .iter()
        .zip(ctx.remaining_accounts.chunks_exact(2))
    {
        let (farm_info, feed_info) = (&accounts[0], &accounts[1]);
        require_keys_eq!(farm_info.key(), *slot, ErrorCode::InvalidActiveFarm);
        let farm = Account::<Farm>::try_from(farm_info)?;
        require_keys_eq!(
            feed_info.key(),
            PriceFeed::address(slot, &core.oracle_authority),
            ErrorCode::InvalidPriceFeed
        );

        let value = match Account::<PriceFeed>::try_from(feed_info) {
            Ok(feed) if feed.is_trusted_by(&core.oracle_authority) => Some(
                feed.value_of(farm.total_value_locked())
                    .ok_or(ErrorCode::MathOverflow)?,
            ),
            _ => None,
        };
        if value.is_none() {
            msg!("Farm {} unpriced this round", slot);
        }
        samples.push(PoolSample {
            farm: *slot,
            value: value.unwrap_or_default(),
            delta: 0,
            priced: value.is_some(),
        });
    }

    // --- 3) Score & accumulate ---
    let mut observation = core.record_observation(samples, now)?;
    observation.bump = ctx.bumps.observation;
    observation.core = core.key();

    emit!(ScoreUpdated {
        core: observation.core,
        index: observation.index,
        timestamp: observation.timestamp,
        score: observation.score,
        accumulated_score: observation.accumulated_score,
        total_value: observation.total_value,
    });
    msg!(
        "Observation {} recorded, score {}",
        observation.index,
        observation.score
    );

    // --- 4) Persist ---
    ctx.accounts.observation.set_inner(observation);
    Ok(())
}
