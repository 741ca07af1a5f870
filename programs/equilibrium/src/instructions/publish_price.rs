use crate::states::{Farm, PriceFeed, PricePublished};
use crate::utils::current_timestamp;
use crate::PRICE_FEED_SEED;
use anchor_lang::prelude::*;

/// Accounts context for `publish_price`.
///
/// Each publisher writes to its own feed for the farm, created on its first
/// publish. The core decides separately which publisher to trust.
#[derive(Accounts)]
pub struct PublishPrice<'info> {
    #[account(mut)]
    pub publisher: Signer<'info>,

    pub farm: Box<Account<'info, Farm>>,

    #[account(
        init_if_needed,
        seeds = [
            PRICE_FEED_SEED.as_bytes(),
            farm.key().as_ref(),
            publisher.key().as_ref()
        ],
        bump,
        payer = publisher,
        space = PriceFeed::LEN
    )]
    pub price_feed: Box<Account<'info, PriceFeed>>,

    pub system_program: Program<'info, System>,
}

/// Publishes the comparable value of one stake base unit, scaled by
/// `PRICE_PRECISION`. A price of zero marks the farm unpriced.
pub fn publish_price(ctx: Context<PublishPrice>, price: u64) -> Result<()> {
    let now = current_timestamp()?;
    let feed = &mut ctx.accounts.price_feed;

    if feed.authority == Pubkey::default() {
        feed.bump = ctx.bumps.price_feed;
        feed.farm = ctx.accounts.farm.key();
        feed.authority = ctx.accounts.publisher.key();
        msg!("Price feed created");
    }

    feed.price = price;
    feed.publish_time = now;

    emit!(PricePublished {
        price_feed: feed.key(),
        farm: feed.farm,
        publisher: feed.authority,
        price,
        publish_time: now,
    });
    Ok(())
}
