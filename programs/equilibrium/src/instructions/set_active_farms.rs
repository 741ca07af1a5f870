use crate::error::ErrorCode;
use crate::states::{ActiveFarmsSet, Core, Farm, FarmRecord, FarmRegistered};
use anchor_lang::prelude::*;

/// Accounts context for `set_active_farms`.
///
/// The new group is passed in `remaining_accounts`, one farm account per slot
/// in slot order.
#[derive(Accounts)]
pub struct SetActiveFarms<'info> {
    #[account(
        constraint = admin.key() == core.admin @ ErrorCode::InvalidOwner
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub core: Box<Account<'info, Core>>,
}

/// Replaces the active group.
///
/// Every account must be a farm owned by this program that is either
/// standalone or deployed by this core. Farms the core has not seen yet are
/// appended to the registry under their pair; replaced farms stay registered
/// and keep running.
pub fn set_active_farms<'info>(
    ctx: Context<'_, '_, 'info, 'info, SetActiveFarms<'info>>,
) -> Result<()> {
    let core = &mut ctx.accounts.core;
    let core_key = core.key();

    let mut records = Vec::with_capacity(ctx.remaining_accounts.len());
    for info in ctx.remaining_accounts.iter() {
        let farm = Account::<Farm>::try_from(info)?;
        require!(
            farm.core == Pubkey::default() || farm.core == core_key,
            ErrorCode::InvalidActiveFarm
        );
        records.push(FarmRecord {
            pair: farm.pair,
            farm: info.key(),
        });
    }

    let start = core.farms.len();
    let registered = core.set_active(&records)?;
    for (offset, record) in registered.iter().enumerate() {
        emit!(FarmRegistered {
            core: core_key,
            pair: record.pair,
            farm: record.farm,
            index: (start + offset) as u64,
        });
    }
    msg!("Active farms set: {}", core.active_farms.len());

    emit!(ActiveFarmsSet {
        core: core_key,
        farms: core.active_farms.clone(),
    });
    Ok(())
}
