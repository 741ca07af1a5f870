use crate::states::{Core, CoreInitialized};
use crate::CORE_SEED;
use anchor_lang::prelude::*;

/// Accounts context for `initialise_core`.
///
/// The signer becomes the core admin; the core PDA is derived from
/// `CORE_SEED + admin`, so every admin key can run one core.
#[derive(Accounts)]
pub struct InitialiseCore<'info> {
    /// Creator and first admin; pays for the core account.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Aggregator state: registry, active group and score accumulator.
    #[account(
        init,
        seeds = [CORE_SEED.as_bytes(), admin.key().as_ref()],
        bump,
        payer = admin,
        space = Core::LEN
    )]
    pub core: Box<Account<'info, Core>>,

    pub system_program: Program<'info, System>,
}

/// Creates an empty core.
///
/// # Parameters
/// - `oracle_authority`: publisher whose price feeds `update` will trust.
/// - `permissionless_update`: whether anyone may append observations.
pub fn initialise_core(
    ctx: Context<InitialiseCore>,
    oracle_authority: Pubkey,
    permissionless_update: bool,
) -> Result<()> {
    let core = &mut ctx.accounts.core;
    core.bump = ctx.bumps.core;
    core.admin = ctx.accounts.admin.key();
    core.oracle_authority = oracle_authority;
    core.permissionless_update = permissionless_update;
    msg!("Core initialized");

    emit!(CoreInitialized {
        core: core.key(),
        admin: core.admin,
        oracle_authority,
        permissionless_update,
    });
    Ok(())
}
