use crate::error::ErrorCode;
use crate::states::{ConfigUpdated, Core};
use anchor_lang::prelude::*;

/// Accounts context for the `update_config` instruction.
///
/// Only the current core admin may change core parameters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// Authorized signer: must be the stored admin.
    #[account(
        constraint = owner.key() == core.admin @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    /// Core whose configuration is updated.
    #[account(mut)]
    pub core: Box<Account<'info, Core>>,
}

/// Updates a single core parameter.
///
/// # Param Mapping
/// - `0`: **Admin change** → new admin Pubkey passed via `remaining_accounts[0]`.
/// - `1`: **oracle_authority** → new feed publisher passed via `remaining_accounts[0]`.
/// - `2`: **permissionless_update** → toggles open `update` calls (nonzero = open).
///
/// Any other `param` value returns `ErrorCode::InvalidParam`.
///
/// # Errors
/// - `InvalidOwner`: caller is not the admin.
/// - `MissingRemainingAccount`: a key update without the key account.
/// - `InvalidParam`: unknown selector.
pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
    let core = &mut ctx.accounts.core;
    match param {
        0 => {
            let new_admin = remaining_key(ctx.remaining_accounts)?;
            require_keys_neq!(new_admin, Pubkey::default());
            core.admin = new_admin;
        }
        1 => {
            let oracle_authority = remaining_key(ctx.remaining_accounts)?;
            require_keys_neq!(oracle_authority, Pubkey::default());
            core.oracle_authority = oracle_authority;
        }
        2 => {
            core.permissionless_update = value != 0;
        }
        _ => return Err(error!(ErrorCode::InvalidParam)),
    }

    emit!(ConfigUpdated {
        core: core.key(),
        admin: core.admin,
        oracle_authority: core.oracle_authority,
        permissionless_update: core.permissionless_update,
    });
    Ok(())
}

fn remaining_key(remaining_accounts: &[AccountInfo]) -> Result<Pubkey> {
    Ok(*remaining_accounts
        .first()
        .ok_or(error!(ErrorCode::MissingRemainingAccount))?
        .key)
}
