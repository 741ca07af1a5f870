use anchor_lang::AccountDeserialize;
use anyhow::{format_err, Result};
use equilibrium::{
    CORE_SEED, FARM_AUTH_SEED, FARM_SEED, OBSERVATION_SEED, PRICE_FEED_SEED, REWARD_VAULT_SEED,
    STAKE_ACCOUNT_SEED, STAKE_VAULT_SEED,
};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{account::Account, pubkey::Pubkey};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

pub fn fetch_anchor_account<T: AccountDeserialize>(
    rpc_client: &RpcClient,
    address: &Pubkey,
) -> Result<T> {
    let account = rpc_client.get_account(address)?;
    deserialize_anchor_account(&account)
}

/// Token program owning `mint` (SPL Token or Token-2022).
pub fn get_token_program(rpc_client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    let owner = rpc_client.get_account(mint)?.owner;
    if owner == spl_token::id() || owner == spl_token_2022::id() {
        Ok(owner)
    } else {
        Err(format_err!("{} is not a token mint", mint))
    }
}

pub fn get_associated_token_address(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address_with_program_id(
        owner,
        mint,
        token_program,
    )
}

/// Current cluster time, as seen by the latest slot.
pub fn get_cluster_time(rpc_client: &RpcClient) -> Result<u64> {
    let slot = rpc_client.get_slot()?;
    let time = rpc_client.get_block_time(slot)?;
    u64::try_from(time).map_err(|_| format_err!("negative block time {}", time))
}

pub fn get_core_address(admin: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (core, _bump) =
        Pubkey::find_program_address(&[CORE_SEED.as_bytes(), admin.as_ref()], program_id);
    core
}

pub fn get_farm_address(core: &Pubkey, pair: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (farm, _bump) = Pubkey::find_program_address(
        &[FARM_SEED.as_bytes(), core.as_ref(), pair.as_ref()],
        program_id,
    );
    farm
}

pub fn get_farm_authority_address(farm: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[FARM_AUTH_SEED.as_bytes(), farm.as_ref()], program_id);
    authority
}

pub fn get_stake_vault_address(farm: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (vault, _bump) =
        Pubkey::find_program_address(&[STAKE_VAULT_SEED.as_bytes(), farm.as_ref()], program_id);
    vault
}

pub fn get_reward_vault_address(farm: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (vault, _bump) =
        Pubkey::find_program_address(&[REWARD_VAULT_SEED.as_bytes(), farm.as_ref()], program_id);
    vault
}

pub fn get_price_feed_address(farm: &Pubkey, authority: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (feed, _bump) = Pubkey::find_program_address(
        &[PRICE_FEED_SEED.as_bytes(), farm.as_ref(), authority.as_ref()],
        program_id,
    );
    feed
}

pub fn get_stake_account_address(farm: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (stake_account, _bump) = Pubkey::find_program_address(
        &[STAKE_ACCOUNT_SEED.as_bytes(), farm.as_ref(), owner.as_ref()],
        program_id,
    );
    stake_account
}

pub fn get_observation_address(core: &Pubkey, index: u64, program_id: &Pubkey) -> Pubkey {
    let (observation, _bump) = Pubkey::find_program_address(
        &[
            OBSERVATION_SEED.as_bytes(),
            core.as_ref(),
            &index.to_le_bytes(),
        ],
        program_id,
    );
    observation
}
