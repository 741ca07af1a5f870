use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use equilibrium::accounts as equilibrium_accounts;
use equilibrium::instruction as equilibrium_instructions;
use equilibrium::states::Farm;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use std::rc::Rc;

use crate::instructions::utils::*;

use super::super::{read_keypair_file, ClientConfig};

fn program_for(config: &ClientConfig, keypair_path: &str) -> Result<Program<Rc<Keypair>>> {
    let signer = read_keypair_file(keypair_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(signer));
    Ok(client.program(config.equilibrium_program)?)
}

// ─── Core ───────────────────────────────────────────────

pub fn initialise_core_instr(
    config: &ClientConfig,
    oracle_authority: Pubkey,
    permissionless_update: bool,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;
    let core = get_core_address(&program.payer(), &program.id());

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::InitialiseCore {
            admin: program.payer(),
            core,
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::InitialiseCore {
            oracle_authority,
            permissionless_update,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn update_config_instr(
    config: &ClientConfig,
    param: u8,
    value: u64,
    key: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;

    let mut ixs = program
        .request()
        .accounts(equilibrium_accounts::UpdateConfig {
            owner: program.payer(),
            core: config.core,
        })
        .args(equilibrium_instructions::UpdateConfig { param, value })
        .instructions()?;

    if let Some(key) = key {
        ixs[0].accounts.push(AccountMeta::new_readonly(key, false));
    }
    Ok(ixs)
}

#[allow(clippy::too_many_arguments)]
pub fn deploy_instr(
    config: &ClientConfig,
    pair: Pubkey,
    token_a: Pubkey,
    token_b: Pubkey,
    stake_mint: Pubkey,
    reward_mint: Pubkey,
    token_program: Pubkey,
    epoch_duration: u64,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;
    let farm = get_farm_address(&config.core, &pair, &program.id());

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::Deploy {
            admin: program.payer(),
            core: config.core,
            farm,
            authority: get_farm_authority_address(&farm, &program.id()),
            stake_mint,
            reward_mint,
            stake_vault: get_stake_vault_address(&farm, &program.id()),
            reward_vault: get_reward_vault_address(&farm, &program.id()),
            token_program,
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::Deploy {
            pair,
            token_a,
            token_b,
            epoch_duration,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn set_active_farms_instr(config: &ClientConfig, farms: &[Pubkey]) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;

    let mut ixs = program
        .request()
        .accounts(equilibrium_accounts::SetActiveFarms {
            admin: program.payer(),
            core: config.core,
        })
        .args(equilibrium_instructions::SetActiveFarms {})
        .instructions()?;

    ixs[0].accounts.extend(
        farms
            .iter()
            .map(|farm| AccountMeta::new_readonly(*farm, false)),
    );
    Ok(ixs)
}

/// `active` pairs each active farm with its price feed, in slot order.
pub fn update_instr(
    config: &ClientConfig,
    observation_index: u64,
    active: &[(Pubkey, Pubkey)],
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;

    let mut ixs = program
        .request()
        .accounts(equilibrium_accounts::Update {
            payer: program.payer(),
            core: config.core,
            observation: get_observation_address(&config.core, observation_index, &program.id()),
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::Update {})
        .instructions()?;

    for (farm, price_feed) in active {
        ixs[0].accounts.push(AccountMeta::new_readonly(*farm, false));
        ixs[0]
            .accounts
            .push(AccountMeta::new_readonly(*price_feed, false));
    }
    Ok(ixs)
}

pub fn publish_price_instr(config: &ClientConfig, farm: Pubkey, price: u64) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::PublishPrice {
            publisher: program.payer(),
            farm,
            price_feed: get_price_feed_address(&farm, &program.payer(), &program.id()),
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::PublishPrice { price })
        .instructions()?;
    Ok(instructions)
}

// ─── Farm ───────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn initialise_farm_instr(
    config: &ClientConfig,
    farm: Pubkey,
    pair: Pubkey,
    token_a: Pubkey,
    token_b: Pubkey,
    stake_mint: Pubkey,
    reward_mint: Pubkey,
    token_program: Pubkey,
    epoch_duration: u64,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::InitialiseFarm {
            admin: program.payer(),
            farm,
            authority: get_farm_authority_address(&farm, &program.id()),
            stake_mint,
            reward_mint,
            stake_vault: get_stake_vault_address(&farm, &program.id()),
            reward_vault: get_reward_vault_address(&farm, &program.id()),
            token_program,
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::InitialiseFarm {
            pair,
            token_a,
            token_b,
            epoch_duration,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn deposit_instr(
    config: &ClientConfig,
    farm_key: Pubkey,
    farm: &Farm,
    token_program: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::Deposit {
            owner,
            farm: farm_key,
            stake_account: get_stake_account_address(&farm_key, &owner, &program.id()),
            stake_mint: farm.stake_mint,
            owner_stake_token: get_associated_token_address(&owner, &farm.stake_mint, &token_program),
            stake_vault: farm.stake_vault,
            token_program,
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::Deposit { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn withdraw_instr(
    config: &ClientConfig,
    farm_key: Pubkey,
    farm: &Farm,
    token_program: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::Withdraw {
            owner,
            farm: farm_key,
            stake_account: get_stake_account_address(&farm_key, &owner, &program.id()),
            authority: get_farm_authority_address(&farm_key, &program.id()),
            stake_mint: farm.stake_mint,
            owner_stake_token: get_associated_token_address(&owner, &farm.stake_mint, &token_program),
            stake_vault: farm.stake_vault,
            token_program,
        })
        .args(equilibrium_instructions::Withdraw { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn get_reward_instr(
    config: &ClientConfig,
    farm_key: Pubkey,
    farm: &Farm,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::GetReward {
            owner,
            farm: farm_key,
            stake_account: get_stake_account_address(&farm_key, &owner, &program.id()),
            authority: get_farm_authority_address(&farm_key, &program.id()),
            reward_mint: farm.reward_mint,
            owner_reward_token: get_associated_token_address(&owner, &farm.reward_mint, &token_program),
            reward_vault: farm.reward_vault,
            token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::GetReward {})
        .instructions()?;
    Ok(instructions)
}

pub fn exit_instr(
    config: &ClientConfig,
    farm_key: Pubkey,
    farm: &Farm,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::Exit {
            owner,
            farm: farm_key,
            stake_account: get_stake_account_address(&farm_key, &owner, &program.id()),
            authority: get_farm_authority_address(&farm_key, &program.id()),
            stake_mint: farm.stake_mint,
            owner_stake_token: get_associated_token_address(&owner, &farm.stake_mint, &token_program),
            stake_vault: farm.stake_vault,
            reward_mint: farm.reward_mint,
            owner_reward_token: get_associated_token_address(&owner, &farm.reward_mint, &token_program),
            reward_vault: farm.reward_vault,
            token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(equilibrium_instructions::Exit {})
        .instructions()?;
    Ok(instructions)
}

pub fn notify_epoch_instr(
    config: &ClientConfig,
    farm_key: Pubkey,
    farm: &Farm,
    reward_amount: u64,
    start_time: u64,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;

    let instructions = program
        .request()
        .accounts(equilibrium_accounts::NotifyEpoch {
            admin: program.payer(),
            farm: farm_key,
            reward_vault: farm.reward_vault,
        })
        .args(equilibrium_instructions::NotifyEpoch {
            reward_amount,
            start_time,
        })
        .instructions()?;
    Ok(instructions)
}

/// Plain token transfer from `funder`'s ATA into the farm's reward vault.
pub fn fund_reward_vault_instr(
    funder: &Pubkey,
    farm: &Farm,
    token_program: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction> {
    let source = get_associated_token_address(funder, &farm.reward_mint, token_program);
    Ok(spl_token_2022::instruction::transfer_checked(
        token_program,
        &source,
        &farm.reward_mint,
        &farm.reward_vault,
        funder,
        &[],
        amount,
        decimals,
    )?)
}
