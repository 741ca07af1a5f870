#![allow(dead_code)]
use anyhow::{format_err, Result};
use clap::Parser;
use configparser::ini::Ini;
use equilibrium::math;
use equilibrium::states::{Core, Farm, Observation, PriceFeed, StakeAccount};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::str::FromStr;

mod instructions;
use instructions::equilibrium_instructions::*;
use instructions::rpc::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    equilibrium_program: Pubkey,
    /// Core owned by the admin keypair.
    core: Pubkey,
}

fn required(config: &Ini, key: &str) -> Result<String> {
    let value = config
        .get("Global", key)
        .ok_or_else(|| format_err!("{} is missing", key))?;
    if value.is_empty() {
        return Err(format_err!("{} must not be empty", key));
    }
    Ok(value)
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config.load(client_config).map_err(|e| format_err!(e))?;
    let http_url = required(&config, "http_url")?;
    let ws_url = required(&config, "ws_url")?;
    let payer_path = required(&config, "payer_path")?;
    let admin_path = required(&config, "admin_path")?;
    let equilibrium_program = Pubkey::from_str(&required(&config, "equilibrium_program")?)?;

    let admin = read_keypair_file(&admin_path)?.pubkey();
    let core = get_core_address(&admin, &equilibrium_program);

    Ok(ClientConfig {
        http_url,
        ws_url,
        payer_path,
        admin_path,
        equilibrium_program,
        core,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: EquilibriumCommands,
}

#[derive(Debug, Parser)]
pub enum EquilibriumCommands {
    InitialiseCore {
        #[arg(long)]
        oracle_authority: Pubkey,
        #[arg(long)]
        permissionless_update: bool,
    },
    UpdateConfig {
        #[arg(long)]
        param: u8,
        #[arg(long, default_value_t = 0)]
        value: u64,
        /// New admin or oracle authority for params 0 and 1.
        #[arg(long)]
        key: Option<Pubkey>,
    },
    Deploy {
        #[arg(long)]
        pair: Pubkey,
        #[arg(long)]
        token_a: Pubkey,
        #[arg(long)]
        token_b: Pubkey,
        #[arg(long)]
        stake_mint: Pubkey,
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        epoch_duration: u64,
    },
    InitialiseFarm {
        #[arg(long)]
        pair: Pubkey,
        #[arg(long)]
        token_a: Pubkey,
        #[arg(long)]
        token_b: Pubkey,
        #[arg(long)]
        stake_mint: Pubkey,
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        epoch_duration: u64,
    },
    SetActiveFarms {
        #[arg(long, num_args = 1.., required = true)]
        farms: Vec<Pubkey>,
    },
    PublishPrice {
        #[arg(long)]
        farm: Pubkey,
        #[arg(long)]
        price: u64,
    },
    Deposit {
        #[arg(long)]
        farm: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    Withdraw {
        #[arg(long)]
        farm: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    GetReward {
        #[arg(long)]
        farm: Pubkey,
    },
    Exit {
        #[arg(long)]
        farm: Pubkey,
    },
    NotifyEpoch {
        #[arg(long)]
        farm: Pubkey,
        #[arg(long)]
        reward_amount: u64,
        /// Defaults to now.
        #[arg(long, default_value_t = 0)]
        start_time: u64,
        /// Transfer `reward_amount` from the admin's ATA into the vault first.
        #[arg(long)]
        fund: bool,
    },
    Update {},
    Earned {
        #[arg(long)]
        farm: Pubkey,
        /// Defaults to the payer.
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    Score {},
    Consult {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
    },
    FarmByPair {
        #[arg(long)]
        pair: Pubkey,
    },
    Farms {},
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let config = load_cfg(client_config)?;
    let payer = read_keypair_file(&config.payer_path)?;
    let admin = read_keypair_file(&config.admin_path)?;
    let program_id = config.equilibrium_program;
    // solana rpc client
    let rpc_client = RpcClient::new(config.http_url.to_string());

    let opts = Opts::parse();
    match opts.command {
        EquilibriumCommands::InitialiseCore {
            oracle_authority,
            permissionless_update,
        } => {
            let instructions =
                initialise_core_instr(&config, oracle_authority, permissionless_update)?;
            let signature = sign_and_send(&rpc_client, &instructions, &admin, &[])?;
            println!("core: {}", config.core);
            println!("{}", signature);
        }
        EquilibriumCommands::UpdateConfig { param, value, key } => {
            let instructions = update_config_instr(&config, param, value, key)?;
            let signature = sign_and_send(&rpc_client, &instructions, &admin, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::Deploy {
            pair,
            token_a,
            token_b,
            stake_mint,
            reward_mint,
            epoch_duration,
        } => {
            let token_program = get_token_program(&rpc_client, &stake_mint)?;
            let instructions = deploy_instr(
                &config,
                pair,
                token_a,
                token_b,
                stake_mint,
                reward_mint,
                token_program,
                epoch_duration,
            )?;
            let signature = sign_and_send(&rpc_client, &instructions, &admin, &[])?;
            println!("farm: {}", get_farm_address(&config.core, &pair, &program_id));
            println!("{}", signature);
        }
        EquilibriumCommands::InitialiseFarm {
            pair,
            token_a,
            token_b,
            stake_mint,
            reward_mint,
            epoch_duration,
        } => {
            let farm = Keypair::new();
            let token_program = get_token_program(&rpc_client, &stake_mint)?;
            let instructions = initialise_farm_instr(
                &config,
                farm.pubkey(),
                pair,
                token_a,
                token_b,
                stake_mint,
                reward_mint,
                token_program,
                epoch_duration,
            )?;
            let signature = sign_and_send(&rpc_client, &instructions, &admin, &[&farm])?;
            println!("farm: {}", farm.pubkey());
            println!("{}", signature);
        }
        EquilibriumCommands::SetActiveFarms { farms } => {
            let instructions = set_active_farms_instr(&config, &farms)?;
            let signature = sign_and_send(&rpc_client, &instructions, &admin, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::PublishPrice { farm, price } => {
            let instructions = publish_price_instr(&config, farm, price)?;
            let signature = sign_and_send(&rpc_client, &instructions, &payer, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::Deposit { farm, amount } => {
            let state: Farm = fetch_anchor_account(&rpc_client, &farm)?;
            let token_program = get_token_program(&rpc_client, &state.stake_mint)?;
            let instructions = deposit_instr(&config, farm, &state, token_program, amount)?;
            let signature = sign_and_send(&rpc_client, &instructions, &payer, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::Withdraw { farm, amount } => {
            let state: Farm = fetch_anchor_account(&rpc_client, &farm)?;
            let token_program = get_token_program(&rpc_client, &state.stake_mint)?;
            let instructions = withdraw_instr(&config, farm, &state, token_program, amount)?;
            let signature = sign_and_send(&rpc_client, &instructions, &payer, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::GetReward { farm } => {
            let state: Farm = fetch_anchor_account(&rpc_client, &farm)?;
            let token_program = get_token_program(&rpc_client, &state.reward_mint)?;
            let instructions = get_reward_instr(&config, farm, &state, token_program)?;
            let signature = sign_and_send(&rpc_client, &instructions, &payer, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::Exit { farm } => {
            let state: Farm = fetch_anchor_account(&rpc_client, &farm)?;
            let token_program = get_token_program(&rpc_client, &state.stake_mint)?;
            let instructions = exit_instr(&config, farm, &state, token_program)?;
            let signature = sign_and_send(&rpc_client, &instructions, &payer, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::NotifyEpoch {
            farm,
            reward_amount,
            start_time,
            fund,
        } => {
            let state: Farm = fetch_anchor_account(&rpc_client, &farm)?;
            let mut instructions = Vec::new();
            if fund {
                let token_program = get_token_program(&rpc_client, &state.reward_mint)?;
                let mint_account = rpc_client.get_account(&state.reward_mint)?;
                let decimals = spl_token_2022::extension::StateWithExtensions::<
                    spl_token_2022::state::Mint,
                >::unpack(&mint_account.data)?
                .base
                .decimals;
                instructions.push(fund_reward_vault_instr(
                    &admin.pubkey(),
                    &state,
                    &token_program,
                    reward_amount,
                    decimals,
                )?);
            }
            instructions.extend(notify_epoch_instr(
                &config,
                farm,
                &state,
                reward_amount,
                start_time,
            )?);
            let signature = sign_and_send(&rpc_client, &instructions, &admin, &[])?;
            println!("{}", signature);
        }
        EquilibriumCommands::Update {} => {
            let core: Core = fetch_anchor_account(&rpc_client, &config.core)?;
            let mut active = Vec::with_capacity(core.active_farms.len());
            for farm in &core.active_farms {
                let feed = get_price_feed_address(farm, &core.oracle_authority, &program_id);
                active.push((*farm, feed));
            }
            let instructions = update_instr(&config, core.observation_count, &active)?;
            let signature = sign_and_send(&rpc_client, &instructions, &payer, &[])?;
            println!("observation: {}", core.observation_count);
            println!("{}", signature);
        }
        EquilibriumCommands::Earned { farm, owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let state: Farm = fetch_anchor_account(&rpc_client, &farm)?;
            let stake_address = get_stake_account_address(&farm, &owner, &program_id);
            let stake: StakeAccount = fetch_anchor_account(&rpc_client, &stake_address)?;
            let now = get_cluster_time(&rpc_client)?;
            let earned = state
                .earned(&stake, now)
                .map_err(|e| format_err!("{}", e))?;
            println!("balance: {}", stake.balance);
            println!("earned: {}", earned);
        }
        EquilibriumCommands::Score {} => {
            let core: Core = fetch_anchor_account(&rpc_client, &config.core)?;
            println!("score: {}", core.last_score);
            println!("observations: {}", core.observation_count);
            println!("accumulated: {}", core.accumulated_score);
        }
        EquilibriumCommands::Consult { from, to } => {
            let start: Observation = fetch_anchor_account(
                &rpc_client,
                &get_observation_address(&config.core, from, &program_id),
            )?;
            let end: Observation = fetch_anchor_account(
                &rpc_client,
                &get_observation_address(&config.core, to, &program_id),
            )?;
            let average = math::time_weighted_average(
                start.accumulated_score,
                start.timestamp,
                end.accumulated_score,
                end.timestamp,
            )
            .map_err(|e| format_err!("{}", e))?;
            println!("average score: {}", average);
        }
        EquilibriumCommands::FarmByPair { pair } => {
            let core: Core = fetch_anchor_account(&rpc_client, &config.core)?;
            match core.farm_by_pair(&pair) {
                Some(farm) => println!("{}", farm),
                None => println!("no farm registered for {}", pair),
            }
        }
        EquilibriumCommands::Farms {} => {
            let core: Core = fetch_anchor_account(&rpc_client, &config.core)?;
            for (index, record) in core.farms.iter().enumerate() {
                let active = core.active_farms.contains(&record.farm);
                let feed_address =
                    get_price_feed_address(&record.farm, &core.oracle_authority, &program_id);
                let price = fetch_anchor_account::<PriceFeed>(&rpc_client, &feed_address)
                    .map(|feed| feed.price.to_string())
                    .unwrap_or_else(|_| "-".to_string());
                println!(
                    "{} pair {} farm {} price {}{}",
                    index,
                    record.pair,
                    record.farm,
                    price,
                    if active { " (active)" } else { "" }
                );
            }
        }
    }
    Ok(())
}
