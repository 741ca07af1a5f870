pub mod initialise_core;
pub use initialise_core::*;

pub mod update_config;
pub use update_config::*;

pub mod deploy;
pub use deploy::*;

pub mod initialise_farm;
pub use initialise_farm::*;

pub mod set_active_farms;
pub use set_active_farms::*;

pub mod update;
pub use update::*;

pub mod views;
pub use views::*;

pub mod publish_price;
pub use publish_price::*;

pub mod deposit;
pub use deposit::*;

pub mod withdraw;
pub use withdraw::*;

pub mod get_reward;
pub use get_reward::*;

pub mod exit;
pub use exit::*;

pub mod notify_epoch;
pub use notify_epoch::*;
