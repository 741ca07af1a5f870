pub mod core;
pub use self::core::*;

pub mod events;
pub use events::*;

pub mod farm;
pub use farm::*;

pub mod observation;
pub use observation::*;

pub mod price_feed;
pub use price_feed::*;

pub mod stake_account;
pub use stake_account::*;
