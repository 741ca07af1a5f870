pub mod token;
pub use token::*;

use crate::error::ErrorCode;
use anchor_lang::prelude::*;

/// Current cluster time as unsigned seconds.
pub fn current_timestamp() -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    u64::try_from(now).map_err(|_| error!(ErrorCode::InvalidTimestamp))
}
