//! 256-bit intermediates for products that can exceed `u128`.
#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use crate::error::ErrorCode;
use anchor_lang::prelude::{require, Result};

mod wide {
    uint::construct_uint! {
        pub struct U256(4);
    }
}
pub use wide::U256;

impl U256 {
    /// Narrow back to `u128`, failing instead of truncating.
    pub fn try_to_u128(self) -> Result<u128> {
        if self > U256::from(u128::MAX) {
            return Err(ErrorCode::MathOverflow.into());
        }
        Ok(self.as_u128())
    }
}

/// `a * b / denominator` without intermediate overflow.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator > 0, ErrorCode::MathOverflow);
    U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(U256::from(denominator))
        .ok_or(ErrorCode::MathOverflow)?
        .try_to_u128()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_handles_products_past_u128() {
        let a = u128::MAX / 2;
        assert_eq!(mul_div(a, 4, 8).unwrap(), a / 2);
    }

    #[test]
    fn mul_div_rejects_zero_denominator_and_narrowing_overflow() {
        assert!(mul_div(1, 1, 0).is_err());
        assert!(mul_div(u128::MAX, 2, 1).is_err());
    }
}
