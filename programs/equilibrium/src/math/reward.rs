//! Reward-rate math for the farm accrual engine.
//!
//! The global index `reward_per_token` grows by
//! `rate * elapsed * PRECISION / total_supply` and an account's accrual is
//! `balance * (index_now - index_paid) / PRECISION`. Division back into token
//! units only happens in [`earned`].

use crate::error::ErrorCode;
use crate::math::mul_div;
use crate::PRECISION;
use anchor_lang::prelude::*;

/// Latest timestamp that still earns emission: `min(now, epoch_finish)`.
pub fn last_time_reward_applicable(now: u64, epoch_finish: u64) -> u64 {
    std::cmp::min(now, epoch_finish)
}

/// Global reward index as of `applicable_time`.
///
/// Returns `stored` unchanged when nothing is staked or when
/// `applicable_time` does not lie after `last_update_time` (an epoch that has
/// not started yet, or one that already ended before the last settle).
pub fn reward_per_token(
    stored: u128,
    total_supply: u64,
    reward_rate: u64,
    last_update_time: u64,
    applicable_time: u64,
) -> Result<u128> {
    if total_supply == 0 || applicable_time <= last_update_time {
        return Ok(stored);
    }
    let elapsed = applicable_time - last_update_time;
    let emitted = (reward_rate as u128)
        .checked_mul(elapsed as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    let increment = mul_div(emitted, PRECISION, total_supply as u128)?;
    stored
        .checked_add(increment)
        .ok_or(ErrorCode::MathOverflow.into())
}

/// Rewards owed to an account holding `balance` since it last synced at
/// `reward_per_token_paid`, on top of what it already accrued.
pub fn earned(
    balance: u64,
    reward_per_token: u128,
    reward_per_token_paid: u128,
    rewards_accrued: u64,
) -> Result<u64> {
    let pending_index = reward_per_token
        .checked_sub(reward_per_token_paid)
        .ok_or(ErrorCode::MathOverflow)?;
    let pending = mul_div(balance as u128, pending_index, PRECISION)?;
    let total = pending
        .checked_add(rewards_accrued as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    u64::try_from(total).map_err(|_| ErrorCode::MathOverflow.into())
}

/// Emission an epoch ending at `epoch_finish` has not released by `from`.
///
/// `from` must be the later of the current time and the epoch start, so a
/// deferred epoch only counts the time it would actually run.
pub fn undistributed_reward(from: u64, epoch_finish: u64, reward_rate: u64) -> Result<u64> {
    if from >= epoch_finish {
        return Ok(0);
    }
    (epoch_finish - from)
        .checked_mul(reward_rate)
        .ok_or(ErrorCode::MathOverflow.into())
}

/// Rate for a new epoch, folding in `leftover` from the running one so
/// overlapping notifications never lose reward.
pub fn next_reward_rate(reward_amount: u64, leftover: u64, epoch_duration: u64) -> Result<u64> {
    require_gt!(epoch_duration, 0, ErrorCode::InvalidEpochDuration);
    let total = reward_amount
        .checked_add(leftover)
        .ok_or(ErrorCode::MathOverflow)?;
    Ok(total / epoch_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_supply_banks_nothing() {
        assert_eq!(reward_per_token(42, 0, 1_000, 0, 500).unwrap(), 42);
    }

    #[test]
    fn index_does_not_move_before_last_update() {
        assert_eq!(reward_per_token(7, 100, 1_000, 500, 400).unwrap(), 7);
        assert_eq!(reward_per_token(7, 100, 1_000, 500, 500).unwrap(), 7);
    }

    #[test]
    fn small_rate_over_large_supply_still_accrues() {
        let index = reward_per_token(0, 1_000_000_000_000_000, 1, 0, 1).unwrap();
        assert!(index > 0);
    }

    #[test]
    fn earned_scales_index_delta_by_balance() {
        let index = reward_per_token(0, 100, 10, 0, 10).unwrap();
        assert_eq!(earned(100, index, 0, 0).unwrap(), 100);
        assert_eq!(earned(50, index, 0, 3).unwrap(), 53);
    }

    #[test]
    fn leftover_is_folded_into_new_rate() {
        // 100/s with 50s left leaves 5_000 undistributed.
        assert_eq!(undistributed_reward(50, 100, 100).unwrap(), 5_000);
        assert_eq!(undistributed_reward(100, 100, 100).unwrap(), 0);
        assert_eq!(next_reward_rate(5_000, 5_000, 100).unwrap(), 100);
    }

    #[test]
    fn next_rate_rejects_zero_duration() {
        assert!(next_reward_rate(1, 0, 0).is_err());
    }

    proptest! {
        #[test]
        fn index_is_monotone_in_time(
            stored in 0u128..1_000_000_000_000u128,
            supply in 1u64..u64::MAX,
            rate in 0u64..1_000_000_000u64,
            t1 in 0u64..1_000_000u64,
            dt in 0u64..1_000_000u64,
        ) {
            let a = reward_per_token(stored, supply, rate, 0, t1).unwrap();
            let b = reward_per_token(stored, supply, rate, 0, t1 + dt).unwrap();
            prop_assert!(b >= a);
            prop_assert!(a >= stored);
        }

        #[test]
        fn earned_never_exceeds_emission_for_sole_staker(
            supply in 1u64..1_000_000_000u64,
            rate in 0u64..1_000_000u64,
            elapsed in 0u64..100_000u64,
        ) {
            let index = reward_per_token(0, supply, rate, 0, elapsed).unwrap();
            let owed = earned(supply, index, 0, 0).unwrap();
            prop_assert!(owed as u128 <= rate as u128 * elapsed as u128);
        }
    }
}
