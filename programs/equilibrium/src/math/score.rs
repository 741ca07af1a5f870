//! Equilibrium score and the time-weighted score accumulator.
//!
//! The score measures how far the active farms' comparable values sit from
//! their mean: with `n` priced values summing to `S`,
//!
//! ```text
//! penalty = round(100 * Σ|n·vᵢ − S| / (n·S))
//! score   = 100 − min(penalty, 100)
//! ```
//!
//! i.e. the mean absolute deviation relative to the mean, in percent. Equal
//! values score 100; an empty or all-zero group also scores 100 since there
//! is nothing out of balance.

use crate::error::ErrorCode;
use crate::math::U256;
use anchor_lang::prelude::*;

pub const MAX_SCORE: u8 = 100;

/// Bounded equilibrium score for a set of comparable values.
pub fn equilibrium_score(values: &[u128]) -> Result<u8> {
    let n = values.len() as u128;
    let total = values.iter().try_fold(U256::zero(), |acc, v| {
        acc.checked_add(U256::from(*v)).ok_or(ErrorCode::MathOverflow)
    })?;
    if n == 0 || total.is_zero() {
        return Ok(MAX_SCORE);
    }

    let n = U256::from(n);
    let mut deviation = U256::zero();
    for value in values {
        let scaled = U256::from(*value)
            .checked_mul(n)
            .ok_or(ErrorCode::MathOverflow)?;
        let distance = if scaled > total {
            scaled - total
        } else {
            total - scaled
        };
        deviation = deviation
            .checked_add(distance)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    // round(100 * D / (n * S)) == (200 * D + n * S) / (2 * n * S)
    let denominator = n.checked_mul(total).ok_or(ErrorCode::MathOverflow)?;
    let penalty = deviation
        .checked_mul(U256::from(200u8))
        .and_then(|x| x.checked_add(denominator))
        .and_then(|x| x.checked_div(denominator * U256::from(2u8)))
        .ok_or(ErrorCode::MathOverflow)?;
    let penalty = std::cmp::min(penalty, U256::from(MAX_SCORE)).as_u32() as u8;
    Ok(MAX_SCORE - penalty)
}

/// Signed deviation of each value from the (floored) group mean.
pub fn mean_deviations(values: &[u128]) -> Result<Vec<i128>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let total = values.iter().try_fold(0u128, |acc, v| {
        acc.checked_add(*v).ok_or(ErrorCode::MathOverflow)
    })?;
    let mean = i128::try_from(total / values.len() as u128).map_err(|_| ErrorCode::MathOverflow)?;
    values
        .iter()
        .map(|v| -> Result<i128> {
            let v = i128::try_from(*v).map_err(|_| ErrorCode::MathOverflow)?;
            Ok(v.checked_sub(mean).ok_or(ErrorCode::MathOverflow)?)
        })
        .collect()
}

/// Advance a cumulative accumulator by holding `previous_score` over
/// `[last_update_time, now]`. A clock that has not moved forward contributes
/// nothing.
pub fn accumulate_score(
    accumulated: u128,
    previous_score: u8,
    last_update_time: u64,
    now: u64,
) -> Result<u128> {
    let elapsed = now.saturating_sub(last_update_time);
    let contribution = (previous_score as u128)
        .checked_mul(elapsed as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    accumulated
        .checked_add(contribution)
        .ok_or(ErrorCode::MathOverflow.into())
}

/// Time-weighted average score between two accumulator readings.
pub fn time_weighted_average(
    accumulated_start: u128,
    time_start: u64,
    accumulated_end: u128,
    time_end: u64,
) -> Result<u64> {
    require_gt!(time_end, time_start, ErrorCode::InvalidWindow);
    let integral = accumulated_end
        .checked_sub(accumulated_start)
        .ok_or(ErrorCode::InvalidWindow)?;
    let average = integral / (time_end - time_start) as u128;
    u64::try_from(average).map_err(|_| ErrorCode::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn balanced_group_scores_100() {
        assert_eq!(equilibrium_score(&[200, 200, 200, 200]).unwrap(), 100);
        assert_eq!(equilibrium_score(&[7]).unwrap(), 100);
    }

    #[test]
    fn observed_unbalanced_group_scores_86() {
        assert_eq!(equilibrium_score(&[150, 200, 150, 200]).unwrap(), 86);
    }

    #[test]
    fn drop_in_one_farm_lowers_score() {
        assert_eq!(equilibrium_score(&[150, 200, 100, 200]).unwrap(), 77);
    }

    #[test]
    fn empty_or_unfunded_group_does_not_divide_by_zero() {
        assert_eq!(equilibrium_score(&[]).unwrap(), 100);
        assert_eq!(equilibrium_score(&[0, 0, 0, 0]).unwrap(), 100);
    }

    #[test]
    fn fully_concentrated_value_bottoms_out() {
        assert_eq!(equilibrium_score(&[0, 0, 0, 1_000]).unwrap(), 0);
        // two of two: |2*0-10| + |2*10-10| = 20 over n*S = 20 -> penalty 100
        assert_eq!(equilibrium_score(&[0, 10]).unwrap(), 0);
    }

    #[test]
    fn deviations_are_measured_from_the_mean() {
        assert_eq!(
            mean_deviations(&[150, 200, 150, 200]).unwrap(),
            vec![-25, 25, -25, 25]
        );
        assert!(mean_deviations(&[]).unwrap().is_empty());
    }

    #[test]
    fn accumulator_holds_previous_score_over_elapsed_time() {
        assert_eq!(accumulate_score(0, 0, 0, 1_000).unwrap(), 0);
        assert_eq!(accumulate_score(500, 86, 100, 110).unwrap(), 500 + 860);
        // clock did not advance
        assert_eq!(accumulate_score(500, 86, 110, 100).unwrap(), 500);
    }

    #[test]
    fn windowed_average_recovers_constant_score() {
        let a = accumulate_score(0, 90, 0, 100).unwrap();
        let b = accumulate_score(a, 90, 100, 400).unwrap();
        assert_eq!(time_weighted_average(a, 100, b, 400).unwrap(), 90);
        assert!(time_weighted_average(b, 400, a, 100).is_err());
        assert!(time_weighted_average(a, 100, a, 100).is_err());
    }

    quickcheck! {
        fn score_is_bounded(values: Vec<u64>) -> bool {
            let values: Vec<u128> = values.into_iter().map(u128::from).collect();
            equilibrium_score(&values).map(|s| s <= MAX_SCORE).unwrap_or(false)
        }

        fn equal_values_always_score_100(value: u64, n: u8) -> bool {
            let values = vec![value as u128; (n % 16) as usize + 1];
            equilibrium_score(&values).unwrap() == MAX_SCORE
        }
    }
}
