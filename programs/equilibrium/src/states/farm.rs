use crate::error::ErrorCode;
use crate::math;
use crate::states::StakeAccount;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Farm Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// Stores the reward-accrual state of one staking farm.
///
/// Stake tokens sit in `stake_vault`, emission is paid from `reward_vault`;
/// both are token accounts owned by the farm authority PDA
/// (`FARM_AUTH_SEED + farm`). Rewards are distributed lazily: every entry point
/// settles the global `reward_per_token_stored` index first, and each
/// [`StakeAccount`] books its share from the index delta since its last
/// interaction.
#[account]
#[derive(Default, Debug)]
pub struct Farm {
    /// PDA bump when the farm was created through `deploy` (0 otherwise).
    pub bump: u8,

    /// Bump of the farm authority PDA that owns both vaults.
    pub authority_bump: u8,

    /// Account allowed to notify new epochs.
    pub admin: Pubkey,

    /// Core that deployed this farm, `Pubkey::default()` for standalone farms.
    pub core: Pubkey,

    /// Identifier of the liquidity pair this farm stakes.
    pub pair: Pubkey,

    /// First token of the pair.
    pub token_a: Pubkey,

    /// Second token of the pair.
    pub token_b: Pubkey,

    /// Mint of the staked token.
    pub stake_mint: Pubkey,

    /// Mint of the emitted reward token.
    pub reward_mint: Pubkey,

    /// Custody of all deposits.
    pub stake_vault: Pubkey,

    /// Reserve that pays out rewards.
    pub reward_vault: Pubkey,

    /// Sum of every stake account balance.
    pub total_supply: u64,

    /// Reward units emitted per second during the current epoch.
    pub reward_rate: u64,

    /// Global reward index, scaled by `PRECISION`.
    pub reward_per_token_stored: u128,

    /// Timestamp the index was last settled to.
    pub last_update_time: u64,

    /// Timestamp the current emission ends.
    pub epoch_finish: u64,

    /// Length of every emission period, in seconds.
    pub epoch_duration: u64,

    /// Sum of every notified reward amount.
    pub total_notified: u64,

    /// Sum of every reward paid out.
    pub total_paid: u64,

    /// Number of stake accounts ever opened.
    pub depositor_count: u64,
}

/// Static description of a farm supplied at creation.
pub struct FarmParams {
    pub admin: Pubkey,
    pub core: Pubkey,
    pub pair: Pubkey,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub reward_vault: Pubkey,
    pub epoch_duration: u64,
}

impl Farm {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1 + 1: bumps
    /// - 32 * 9: nine Pubkeys
    /// - 8 * 8: eight `u64` fields
    /// - 16: one `u128` field
    pub const LEN: usize = 8 + 1 + 1 + 32 * 9 + 8 * 8 + 16;

    pub fn init(&mut self, params: FarmParams, bump: u8, authority_bump: u8) -> Result<()> {
        require_gt!(params.epoch_duration, 0, ErrorCode::InvalidEpochDuration);
        self.bump = bump;
        self.authority_bump = authority_bump;
        self.admin = params.admin;
        self.core = params.core;
        self.pair = params.pair;
        self.token_a = params.token_a;
        self.token_b = params.token_b;
        self.stake_mint = params.stake_mint;
        self.reward_mint = params.reward_mint;
        self.stake_vault = params.stake_vault;
        self.reward_vault = params.reward_vault;
        self.epoch_duration = params.epoch_duration;
        Ok(())
    }

    /// Locked stake the core samples for scoring.
    pub fn total_value_locked(&self) -> u64 {
        self.total_supply
    }

    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        math::last_time_reward_applicable(now, self.epoch_finish)
    }

    pub fn reward_per_token(&self, now: u64) -> Result<u128> {
        math::reward_per_token(
            self.reward_per_token_stored,
            self.total_supply,
            self.reward_rate,
            self.last_update_time,
            self.last_time_reward_applicable(now),
        )
    }

    /// Rewards claimable by `stake` at `now`, without touching state.
    pub fn earned(&self, stake: &StakeAccount, now: u64) -> Result<u64> {
        math::earned(
            stake.balance,
            self.reward_per_token(now)?,
            stake.reward_per_token_paid,
            stake.rewards_accrued,
        )
    }

    /// Bring the global index up to `now`.
    pub fn settle(&mut self, now: u64) -> Result<()> {
        self.reward_per_token_stored = self.reward_per_token(now)?;
        self.last_update_time =
            std::cmp::max(self.last_update_time, self.last_time_reward_applicable(now));
        Ok(())
    }

    /// Settle the global index, then book `stake`'s accrual against it.
    pub fn settle_account(&mut self, stake: &mut StakeAccount, now: u64) -> Result<()> {
        self.settle(now)?;
        stake.rewards_accrued = math::earned(
            stake.balance,
            self.reward_per_token_stored,
            stake.reward_per_token_paid,
            stake.rewards_accrued,
        )?;
        stake.reward_per_token_paid = self.reward_per_token_stored;
        Ok(())
    }

    pub fn stake(&mut self, stake: &mut StakeAccount, amount: u64, now: u64) -> Result<()> {
        require_gt!(amount, 0, ErrorCode::ZeroAmount);
        self.settle_account(stake, now)?;
        stake.balance = stake
            .balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn unstake(&mut self, stake: &mut StakeAccount, amount: u64, now: u64) -> Result<()> {
        require_gt!(amount, 0, ErrorCode::ZeroAmount);
        require_gte!(stake.balance, amount, ErrorCode::InsufficientStake);
        self.settle_account(stake, now)?;
        stake.balance -= amount;
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Settle `stake` and hand back everything it accrued, zeroing the claim.
    /// Returns 0 when there is nothing to pay.
    pub fn take_reward(&mut self, stake: &mut StakeAccount, now: u64) -> Result<u64> {
        self.settle_account(stake, now)?;
        let reward = stake.rewards_accrued;
        if reward == 0 {
            return Ok(0);
        }
        stake.rewards_accrued = 0;
        stake.total_claimed = stake
            .total_claimed
            .checked_add(reward)
            .ok_or(ErrorCode::MathOverflow)?;
        self.total_paid = self
            .total_paid
            .checked_add(reward)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(reward)
    }

    /// Rewards already owed to stakers but not yet paid out, given the
    /// `leftover` the running epoch has not released yet.
    pub fn outstanding_reward(&self, leftover: u64) -> u64 {
        self.total_notified
            .saturating_sub(self.total_paid)
            .saturating_sub(leftover)
    }

    /// Start a new emission period of `reward_amount` beginning at
    /// `max(start_time, now)`.
    ///
    /// Reward the running (or still pending) epoch has not released is folded
    /// into the new rate. `reward_reserve`, the reward vault balance, must
    /// cover the full new emission `rate * epoch_duration` on top of what is
    /// already owed and unclaimed. Returns the new rate.
    pub fn start_epoch(
        &mut self,
        reward_amount: u64,
        start_time: u64,
        now: u64,
        reward_reserve: u64,
    ) -> Result<u64> {
        self.settle(now)?;

        // a deferred epoch releases nothing before its start
        let from = std::cmp::max(now, self.last_update_time);
        let leftover = math::undistributed_reward(from, self.epoch_finish, self.reward_rate)?;
        let rate = math::next_reward_rate(reward_amount, leftover, self.epoch_duration)?;
        require_gt!(rate, 0, ErrorCode::ZeroAmount);

        let required = rate
            .checked_mul(self.epoch_duration)
            .and_then(|promised| promised.checked_add(self.outstanding_reward(leftover)))
            .ok_or(ErrorCode::MathOverflow)?;
        require_gte!(reward_reserve, required, ErrorCode::InsufficientRewardReserve);

        let start = std::cmp::max(start_time, now);
        self.reward_rate = rate;
        self.last_update_time = start;
        self.epoch_finish = start
            .checked_add(self.epoch_duration)
            .ok_or(ErrorCode::MathOverflow)?;
        self.total_notified = self
            .total_notified
            .checked_add(reward_amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SIX_HOURS: u64 = 60 * 60 * 6;
    const T0: u64 = 1_700_000_000;

    fn params(epoch_duration: u64) -> FarmParams {
        FarmParams {
            admin: Pubkey::new_unique(),
            core: Pubkey::default(),
            pair: Pubkey::new_unique(),
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            stake_mint: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            stake_vault: Pubkey::new_unique(),
            reward_vault: Pubkey::new_unique(),
            epoch_duration,
        }
    }

    fn farm(epoch_duration: u64) -> Farm {
        let mut farm = Farm::default();
        farm.init(params(epoch_duration), 0, 255).unwrap();
        farm
    }

    fn within(actual: u64, expected: u64, tolerance: u64) -> bool {
        actual.abs_diff(expected) <= tolerance
    }

    #[test]
    fn starts_empty() {
        let farm = farm(SIX_HOURS);
        assert_eq!(farm.total_supply, 0);
        assert_eq!(farm.total_value_locked(), 0);
    }

    #[test]
    fn rejects_zero_epoch_duration() {
        let mut farm = Farm::default();
        assert!(farm.init(params(0), 0, 0).is_err());
    }

    #[test]
    fn late_joiner_gets_a_quarter() {
        let mut farm = farm(SIX_HOURS);
        let mut alice = StakeAccount::default();
        let mut bob = StakeAccount::default();

        farm.start_epoch(1_000_000_000_000, T0, T0, 2_000_000_000_000)
            .unwrap();
        farm.stake(&mut alice, 100, T0).unwrap();
        farm.stake(&mut bob, 100, T0 + SIX_HOURS / 2).unwrap();

        let end = T0 + SIX_HOURS;
        let a = farm.earned(&alice, end).unwrap();
        let b = farm.earned(&bob, end).unwrap();
        assert!(within(a, 750_000_000_000, 1_000_000_000), "alice earned {a}");
        assert!(within(b, 250_000_000_000, 1_000_000_000), "bob earned {b}");

        // the follow-up notification settles but keeps both claims intact
        farm.start_epoch(1_000_000_000_000, end + 1, end, 2_000_000_000_000)
            .unwrap();
        assert_eq!(farm.earned(&alice, end).unwrap(), a);
        assert_eq!(farm.earned(&bob, end).unwrap(), b);
    }

    #[test]
    fn equal_stakes_split_evenly_and_sum_to_emission() {
        let mut farm = farm(SIX_HOURS);
        let mut alice = StakeAccount::default();
        let mut bob = StakeAccount::default();
        farm.stake(&mut alice, 500, T0).unwrap();
        farm.stake(&mut bob, 500, T0).unwrap();
        farm.start_epoch(21_600_000, T0, T0, 21_600_000).unwrap();

        let end = T0 + SIX_HOURS + 1_000;
        let a = farm.earned(&alice, end).unwrap();
        let b = farm.earned(&bob, end).unwrap();
        assert_eq!(a, b);
        assert_eq!(a + b, 21_600_000);
    }

    #[test]
    fn earned_grows_only_while_epoch_runs() {
        let mut farm = farm(SIX_HOURS);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 10, T0).unwrap();
        farm.start_epoch(SIX_HOURS * 10, T0, T0, SIX_HOURS * 10).unwrap();

        let early = farm.earned(&alice, T0 + 10).unwrap();
        assert_eq!(early, farm.earned(&alice, T0 + 10).unwrap());
        let later = farm.earned(&alice, T0 + 20).unwrap();
        assert!(later > early);

        let at_end = farm.earned(&alice, T0 + SIX_HOURS).unwrap();
        assert_eq!(at_end, farm.earned(&alice, T0 + SIX_HOURS * 5).unwrap());
    }

    #[test]
    fn nothing_accrues_with_zero_supply() {
        let mut farm = farm(SIX_HOURS);
        farm.start_epoch(SIX_HOURS, T0, T0, SIX_HOURS).unwrap();
        farm.settle(T0 + 100).unwrap();
        assert_eq!(farm.reward_per_token_stored, 0);
        assert_eq!(farm.last_update_time, T0 + 100);
    }

    #[test]
    fn overlapping_notification_keeps_unvested_reward() {
        let mut farm = farm(SIX_HOURS);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 1, T0).unwrap();

        farm.start_epoch(SIX_HOURS * 1_000, T0, T0, u64::MAX).unwrap();
        let midway = T0 + SIX_HOURS / 2;
        farm.start_epoch(SIX_HOURS * 1_000, midway, midway, u64::MAX)
            .unwrap();
        assert_eq!(farm.reward_rate, 1_500);
        assert_eq!(farm.total_notified, SIX_HOURS * 2_000);

        let paid = farm.earned(&alice, midway + SIX_HOURS).unwrap();
        assert_eq!(paid, SIX_HOURS * 2_000);
    }

    #[test]
    fn notification_beyond_reserve_is_rejected_without_side_effects() {
        let mut farm = farm(SIX_HOURS);
        let err = farm.start_epoch(SIX_HOURS * 10, T0, T0, SIX_HOURS * 10 - 1);
        assert!(err.is_err());
        assert_eq!(farm.reward_rate, 0);
        assert_eq!(farm.epoch_finish, 0);
        assert_eq!(farm.total_notified, 0);
    }

    #[test]
    fn dust_notification_is_rejected() {
        let mut farm = farm(SIX_HOURS);
        assert!(farm.start_epoch(SIX_HOURS - 1, T0, T0, u64::MAX).is_err());
    }

    #[test]
    fn future_start_defers_emission() {
        let mut farm = farm(100);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 1, T0).unwrap();
        farm.start_epoch(1_000, T0 + 50, T0, 1_000).unwrap();
        assert_eq!(farm.epoch_finish, T0 + 150);

        assert_eq!(farm.earned(&alice, T0 + 40).unwrap(), 0);
        farm.settle(T0 + 40).unwrap();
        assert_eq!(farm.last_update_time, T0 + 50);
        assert_eq!(farm.earned(&alice, T0 + 150).unwrap(), 1_000);
    }

    #[test]
    fn deposit_then_withdraw_restores_supply() {
        let mut farm = farm(SIX_HOURS);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 42, T0).unwrap();
        farm.unstake(&mut alice, 42, T0).unwrap();
        assert_eq!(alice.balance, 0);
        assert_eq!(farm.total_supply, 0);
        assert_eq!(alice.rewards_accrued, 0);
    }

    #[test]
    fn input_errors_leave_state_untouched() {
        let mut farm = farm(SIX_HOURS);
        let mut alice = StakeAccount::default();
        assert!(farm.stake(&mut alice, 0, T0).is_err());
        farm.stake(&mut alice, 5, T0).unwrap();
        assert!(farm.unstake(&mut alice, 6, T0).is_err());
        assert!(farm.unstake(&mut alice, 0, T0).is_err());
        assert_eq!(alice.balance, 5);
        assert_eq!(farm.total_supply, 5);
    }

    #[test]
    fn claiming_zeroes_accrual_and_empty_claim_is_a_no_op() {
        let mut farm = farm(100);
        let mut alice = StakeAccount::default();
        assert_eq!(farm.take_reward(&mut alice, T0).unwrap(), 0);

        farm.stake(&mut alice, 10, T0).unwrap();
        farm.start_epoch(1_000, T0, T0, 1_000).unwrap();
        assert_eq!(farm.take_reward(&mut alice, T0 + 100).unwrap(), 1_000);
        assert_eq!(alice.rewards_accrued, 0);
        assert_eq!(alice.total_claimed, 1_000);
        assert_eq!(farm.total_paid, 1_000);
        assert_eq!(farm.take_reward(&mut alice, T0 + 200).unwrap(), 0);
    }

    #[test]
    fn random_interaction_sequences_keep_supply_and_index_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut farm = farm(3_600);
        let mut accounts = vec![StakeAccount::default(); 5];
        let mut now = T0;
        let mut last_index = 0u128;

        for _ in 0..500 {
            now += rng.random_range(0..600);
            let who = rng.random_range(0..accounts.len());
            match rng.random_range(0..4) {
                0 => farm
                    .stake(&mut accounts[who], rng.random_range(1..1_000), now)
                    .unwrap(),
                1 => {
                    let balance = accounts[who].balance;
                    if balance > 0 {
                        let amount = rng.random_range(1..=balance);
                        farm.unstake(&mut accounts[who], amount, now).unwrap();
                    }
                }
                2 => {
                    farm.take_reward(&mut accounts[who], now).unwrap();
                }
                _ => {
                    let start = now + rng.random_range(0..7_200);
                    farm.start_epoch(rng.random_range(3_600..1_000_000), start, now, u64::MAX)
                        .unwrap();
                }
            }

            let supply: u64 = accounts.iter().map(|a| a.balance).sum();
            assert_eq!(supply, farm.total_supply);
            assert!(farm.reward_per_token_stored >= last_index);
            last_index = farm.reward_per_token_stored;

            let owed: u128 = accounts
                .iter()
                .map(|a| farm.earned(a, now).unwrap() as u128)
                .sum();
            assert!(owed + farm.total_paid as u128 <= farm.total_notified as u128);
        }
    }

    #[test]
    fn renotify_before_deferred_start_keeps_pending_reward() {
        let mut farm = farm(100);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 1, T0).unwrap();

        farm.start_epoch(1_000, T0 + 50, T0, u64::MAX).unwrap();
        assert_eq!(farm.last_update_time, T0 + 50);
        // nothing of the pending epoch was released, so all of it carries over
        let rate = farm.start_epoch(1_000, T0, T0, u64::MAX).unwrap();
        assert_eq!(rate, 20);
        assert_eq!(farm.epoch_finish, T0 + 100);
        assert_eq!(farm.total_notified, 2_000);
        assert_eq!(farm.earned(&alice, T0 + 1_000).unwrap(), 2_000);
    }

    #[test]
    fn reserve_must_also_cover_unclaimed_rewards() {
        let mut farm = farm(100);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 1, T0).unwrap();
        farm.start_epoch(1_000, T0, T0, 1_000).unwrap();

        // the first epoch ended with 1_000 owed to alice and still in the vault
        assert!(farm.start_epoch(1_000, T0 + 100, T0 + 100, 1_000).is_err());
        assert_eq!(farm.outstanding_reward(0), 1_000);
        farm.start_epoch(1_000, T0 + 100, T0 + 100, 2_000).unwrap();

        // once paid, only the running epoch and the new one need funding
        assert_eq!(farm.take_reward(&mut alice, T0 + 200).unwrap(), 2_000);
        assert_eq!(farm.outstanding_reward(0), 0);
        farm.start_epoch(1_000, T0 + 200, T0 + 200, 1_000).unwrap();
    }

    #[test]
    fn reserve_counts_the_running_epoch_once() {
        let mut farm = farm(100);
        let mut alice = StakeAccount::default();
        farm.stake(&mut alice, 1, T0).unwrap();
        farm.start_epoch(1_000, T0, T0, 1_000).unwrap();

        // halfway: 500 earned, 500 still to emit and folded into the new rate
        assert!(farm.start_epoch(1_000, T0 + 50, T0 + 50, 1_999).is_err());
        let rate = farm.start_epoch(1_000, T0 + 50, T0 + 50, 2_000).unwrap();
        assert_eq!(rate, 15);
    }

    proptest! {
        #[test]
        fn total_earned_never_exceeds_notified(
            stakes in proptest::collection::vec(1u64..1_000_000, 1..6),
            reward in 3_600u64..1_000_000_000,
            elapsed in 0u64..10_000,
        ) {
            let mut farm = farm(3_600);
            let mut accounts: Vec<StakeAccount> = vec![StakeAccount::default(); stakes.len()];
            for (account, amount) in accounts.iter_mut().zip(&stakes) {
                farm.stake(account, *amount, T0).unwrap();
            }
            farm.start_epoch(reward, T0, T0, u64::MAX).unwrap();

            let owed: u128 = accounts
                .iter()
                .map(|a| farm.earned(a, T0 + elapsed).unwrap() as u128)
                .sum();
            prop_assert!(owed <= reward as u128);
        }

        #[test]
        fn renotify_never_emits_more_than_notified(
            stake in 1u64..1_000_000,
            first in 3_600u64..1_000_000_000,
            second in 3_600u64..1_000_000_000,
            delay in 1u64..7_200,
            renotify_at in 0u64..7_200,
            elapsed in 0u64..20_000,
        ) {
            let mut farm = farm(3_600);
            let mut alice = StakeAccount::default();
            farm.stake(&mut alice, stake, T0).unwrap();
            farm.start_epoch(first, T0 + delay, T0, u64::MAX).unwrap();
            let now = T0 + renotify_at;
            farm.start_epoch(second, now, now, u64::MAX).unwrap();

            let owed = farm.earned(&alice, now + elapsed).unwrap();
            prop_assert!(owed <= first + second);
        }
    }
}
