use crate::error::ErrorCode;
use crate::math;
use crate::states::{Observation, PoolSample};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Core Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// Capacity of the pair → farm registry.
pub const MAX_FARMS: usize = 32;

/// Capacity of the active group sampled on every `update`.
pub const MAX_ACTIVE_FARMS: usize = 8;

/// Registry entry mapping a pair identifier to the farm staking it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FarmRecord {
    pub pair: Pubkey,
    pub farm: Pubkey,
}

/// Named leading slots of the active group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSlot {
    A,
    B,
    C,
}

impl ActiveSlot {
    pub fn index(self) -> usize {
        match self {
            ActiveSlot::A => 0,
            ActiveSlot::B => 1,
            ActiveSlot::C => 2,
        }
    }
}

/// Aggregator state, derived from `CORE_SEED + creator`.
///
/// Owns the farm registry (ordered by registration), the active group it
/// samples, and the cumulative score accumulator. Observations live in their
/// own accounts, indexed by `observation_count`.
#[account]
#[derive(Default, Debug)]
pub struct Core {
    /// PDA bump for this account.
    pub bump: u8,

    /// Authorized to deploy farms, set the active group and update config.
    pub admin: Pubkey,

    /// Price feeds published by anyone else are treated as unpriced.
    pub oracle_authority: Pubkey,

    /// If `false`, only `admin` may call `update`.
    pub permissionless_update: bool,

    /// Registered farms in registration order.
    pub farms: Vec<FarmRecord>,

    /// Farms sampled by `update`, in slot order.
    pub active_farms: Vec<Pubkey>,

    /// Number of observations appended so far.
    pub observation_count: u64,

    /// Score of the latest observation.
    pub last_score: u8,

    /// Timestamp of the latest observation.
    pub last_update_time: u64,

    /// Time integral of the score series.
    pub accumulated_score: u128,
}

impl Core {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: admin, oracle authority
    /// - 1: permissionless flag
    /// - 4 + 64 * MAX_FARMS: registry
    /// - 4 + 32 * MAX_ACTIVE_FARMS: active group
    /// - 8 * 2 + 1: observation count, last update time, last score
    /// - 16: accumulator
    pub const LEN: usize =
        8 + 1 + 32 * 2 + 1 + (4 + 64 * MAX_FARMS) + (4 + 32 * MAX_ACTIVE_FARMS) + 8 * 2 + 1 + 16;

    pub fn farm_by_pair(&self, pair: &Pubkey) -> Option<Pubkey> {
        self.farms
            .iter()
            .find(|record| record.pair == *pair)
            .map(|record| record.farm)
    }

    pub fn farm_at(&self, index: usize) -> Option<Pubkey> {
        self.farms.get(index).map(|record| record.farm)
    }

    pub fn active_farm(&self, slot: ActiveSlot) -> Option<Pubkey> {
        self.active_farms.get(slot.index()).copied()
    }

    pub fn is_registered(&self, farm: &Pubkey) -> bool {
        self.farms.iter().any(|record| record.farm == *farm)
    }

    /// Append `farm` under `pair`. Returns `false` if it was already there.
    pub fn register(&mut self, pair: Pubkey, farm: Pubkey) -> Result<bool> {
        if let Some(existing) = self.farm_by_pair(&pair) {
            require_keys_eq!(existing, farm, ErrorCode::PairAlreadyRegistered);
            return Ok(false);
        }
        require!(self.farms.len() < MAX_FARMS, ErrorCode::RegistryFull);
        self.farms.push(FarmRecord { pair, farm });
        Ok(true)
    }

    /// Replace the active group, registering any farm not yet known.
    /// Returns the records that were newly registered.
    pub fn set_active(&mut self, records: &[FarmRecord]) -> Result<Vec<FarmRecord>> {
        require!(!records.is_empty(), ErrorCode::NoActiveFarms);
        require!(
            records.len() <= MAX_ACTIVE_FARMS,
            ErrorCode::TooManyActiveFarms
        );
        for (i, record) in records.iter().enumerate() {
            require!(
                records[..i].iter().all(|other| other.farm != record.farm),
                ErrorCode::InvalidActiveFarm
            );
        }
        let mut registered = Vec::new();
        for record in records {
            if self.register(record.pair, record.farm)? {
                registered.push(*record);
            }
        }
        self.active_farms = records.iter().map(|record| record.farm).collect();
        Ok(registered)
    }

    /// Score the sampled group, advance the accumulator and build the next
    /// observation.
    ///
    /// `samples` carry `value` and `priced`; deltas are filled in here. Only
    /// priced samples take part in the score. The accumulator holds the
    /// previous score over the time since the previous observation; the very
    /// first observation contributes nothing.
    pub fn record_observation(
        &mut self,
        mut samples: Vec<PoolSample>,
        now: u64,
    ) -> Result<Observation> {
        let priced: Vec<u128> = samples
            .iter()
            .filter(|sample| sample.priced)
            .map(|sample| sample.value)
            .collect();
        let score = math::equilibrium_score(&priced)?;
        let mut deltas = math::mean_deviations(&priced)?.into_iter();
        for sample in samples.iter_mut() {
            sample.delta = if sample.priced {
                deltas.next().ok_or(ErrorCode::MathOverflow)?
            } else {
                sample.value = 0;
                0
            };
        }
        let total_value = priced.iter().try_fold(0u128, |acc, v| {
            acc.checked_add(*v).ok_or(ErrorCode::MathOverflow)
        })?;

        if self.observation_count > 0 {
            self.accumulated_score = math::accumulate_score(
                self.accumulated_score,
                self.last_score,
                self.last_update_time,
                now,
            )?;
        }
        let index = self.observation_count;
        self.observation_count = index.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        self.last_score = score;
        self.last_update_time = std::cmp::max(self.last_update_time, now);

        Ok(Observation {
            bump: 0,
            core: Pubkey::default(),
            index,
            timestamp: self.last_update_time,
            score,
            accumulated_score: self.accumulated_score,
            total_value,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000;

    fn record() -> FarmRecord {
        FarmRecord {
            pair: Pubkey::new_unique(),
            farm: Pubkey::new_unique(),
        }
    }

    fn priced(values: &[u128]) -> Vec<PoolSample> {
        values
            .iter()
            .map(|value| PoolSample {
                farm: Pubkey::new_unique(),
                value: *value,
                delta: 0,
                priced: true,
            })
            .collect()
    }

    #[test]
    fn registry_preserves_registration_order() {
        let mut core = Core::default();
        let records: Vec<FarmRecord> = (0..3).map(|_| record()).collect();
        for r in &records {
            assert!(core.register(r.pair, r.farm).unwrap());
        }
        for (i, r) in records.iter().enumerate() {
            assert_eq!(core.farm_at(i), Some(r.farm));
            assert_eq!(core.farm_by_pair(&r.pair), Some(r.farm));
        }
        assert_eq!(core.farm_at(3), None);
        assert_eq!(core.farm_by_pair(&Pubkey::new_unique()), None);
    }

    #[test]
    fn pair_cannot_point_at_two_farms() {
        let mut core = Core::default();
        let r = record();
        core.register(r.pair, r.farm).unwrap();
        assert!(!core.register(r.pair, r.farm).unwrap());
        assert!(core.register(r.pair, Pubkey::new_unique()).is_err());
        assert_eq!(core.farms.len(), 1);
    }

    #[test]
    fn registry_is_bounded() {
        let mut core = Core::default();
        for _ in 0..MAX_FARMS {
            let r = record();
            core.register(r.pair, r.farm).unwrap();
        }
        let r = record();
        assert!(core.register(r.pair, r.farm).is_err());
    }

    #[test]
    fn set_active_registers_and_replaces_group() {
        let mut core = Core::default();
        let first: Vec<FarmRecord> = (0..4).map(|_| record()).collect();
        assert_eq!(core.set_active(&first).unwrap().len(), 4);
        assert_eq!(core.active_farm(ActiveSlot::A), Some(first[0].farm));
        assert_eq!(core.active_farm(ActiveSlot::C), Some(first[2].farm));

        let second = vec![first[3], record()];
        assert_eq!(core.set_active(&second).unwrap().len(), 1);
        assert_eq!(core.active_farms, vec![first[3].farm, second[1].farm]);
        assert_eq!(core.active_farm(ActiveSlot::C), None);
        // replaced farms stay registered
        assert!(core.is_registered(&first[0].farm));
        assert_eq!(core.farms.len(), 5);
    }

    #[test]
    fn set_active_rejects_empty_and_oversized_groups() {
        let mut core = Core::default();
        assert!(core.set_active(&[]).is_err());
        let too_many: Vec<FarmRecord> = (0..MAX_ACTIVE_FARMS + 1).map(|_| record()).collect();
        assert!(core.set_active(&too_many).is_err());
        let r = record();
        assert!(core.set_active(&[r, r]).is_err());
        assert!(core.farms.is_empty());
    }

    #[test]
    fn observations_score_the_group_and_integrate_over_time() {
        let mut core = Core::default();

        let first = core
            .record_observation(priced(&[150, 200, 150, 200]), T0)
            .unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.score, 86);
        assert_eq!(first.accumulated_score, 0);
        assert_eq!(first.total_value, 700);
        assert_eq!(
            first.samples.iter().map(|s| s.delta).collect::<Vec<_>>(),
            vec![-25, 25, -25, 25]
        );
        assert_eq!(core.last_score, 86);

        let second = core
            .record_observation(priced(&[150, 200, 100, 200]), T0 + 60)
            .unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.score, 77);
        assert_eq!(second.accumulated_score, 86 * 60);

        let third = core
            .record_observation(priced(&[200, 200, 200, 200]), T0 + 100)
            .unwrap();
        assert_eq!(third.score, 100);
        assert_eq!(third.accumulated_score, 86 * 60 + 77 * 40);
        assert_eq!(core.observation_count, 3);

        let twap = math::time_weighted_average(
            first.accumulated_score,
            first.timestamp,
            third.accumulated_score,
            third.timestamp,
        )
        .unwrap();
        assert_eq!(twap, (86 * 60 + 77 * 40) / 100);
    }

    #[test]
    fn unfunded_group_records_a_full_score() {
        let mut core = Core::default();
        let obs = core.record_observation(priced(&[0, 0, 0, 0]), T0).unwrap();
        assert_eq!(obs.score, 100);
        let obs = core.record_observation(Vec::new(), T0 + 5).unwrap();
        assert_eq!(obs.score, 100);
        assert_eq!(core.accumulated_score, 500);
    }

    #[test]
    fn unpriced_farms_are_left_out_of_the_score() {
        let mut core = Core::default();
        let mut samples = priced(&[200, 200, 200, 9_999]);
        samples[3].priced = false;
        let obs = core.record_observation(samples, T0).unwrap();
        assert_eq!(obs.score, 100);
        assert_eq!(obs.samples[3].value, 0);
        assert_eq!(obs.samples[3].delta, 0);
        assert_eq!(obs.total_value, 600);
    }

    #[test]
    fn accumulator_never_decreases_when_clock_stalls() {
        let mut core = Core::default();
        core.record_observation(priced(&[1, 2]), T0).unwrap();
        let before = core.accumulated_score;
        let obs = core.record_observation(priced(&[2, 2]), T0 - 10).unwrap();
        assert_eq!(obs.accumulated_score, before);
        assert_eq!(obs.timestamp, T0);
        assert_eq!(core.last_update_time, T0);
    }
}
