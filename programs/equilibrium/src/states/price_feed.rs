use crate::PRICE_FEED_SEED;
use anchor_lang::prelude::*;

/// Value of one base unit of a farm's stake token in the core's comparable
/// unit, scaled by `PRICE_PRECISION`.
///
/// Derived from `PRICE_FEED_SEED + farm + authority`, so every publisher owns
/// its own feed per farm and nobody can occupy another publisher's address.
/// The core only reads the feed of its configured `oracle_authority`.
#[account]
#[derive(Default, Debug)]
pub struct PriceFeed {
    pub bump: u8,
    pub farm: Pubkey,
    pub authority: Pubkey,
    pub price: u64,
    pub publish_time: u64,
}

impl PriceFeed {
    pub const LEN: usize = 8 + 1 + 32 * 2 + 8 * 2;

    /// Feed address `authority` publishes to for `farm`.
    pub fn address(farm: &Pubkey, authority: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[PRICE_FEED_SEED.as_bytes(), farm.as_ref(), authority.as_ref()],
            &crate::ID,
        )
        .0
    }

    /// Comparable value of `amount` stake units under this feed.
    pub fn value_of(&self, amount: u64) -> Option<u128> {
        (amount as u128)
            .checked_mul(self.price as u128)?
            .checked_div(crate::PRICE_PRECISION)
    }

    /// Whether the core may value its farm with this feed.
    pub fn is_trusted_by(&self, oracle_authority: &Pubkey) -> bool {
        self.authority == *oracle_authority && self.price > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PRICE_PRECISION;

    #[test]
    fn values_stake_at_feed_price() {
        let feed = PriceFeed {
            price: (PRICE_PRECISION * 3 / 2) as u64,
            ..Default::default()
        };
        assert_eq!(feed.value_of(100), Some(150));
        assert_eq!(feed.value_of(0), Some(0));
    }

    #[test]
    fn each_publisher_gets_its_own_feed_address() {
        let farm = Pubkey::new_unique();
        let oracle = Pubkey::new_unique();
        let squatter = Pubkey::new_unique();

        let trusted = PriceFeed::address(&farm, &oracle);
        assert_eq!(trusted, PriceFeed::address(&farm, &oracle));
        assert_ne!(trusted, PriceFeed::address(&farm, &squatter));
        assert_ne!(trusted, PriceFeed::address(&Pubkey::new_unique(), &oracle));
    }

    #[test]
    fn only_priced_feeds_of_the_oracle_are_trusted() {
        let oracle = Pubkey::new_unique();
        let mut feed = PriceFeed {
            authority: oracle,
            price: 1,
            ..Default::default()
        };
        assert!(feed.is_trusted_by(&oracle));
        assert!(!feed.is_trusted_by(&Pubkey::new_unique()));
        feed.price = 0;
        assert!(!feed.is_trusted_by(&oracle));
    }
}
