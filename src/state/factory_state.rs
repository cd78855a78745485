//! Factory state: the single registry PDA this program deploys.
//!
//! Rather than keep an explicit `pair -> pool` mapping, this factory leans
//! on PDA derivation: a pool's address *is*
//! `find_program_address([POOL_SEED_PREFIX, asset0, asset1], program_id)`,
//! so "does a pool exist" is answered by checking whether that account is
//! already initialized. The factory only needs to remember the fee
//! configuration and an insertion counter for `PairCreated`'s index field.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// The factory's persisted fields. Exactly one of these accounts exists
/// per program deployment, at the PDA derived from `FACTORY_SEED` alone.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct FactoryState {
    /// Recipient of protocol-fee liquidity shares. `Pubkey::default()`
    /// (the null handle) means protocol fees are disabled.
    pub fee_to: Pubkey,
    /// Administrator allowed to rotate `fee_to` and `fee_to_setter`.
    pub fee_to_setter: Pubkey,
    /// Count of pools created so far; doubles as the 1-based index
    /// assigned to the next pool.
    pub pair_count: u64,
    /// Bump seed for this PDA, cached to avoid re-deriving it on every call.
    pub bump_seed: u8,
}

impl FactoryState {
    pub const LEN: usize = 32 // fee_to
        + 32 // fee_to_setter
        + 8  // pair_count
        + 1; // bump_seed

    pub fn new(fee_to_setter: Pubkey, bump_seed: u8) -> Self {
        Self {
            fee_to: Pubkey::default(),
            fee_to_setter,
            pair_count: 0,
            bump_seed,
        }
    }

    /// Protocol fees are enabled exactly when a non-null recipient is set.
    pub fn fee_on(&self) -> bool {
        self.fee_to != Pubkey::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_factory_has_fees_disabled() {
        let factory = FactoryState::new(Pubkey::new_unique(), 255);
        assert!(!factory.fee_on());
        assert_eq!(factory.pair_count, 0);
    }

    #[test]
    fn fee_on_tracks_fee_to() {
        let mut factory = FactoryState::new(Pubkey::new_unique(), 255);
        factory.fee_to = Pubkey::new_unique();
        assert!(factory.fee_on());
        factory.fee_to = Pubkey::default();
        assert!(!factory.fee_on());
    }
}
