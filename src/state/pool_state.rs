//! Pool state: one per unordered asset pair, created exactly once by the
//! factory and never destroyed.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::math::uq112x112::{self, U256};

/// A pool's full persisted state, at the PDA derived from
/// `[POOL_SEED_PREFIX, asset0, asset1]`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PoolState {
    /// The factory that created this pool. Immutable after construction.
    pub factory: Pubkey,
    /// Canonical asset handles: `asset0 < asset1`. Immutable.
    pub asset0: Pubkey,
    pub asset1: Pubkey,
    /// SPL token accounts, owned by this pool's PDA, that custody the two
    /// asset reserves.
    pub vault0: Pubkey,
    pub vault1: Pubkey,

    /// Last observed balances, reconciled by `_update` at the end of every
    /// economic operation. Each must stay below `2^112`.
    pub reserve0: u64,
    pub reserve1: u64,
    /// `T mod 2^32` as of the last `_update`.
    pub block_timestamp_last: u32,

    /// Q112.112 cumulative price integrals, stored as little-endian bytes
    /// of an unsigned 256-bit word that is allowed to wrap.
    pub price0_cumulative_last: [u8; 32],
    pub price1_cumulative_last: [u8; 32],

    /// `reserve0 * reserve1` as of the end of the last liquidity event for
    /// which protocol fees were enabled; zero otherwise.
    pub k_last: u128,

    /// Total liquidity-share supply. Shares themselves are tracked in
    /// per-holder `ShareAccount`s (see `state::share_state`).
    pub total_supply: u64,

    /// Reentrancy flag: false = unlocked, true = locked. Guarded by
    /// `utils::reentrancy_protection::PoolGuard` around every
    /// mint/burn/swap/skim/sync.
    pub locked: bool,

    /// Bump seed for this PDA.
    pub bump_seed: u8,
    /// 1-based index assigned at creation time, mirroring the factory's
    /// `allPairs` insertion order for `PairCreated`'s `index` field.
    pub pair_index: u64,

    /// Domain separator for this pool's signed-approval envelope,
    /// computed once at construction from the share-token name, version,
    /// ambient chain id, and this pool's own address (see
    /// `processors::permit`).
    pub domain_separator: [u8; 32],
}

impl PoolState {
    pub const LEN: usize = 32 * 5 // factory, asset0, asset1, vault0, vault1
        + 8 + 8  // reserve0, reserve1
        + 4      // block_timestamp_last
        + 32 + 32 // cumulative prices
        + 16     // k_last
        + 8      // total_supply
        + 1      // locked
        + 1      // bump_seed
        + 8      // pair_index
        + 32;    // domain_separator

    pub fn price0_cumulative_last(&self) -> U256 {
        uq112x112::from_bytes(&self.price0_cumulative_last)
    }

    pub fn set_price0_cumulative_last(&mut self, value: U256) {
        self.price0_cumulative_last = uq112x112::to_bytes(value);
    }

    pub fn price1_cumulative_last(&self) -> U256 {
        uq112x112::from_bytes(&self.price1_cumulative_last)
    }

    pub fn set_price1_cumulative_last(&mut self, value: U256) {
        self.price1_cumulative_last = uq112x112::to_bytes(value);
    }

    /// `totalSupply >= MINIMUM_LIQUIDITY` holds forever once a pool has
    /// ever minted.
    pub fn has_ever_minted(&self) -> bool {
        self.total_supply > 0
    }
}
