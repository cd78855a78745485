//! PDA derivation helpers. Every piece of durable state in this program is
//! addressed by one of these derivations; a pool's very identity is a
//! deterministic function of `(factory, canonical pair)`, so two callers
//! requesting the same unordered pair always land on the same pool.

use solana_program::pubkey::Pubkey;

use crate::constants::{
    ALLOWANCE_SEED_PREFIX, FACTORY_SEED, POOL_SEED_PREFIX, SHARE_SEED_PREFIX, VAULT_SEED_PREFIX,
};

/// Canonicalize an unordered asset pair so `asset0 < asset1`. Returns
/// `None` when the two handles are equal (the caller maps that to
/// `IDENTICAL_ADDRESSES`).
pub fn canonical_pair(a: Pubkey, b: Pubkey) -> Option<(Pubkey, Pubkey)> {
    if a == b {
        None
    } else if a < b {
        Some((a, b))
    } else {
        Some((b, a))
    }
}

pub fn find_factory_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FACTORY_SEED], program_id)
}

/// `asset0`/`asset1` must already be in canonical order; callers derive
/// via `canonical_pair` first.
pub fn find_pool_address(program_id: &Pubkey, asset0: &Pubkey, asset1: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POOL_SEED_PREFIX, asset0.as_ref(), asset1.as_ref()],
        program_id,
    )
}

pub fn find_vault_address(program_id: &Pubkey, pool: &Pubkey, asset: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED_PREFIX, pool.as_ref(), asset.as_ref()],
        program_id,
    )
}

pub fn find_share_address(program_id: &Pubkey, pool: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[SHARE_SEED_PREFIX, pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

pub fn find_allowance_address(
    program_id: &Pubkey,
    pool: &Pubkey,
    owner: &Pubkey,
    spender: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            ALLOWANCE_SEED_PREFIX,
            pool.as_ref(),
            owner.as_ref(),
            spender.as_ref(),
        ],
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_orders_by_key() {
        let low = Pubkey::new_from_array([1u8; 32]);
        let high = Pubkey::new_from_array([2u8; 32]);
        assert_eq!(canonical_pair(high, low), Some((low, high)));
        assert_eq!(canonical_pair(low, high), Some((low, high)));
    }

    #[test]
    fn canonical_pair_rejects_identical_handles() {
        let a = Pubkey::new_unique();
        assert_eq!(canonical_pair(a, a), None);
    }

    #[test]
    fn pool_address_is_deterministic_in_either_caller_order() {
        let program_id = Pubkey::new_unique();
        let a = Pubkey::new_from_array([1u8; 32]);
        let b = Pubkey::new_from_array([2u8; 32]);
        let (asset0, asset1) = canonical_pair(a, b).unwrap();
        let (asset0_rev, asset1_rev) = canonical_pair(b, a).unwrap();
        assert_eq!((asset0, asset1), (asset0_rev, asset1_rev));
        let pool_a = find_pool_address(&program_id, &asset0, &asset1);
        let pool_b = find_pool_address(&program_id, &asset0_rev, &asset1_rev);
        assert_eq!(pool_a, pool_b);
    }
}
