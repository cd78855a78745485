//! Non-mutating introspection instructions: a thin read, logged via
//! `msg!`, returning `Ok(())` without touching state.

use borsh::BorshDeserialize;
use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::error::PoolError;
use crate::state::{FactoryState, PoolState};
use crate::utils::pda::{canonical_pair, find_pool_address};

/// Logs the requested pool's full state, for off-chain introspection.
pub fn get_pool_state(accounts: &[AccountInfo]) -> ProgramResult {
    let pool_account = accounts.first().ok_or(PoolError::InvalidAccount("missing pool account"))?;
    let pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;
    msg!(
        "Pool asset0={} asset1={} reserve0={} reserve1={} total_supply={} k_last={} locked={}",
        pool.asset0,
        pool.asset1,
        pool.reserve0,
        pool.reserve1,
        pool.total_supply,
        pool.k_last,
        pool.locked
    );
    Ok(())
}

/// Logs the factory's fee configuration and pair count.
pub fn get_factory_state(accounts: &[AccountInfo]) -> ProgramResult {
    let factory_account = accounts.first().ok_or(PoolError::InvalidAccount("missing factory account"))?;
    let factory = FactoryState::deserialize(&mut &factory_account.data.borrow()[..])?;
    msg!(
        "Factory fee_to={} fee_to_setter={} pair_count={}",
        factory.fee_to,
        factory.fee_to_setter,
        factory.pair_count
    );
    Ok(())
}

/// Logs the PDA that would be derived for a given (unordered) asset pair,
/// without requiring the pool to already exist.
pub fn get_pair_address(program_id: &Pubkey, asset_a: Pubkey, asset_b: Pubkey) -> ProgramResult {
    let (asset0, asset1) = canonical_pair(asset_a, asset_b).ok_or(PoolError::IdenticalAddresses)?;
    let (pool, _) = find_pool_address(program_id, &asset0, &asset1);
    msg!("PairAddress asset0={} asset1={} pool={}", asset0, asset1, pool);
    Ok(())
}
