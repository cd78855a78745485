//! Reserve accounting shared by every economic operation: the
//! time-weighted price accumulator (`_update`), the protocol-fee mint
//! (`_mintFee`), and the two operations that exist purely to reconcile
//! reserves against vault balances (`skim`, `sync`).
//!
//! The accumulator and fee-growth math are kept as free functions taking
//! plain integers, isolated the same way the small helpers in
//! `math::isqrt` and `math::uq112x112` are, so they can be unit-tested
//! without a `BanksClient`.

use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    sysvar::{clock::Clock, Sysvar},
};
use spl_token::instruction as token_instruction;

use crate::constants::PROTOCOL_FEE_GROWTH_MULTIPLIER;
use crate::error::PoolError;
use crate::math::{isqrt, uq112x112};
use crate::processors::liquidity::save_pool;
use crate::state::{FactoryState, PoolState, ShareAccount};
use crate::utils::pda::find_factory_address;
use crate::utils::reentrancy_protection::PoolGuard;
use crate::utils::token_validation::validate_token_account;

/// `T mod 2^32`, the ambient wall clock read off the `Clock` sysvar.
pub fn current_timestamp() -> Result<u32, ProgramError> {
    let clock = Clock::get()?;
    Ok((clock.unix_timestamp as u64 % (1u64 << 32)) as u32)
}

/// One side of the price-accumulator update: adds `encode(other)/this *
/// elapsed` to `acc`, wrapping at 2^256 by design — the cumulative price
/// is meant to be differenced between two observations, not read in
/// isolation. A no-op when `elapsed` is zero or `this` is zero (division
/// by a zero reserve is undefined and never reached because the caller
/// only calls this when both pre-reserves are nonzero).
pub fn accumulate_price(acc: uq112x112::U256, other: u64, this: u64, elapsed: u32) -> uq112x112::U256 {
    if elapsed == 0 || this == 0 {
        return acc;
    }
    let price = uq112x112::uq_div(uq112x112::encode(other), this);
    let (delta, _) = price.overflowing_mul(uq112x112::U256::from(elapsed));
    let (result, _) = acc.overflowing_add(delta);
    result
}

/// Pure form of `_update`: given the pool's prior reserves/timestamp (read
/// from `pool` before mutation) and the freshly observed balances `b0,
/// b1`, mutates `pool` to the post-update state. Reserves are modeled as
/// `u64` (an SPL token amount's native width); since `u64::MAX < 2^112`,
/// overflow past the 112-bit reserve bound is unreachable at the type
/// level (see DESIGN.md).
pub fn apply_update(pool: &mut PoolState, b0: u64, b1: u64, now: u32) {
    let elapsed = now.wrapping_sub(pool.block_timestamp_last);
    if elapsed > 0 && pool.reserve0 != 0 && pool.reserve1 != 0 {
        let new_p0 = accumulate_price(
            pool.price0_cumulative_last(),
            pool.reserve1,
            pool.reserve0,
            elapsed,
        );
        pool.set_price0_cumulative_last(new_p0);
        let new_p1 = accumulate_price(
            pool.price1_cumulative_last(),
            pool.reserve0,
            pool.reserve1,
            elapsed,
        );
        pool.set_price1_cumulative_last(new_p1);
    }
    pool.reserve0 = b0;
    pool.reserve1 = b1;
    pool.block_timestamp_last = now;
}

/// Outcome of `_mintFee`: whether protocol fees are currently enabled, and
/// how many shares (if any) should be minted to the factory's fee
/// recipient before the rest of `mint`/`burn` proceeds.
pub struct MintFeeOutcome {
    pub fee_on: bool,
    pub mint_amount: u64,
    /// `true` when `kLast` should be reset to zero (fees just turned off,
    /// or fees are off and `kLast` was already nonzero from a prior
    /// on-period). Any growth accrued since the last mint/burn is
    /// forfeited rather than paid out later.
    pub reset_k_last: bool,
}

/// Pure form of `_mintFee`. `reserve0`/`reserve1` are the pre-operation
/// reserves; `k_last`/`total_supply` are read before this call.
pub fn compute_mint_fee(
    fee_on: bool,
    reserve0: u64,
    reserve1: u64,
    k_last: u128,
    total_supply: u64,
) -> MintFeeOutcome {
    if !fee_on {
        return MintFeeOutcome {
            fee_on: false,
            mint_amount: 0,
            reset_k_last: k_last != 0,
        };
    }
    if k_last == 0 {
        return MintFeeOutcome {
            fee_on: true,
            mint_amount: 0,
            reset_k_last: false,
        };
    }
    let root_k = isqrt((reserve0 as u128) * (reserve1 as u128));
    let root_k_last = isqrt(k_last);
    if root_k <= root_k_last {
        return MintFeeOutcome {
            fee_on: true,
            mint_amount: 0,
            reset_k_last: false,
        };
    }
    let numerator = (total_supply as u128) * (root_k - root_k_last);
    let denominator = PROTOCOL_FEE_GROWTH_MULTIPLIER * root_k + root_k_last;
    let liquidity = numerator / denominator;
    MintFeeOutcome {
        fee_on: true,
        mint_amount: liquidity as u64,
        reset_k_last: false,
    }
}

/// Reads the factory's `fee_to` field without requiring a mutable
/// borrow — every liquidity event calls this once.
pub fn read_fee_to(program_id: &Pubkey, factory_account: &AccountInfo) -> Result<Pubkey, ProgramError> {
    let (expected_factory, _) = find_factory_address(program_id);
    if factory_account.key != &expected_factory {
        return Err(PoolError::InvalidAccount("factory PDA mismatch").into());
    }
    let factory = FactoryState::deserialize(&mut &factory_account.data.borrow()[..])?;
    Ok(factory.fee_to)
}

/// Applies a computed `MintFeeOutcome` against `pool` and, if shares are
/// due, the fee recipient's `ShareAccount`. Does not persist either
/// account; callers serialize afterward alongside their other writes.
pub fn apply_mint_fee_outcome(
    pool: &mut PoolState,
    fee_recipient_share: Option<&mut ShareAccount>,
    outcome: &MintFeeOutcome,
) -> ProgramResult {
    if outcome.reset_k_last {
        pool.k_last = 0;
    }
    if outcome.mint_amount > 0 {
        let share = fee_recipient_share.ok_or(ProgramError::NotEnoughAccountKeys)?;
        share.balance = share
            .balance
            .checked_add(outcome.mint_amount)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        pool.total_supply = pool
            .total_supply
            .checked_add(outcome.mint_amount)
            .ok_or(ProgramError::ArithmeticOverflow)?;
    }
    Ok(())
}

/// Sweeps `balanceOf(vault_i) - reserve_i` of each asset to `to`, without
/// touching the recorded reserves. `to_vault0`/`to_vault1` must both be
/// token accounts owned by `to`.
pub fn process_skim(_program_id: &Pubkey, accounts: &[AccountInfo], to: Pubkey) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let _caller = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let vault0_account = next_account_info(account_info_iter)?;
    let vault1_account = next_account_info(account_info_iter)?;
    let to_vault0 = next_account_info(account_info_iter)?;
    let to_vault1 = next_account_info(account_info_iter)?;
    let token_program = next_account_info(account_info_iter)?;

    let mut pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;
    if pool.vault0 != *vault0_account.key || pool.vault1 != *vault1_account.key {
        return Err(PoolError::InvalidAccount("vault mismatch").into());
    }
    let guard = PoolGuard::enter(*pool_account.key, &mut pool)?;
    // Persist the lock before the token transfers below, both of which
    // are outbound CPIs that could reenter this program.
    save_pool(pool_account, &pool)?;

    let vault0 = validate_token_account(vault0_account, "vault0", None, None)?;
    let vault1 = validate_token_account(vault1_account, "vault1", None, None)?;
    validate_token_account(to_vault0, "to_vault0", Some(&to), None)?;
    validate_token_account(to_vault1, "to_vault1", Some(&to), None)?;
    let excess0 = vault0.amount.saturating_sub(pool.reserve0);
    let excess1 = vault1.amount.saturating_sub(pool.reserve1);

    let seeds: &[&[u8]] = &[
        crate::constants::POOL_SEED_PREFIX,
        pool.asset0.as_ref(),
        pool.asset1.as_ref(),
        &[pool.bump_seed],
    ];

    if excess0 > 0 {
        invoke_signed(
            &token_instruction::transfer(
                token_program.key,
                vault0_account.key,
                to_vault0.key,
                pool_account.key,
                &[],
                excess0,
            )?,
            &[
                vault0_account.clone(),
                to_vault0.clone(),
                pool_account.clone(),
                token_program.clone(),
            ],
            &[seeds],
        )?;
    }
    if excess1 > 0 {
        invoke_signed(
            &token_instruction::transfer(
                token_program.key,
                vault1_account.key,
                to_vault1.key,
                pool_account.key,
                &[],
                excess1,
            )?,
            &[
                vault1_account.clone(),
                to_vault1.clone(),
                pool_account.clone(),
                token_program.clone(),
            ],
            &[seeds],
        )?;
    }

    guard.exit(&mut pool);
    save_pool(pool_account, &pool)?;

    msg!("skim: swept {} asset0, {} asset1 to {}", excess0, excess1, to);
    Ok(())
}

/// Forces `_update` to adopt the vaults' current balances as the new
/// reserves, refreshing the cumulative price accumulators without a
/// trade.
pub fn process_sync(_program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let pool_account = next_account_info(account_info_iter)?;
    let vault0_account = next_account_info(account_info_iter)?;
    let vault1_account = next_account_info(account_info_iter)?;

    let mut pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;
    if pool.vault0 != *vault0_account.key || pool.vault1 != *vault1_account.key {
        return Err(PoolError::InvalidAccount("vault mismatch").into());
    }
    // No CPI happens in this function, but it's guarded anyway so a
    // nested call can't observe reserves mid-update.
    let guard = PoolGuard::enter(*pool_account.key, &mut pool)?;

    let vault0 = spl_token::state::Account::unpack_from_slice(&vault0_account.data.borrow())
        .map_err(|_| PoolError::InvalidAccount("vault0 unpack"))?;
    let vault1 = spl_token::state::Account::unpack_from_slice(&vault1_account.data.borrow())
        .map_err(|_| PoolError::InvalidAccount("vault1 unpack"))?;

    let now = current_timestamp()?;
    apply_update(&mut pool, vault0.amount, vault1.amount, now);

    guard.exit(&mut pool);
    save_pool(pool_account, &pool)?;

    msg!("Sync reserve0={} reserve1={}", pool.reserve0, pool.reserve1);
    Ok(())
}
