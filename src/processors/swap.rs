//! `swap`: the constant-product trade with its optional flash-swap
//! callback. The balance-delta trust model means every input is derived
//! from vault balances observed *after* the optimistic payout and
//! callback, never from a caller-declared amount.

use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::instruction as token_instruction;

use crate::constants::{POOL_SEED_PREFIX, SWAP_FEE_DENOMINATOR, SWAP_FEE_NUMERATOR};
use crate::error::PoolError;
use crate::math::uq112x112::U256;
use crate::processors::liquidity::save_pool;
use crate::processors::reserves::{apply_update, current_timestamp};
use crate::state::PoolState;
use crate::utils::reentrancy_protection::PoolGuard;
use crate::utils::token_validation::validate_token_account;

/// Inputs received, derived purely from the balance delta: `b - (r -
/// out)` when positive, zero otherwise. Fails `INSUFFICIENT_INPUT_AMOUNT`
/// if both sides are zero.
pub fn compute_swap_inputs(
    reserve0: u64,
    reserve1: u64,
    out0: u64,
    out1: u64,
    balance0: u64,
    balance1: u64,
) -> Result<(u64, u64), PoolError> {
    let expected0 = reserve0 - out0;
    let expected1 = reserve1 - out1;
    let in0 = if balance0 > expected0 { balance0 - expected0 } else { 0 };
    let in1 = if balance1 > expected1 { balance1 - expected1 } else { 0 };
    if in0 == 0 && in1 == 0 {
        return Err(PoolError::InsufficientInputAmount);
    }
    Ok((in0, in1))
}

/// The fee-adjusted invariant check: after removing 0.30% of each input,
/// the product of adjusted balances must not fall below the product of
/// pre-trade reserves.
///
/// Adjusted balances can reach ~74 bits (`u64::MAX * 1000`); their product
/// can reach ~148 bits, past what `u128` holds. Carried out in `U256`
/// (the same carrier the price accumulator uses) rather than `u128`, so a
/// legitimately large pool never spuriously overflows this check.
pub fn check_invariant(
    reserve0: u64,
    reserve1: u64,
    balance0: u64,
    balance1: u64,
    in0: u64,
    in1: u64,
) -> Result<(), PoolError> {
    let balance0_adjusted = U256::from(balance0) * U256::from(SWAP_FEE_DENOMINATOR)
        - U256::from(in0) * U256::from(SWAP_FEE_NUMERATOR);
    let balance1_adjusted = U256::from(balance1) * U256::from(SWAP_FEE_DENOMINATOR)
        - U256::from(in1) * U256::from(SWAP_FEE_NUMERATOR);
    let lhs = balance0_adjusted * balance1_adjusted;
    let rhs = U256::from(reserve0)
        * U256::from(reserve1)
        * U256::from(SWAP_FEE_DENOMINATOR)
        * U256::from(SWAP_FEE_DENOMINATOR);
    if lhs < rhs {
        return Err(PoolError::K);
    }
    Ok(())
}

/// Swaps, with an optional flash-swap callback when `data` is non-empty.
pub fn process_swap(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount0_out: u64,
    amount1_out: u64,
    to: Pubkey,
    data: Vec<u8>,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let caller = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let vault0_account = next_account_info(account_info_iter)?;
    let vault1_account = next_account_info(account_info_iter)?;
    let to_account = next_account_info(account_info_iter)?;
    let to_asset0_account = next_account_info(account_info_iter)?;
    let to_asset1_account = next_account_info(account_info_iter)?;
    let token_program = next_account_info(account_info_iter)?;
    let remaining: Vec<&AccountInfo> = account_info_iter.collect();

    if amount0_out == 0 && amount1_out == 0 {
        return Err(PoolError::InsufficientOutputAmount.into());
    }

    let mut pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;
    let guard = PoolGuard::enter(*pool_account.key, &mut pool)?;
    // Persist the lock before the optimistic payout and the flash-swap
    // callback below, both of which are outbound CPIs that could reenter
    // this program against a fresh deserialize of `pool_account.data`.
    save_pool(pool_account, &pool)?;

    if pool.vault0 != *vault0_account.key || pool.vault1 != *vault1_account.key {
        return Err(PoolError::InvalidAccount("vault mismatch").into());
    }
    let (r0, r1) = (pool.reserve0, pool.reserve1);
    if amount0_out >= r0 || amount1_out >= r1 {
        return Err(PoolError::InsufficientLiquidity.into());
    }
    if to == pool.asset0 || to == pool.asset1 {
        return Err(PoolError::InvalidTo.into());
    }
    if *to_account.key != to {
        return Err(PoolError::InvalidAccount("to account mismatch").into());
    }

    validate_token_account(vault0_account, "vault0", Some(pool_account.key), Some(&pool.asset0))?;
    validate_token_account(vault1_account, "vault1", Some(pool_account.key), Some(&pool.asset1))?;

    let seeds: &[&[u8]] = &[
        POOL_SEED_PREFIX,
        pool.asset0.as_ref(),
        pool.asset1.as_ref(),
        &[pool.bump_seed],
    ];

    // Step 4: optimistic payout, before any input is observed.
    if amount0_out > 0 {
        invoke_signed(
            &token_instruction::transfer(token_program.key, vault0_account.key, to_asset0_account.key, pool_account.key, &[], amount0_out)?,
            &[vault0_account.clone(), to_asset0_account.clone(), pool_account.clone(), token_program.clone()],
            &[seeds],
        )?;
    }
    if amount1_out > 0 {
        invoke_signed(
            &token_instruction::transfer(token_program.key, vault1_account.key, to_asset1_account.key, pool_account.key, &[], amount1_out)?,
            &[vault1_account.clone(), to_asset1_account.clone(), pool_account.clone(), token_program.clone()],
            &[seeds],
        )?;
    }

    // Step 5: flash-swap callback, invoked only when the recipient
    // supplied call data. `to_account`'s owner is the callback program;
    // `remaining` accounts are forwarded verbatim.
    if !data.is_empty() {
        let mut callback_data = Vec::with_capacity(8 + 8 + 8 + data.len());
        callback_data.extend_from_slice(caller.key.as_ref());
        callback_data.extend_from_slice(&amount0_out.to_le_bytes());
        callback_data.extend_from_slice(&amount1_out.to_le_bytes());
        callback_data.extend_from_slice(&data);

        let mut account_metas = vec![AccountMeta::new_readonly(*caller.key, false)];
        let mut callback_accounts = vec![caller.clone()];
        for account in &remaining {
            account_metas.push(AccountMeta {
                pubkey: *account.key,
                is_signer: false,
                is_writable: account.is_writable,
            });
            callback_accounts.push((*account).clone());
        }
        invoke(
            &Instruction {
                program_id: *to_account.owner,
                accounts: account_metas,
                data: callback_data,
            },
            &callback_accounts,
        )?;
    }

    // Step 6: balances read only after the callback has had a chance to
    // deliver input.
    let vault0_after = spl_token::state::Account::unpack_from_slice(&vault0_account.data.borrow())
        .map_err(|_| PoolError::InvalidAccount("vault0 reread"))?;
    let vault1_after = spl_token::state::Account::unpack_from_slice(&vault1_account.data.borrow())
        .map_err(|_| PoolError::InvalidAccount("vault1 reread"))?;

    let (in0, in1) = compute_swap_inputs(r0, r1, amount0_out, amount1_out, vault0_after.amount, vault1_after.amount)?;
    check_invariant(r0, r1, vault0_after.amount, vault1_after.amount, in0, in1)?;

    let now = current_timestamp()?;
    apply_update(&mut pool, vault0_after.amount, vault1_after.amount, now);

    guard.exit(&mut pool);
    save_pool(pool_account, &pool)?;

    msg!(
        "Swap sender={} in0={} in1={} out0={} out1={} to={}",
        caller.key,
        in0,
        in1,
        amount0_out,
        amount1_out,
        to
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: u64 = 1_000_000_000_000_000_000;

    #[test]
    fn s2_swap_asset0_to_asset1() {
        // S2: seed (5E, 10E); 1E asset0 in; expected output
        // 1662497915624478906.
        let r0 = 5 * E;
        let r1 = 10 * E;
        let out1 = 1_662_497_915_624_478_906u64;
        let b0 = r0 + E;
        let b1 = r1 - out1;
        let (in0, in1) = compute_swap_inputs(r0, r1, 0, out1, b0, b1).unwrap();
        assert_eq!(in0, E);
        assert_eq!(in1, 0);
        check_invariant(r0, r1, b0, b1, in0, in1).unwrap();
    }

    #[test]
    fn s2_one_more_output_unit_fails_k() {
        let r0 = 5 * E;
        let r1 = 10 * E;
        let out1 = 1_662_497_915_624_478_906u64 + 1;
        let b0 = r0 + E;
        let b1 = r1 - out1;
        let (in0, in1) = compute_swap_inputs(r0, r1, 0, out1, b0, b1).unwrap();
        let err = check_invariant(r0, r1, b0, b1, in0, in1).unwrap_err();
        assert_eq!(err, PoolError::K);
    }

    #[test]
    fn s3_swap_asset1_to_asset0() {
        let r0 = 5 * E;
        let r1 = 10 * E;
        let out0 = 453_305_446_940_074_565u64;
        let b0 = r0 - out0;
        let b1 = r1 + E;
        let (in0, in1) = compute_swap_inputs(r0, r1, out0, 0, b0, b1).unwrap();
        assert_eq!(in1, E);
        assert_eq!(in0, 0);
        check_invariant(r0, r1, b0, b1, in0, in1).unwrap();

        let err = check_invariant(r0, r1, b0 - 1, b1, in0 + 1, in1).unwrap_err();
        assert_eq!(err, PoolError::K);
    }

    #[test]
    fn no_input_delivered_fails_insufficient_input() {
        let r0 = 5 * E;
        let r1 = 10 * E;
        let err = compute_swap_inputs(r0, r1, E, 0, r0 - E, r1).unwrap_err();
        assert_eq!(err, PoolError::InsufficientInputAmount);
    }
}
