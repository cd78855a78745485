//! `mint` and `burn`: the two liquidity-event instructions. Both snapshot
//! pre-reserves, settle the protocol fee, compute a share delta with pure
//! integer math, then fall through to the shared `_update`.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::instruction as token_instruction;

use crate::constants::{MINIMUM_LIQUIDITY, POOL_SEED_PREFIX};
use crate::error::PoolError;
use crate::math::isqrt;
use crate::processors::reserves::{apply_mint_fee_outcome, apply_update, compute_mint_fee, current_timestamp, read_fee_to};
use crate::state::{PoolState, ShareAccount};
use crate::utils::pda::find_share_address;
use crate::utils::reentrancy_protection::PoolGuard;
use crate::utils::token_validation::validate_token_account;

/// Liquidity-share quantity minted for a deposit, and whether this was the
/// pool's first mint (which additionally burns `MINIMUM_LIQUIDITY` to the
/// null holder).
pub fn compute_mint_liquidity(
    amount0: u64,
    amount1: u64,
    reserve0: u64,
    reserve1: u64,
    total_supply: u64,
) -> Result<(u64, bool), PoolError> {
    if total_supply == 0 {
        let liquidity = isqrt((amount0 as u128) * (amount1 as u128));
        let liquidity = liquidity
            .checked_sub(MINIMUM_LIQUIDITY as u128)
            .ok_or(PoolError::InsufficientLiquidityMinted)?;
        if liquidity == 0 {
            return Err(PoolError::InsufficientLiquidityMinted);
        }
        Ok((liquidity as u64, true))
    } else {
        let l0 = (amount0 as u128) * (total_supply as u128) / (reserve0 as u128);
        let l1 = (amount1 as u128) * (total_supply as u128) / (reserve1 as u128);
        let liquidity = l0.min(l1);
        if liquidity == 0 {
            return Err(PoolError::InsufficientLiquidityMinted);
        }
        Ok((liquidity as u64, false))
    }
}

/// The two asset quantities returned for burning `liquidity` shares out of
/// `total_supply`, pro rata against the pool's current balances. Integer
/// division truncates; any dust stays in the pool.
pub fn compute_burn_amounts(
    liquidity: u64,
    balance0: u64,
    balance1: u64,
    total_supply: u64,
) -> Result<(u64, u64), PoolError> {
    let out0 = (liquidity as u128) * (balance0 as u128) / (total_supply as u128);
    let out1 = (liquidity as u128) * (balance1 as u128) / (total_supply as u128);
    if out0 == 0 || out1 == 0 {
        return Err(PoolError::InsufficientLiquidityBurned);
    }
    Ok((out0 as u64, out1 as u64))
}

/// Mints liquidity shares for deposits already sitting in the pool's
/// vaults. The caller transfers both assets into `vault0`/`vault1` in an
/// earlier instruction of the same transaction.
pub fn process_mint(program_id: &Pubkey, accounts: &[AccountInfo], to: Pubkey) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let payer = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let vault0_account = next_account_info(account_info_iter)?;
    let vault1_account = next_account_info(account_info_iter)?;
    let factory_account = next_account_info(account_info_iter)?;
    let to_share_account = next_account_info(account_info_iter)?;
    let fee_share_account = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;

    let mut pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;
    let guard = PoolGuard::enter(*pool_account.key, &mut pool)?;
    // Persist the lock before any outbound CPI below (share-account
    // creation, both of which invoke the system program): a reentrant
    // call re-deserializes whatever is currently in `pool_account.data`,
    // so the in-memory flag alone is invisible to it.
    save_pool(pool_account, &pool)?;

    if pool.vault0 != *vault0_account.key || pool.vault1 != *vault1_account.key {
        return Err(PoolError::InvalidAccount("vault mismatch").into());
    }

    let vault0 = validate_token_account(vault0_account, "vault0", Some(pool_account.key), Some(&pool.asset0))?;
    let vault1 = validate_token_account(vault1_account, "vault1", Some(pool_account.key), Some(&pool.asset1))?;

    let (r0, r1) = (pool.reserve0, pool.reserve1);
    let amount0 = vault0.amount.checked_sub(r0).ok_or(ProgramError::ArithmeticOverflow)?;
    let amount1 = vault1.amount.checked_sub(r1).ok_or(ProgramError::ArithmeticOverflow)?;

    let fee_to = read_fee_to(program_id, factory_account)?;
    let fee_on = fee_to != Pubkey::default();
    let outcome = compute_mint_fee(fee_on, r0, r1, pool.k_last, pool.total_supply);

    let mut fee_share = if outcome.mint_amount > 0 {
        let (expected, bump) = find_share_address(program_id, pool_account.key, &fee_to);
        if fee_share_account.key != &expected {
            return Err(PoolError::InvalidAccount("fee share PDA mismatch").into());
        }
        Some(load_or_init_share(
            fee_share_account,
            payer,
            system_program,
            pool_account.key,
            &fee_to,
            bump,
        )?)
    } else {
        None
    };
    apply_mint_fee_outcome(&mut pool, fee_share.as_mut(), &outcome)?;

    let total_supply_before_mint = pool.total_supply;
    let (liquidity, is_first) =
        compute_mint_liquidity(amount0, amount1, r0, r1, total_supply_before_mint)?;

    let (expected_to_share, to_bump) = find_share_address(program_id, pool_account.key, &to);
    if to_share_account.key != &expected_to_share {
        return Err(PoolError::InvalidAccount("recipient share PDA mismatch").into());
    }
    let mut to_share = load_or_init_share(to_share_account, payer, system_program, pool_account.key, &to, to_bump)?;

    if is_first {
        pool.total_supply = pool
            .total_supply
            .checked_add(MINIMUM_LIQUIDITY)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        msg!("Transfer from=0 to=0 value={}", MINIMUM_LIQUIDITY);
    }
    pool.total_supply = pool
        .total_supply
        .checked_add(liquidity)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    to_share.balance = to_share
        .balance
        .checked_add(liquidity)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    let now = current_timestamp()?;
    apply_update(&mut pool, vault0.amount, vault1.amount, now);
    if fee_on {
        pool.k_last = (pool.reserve0 as u128) * (pool.reserve1 as u128);
    }

    save_share(to_share_account, &to_share)?;
    if let Some(share) = &fee_share {
        save_share(fee_share_account, share)?;
    }
    guard.exit(&mut pool);
    save_pool(pool_account, &pool)?;

    msg!(
        "Mint sender={} amount0={} amount1={} liquidity={} to={}",
        payer.key,
        amount0,
        amount1,
        liquidity,
        to
    );
    Ok(())
}

/// Burns the liquidity shares already sitting in the pool's own
/// `ShareAccount` and pays out both assets to `to`.
pub fn process_burn(program_id: &Pubkey, accounts: &[AccountInfo], to: Pubkey) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let payer = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let vault0_account = next_account_info(account_info_iter)?;
    let vault1_account = next_account_info(account_info_iter)?;
    let pool_share_account = next_account_info(account_info_iter)?;
    let to_asset0_account = next_account_info(account_info_iter)?;
    let to_asset1_account = next_account_info(account_info_iter)?;
    let factory_account = next_account_info(account_info_iter)?;
    let fee_share_account = next_account_info(account_info_iter)?;
    let token_program = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;

    let mut pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;
    let guard = PoolGuard::enter(*pool_account.key, &mut pool)?;
    // Persist the lock before any outbound CPI below (fee-share creation,
    // then the asset payouts), so a reentrant call sees it in the
    // account's actual bytes rather than just this call's in-memory copy.
    save_pool(pool_account, &pool)?;

    if pool.vault0 != *vault0_account.key || pool.vault1 != *vault1_account.key {
        return Err(PoolError::InvalidAccount("vault mismatch").into());
    }

    let vault0 = validate_token_account(vault0_account, "vault0", Some(pool_account.key), Some(&pool.asset0))?;
    let vault1 = validate_token_account(vault1_account, "vault1", Some(pool_account.key), Some(&pool.asset1))?;

    let (expected_pool_share, _) = find_share_address(program_id, pool_account.key, pool_account.key);
    if pool_share_account.key != &expected_pool_share {
        return Err(PoolError::InvalidAccount("pool share PDA mismatch").into());
    }
    let mut pool_share = ShareAccount::deserialize(&mut &pool_share_account.data.borrow()[..])?;
    let liquidity = pool_share.balance;

    let (r0, r1) = (pool.reserve0, pool.reserve1);
    let fee_to = read_fee_to(program_id, factory_account)?;
    let fee_on = fee_to != Pubkey::default();
    let outcome = compute_mint_fee(fee_on, r0, r1, pool.k_last, pool.total_supply);

    let mut fee_share = if outcome.mint_amount > 0 {
        let (expected, bump) = find_share_address(program_id, pool_account.key, &fee_to);
        if fee_share_account.key != &expected {
            return Err(PoolError::InvalidAccount("fee share PDA mismatch").into());
        }
        Some(load_or_init_share(
            fee_share_account,
            payer,
            system_program,
            pool_account.key,
            &fee_to,
            bump,
        )?)
    } else {
        None
    };
    apply_mint_fee_outcome(&mut pool, fee_share.as_mut(), &outcome)?;

    let (out0, out1) =
        compute_burn_amounts(liquidity, vault0.amount, vault1.amount, pool.total_supply)?;

    pool_share.balance = 0;
    pool.total_supply = pool
        .total_supply
        .checked_sub(liquidity)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    let seeds: &[&[u8]] = &[
        POOL_SEED_PREFIX,
        pool.asset0.as_ref(),
        pool.asset1.as_ref(),
        &[pool.bump_seed],
    ];
    invoke_signed(
        &token_instruction::transfer(token_program.key, vault0_account.key, to_asset0_account.key, pool_account.key, &[], out0)?,
        &[vault0_account.clone(), to_asset0_account.clone(), pool_account.clone(), token_program.clone()],
        &[seeds],
    )?;
    invoke_signed(
        &token_instruction::transfer(token_program.key, vault1_account.key, to_asset1_account.key, pool_account.key, &[], out1)?,
        &[vault1_account.clone(), to_asset1_account.clone(), pool_account.clone(), token_program.clone()],
        &[seeds],
    )?;

    let vault0_after = spl_token::state::Account::unpack_from_slice(&vault0_account.data.borrow())
        .map_err(|_| PoolError::InvalidAccount("vault0 reread"))?;
    let vault1_after = spl_token::state::Account::unpack_from_slice(&vault1_account.data.borrow())
        .map_err(|_| PoolError::InvalidAccount("vault1 reread"))?;

    let now = current_timestamp()?;
    apply_update(&mut pool, vault0_after.amount, vault1_after.amount, now);
    if fee_on {
        pool.k_last = (pool.reserve0 as u128) * (pool.reserve1 as u128);
    }

    save_share(pool_share_account, &pool_share)?;
    if let Some(share) = &fee_share {
        save_share(fee_share_account, share)?;
    }
    guard.exit(&mut pool);
    save_pool(pool_account, &pool)?;

    msg!(
        "Burn sender={} amount0={} amount1={} liquidity={} to={}",
        payer.key,
        out0,
        out1,
        liquidity,
        to
    );
    Ok(())
}

pub(crate) fn load_or_init_share<'a>(
    account: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    pool: &Pubkey,
    owner: &Pubkey,
    bump: u8,
) -> Result<ShareAccount, ProgramError> {
    if account.data_is_empty() {
        let rent = solana_program::sysvar::rent::Rent::get()?;
        let seeds: &[&[u8]] = &[crate::constants::SHARE_SEED_PREFIX, pool.as_ref(), owner.as_ref(), &[bump]];
        solana_program::program::invoke_signed(
            &solana_program::system_instruction::create_account(
                payer.key,
                account.key,
                rent.minimum_balance(ShareAccount::LEN),
                ShareAccount::LEN as u64,
                &crate::id(),
            ),
            &[payer.clone(), account.clone(), system_program.clone()],
            &[seeds],
        )?;
        Ok(ShareAccount::new(*pool, *owner, bump))
    } else {
        Ok(ShareAccount::deserialize(&mut &account.data.borrow()[..])?)
    }
}

pub(crate) fn save_share(account: &AccountInfo, share: &ShareAccount) -> ProgramResult {
    let mut data = Vec::new();
    share.serialize(&mut data)?;
    account.data.borrow_mut()[..data.len()].copy_from_slice(&data);
    Ok(())
}

pub(crate) fn save_pool(account: &AccountInfo, pool: &PoolState) -> ProgramResult {
    let mut data = Vec::new();
    pool.serialize(&mut data)?;
    account.data.borrow_mut()[..data.len()].copy_from_slice(&data);
    Ok(())
}
