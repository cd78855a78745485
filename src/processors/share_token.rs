//! The pool's own fungible liquidity-share ledger: `approve`, `transfer`,
//! `transferFrom`. Mint/burn of shares live in `liquidity.rs` since
//! they're only ever driven by the pool itself during `mint`/`burn`.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::{rent::Rent, Sysvar},
};

use crate::constants::{ALLOWANCE_SEED_PREFIX, UNLIMITED_ALLOWANCE};
use crate::error::PoolError;
use crate::processors::liquidity::{load_or_init_share, save_share};
use crate::state::{AllowanceAccount, ShareAccount};
use crate::utils::pda::{find_allowance_address, find_share_address};

/// Sets `allowance[owner][spender] = amount` unconditionally, creating the
/// allowance PDA on first use.
pub fn process_approve(program_id: &Pubkey, accounts: &[AccountInfo], spender: Pubkey, amount: u64) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let owner = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let allowance_account = next_account_info(account_info_iter)?;
    let payer = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;

    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected, bump) = find_allowance_address(program_id, pool_account.key, owner.key, &spender);
    if allowance_account.key != &expected {
        return Err(PoolError::InvalidAccount("allowance PDA mismatch").into());
    }

    let mut allowance = if allowance_account.data_is_empty() {
        let rent = Rent::get()?;
        let seeds: &[&[u8]] = &[
            ALLOWANCE_SEED_PREFIX,
            pool_account.key.as_ref(),
            owner.key.as_ref(),
            spender.as_ref(),
            &[bump],
        ];
        invoke_signed(
            &solana_program::system_instruction::create_account(
                payer.key,
                allowance_account.key,
                rent.minimum_balance(AllowanceAccount::LEN),
                AllowanceAccount::LEN as u64,
                &crate::id(),
            ),
            &[payer.clone(), allowance_account.clone(), system_program.clone()],
            &[seeds],
        )?;
        AllowanceAccount::new(*pool_account.key, *owner.key, spender, bump)
    } else {
        AllowanceAccount::deserialize(&mut &allowance_account.data.borrow()[..])?
    };

    allowance.amount = amount;
    let mut data = Vec::new();
    allowance.serialize(&mut data)?;
    allowance_account.data.borrow_mut()[..data.len()].copy_from_slice(&data);

    msg!("Approval owner={} spender={} value={}", owner.key, spender, amount);
    Ok(())
}

/// Standard share transfer: moves `amount` from `from`'s balance to
/// `to`'s.
pub fn process_transfer(program_id: &Pubkey, accounts: &[AccountInfo], to: Pubkey, amount: u64) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let from = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let from_share_account = next_account_info(account_info_iter)?;
    let to_share_account = next_account_info(account_info_iter)?;
    let payer = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;

    if !from.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    apply_transfer(
        program_id,
        pool_account,
        from_share_account,
        to_share_account,
        payer,
        system_program,
        from.key,
        &to,
        amount,
    )?;
    msg!("Transfer from={} to={} value={}", from.key, to, amount);
    Ok(())
}

/// Transfer on behalf of `owner`, consuming `allowance[owner][caller]`
/// unless it equals the unlimited sentinel.
pub fn process_transfer_from(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    owner: Pubkey,
    to: Pubkey,
    amount: u64,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let caller = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let owner_share_account = next_account_info(account_info_iter)?;
    let to_share_account = next_account_info(account_info_iter)?;
    let allowance_account = next_account_info(account_info_iter)?;
    let payer = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;

    if !caller.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected_allowance, _) = find_allowance_address(program_id, pool_account.key, &owner, caller.key);
    if allowance_account.key != &expected_allowance {
        return Err(PoolError::InvalidAccount("allowance PDA mismatch").into());
    }
    let mut allowance = AllowanceAccount::deserialize(&mut &allowance_account.data.borrow()[..])?;
    allowance.consume(amount)?;
    let mut allowance_data = Vec::new();
    allowance.serialize(&mut allowance_data)?;
    allowance_account.data.borrow_mut()[..allowance_data.len()].copy_from_slice(&allowance_data);

    apply_transfer(
        program_id,
        pool_account,
        owner_share_account,
        to_share_account,
        payer,
        system_program,
        &owner,
        &to,
        amount,
    )?;
    msg!("Transfer from={} to={} value={}", owner, to, amount);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_transfer<'a>(
    program_id: &Pubkey,
    pool_account: &AccountInfo<'a>,
    from_share_account: &AccountInfo<'a>,
    to_share_account: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    from: &Pubkey,
    to: &Pubkey,
    amount: u64,
) -> ProgramResult {
    let (expected_from, _) = find_share_address(program_id, pool_account.key, from);
    let (expected_to, to_bump) = find_share_address(program_id, pool_account.key, to);
    if from_share_account.key != &expected_from || to_share_account.key != &expected_to {
        return Err(PoolError::InvalidAccount("share PDA mismatch").into());
    }

    let mut from_share = ShareAccount::deserialize(&mut &from_share_account.data.borrow()[..])?;
    let mut to_share = load_or_init_share(to_share_account, payer, system_program, pool_account.key, to, to_bump)?;

    from_share.balance = from_share
        .balance
        .checked_sub(amount)
        .ok_or(PoolError::InsufficientBalance)?;
    to_share.balance = to_share
        .balance
        .checked_add(amount)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    let mut from_data = Vec::new();
    from_share.serialize(&mut from_data)?;
    from_share_account.data.borrow_mut()[..from_data.len()].copy_from_slice(&from_data);

    save_share(to_share_account, &to_share)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_leaves_unlimited_allowance_untouched() {
        let mut allowance = AllowanceAccount::new(Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique(), 0);
        allowance.amount = UNLIMITED_ALLOWANCE;
        allowance.consume(12345).unwrap();
        assert_eq!(allowance.amount, UNLIMITED_ALLOWANCE);
    }

    #[test]
    fn consume_decrements_finite_allowance_by_exact_amount() {
        let mut allowance = AllowanceAccount::new(Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique(), 0);
        allowance.amount = 1_000;
        allowance.consume(400).unwrap();
        assert_eq!(allowance.amount, 600);
    }
}
