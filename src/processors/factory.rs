//! Factory processors: the registry singleton and pool creation.
//!
//! Each PDA is allocated via `system_instruction::create_account` signed
//! with its own seeds, then populated with a Borsh-serialized write in the
//! same instruction — no separate "allocate" instruction is needed since
//! account size here is a compile-time constant.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};
use spl_token::instruction as token_instruction;

use crate::constants::{FACTORY_SEED, POOL_SEED_PREFIX, VAULT_SEED_PREFIX};
use crate::error::PoolError;
use crate::processors::permit::compute_domain_separator;
use crate::state::{FactoryState, PoolState};
use crate::utils::pda::{canonical_pair, find_factory_address, find_pool_address, find_vault_address};

/// Creates the factory singleton. Must run exactly once per deployment
/// before any pair can be created.
pub fn process_initialize_factory(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    fee_to_setter: Pubkey,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let payer = next_account_info(account_info_iter)?;
    let factory_account = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;

    if !payer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected_factory, bump_seed) = find_factory_address(program_id);
    if factory_account.key != &expected_factory {
        return Err(PoolError::InvalidAccount("factory PDA mismatch").into());
    }
    if !factory_account.data_is_empty() {
        return Err(PoolError::InvalidAccount("factory already initialized").into());
    }

    let rent = Rent::get()?;
    let space = FactoryState::LEN;
    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            factory_account.key,
            rent.minimum_balance(space),
            space as u64,
            program_id,
        ),
        &[payer.clone(), factory_account.clone(), system_program.clone()],
        &[&[FACTORY_SEED, &[bump_seed]]],
    )?;

    let factory = FactoryState::new(fee_to_setter, bump_seed);
    let mut data = Vec::new();
    factory.serialize(&mut data)?;
    factory_account.data.borrow_mut()[..data.len()].copy_from_slice(&data);

    msg!("factory initialized, fee_to_setter={}", fee_to_setter);
    Ok(())
}

/// Deterministically creates a new pool for an unordered asset pair.
pub fn process_create_pair(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let payer = next_account_info(account_info_iter)?;
    let factory_account = next_account_info(account_info_iter)?;
    let asset_a = next_account_info(account_info_iter)?;
    let asset_b = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let vault0_account = next_account_info(account_info_iter)?;
    let vault1_account = next_account_info(account_info_iter)?;
    let token_program = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;
    let rent_sysvar = next_account_info(account_info_iter)?;

    if !payer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected_factory, _) = find_factory_address(program_id);
    if factory_account.key != &expected_factory {
        return Err(PoolError::InvalidAccount("factory PDA mismatch").into());
    }
    let mut factory = FactoryState::deserialize(&mut &factory_account.data.borrow()[..])?;

    let (asset0, asset1) =
        canonical_pair(*asset_a.key, *asset_b.key).ok_or(PoolError::IdenticalAddresses)?;
    if asset0 == Pubkey::default() {
        return Err(PoolError::ZeroAddress.into());
    }

    let (expected_pool, pool_bump) = find_pool_address(program_id, &asset0, &asset1);
    if pool_account.key != &expected_pool {
        return Err(PoolError::InvalidAccount("pool PDA mismatch").into());
    }
    if !pool_account.data_is_empty() {
        return Err(PoolError::PairExists.into());
    }

    let (expected_vault0, vault0_bump) = find_vault_address(program_id, &expected_pool, &asset0);
    let (expected_vault1, vault1_bump) = find_vault_address(program_id, &expected_pool, &asset1);
    if vault0_account.key != &expected_vault0 || vault1_account.key != &expected_vault1 {
        return Err(PoolError::InvalidAccount("vault PDA mismatch").into());
    }

    let rent = Rent::from_account_info(rent_sysvar)?;

    let pool_seeds: &[&[u8]] = &[
        POOL_SEED_PREFIX,
        asset0.as_ref(),
        asset1.as_ref(),
        &[pool_bump],
    ];
    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            pool_account.key,
            rent.minimum_balance(PoolState::LEN),
            PoolState::LEN as u64,
            program_id,
        ),
        &[payer.clone(), pool_account.clone(), system_program.clone()],
        &[pool_seeds],
    )?;

    create_vault(
        payer,
        vault0_account,
        asset_a.key == &asset0,
        asset_a,
        asset_b,
        pool_account,
        token_program,
        system_program,
        &rent,
        &[
            VAULT_SEED_PREFIX,
            pool_account.key.as_ref(),
            asset0.as_ref(),
            &[vault0_bump],
        ],
    )?;
    create_vault(
        payer,
        vault1_account,
        asset_a.key != &asset0,
        asset_a,
        asset_b,
        pool_account,
        token_program,
        system_program,
        &rent,
        &[
            VAULT_SEED_PREFIX,
            pool_account.key.as_ref(),
            asset1.as_ref(),
            &[vault1_bump],
        ],
    )?;

    factory.pair_count = factory
        .pair_count
        .checked_add(1)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    let pair_index = factory.pair_count;
    let mut factory_data = Vec::new();
    factory.serialize(&mut factory_data)?;
    factory_account.data.borrow_mut()[..factory_data.len()].copy_from_slice(&factory_data);

    let domain_separator = compute_domain_separator(program_id, &expected_pool);
    let pool = PoolState {
        factory: expected_factory,
        asset0,
        asset1,
        vault0: expected_vault0,
        vault1: expected_vault1,
        reserve0: 0,
        reserve1: 0,
        block_timestamp_last: 0,
        price0_cumulative_last: [0u8; 32],
        price1_cumulative_last: [0u8; 32],
        k_last: 0,
        total_supply: 0,
        locked: false,
        bump_seed: pool_bump,
        pair_index,
        domain_separator,
    };
    let mut pool_data = Vec::new();
    pool.serialize(&mut pool_data)?;
    pool_account.data.borrow_mut()[..pool_data.len()].copy_from_slice(&pool_data);

    msg!(
        "PairCreated asset0={} asset1={} pool={} index={}",
        asset0,
        asset1,
        expected_pool,
        pair_index
    );
    Ok(())
}

/// Allocates and initializes one of the pool's two custody vaults. Picking
/// whichever of `(asset_a, asset_b)` is the target avoids passing a fifth
/// "which mint" argument at each call site.
#[allow(clippy::too_many_arguments)]
fn create_vault<'a>(
    payer: &AccountInfo<'a>,
    vault_account: &AccountInfo<'a>,
    use_asset_a: bool,
    asset_a: &AccountInfo<'a>,
    asset_b: &AccountInfo<'a>,
    pool_account: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    rent: &Rent,
    seeds: &[&[u8]],
) -> ProgramResult {
    let mint_account = if use_asset_a { asset_a } else { asset_b };
    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            vault_account.key,
            rent.minimum_balance(spl_token::state::Account::LEN),
            spl_token::state::Account::LEN as u64,
            token_program.key,
        ),
        &[payer.clone(), vault_account.clone(), system_program.clone()],
        &[seeds],
    )?;
    invoke_signed(
        &token_instruction::initialize_account3(
            token_program.key,
            vault_account.key,
            mint_account.key,
            pool_account.key,
        )?,
        &[vault_account.clone(), mint_account.clone()],
        &[seeds],
    )?;
    Ok(())
}

/// Rotates the protocol-fee recipient. `Pubkey::default()` disables
/// protocol fees.
pub fn process_set_fee_to(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_fee_to: Pubkey,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let caller = next_account_info(account_info_iter)?;
    let factory_account = next_account_info(account_info_iter)?;

    let (expected_factory, _) = find_factory_address(program_id);
    if factory_account.key != &expected_factory {
        return Err(PoolError::InvalidAccount("factory PDA mismatch").into());
    }

    let mut factory = FactoryState::deserialize(&mut &factory_account.data.borrow()[..])?;
    if !caller.is_signer || *caller.key != factory.fee_to_setter {
        return Err(PoolError::Forbidden.into());
    }
    factory.fee_to = new_fee_to;
    let mut data = Vec::new();
    factory.serialize(&mut data)?;
    factory_account.data.borrow_mut()[..data.len()].copy_from_slice(&data);

    msg!("fee_to set to {}", new_fee_to);
    Ok(())
}

/// Rotates the factory administrator.
pub fn process_set_fee_to_setter(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_fee_to_setter: Pubkey,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let caller = next_account_info(account_info_iter)?;
    let factory_account = next_account_info(account_info_iter)?;

    let (expected_factory, _) = find_factory_address(program_id);
    if factory_account.key != &expected_factory {
        return Err(PoolError::InvalidAccount("factory PDA mismatch").into());
    }

    let mut factory = FactoryState::deserialize(&mut &factory_account.data.borrow()[..])?;
    if !caller.is_signer || *caller.key != factory.fee_to_setter {
        return Err(PoolError::Forbidden.into());
    }
    factory.fee_to_setter = new_fee_to_setter;
    let mut data = Vec::new();
    factory.serialize(&mut data)?;
    factory_account.data.borrow_mut()[..data.len()].copy_from_slice(&data);

    msg!("fee_to_setter set to {}", new_fee_to_setter);
    Ok(())
}
