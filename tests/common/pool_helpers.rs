//! Instruction-building helpers for the factory/pool lifecycle, grounded
//! on the teacher's `create_pool_new_pattern`-style pattern of deriving
//! every PDA up front and assembling one instruction per call.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};
use solana_program_test::BanksClient;
use solana_sdk::{hash::Hash, signature::Keypair, signer::Signer, transaction::Transaction};

use constant_product_amm::{
    find_allowance_address, find_factory_address, find_pool_address, find_share_address, find_vault_address, id,
    PoolInstruction, PoolState, ShareAccount,
};

use super::TestResult;

/// Reads back a holder's liquidity-share balance, zero if the PDA hasn't
/// been created yet.
pub async fn get_share_balance(banks: &mut BanksClient, pool: &Pubkey, owner: &Pubkey) -> u64 {
    let (share_address, _) = find_share_address(&id(), pool, owner);
    match banks.get_account(share_address).await.unwrap() {
        Some(account) => ShareAccount::deserialize(&mut &account.data[..]).unwrap().balance,
        None => 0,
    }
}

pub async fn get_pool_state(banks: &mut BanksClient, pool: &Pubkey) -> PoolState {
    let account = banks.get_account(*pool).await.unwrap().unwrap();
    PoolState::deserialize(&mut &account.data[..]).unwrap()
}

pub fn factory_address() -> Pubkey {
    find_factory_address(&id()).0
}

pub async fn initialize_factory(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    fee_to_setter: &Pubkey,
) -> TestResult {
    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new(payer.pubkey(), true),
            AccountMeta::new(factory_address(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: PoolInstruction::InitializeFactory {
            fee_to_setter: *fee_to_setter,
        }
        .try_to_vec()
        .unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&payer.pubkey()));
    tx.sign(&[payer], recent_blockhash);
    banks.process_transaction(tx).await
}

/// Creates a pair for `(mint_a, mint_b)` in whatever order they're passed;
/// the processor canonicalizes them. Returns `(asset0, asset1, pool,
/// vault0, vault1)`.
pub async fn create_pair(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    mint_a: &Pubkey,
    mint_b: &Pubkey,
) -> Result<(Pubkey, Pubkey, Pubkey, Pubkey, Pubkey), solana_program_test::BanksClientError> {
    let (asset0, asset1) = if mint_a < mint_b {
        (*mint_a, *mint_b)
    } else {
        (*mint_b, *mint_a)
    };
    let (pool, _) = find_pool_address(&id(), &asset0, &asset1);
    let (vault0, _) = find_vault_address(&id(), &pool, &asset0);
    let (vault1, _) = find_vault_address(&id(), &pool, &asset1);

    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new(payer.pubkey(), true),
            AccountMeta::new(factory_address(), false),
            AccountMeta::new_readonly(*mint_a, false),
            AccountMeta::new_readonly(*mint_b, false),
            AccountMeta::new(pool, false),
            AccountMeta::new(vault0, false),
            AccountMeta::new(vault1, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: PoolInstruction::CreatePair.try_to_vec().unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&payer.pubkey()));
    tx.sign(&[payer], recent_blockhash);
    banks.process_transaction(tx).await?;
    Ok((asset0, asset1, pool, vault0, vault1))
}

pub async fn mint_liquidity(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    pool: &Pubkey,
    vault0: &Pubkey,
    vault1: &Pubkey,
    to: &Pubkey,
) -> TestResult {
    let (to_share, _) = find_share_address(&id(), pool, to);
    // Fee recipient share PDA: only ever touched when the factory's
    // fee_to is set, which these tests leave disabled, so any unused
    // key satisfies the account-count requirement.
    let fee_share_placeholder = Pubkey::new_unique();

    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new(payer.pubkey(), true),
            AccountMeta::new(*pool, false),
            AccountMeta::new(*vault0, false),
            AccountMeta::new(*vault1, false),
            AccountMeta::new_readonly(factory_address(), false),
            AccountMeta::new(to_share, false),
            AccountMeta::new(fee_share_placeholder, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: PoolInstruction::Mint { to: *to }.try_to_vec().unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&payer.pubkey()));
    tx.sign(&[payer], recent_blockhash);
    banks.process_transaction(tx).await
}

#[allow(clippy::too_many_arguments)]
pub async fn burn_liquidity(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    pool: &Pubkey,
    vault0: &Pubkey,
    vault1: &Pubkey,
    to_asset0: &Pubkey,
    to_asset1: &Pubkey,
    to: &Pubkey,
) -> TestResult {
    let (pool_share, _) = find_share_address(&id(), pool, pool);
    let fee_share_placeholder = Pubkey::new_unique();

    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new(payer.pubkey(), true),
            AccountMeta::new(*pool, false),
            AccountMeta::new(*vault0, false),
            AccountMeta::new(*vault1, false),
            AccountMeta::new(pool_share, false),
            AccountMeta::new(*to_asset0, false),
            AccountMeta::new(*to_asset1, false),
            AccountMeta::new_readonly(factory_address(), false),
            AccountMeta::new(fee_share_placeholder, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: PoolInstruction::Burn { to: *to }.try_to_vec().unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&payer.pubkey()));
    tx.sign(&[payer], recent_blockhash);
    banks.process_transaction(tx).await
}

#[allow(clippy::too_many_arguments)]
pub async fn swap(
    banks: &mut BanksClient,
    caller: &Keypair,
    recent_blockhash: Hash,
    pool: &Pubkey,
    vault0: &Pubkey,
    vault1: &Pubkey,
    to: &Pubkey,
    to_asset0: &Pubkey,
    to_asset1: &Pubkey,
    amount0_out: u64,
    amount1_out: u64,
) -> TestResult {
    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new(caller.pubkey(), true),
            AccountMeta::new(*pool, false),
            AccountMeta::new(*vault0, false),
            AccountMeta::new(*vault1, false),
            AccountMeta::new_readonly(*to, false),
            AccountMeta::new(*to_asset0, false),
            AccountMeta::new(*to_asset1, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: PoolInstruction::Swap {
            amount0_out,
            amount1_out,
            to: *to,
            data: Vec::new(),
        }
        .try_to_vec()
        .unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&caller.pubkey()));
    tx.sign(&[caller], recent_blockhash);
    banks.process_transaction(tx).await
}

/// Standard `Transfer`, used by the burn scenario to move shares into the
/// pool's own `ShareAccount` PDA before calling `burn`.
pub async fn transfer_shares(
    banks: &mut BanksClient,
    from: &Keypair,
    recent_blockhash: Hash,
    pool: &Pubkey,
    to: &Pubkey,
    amount: u64,
) -> TestResult {
    let (from_share, _) = find_share_address(&id(), pool, &from.pubkey());
    let (to_share, _) = find_share_address(&id(), pool, to);

    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new(from.pubkey(), true),
            AccountMeta::new_readonly(*pool, false),
            AccountMeta::new(from_share, false),
            AccountMeta::new(to_share, false),
            AccountMeta::new(from.pubkey(), true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: PoolInstruction::Transfer { to: *to, amount }.try_to_vec().unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&from.pubkey()));
    tx.sign(&[from], recent_blockhash);
    banks.process_transaction(tx).await
}

pub async fn set_fee_to(
    banks: &mut BanksClient,
    caller: &Keypair,
    recent_blockhash: Hash,
    new_fee_to: &Pubkey,
) -> TestResult {
    let ix = Instruction {
        program_id: id(),
        accounts: vec![
            AccountMeta::new_readonly(caller.pubkey(), true),
            AccountMeta::new(factory_address(), false),
        ],
        data: PoolInstruction::SetFeeTo { new_fee_to: *new_fee_to }.try_to_vec().unwrap(),
    };
    let mut tx = Transaction::new_with_payer(&[ix], Some(&caller.pubkey()));
    tx.sign(&[caller], recent_blockhash);
    banks.process_transaction(tx).await
}

#[allow(dead_code)]
pub fn allowance_address(pool: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> Pubkey {
    find_allowance_address(&id(), pool, owner, spender).0
}
