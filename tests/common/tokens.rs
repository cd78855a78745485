//! SPL-token scaffolding used by the integration tests: mint creation,
//! bare token-account creation, and minting into a destination. Adapted
//! from the teacher's `tests/common/tokens.rs` helpers of the same name.

use solana_program::program_pack::Pack;
use solana_program_test::BanksClient;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Keypair, signer::Signer, transaction::Transaction};
use spl_token::{instruction as token_instruction, state::Account as TokenAccount, state::Mint};

use super::TestResult;

pub async fn create_mint(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    mint: &Keypair,
    decimals: u8,
) -> TestResult {
    let rent = banks.get_rent().await.unwrap();
    let lamports = rent.minimum_balance(Mint::LEN);

    let create_account_ix = solana_sdk::system_instruction::create_account(
        &payer.pubkey(),
        &mint.pubkey(),
        lamports,
        Mint::LEN as u64,
        &spl_token::id(),
    );
    let initialize_mint_ix =
        token_instruction::initialize_mint(&spl_token::id(), &mint.pubkey(), &payer.pubkey(), None, decimals).unwrap();

    let mut transaction = Transaction::new_with_payer(&[create_account_ix, initialize_mint_ix], Some(&payer.pubkey()));
    transaction.sign(&[payer, mint], recent_blockhash);
    banks.process_transaction(transaction).await
}

pub async fn create_token_account(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    token_account: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
) -> TestResult {
    let rent = banks.get_rent().await.unwrap();
    let lamports = rent.minimum_balance(TokenAccount::LEN);

    let create_account_ix = solana_sdk::system_instruction::create_account(
        &payer.pubkey(),
        &token_account.pubkey(),
        lamports,
        TokenAccount::LEN as u64,
        &spl_token::id(),
    );
    let initialize_account_ix =
        token_instruction::initialize_account(&spl_token::id(), &token_account.pubkey(), mint, owner).unwrap();

    let mut transaction =
        Transaction::new_with_payer(&[create_account_ix, initialize_account_ix], Some(&payer.pubkey()));
    transaction.sign(&[payer, token_account], recent_blockhash);
    banks.process_transaction(transaction).await
}

pub async fn mint_tokens(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Keypair,
    amount: u64,
) -> TestResult {
    let mint_to_ix =
        token_instruction::mint_to(&spl_token::id(), mint, destination, &authority.pubkey(), &[], amount).unwrap();

    let mut transaction = Transaction::new_with_payer(&[mint_to_ix], Some(&payer.pubkey()));
    transaction.sign(&[payer], recent_blockhash);
    banks.process_transaction(transaction).await
}

pub async fn get_token_balance(banks: &mut BanksClient, account: &Pubkey) -> u64 {
    let data = banks.get_account(*account).await.unwrap().unwrap().data;
    TokenAccount::unpack_from_slice(&data).unwrap().amount
}

/// Plain SPL-token transfer, used by the tests to seed a pool's vault
/// ahead of `mint` the same way an off-chain client would: deposit first,
/// then call `mint` to notice the new balance.
pub async fn transfer_tokens(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    source: &Pubkey,
    destination: &Pubkey,
    authority: &Keypair,
    amount: u64,
) -> TestResult {
    let transfer_ix =
        token_instruction::transfer(&spl_token::id(), source, destination, &authority.pubkey(), &[], amount).unwrap();

    let mut transaction = Transaction::new_with_payer(&[transfer_ix], Some(&payer.pubkey()));
    transaction.sign(&[payer, authority], recent_blockhash);
    banks.process_transaction(transaction).await
}
