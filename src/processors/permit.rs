//! Off-chain signed approval, in the EIP-712-shaped envelope: a domain
//! separator binding the signature to this pool and chain, and a struct
//! hash over the approval fields.
//!
//! `keccak256` and `ecrecover` are genuine host syscalls on this
//! substrate (`solana_program::keccak`, `solana_program::secp256k1_recover`),
//! so the envelope is realized with them directly rather than an
//! invented substitute (see DESIGN.md).

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::UnixTimestamp,
    entrypoint::ProgramResult,
    keccak,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    pubkey::Pubkey,
    secp256k1_recover::secp256k1_recover,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

use crate::constants::{ALLOWANCE_SEED_PREFIX, CHAIN_ID, DOMAIN_TYPE_TAG, PERMIT_TYPE_TAG, SHARE_TOKEN_NAME, SHARE_TOKEN_VERSION};
use crate::error::PoolError;
use crate::state::{AllowanceAccount, PoolState, ShareAccount};
use crate::utils::pda::{find_allowance_address, find_share_address};

/// `keccak256(EIP712DomainTypeHash, keccak(name), keccak("1"), chainId,
/// poolAddress)`, computed once at pool construction and cached on
/// `PoolState::domain_separator`. Folding in the pool's own address is
/// what binds a permit to this pool specifically, not just this program.
pub fn compute_domain_separator(_program_id: &Pubkey, pool: &Pubkey) -> [u8; 32] {
    let domain_type_hash = keccak::hash(DOMAIN_TYPE_TAG).to_bytes();
    let name_hash = keccak::hash(SHARE_TOKEN_NAME.as_bytes()).to_bytes();
    let version_hash = keccak::hash(SHARE_TOKEN_VERSION.as_bytes()).to_bytes();
    keccak::hashv(&[
        &domain_type_hash,
        &name_hash,
        &version_hash,
        &CHAIN_ID.to_le_bytes(),
        pool.as_ref(),
    ])
    .to_bytes()
}

/// The EIP-712 message digest: `keccak256("\x19\x01" || domainSeparator ||
/// keccak256(encode(typeHash, owner, spender, value, nonce, deadline)))`.
fn permit_digest(
    domain_separator: &[u8; 32],
    owner: &Pubkey,
    spender: &Pubkey,
    value: u64,
    nonce: u64,
    deadline: i64,
) -> [u8; 32] {
    let type_hash = keccak::hash(PERMIT_TYPE_TAG).to_bytes();
    let struct_hash = keccak::hashv(&[
        &type_hash,
        owner.as_ref(),
        spender.as_ref(),
        &value.to_le_bytes(),
        &nonce.to_le_bytes(),
        &deadline.to_le_bytes(),
    ])
    .to_bytes();
    keccak::hashv(&[b"\x19\x01", domain_separator, &struct_hash]).to_bytes()
}

/// Off-chain signed approval. Fails `EXPIRED` if `deadline` has passed,
/// `INVALID_SIGNATURE` unless the recovered signer is `owner` and
/// non-null. Increments `nonce[owner]` exactly once on success.
#[allow(clippy::too_many_arguments)]
pub fn process_permit(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    owner: Pubkey,
    spender: Pubkey,
    value: u64,
    deadline: i64,
    v: u8,
    r: [u8; 32],
    s: [u8; 32],
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let pool_account = next_account_info(account_info_iter)?;
    let owner_share_account = next_account_info(account_info_iter)?;
    let allowance_account = next_account_info(account_info_iter)?;
    let payer = next_account_info(account_info_iter)?;
    let system_program = next_account_info(account_info_iter)?;
    let clock_sysvar = next_account_info(account_info_iter)?;

    let clock = Clock::from_account_info(clock_sysvar)?;
    if deadline < clock.unix_timestamp as UnixTimestamp {
        return Err(PoolError::Expired.into());
    }

    let pool = PoolState::deserialize(&mut &pool_account.data.borrow()[..])?;

    let (expected_owner_share, _) = find_share_address(program_id, pool_account.key, &owner);
    if owner_share_account.key != &expected_owner_share {
        return Err(PoolError::InvalidAccount("owner share PDA mismatch").into());
    }
    let mut owner_share = ShareAccount::deserialize(&mut &owner_share_account.data.borrow()[..])?;

    let digest = permit_digest(&pool.domain_separator, &owner, &spender, value, owner_share.nonce, deadline);
    let recovery_id = v.checked_sub(27).ok_or(PoolError::InvalidSignature)?;
    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&r);
    signature[32..].copy_from_slice(&s);
    let recovered = secp256k1_recover(&digest, recovery_id, &signature).map_err(|_| PoolError::InvalidSignature)?;

    let recovered_pubkey = Pubkey::new_from_array(keccak::hash(&recovered.to_bytes()).to_bytes());
    if recovered_pubkey == Pubkey::default() || recovered_pubkey != owner {
        return Err(PoolError::InvalidSignature.into());
    }

    owner_share.nonce = owner_share
        .nonce
        .checked_add(1)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    let mut owner_data = Vec::new();
    owner_share.serialize(&mut owner_data)?;
    owner_share_account.data.borrow_mut()[..owner_data.len()].copy_from_slice(&owner_data);

    let (expected_allowance, bump) = find_allowance_address(program_id, pool_account.key, &owner, &spender);
    if allowance_account.key != &expected_allowance {
        return Err(PoolError::InvalidAccount("allowance PDA mismatch").into());
    }
    let mut allowance = if allowance_account.data_is_empty() {
        let rent = Rent::get()?;
        let seeds: &[&[u8]] = &[
            ALLOWANCE_SEED_PREFIX,
            pool_account.key.as_ref(),
            owner.as_ref(),
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
        AllowanceAccount::new(*pool_account.key, owner, spender, bump)
    } else {
        AllowanceAccount::deserialize(&mut &allowance_account.data.borrow()[..])?
    };
    allowance.amount = value;
    let mut allowance_data = Vec::new();
    allowance.serialize(&mut allowance_data)?;
    allowance_account.data.borrow_mut()[..allowance_data.len()].copy_from_slice(&allowance_data);

    msg!("Approval owner={} spender={} value={}", owner, spender, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_separator_is_deterministic_in_pool_and_chain() {
        let program_id = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let a = compute_domain_separator(&program_id, &pool);
        let b = compute_domain_separator(&program_id, &pool);
        assert_eq!(a, b);
    }

    #[test]
    fn domain_separator_differs_across_pools() {
        let program_id = Pubkey::new_unique();
        let a = compute_domain_separator(&program_id, &Pubkey::new_unique());
        let b = compute_domain_separator(&program_id, &Pubkey::new_unique());
        assert_ne!(a, b);
    }

    #[test]
    fn permit_digest_varies_with_nonce() {
        let domain = [7u8; 32];
        let owner = Pubkey::new_unique();
        let spender = Pubkey::new_unique();
        let d0 = permit_digest(&domain, &owner, &spender, 100, 0, 1_000);
        let d1 = permit_digest(&domain, &owner, &spender, 100, 1, 1_000);
        assert_ne!(d0, d1, "replaying a consumed nonce must not reuse the same digest");
    }
}
