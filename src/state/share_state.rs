//! Per-holder liquidity-share ledger.
//!
//! A single Solana account cannot grow to hold an unbounded number of
//! holders' balances cheaply, so — the same way the SPL Associated Token
//! Account program gives every `(owner, mint)` pair its own account
//! instead of keeping one giant map inside the mint — each holder's
//! balance and nonce live in their own `ShareAccount` PDA, and each
//! `(owner, spender)` allowance lives in its own `AllowanceAccount` PDA.
//! This also happens to be exactly what the signed-approval flow needs:
//! the pool must be able to create and update an allowance for a spender
//! the owner has never interacted with on-chain before, which is not
//! expressible through SPL token's owner-authorized `Approve` instruction
//! (see DESIGN.md).

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// One holder's balance and permit nonce for one pool's liquidity share.
/// PDA seeds: `[SHARE_SEED_PREFIX, pool, owner]`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ShareAccount {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub balance: u64,
    /// Monotonic counter, incremented once per successful `permit` call
    /// for this owner.
    pub nonce: u64,
    pub bump_seed: u8,
}

impl ShareAccount {
    pub const LEN: usize = 32 + 32 + 8 + 8 + 1;

    pub fn new(pool: Pubkey, owner: Pubkey, bump_seed: u8) -> Self {
        Self {
            pool,
            owner,
            balance: 0,
            nonce: 0,
            bump_seed,
        }
    }
}

/// One `(owner, spender)` allowance for one pool's liquidity share.
/// PDA seeds: `[ALLOWANCE_SEED_PREFIX, pool, owner, spender]`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct AllowanceAccount {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub amount: u64,
    pub bump_seed: u8,
}

impl AllowanceAccount {
    pub const LEN: usize = 32 + 32 + 32 + 8 + 1;

    pub fn new(pool: Pubkey, owner: Pubkey, spender: Pubkey, bump_seed: u8) -> Self {
        Self {
            pool,
            owner,
            spender,
            amount: 0,
            bump_seed,
        }
    }

    /// `transferFrom` leaves the sentinel "unlimited" allowance untouched
    /// and otherwise decrements it by exactly the transferred amount.
    pub fn consume(&mut self, amount: u64) -> Result<(), crate::error::PoolError> {
        if self.amount == crate::constants::UNLIMITED_ALLOWANCE {
            return Ok(());
        }
        self.amount = self
            .amount
            .checked_sub(amount)
            .ok_or(crate::error::PoolError::InsufficientAllowance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_allowance_is_left_unchanged() {
        let mut allowance = AllowanceAccount::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            255,
        );
        allowance.amount = crate::constants::UNLIMITED_ALLOWANCE;
        allowance.consume(1_000).unwrap();
        assert_eq!(allowance.amount, crate::constants::UNLIMITED_ALLOWANCE);
    }

    #[test]
    fn finite_allowance_decrements_by_exact_amount() {
        let mut allowance = AllowanceAccount::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            255,
        );
        allowance.amount = 500;
        allowance.consume(200).unwrap();
        assert_eq!(allowance.amount, 300);
    }

    #[test]
    fn consuming_more_than_available_fails() {
        let mut allowance = AllowanceAccount::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            255,
        );
        allowance.amount = 10;
        assert!(allowance.consume(11).is_err());
    }
}
