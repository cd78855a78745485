//! Pool and factory instructions.
//!
//! This module defines every operation the program accepts. The
//! economically load-bearing operations (`Swap`, `Mint`, `Burn`,
//! `CreatePair`) carry a full account-layout writeup; the mechanical ones
//! don't repeat it.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// All supported instructions for the constant-product AMM program.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub enum PoolInstruction {
    /// Creates the factory singleton. Must be called exactly once before
    /// any pair can be created.
    ///
    /// Accounts:
    /// 0. `[signer]` payer
    /// 1. `[writable]` factory PDA (`[FACTORY_SEED]`)
    /// 2. `[]` system program
    InitializeFactory { fee_to_setter: Pubkey },

    /// Deterministically creates a new pool for an unordered asset pair.
    /// Fails `IDENTICAL_ADDRESSES` if both mints are equal, `ZERO_ADDRESS`
    /// if the canonical `asset0` is the null handle, `PAIR_EXISTS` if the
    /// pool PDA is already initialized.
    ///
    /// Accounts:
    /// 0. `[signer]` payer
    /// 1. `[writable]` factory PDA
    /// 2. `[]` asset mint A
    /// 3. `[]` asset mint B
    /// 4. `[writable]` pool PDA (`[POOL_SEED_PREFIX, asset0, asset1]`)
    /// 5. `[writable]` vault0 PDA, an SPL token account for the canonical
    ///    `asset0`, owned by the pool PDA
    /// 6. `[writable]` vault1 PDA, symmetric for `asset1`
    /// 7. `[]` SPL token program
    /// 8. `[]` system program
    /// 9. `[]` rent sysvar
    CreatePair,

    /// Rotates the protocol-fee recipient. `Pubkey::default()` disables
    /// protocol fees. Fails `FORBIDDEN` unless the caller is the current
    /// `fee_to_setter`.
    SetFeeTo { new_fee_to: Pubkey },

    /// Rotates the factory administrator. Fails `FORBIDDEN` unless the
    /// caller is the current `fee_to_setter`.
    SetFeeToSetter { new_fee_to_setter: Pubkey },

    /// Mints liquidity shares for deposits already sitting in the pool's
    /// vaults (the caller transfers both assets into `vault0`/`vault1` in
    /// an earlier instruction of the same transaction; this instruction
    /// derives the deposited amounts from the balance delta against the
    /// pool's recorded reserves — it never trusts a caller-declared
    /// amount).
    ///
    /// Accounts:
    /// 0. `[signer]` payer (funds any new `ShareAccount`/allowance PDAs)
    /// 1. `[writable]` pool PDA
    /// 2. `[writable]` vault0
    /// 3. `[writable]` vault1
    /// 4. `[]` factory PDA (queried once for `fee_to`)
    /// 5. `[writable]` recipient's `ShareAccount` PDA for this pool
    /// 6. `[writable]` protocol fee recipient's `ShareAccount` PDA for
    ///    this pool (only touched when protocol fees are enabled; still
    ///    required so the instruction can create it on first use)
    /// 7. `[]` system program
    Mint { to: Pubkey },

    /// Burns the liquidity shares already sitting in the pool's own
    /// `ShareAccount` (the caller transfers shares there in an earlier
    /// instruction) and pays out both assets to `to`.
    ///
    /// Accounts:
    /// 0. `[signer]` payer
    /// 1. `[writable]` pool PDA
    /// 2. `[writable]` vault0
    /// 3. `[writable]` vault1
    /// 4. `[writable]` pool's own `ShareAccount` (the shares being burned)
    /// 5. `[writable]` `to`'s asset0 SPL token account
    /// 6. `[writable]` `to`'s asset1 SPL token account
    /// 7. `[]` factory PDA
    /// 8. `[writable]` protocol fee recipient's `ShareAccount`
    /// 9. `[]` SPL token program
    /// 10. `[]` system program
    Burn { to: Pubkey },

    /// Swaps, with an optional flash-loan style callback.
    ///
    /// Fails `INSUFFICIENT_OUTPUT_AMOUNT` if both outputs are zero,
    /// `INSUFFICIENT_LIQUIDITY` if either output is at or above the
    /// current reserve, `INVALID_TO` if `to` equals either asset handle,
    /// `INSUFFICIENT_INPUT_AMOUNT` if no input is observed after the
    /// callback returns, `K` if the fee-adjusted invariant fails.
    ///
    /// Accounts:
    /// 0. `[signer]` caller (the swap's `sender`, for the `Swap` log line)
    /// 1. `[writable]` pool PDA
    /// 2. `[writable]` vault0
    /// 3. `[writable]` vault1
    /// 4. `[]` `to` — the recipient address; also the callback program id
    ///    when `data` is non-empty
    /// 5. `[writable]` `to`'s asset0 SPL token account
    /// 6. `[writable]` `to`'s asset1 SPL token account
    /// 7. `[]` SPL token program
    /// 8.. remaining accounts, forwarded verbatim to the callback CPI when
    ///    `data` is non-empty
    Swap {
        amount0_out: u64,
        amount1_out: u64,
        to: Pubkey,
        data: Vec<u8>,
    },

    /// Sweeps `balanceOf(vault_i) - reserve_i` of each asset to `to`,
    /// without disturbing the recorded reserves.
    Skim { to: Pubkey },

    /// Adopts the vaults' current balances as the new reserves and
    /// refreshes the cumulative price accumulators without a trade.
    Sync,

    /// Sets `allowance[owner][spender] = amount` unconditionally.
    ///
    /// Accounts: 0. `[signer]` owner, 1. `[]` pool, 2. `[writable]`
    /// allowance PDA (created if absent), 3. `[signer, writable]` payer,
    /// 4. `[]` system program.
    Approve { spender: Pubkey, amount: u64 },

    /// Standard share transfer. `to`'s `ShareAccount` PDA is created on
    /// first use, same as `Mint`.
    ///
    /// Accounts: 0. `[signer]` from, 1. `[]` pool, 2. `[writable]` from's
    /// `ShareAccount`, 3. `[writable]` to's `ShareAccount` (created if
    /// absent), 4. `[signer, writable]` payer, 5. `[]` system program.
    Transfer { to: Pubkey, amount: u64 },

    /// Transfer on behalf of `owner`, consuming `allowance[owner][caller]`
    /// unless it equals the unlimited sentinel. `to`'s `ShareAccount` PDA
    /// is created on first use, same as `Transfer`.
    ///
    /// Accounts: 0. `[signer]` caller, 1. `[]` pool, 2. `[writable]`
    /// owner's `ShareAccount`, 3. `[writable]` to's `ShareAccount`
    /// (created if absent), 4. `[writable]` allowance PDA, 5. `[signer,
    /// writable]` payer, 6. `[]` system program.
    TransferFrom {
        owner: Pubkey,
        to: Pubkey,
        amount: u64,
    },

    /// Off-chain signed approval. Fails `EXPIRED` if `deadline` has
    /// passed, `INVALID_SIGNATURE` unless the recovered signer is `owner`
    /// and non-null. Increments `nonce[owner]` exactly once on success.
    ///
    /// Accounts: 0. `[]` pool, 1. `[writable]` owner's `ShareAccount` (for
    /// the nonce), 2. `[writable]` allowance PDA (created if absent),
    /// 3. `[signer, writable]` payer, 4. `[]` system program, 5. `[]`
    /// clock sysvar.
    Permit {
        owner: Pubkey,
        spender: Pubkey,
        value: u64,
        deadline: i64,
        v: u8,
        r: [u8; 32],
        s: [u8; 32],
    },

    /// Logs the requested pool's full state, for off-chain introspection.
    GetPoolState,
    /// Logs the factory's fee configuration and pair count.
    GetFactoryState,
    /// Logs the PDA that would be derived for a given (unordered) asset
    /// pair, without requiring the pool to already exist.
    GetPairAddress { asset_a: Pubkey, asset_b: Pubkey },
}
