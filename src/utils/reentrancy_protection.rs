//! Reentrancy guard for the pool's mutating operations.
//!
//! Mint/burn/swap/skim/sync each run inside a scoped critical section,
//! guarded by a single `{Unlocked, Locked}` flag persisted on the pool
//! itself. The flag has to actually reach the account's bytes before any
//! outbound CPI, since a reentrant call re-deserializes whatever is
//! currently sitting in `pool_account.data` rather than sharing this
//! call's in-memory `PoolState` — a guard that only flips an in-memory
//! struct field is invisible to it.
//!
//! A first version of this guard stored `&'a mut PoolState` directly and
//! cleared it in `Drop`, mirroring a typical RAII lock. That doesn't work
//! here: because the type implements `Drop`, the borrow checker treats
//! the borrow as live until the guard's scope ends, which conflicts with
//! every plain `pool.field` read/write a processor does after entering
//! the guard (E0502) — and even granting a hypothetical fix for that, the
//! final `pool.serialize(...)` write every processor does happens *before*
//! the guard drops, so it always persists `locked == true`, permanently
//! locking the pool after its first successful call. Following the
//! teacher's own `ReentrancyGuard` (`utils/reentrancy_protection.rs`),
//! which tracks owned `Pubkey`s in a thread-local set rather than holding
//! a borrow of the guarded state, `PoolGuard` now only stores the pool's
//! own key. Callers flip `pool.locked` directly via `enter`/`exit` and are
//! responsible for persisting the flag at the right points; see
//! `processors::{liquidity, swap, reserves}`.

use std::cell::RefCell;
use std::collections::HashSet;

use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::error::PoolError;
use crate::state::pool_state::PoolState;

thread_local! {
    /// Pools currently inside a guarded operation, within this call stack.
    /// Defense in depth alongside the persisted `pool.locked` flag: the
    /// persisted flag is what a reentrant CPI (a fresh deserialize of the
    /// account) actually observes; this set catches same-process
    /// nested calls even before a caller has had a chance to persist
    /// anything.
    static ACTIVE_POOLS: RefCell<HashSet<Pubkey>> = RefCell::new(HashSet::new());
}

/// Guard over one pool's critical section. Holds only the pool's own key
/// — never a borrow of the `PoolState` itself — so it carries no lifetime
/// and never conflicts with the caller's own use of `pool`.
pub struct PoolGuard {
    pool_key: Pubkey,
}

impl PoolGuard {
    /// Fails `LOCKED` if `pool.locked` is already set or if `pool_key` is
    /// already active earlier in this call stack; otherwise marks both
    /// and sets `pool.locked = true`. The caller must persist `pool` to
    /// `pool_account.data` before any outbound CPI for the lock to be
    /// visible to a reentrant call.
    pub fn enter(pool_key: Pubkey, pool: &mut PoolState) -> Result<Self, ProgramError> {
        if pool.locked {
            return Err(PoolError::Locked.into());
        }
        let newly_active = ACTIVE_POOLS.with(|active| active.borrow_mut().insert(pool_key));
        if !newly_active {
            return Err(PoolError::Locked.into());
        }
        pool.locked = true;
        Ok(Self { pool_key })
    }

    /// Clears `pool.locked`. Callers must call this — and persist the
    /// result — on every success path before their final account write;
    /// it does not happen implicitly on drop, since by the time a guard
    /// would drop the final write has already happened.
    pub fn exit(self, pool: &mut PoolState) {
        pool.locked = false;
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        ACTIVE_POOLS.with(|active| {
            active.borrow_mut().remove(&self.pool_key);
        });
    }
}
