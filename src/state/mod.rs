//! State Module
//!
//! This module contains all the account state layouts the program reads
//! and writes: the factory singleton, per-pair pools, and the per-holder
//! share/allowance ledger that realizes the pool's own fungible liquidity
//! token (see `share_state` for why this isn't an SPL mint).

pub mod factory_state;
pub mod pool_state;
pub mod share_state;

pub use factory_state::*;
pub use pool_state::*;
pub use share_state::*;
