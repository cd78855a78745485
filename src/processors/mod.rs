//! Processors Module
//!
//! One file per concern: factory lifecycle, reserve accounting shared by
//! every economic operation, the two liquidity events, the swap, the
//! share-token ledger, signed approvals, and read-only introspection.

pub mod factory;
pub mod liquidity;
pub mod permit;
pub mod reserves;
pub mod share_token;
pub mod swap;
pub mod views;

pub use factory::*;
pub use liquidity::*;
pub use permit::*;
pub use reserves::{process_skim, process_sync};
pub use share_token::*;
pub use swap::*;
pub use views::*;
