//! Utility Functions
//!
//! Shared helpers used throughout the program: PDA derivation, reentrancy
//! guarding, and token-account validation.

pub mod pda;
pub mod reentrancy_protection;
pub mod token_validation;

pub use pda::*;
pub use reentrancy_protection::*;
pub use token_validation::*;
