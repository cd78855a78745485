//! Types Module
//!
//! Wire-level instruction definitions for the constant-product AMM program.

pub mod instructions;

pub use instructions::*;
