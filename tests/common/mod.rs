//! Shared scaffolding for the integration test suite: a `ProgramTest`
//! wired to this program's `process_instruction`, plus SPL-token and PDA
//! helpers so each scenario test can get straight to the instructions
//! under test.

pub mod pool_helpers;
pub mod setup;
pub mod tokens;

pub type TestResult = Result<(), solana_program_test::BanksClientError>;
