#![allow(deprecated)]
/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

// Main library for the constant-product AMM program: a per-pair liquidity
// pool and the factory that mints one per unordered asset pair. Contains
// the program's instructions, error handling, state layouts, and the
// processors that implement them.

use borsh::BorshDeserialize;
use solana_program::{account_info::AccountInfo, declare_id, entrypoint::ProgramResult, pubkey::Pubkey};

declare_id!("quXSYkeZ8ByTCtYY1J1uxQmE36UZ3LmNGgE3CYMFixD");

// Declare the entrypoint to the Solana runtime
#[cfg(not(feature = "no-entrypoint"))]
use solana_program::entrypoint;
#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);

// Module declarations
pub mod constants;
pub mod error;
pub mod math;
pub mod processors;
pub mod state;
pub mod types;
pub mod utils;

// Re-export the public API
pub use constants::*;
pub use error::*;
pub use processors::*;
pub use state::*;
pub use types::*;
pub use utils::*;

/// Main entry point for the constant-product AMM program.
///
/// Deserializes the instruction, then dispatches to the processor for the
/// matching pool or factory operation. There is no global pause state or
/// admin gate to check before dispatch, beyond what each processor
/// enforces itself (e.g. `FORBIDDEN` on factory admin calls, `LOCKED` via
/// the per-pool reentrancy guard).
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = PoolInstruction::try_from_slice(instruction_data)
        .map_err(|_| error::PoolError::InvalidInstructionData)?;

    match instruction {
        PoolInstruction::InitializeFactory { fee_to_setter } => {
            processors::process_initialize_factory(program_id, accounts, fee_to_setter)
        }
        PoolInstruction::CreatePair => processors::process_create_pair(program_id, accounts),
        PoolInstruction::SetFeeTo { new_fee_to } => {
            processors::process_set_fee_to(program_id, accounts, new_fee_to)
        }
        PoolInstruction::SetFeeToSetter { new_fee_to_setter } => {
            processors::process_set_fee_to_setter(program_id, accounts, new_fee_to_setter)
        }

        PoolInstruction::Mint { to } => processors::process_mint(program_id, accounts, to),
        PoolInstruction::Burn { to } => processors::process_burn(program_id, accounts, to),
        PoolInstruction::Swap { amount0_out, amount1_out, to, data } => {
            processors::process_swap(program_id, accounts, amount0_out, amount1_out, to, data)
        }
        PoolInstruction::Skim { to } => processors::process_skim(program_id, accounts, to),
        PoolInstruction::Sync => processors::process_sync(program_id, accounts),

        PoolInstruction::Approve { spender, amount } => {
            processors::process_approve(program_id, accounts, spender, amount)
        }
        PoolInstruction::Transfer { to, amount } => {
            processors::process_transfer(program_id, accounts, to, amount)
        }
        PoolInstruction::TransferFrom { owner, to, amount } => {
            processors::process_transfer_from(program_id, accounts, owner, to, amount)
        }
        PoolInstruction::Permit { owner, spender, value, deadline, v, r, s } => {
            processors::process_permit(program_id, accounts, owner, spender, value, deadline, v, r, s)
        }

        PoolInstruction::GetPoolState => processors::get_pool_state(accounts),
        PoolInstruction::GetFactoryState => processors::get_factory_state(accounts),
        PoolInstruction::GetPairAddress { asset_a, asset_b } => {
            processors::get_pair_address(program_id, asset_a, asset_b)
        }
    }
}
