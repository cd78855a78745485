use solana_program::{
    account_info::AccountInfo, msg, program_error::ProgramError, program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::state::{Account as TokenAccount, AccountState};

use crate::error::PoolError;

/// Unpacks an SPL token account and validates it's usable as one of the
/// pool's own vaults or as a counterparty token account: owned by the SPL
/// Token program, not frozen, and (when provided) matching an expected
/// owner and/or mint.
pub fn validate_token_account(
    account: &AccountInfo,
    account_name: &str,
    expected_owner: Option<&Pubkey>,
    expected_mint: Option<&Pubkey>,
) -> Result<TokenAccount, ProgramError> {
    if account.owner != &spl_token::id() {
        msg!("{}: not owned by the SPL Token program", account_name);
        return Err(ProgramError::IncorrectProgramId);
    }

    let token_account = TokenAccount::unpack_from_slice(&account.data.borrow()).map_err(|e| {
        msg!("{}: failed to unpack token account ({:?})", account_name, e);
        ProgramError::InvalidAccountData
    })?;

    if token_account.state == AccountState::Frozen {
        msg!("{}: token account is frozen", account_name);
        return Err(PoolError::InvalidAccount("frozen token account").into());
    }

    if let Some(expected) = expected_owner {
        if token_account.owner != *expected {
            msg!("{}: owner mismatch", account_name);
            return Err(PoolError::InvalidAccount("token account owner mismatch").into());
        }
    }

    if let Some(expected) = expected_mint {
        if token_account.mint != *expected {
            msg!("{}: mint mismatch", account_name);
            return Err(PoolError::InvalidAccount("token account mint mismatch").into());
        }
    }

    Ok(token_account)
}
