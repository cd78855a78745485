use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Every fatal condition a pool or factory operation can raise. Each
/// variant rolls back the entire instruction; none ever leaves partial
/// state or emits a log line on the failure path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// `createPair` called with the same asset twice.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// `createPair`'s canonical `asset0` is the null handle.
    #[error("zero address")]
    ZeroAddress,

    /// `createPair` for a pair that already has a pool.
    #[error("pair exists")]
    PairExists,

    /// Caller is not the factory's `feeToSetter`, or not the factory, where
    /// one of those is required.
    #[error("forbidden")]
    Forbidden,

    /// Reentrant call into a guarded pool method.
    #[error("locked")]
    Locked,

    /// A balance would exceed the 112-bit reserve bound.
    #[error("overflow")]
    Overflow,

    /// `mint` computed zero liquidity shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// `burn` computed a zero output for either asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// `swap` requested with both outputs zero.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// `swap` requested an output at or above the current reserve.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// `swap`'s recipient equals one of the pool's own asset handles.
    #[error("invalid to")]
    InvalidTo,

    /// `swap` delivered no input after the callback returned.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// The constant-product invariant did not hold after a swap.
    #[error("K")]
    K,

    /// An asset transfer reverted or returned false.
    #[error("transfer failed")]
    TransferFailed,

    /// A signed approval's deadline has passed.
    #[error("expired")]
    Expired,

    /// A signed approval's recovered signer was null or did not match the
    /// claimed owner.
    #[error("invalid signature")]
    InvalidSignature,

    /// Account layout did not match what the instruction expects (wrong
    /// owner, missing signer, wrong PDA, wrong mint).
    #[error("invalid account: {0}")]
    InvalidAccount(&'static str),

    /// Instruction data could not be deserialized.
    #[error("invalid instruction data")]
    InvalidInstructionData,

    /// `transferFrom` requested more than the spender's remaining
    /// allowance.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// `transfer`/`transferFrom`/`burn` requested more than the sender's
    /// balance.
    #[error("insufficient balance")]
    InsufficientBalance,
}

impl PoolError {
    /// A stable numeric code per variant, for `ProgramError::Custom` and for
    /// off-chain clients that match on error codes rather than strings.
    pub fn error_code(&self) -> u32 {
        match self {
            PoolError::IdenticalAddresses => 1,
            PoolError::ZeroAddress => 2,
            PoolError::PairExists => 3,
            PoolError::Forbidden => 4,
            PoolError::Locked => 5,
            PoolError::Overflow => 6,
            PoolError::InsufficientLiquidityMinted => 7,
            PoolError::InsufficientLiquidityBurned => 8,
            PoolError::InsufficientOutputAmount => 9,
            PoolError::InsufficientLiquidity => 10,
            PoolError::InvalidTo => 11,
            PoolError::InsufficientInputAmount => 12,
            PoolError::K => 13,
            PoolError::TransferFailed => 14,
            PoolError::Expired => 15,
            PoolError::InvalidSignature => 16,
            PoolError::InvalidAccount(_) => 17,
            PoolError::InvalidInstructionData => 18,
            PoolError::InsufficientAllowance => 19,
            PoolError::InsufficientBalance => 20,
        }
    }
}

impl From<PoolError> for ProgramError {
    fn from(e: PoolError) -> Self {
        ProgramError::Custom(e.error_code())
    }
}
