//! Constants for the constant-product AMM program.
//!
//! This module contains every numeric constant and PDA seed prefix the
//! pool and factory rely on.

/// Share units permanently locked to the null holder on a pool's first mint,
/// so total supply never returns to zero once liquidity has ever existed.
pub const MINIMUM_LIQUIDITY: u64 = 1000;

/// Swap fee numerator: 3 per 1000 of the input amount (0.30%).
pub const SWAP_FEE_NUMERATOR: u64 = 3;
/// Swap fee denominator.
pub const SWAP_FEE_DENOMINATOR: u64 = 1000;

/// Protocol's share of fee growth: the `5*rootK + rootKLast` denominator
/// captures one sixth of sqrt(k) growth since the last liquidity event.
pub const PROTOCOL_FEE_GROWTH_MULTIPLIER: u128 = 5;

/// Share-token metadata, matching the canonical Uniswap V2 LP token.
pub const SHARE_TOKEN_NAME: &str = "Uniswap V2";
pub const SHARE_TOKEN_SYMBOL: &str = "UNI-V2";
pub const SHARE_TOKEN_DECIMALS: u8 = 18;
pub const SHARE_TOKEN_VERSION: &str = "1";

/// Bit width of the packed reserve fields; reserves must stay below 2^112.
pub const RESERVE_BITS: u32 = 112;

/// Q112.112 fixed point: integer and fractional bits are both 112.
pub const UQ112X112_RESOLUTION: u32 = 112;

/// Sentinel allowance value meaning "unlimited"; `transferFrom` never
/// decrements an allowance equal to this.
pub const UNLIMITED_ALLOWANCE: u64 = u64::MAX;

/// PDA seed for the single factory singleton this program deploys.
pub const FACTORY_SEED: &[u8] = b"factory";
/// PDA seed prefix for a pool account, combined with the canonical
/// `(asset0, asset1)` ordering.
pub const POOL_SEED_PREFIX: &[u8] = b"pool";
/// PDA seed prefix for a pool's custody vault of one of its two assets,
/// combined with the pool key and the asset mint key.
pub const VAULT_SEED_PREFIX: &[u8] = b"vault";
/// PDA seed prefix for a holder's liquidity-share balance account,
/// combined with the pool key and the holder key.
pub const SHARE_SEED_PREFIX: &[u8] = b"share";
/// PDA seed prefix for an (owner, spender) allowance account, combined with
/// the pool key, owner key, and spender key.
pub const ALLOWANCE_SEED_PREFIX: &[u8] = b"allowance";

/// Byte tag standing in for `keccak256("Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)")`.
/// Hashed together with the message fields in `processors::permit`.
pub const PERMIT_TYPE_TAG: &[u8] = b"Permit(owner,spender,value,nonce,deadline)";

/// Byte tag standing in for `keccak256("EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")`.
pub const DOMAIN_TYPE_TAG: &[u8] = b"Domain(name,version,chainId,verifyingContract)";

/// Ambient chain identifier folded into every pool's permit domain
/// separator. This substrate has no native chain-id syscall, so the
/// deployment's network feature supplies a stable stand-in (see
/// DESIGN.md).
pub const CHAIN_ID: u64 = {
    if cfg!(feature = "mainnet") {
        101
    } else if cfg!(feature = "devnet") {
        102
    } else {
        103
    }
};

/// Additional buffer for rent calculations, to tolerate rent-rate increases
/// between account creation and the next rent check.
pub const MINIMUM_RENT_BUFFER: u64 = 1000;
