//! Q112.112 binary fixed point, stored in a 224-bit (padded to 256-bit)
//! unsigned word.
//!
//! A nonnegative integer in `[0, 2^112)` is encoded by multiplying it by
//! `2^112`; division is ordinary truncating integer division of two such
//! words. Both operations are exact and total except that dividing by zero
//! is the caller's responsibility to avoid — callers in `processors::reserves`
//! only ever divide by a reserve already checked nonzero.

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer, used as the carrier type for Q112.112
    /// values (which only ever occupy the low 224 bits) and for the
    /// wrapping cumulative price accumulators.
    pub struct U256(4);
}

/// `2^112`, the fixed-point resolution.
pub const Q112: u128 = 1u128 << crate::constants::UQ112X112_RESOLUTION;

/// Encode `value` (must be `< 2^112`) as a Q112.112 fixed-point number.
pub fn encode(value: u64) -> U256 {
    U256::from(value) * U256::from(Q112)
}

/// Divide a Q112.112 value by a `u64` reserve, truncating toward zero.
/// The pool never calls this with a zero divisor.
pub fn uq_div(value: U256, divisor: u64) -> U256 {
    value / U256::from(divisor)
}

/// Serialize to the 32-byte little-endian layout used by `PoolState`'s
/// cumulative price fields.
pub fn to_bytes(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_little_endian(&mut out);
    out
}

/// Deserialize from the 32-byte little-endian layout used by `PoolState`'s
/// cumulative price fields.
pub fn from_bytes(bytes: &[u8; 32]) -> U256 {
    U256::from_little_endian(bytes)
}
