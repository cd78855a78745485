//! Pure, allocation-free numeric primitives used by the pool: a Q112.112
//! fixed-point helper for the price accumulators, and an integer square
//! root for the protocol-fee growth calculation.

pub mod isqrt;
pub mod uq112x112;

pub use isqrt::isqrt;
pub use uq112x112::U256;
