//! Scaled multiply-divide on 64-bit registers.
//!
//! Rescaling a coder range by a probability ratio multiplies two values that can each be close
//! to 2^60, so the product is computed on 128 bits. The encoder and the decoder must go through
//! these exact functions: any difference in rounding desynchronizes them.

/// Returns `⌊l · r / d⌋`.
///
/// The product may overflow 64 bits, the result must not.
#[inline(always)]
pub fn mul_div(l: u64, r: u64, d: u64) -> u64 {
    debug_assert!(d != 0, "division by zero");
    let quotient = (l as u128 * r as u128) / d as u128;
    debug_assert!(quotient <= u64::MAX as u128, "scaled result overflows");
    quotient as u64
}

/// Returns `⌊(l · r − 1) / d⌋`, the decrease-and-divide sibling of [`mul_div`].
///
/// Used by the decoder to map an offset inside the current range back to a cumulative
/// position of the model. `l · r` must be positive.
#[inline(always)]
pub fn mul_dec_div(l: u64, r: u64, d: u64) -> u64 {
    debug_assert!(d != 0, "division by zero");
    let product = l as u128 * r as u128;
    debug_assert!(product > 0, "decrease of a zero product");
    let quotient = (product - 1) / d as u128;
    debug_assert!(quotient <= u64::MAX as u128, "scaled result overflows");
    quotient as u64
}
