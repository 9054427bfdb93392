//! Arithmetic (range) coding of fixed-width words driven by pluggable adaptive probability
//! models, including PPM-style context mixing.
//!
//! The pieces, leaf first:
//! - [`utils::scaled_math`]: overflow-safe `(a * b) / c` used to rescale coder ranges.
//! - [`stream`]: bit-exact big-endian writer and seekable reader.
//! - [`frequency_index`]: sparse cumulative frequency index over domains up to 2^32.
//! - [`models`]: the [`ProbabilityModel`](models::ProbabilityModel) trait and its variants.
//! - [`range_coder`]: the encoder and decoder state machines.
//! - [`archive`]: the on-disk format tying a word stream, a model and the coder together.

pub mod archive;
pub mod error;
pub mod frequency_index;
pub mod models;
pub mod range_coder;
pub mod stream;
pub mod utils;

pub use error::{Error, Result};

/// The type representing a symbol, i.e. a word's ordinal in `[0, max_ord)`.
///
/// Words are at most 32 bits wide, but `max_ord` itself can be `2^32`, hence the wider type.
pub type Ordinal = u64;

/// The type representing frequencies, cumulative frequencies and totals.
pub type Count = u64;

/// The type representing the bounds of the coder's range and the decoder's value register.
pub type CodeValue = u64;

/// The maximum number of bits a packed context key may use. Keys are combined with counters
/// inside the coder's precision, so wider contexts are rejected at construction.
pub const MAX_CONTEXT_BITS: u32 = 56;

/// The precision, in bits, of the range used by the coder unless a model asks for another one.
pub const DEFAULT_CODER_BITS: u32 = 60;

/// The narrowest supported word.
pub const MIN_WORD_BITS: u16 = 8;

/// The widest supported word.
pub const MAX_WORD_BITS: u16 = 32;

/// The probability interval of a single symbol: it occupies `[low, high)` out of `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrequencyStats {
    pub low: Count,
    pub high: Count,
    pub total: Count,
}

impl FrequencyStats {
    pub fn new(low: Count, high: Count, total: Count) -> Self {
        debug_assert!(low < high && high <= total, "invalid stats {low}..{high}/{total}");
        Self { low, high, total }
    }

    /// The width of the interval, i.e. the (unnormalized) frequency of the symbol.
    #[inline(always)]
    pub fn width(&self) -> Count {
        self.high - self.low
    }
}
