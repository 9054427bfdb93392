//! The range coder.
//!
//! Both sides keep a range `[low, high)` inside `[0, 2^bits)`, narrow it to the interval of each
//! symbol and renormalize it as soon as its leading bit is settled:
//! - `E1`: the range is in the lower half, a `0` is settled;
//! - `E2`: the range is in the upper half, a `1` is settled;
//! - `E3`: the range straddles the middle within the central half; the next settled bit is
//!   unknown, so it is deferred and counted (the "bits to follow"), then emitted with the
//!   opposite value after the next `E1`/`E2`.

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

use crate::error::{Error, Result};
use crate::utils::scaled_math::mul_div;
use crate::{CodeValue, Count, FrequencyStats, DEFAULT_CODER_BITS};

/// A callback invoked once per coded word with the number of words coded so far, for progress
/// reporting.
pub type Tick<'a> = Option<&'a mut dyn FnMut(u64)>;

/// The fixed-point geometry of the coder's range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    bits: u32,
    total: CodeValue,
    half: CodeValue,
    quarter: CodeValue,
    three_quarters: CodeValue,
}

impl Precision {
    /// The widest supported precision: doubling a bound must never overflow a [`CodeValue`].
    pub const MAX_BITS: u32 = 62;

    /// # Panics
    /// If `bits` is not in `3..=62`.
    pub fn new(bits: u32) -> Self {
        assert!(
            (3..=Self::MAX_BITS).contains(&bits),
            "unsupported coder precision: {bits} bits"
        );
        let total = 1 << bits;
        let quarter = total / 4;
        Self {
            bits,
            total,
            half: total / 2,
            quarter,
            three_quarters: 3 * quarter,
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The largest model total the coder accepts: after renormalization the range is always
    /// wider than a quarter, so every symbol with a non-empty interval keeps a non-empty range.
    pub fn max_model_total(&self) -> Count {
        self.quarter
    }

    fn check_total(&self, total: Count) -> Result<()> {
        match total <= self.quarter {
            true => Ok(()),
            false => Err(Error::TotalTooLarge {
                total,
                limit: self.quarter,
            }),
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(DEFAULT_CODER_BITS)
    }
}

/// How much a coding session produced or consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodingStats {
    /// The number of coded words.
    pub words: u64,

    /// The number of bits of the coded payload.
    pub bits: u64,
}

/// Narrows `[low, high)` to the sub-interval described by `stats`. Shared by both sides so that
/// they round identically.
#[inline(always)]
fn narrow(low: CodeValue, high: CodeValue, stats: &FrequencyStats) -> (CodeValue, CodeValue) {
    let width = high - low;
    (
        low + mul_div(width, stats.low, stats.total),
        low + mul_div(width, stats.high, stats.total),
    )
}

/// One renormalization step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// `E1`: the next bit is `0`.
    Lower,
    /// `E2`: the next bit is `1`.
    Upper,
    /// `E3`: the next bit is deferred.
    Middle,
}

impl Precision {
    /// Returns the renormalization step to take, if any, and applies it to the bounds.
    #[inline(always)]
    fn step(&self, low: &mut CodeValue, high: &mut CodeValue) -> Option<(Step, CodeValue)> {
        let (step, offset) = if *high <= self.half {
            (Step::Lower, 0)
        } else if *low >= self.half {
            (Step::Upper, self.half)
        } else if *low >= self.quarter && *high <= self.three_quarters {
            (Step::Middle, self.quarter)
        } else {
            return None;
        };
        *low = 2 * (*low - offset);
        *high = 2 * (*high - offset);
        debug_assert!(*low < *high, "empty range after renormalization");
        Some((step, offset))
    }
}
