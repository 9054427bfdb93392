//! Adaptive probability models.
//!
//! Every model maps a symbol to the interval `[low, high)` it occupies out of `total`, and maps a
//! cumulative position back to the symbol whose interval contains it. Adaptive models change
//! after each observed symbol: the encoder and the decoder must feed them the same symbols in the
//! same order to stay synchronized.

pub mod escape_a;
pub mod escape_d;
pub mod fixed;
pub mod plain;
pub mod ppm;
pub mod uniform;

pub use escape_a::AdaptiveA;
pub use escape_d::AdaptiveD;
pub use fixed::{DecreasingModel, Dictionary, StaticModel};
pub use plain::PlainAdaptive;
pub use ppm::{ContextGate, ContextGeometry, PpmA, PpmD, PpmModel};
pub use uniform::UniformModel;

use crate::error::{Error, Result};
use crate::{Count, FrequencyStats, Ordinal};

/// The interface between a statistical model and the range coder.
///
/// Reading the statistics of a symbol ([`peek`](Self::peek)) and learning from it
/// ([`commit`](Self::commit)) are separate steps; [`stats_for`](Self::stats_for) performs both and
/// is the single "observe" event used while coding.
pub trait ProbabilityModel {
    /// The number of symbols of the alphabet: valid ordinals are in `[0, max_ord)`.
    fn max_ord(&self) -> Ordinal;

    /// Returns the current interval of `ordinal` without changing the model.
    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats>;

    /// Updates the model after `ordinal` has been coded. `ordinal` must have been accepted by
    /// [`peek`](Self::peek) in the current state.
    fn commit(&mut self, ordinal: Ordinal);

    /// Returns the symbol whose interval contains `position`, with `position < total_count()`.
    fn ordinal_for(&self, position: Count) -> Result<Ordinal>;

    /// Returns the current total, i.e. the denominator of every interval.
    fn total_count(&self) -> Count;

    /// Returns the interval of `ordinal` and then learns from it.
    fn stats_for(&mut self, ordinal: Ordinal) -> Result<FrequencyStats> {
        let stats = self.peek(ordinal)?;
        self.commit(ordinal);
        Ok(stats)
    }
}

impl<M: ProbabilityModel + ?Sized> ProbabilityModel for Box<M> {
    fn max_ord(&self) -> Ordinal {
        (**self).max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        (**self).peek(ordinal)
    }

    fn commit(&mut self, ordinal: Ordinal) {
        (**self).commit(ordinal)
    }

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        (**self).ordinal_for(position)
    }

    fn total_count(&self) -> Count {
        (**self).total_count()
    }

    fn stats_for(&mut self, ordinal: Ordinal) -> Result<FrequencyStats> {
        (**self).stats_for(ordinal)
    }
}

/// An adaptive model that can be instantiated on demand, one per context, by a [`PpmModel`].
pub trait EscapeModel: ProbabilityModel {
    /// Creates a model that has not observed any symbol yet.
    fn with_max_ord(max_ord: Ordinal) -> Self;

    /// Returns how many symbols (with repetitions) the model has observed.
    fn observed(&self) -> Count;
}

#[inline(always)]
pub(crate) fn check_ordinal(ordinal: Ordinal, max_ord: Ordinal) -> Result<()> {
    match ordinal < max_ord {
        true => Ok(()),
        false => Err(Error::SymbolOutOfRange { ordinal, max_ord }),
    }
}

#[inline(always)]
pub(crate) fn check_position(position: Count, total: Count) -> Result<()> {
    match position < total {
        true => Ok(()),
        false => Err(Error::PositionOutOfRange { position, total }),
    }
}

/// Returns the smallest ordinal in `[0, max_ord)` whose cumulative upper bound exceeds
/// `position`. `cumulative_high` must be non-decreasing and exceed `position` at `max_ord - 1`.
pub(crate) fn monotone_search(
    max_ord: Ordinal,
    position: Count,
    cumulative_high: impl Fn(Ordinal) -> Count,
) -> Ordinal {
    let (mut lo, mut hi) = (0, max_ord - 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cumulative_high(mid) > position {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}
