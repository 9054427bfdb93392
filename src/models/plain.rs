use crate::error::{Error, Result};
use crate::frequency_index::FrequencyIndex;
use crate::models::{check_ordinal, check_position, ProbabilityModel};
use crate::{Count, FrequencyStats, Ordinal};

/// The simplest adaptive model: every symbol starts with weight `1` and gains `ratio` each time
/// it is observed. Unseen symbols are never excluded, so the total only grows.
#[derive(Clone, Debug)]
pub struct PlainAdaptive {
    /// How much weight an observation adds to its symbol.
    ratio: Count,

    /// How many times each symbol has been observed.
    seen: FrequencyIndex,
}

impl PlainAdaptive {
    pub fn new(max_ord: Ordinal, ratio: Count) -> Self {
        Self {
            ratio,
            seen: FrequencyIndex::new(max_ord),
        }
    }

    /// Returns the total, or `None` if it overflows.
    fn checked_total(&self) -> Option<Count> {
        self.ratio
            .checked_mul(self.seen.total())?
            .checked_add(self.max_ord())
    }
}

impl ProbabilityModel for PlainAdaptive {
    fn max_ord(&self) -> Ordinal {
        self.seen.max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        check_ordinal(ordinal, self.max_ord())?;
        let weight = |seen: Count, base: Count| self.ratio.checked_mul(seen)?.checked_add(base);
        let low = weight(self.seen.sum_below(ordinal), ordinal).ok_or(Error::WeightOverflow)?;
        let high = weight(self.seen.count(ordinal), 1)
            .and_then(|width| low.checked_add(width))
            .ok_or(Error::WeightOverflow)?;
        Ok(FrequencyStats::new(low, high, self.total_count()))
    }

    fn commit(&mut self, ordinal: Ordinal) {
        self.seen.update(ordinal, 1);
    }

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        let total = self.checked_total().ok_or(Error::WeightOverflow)?;
        check_position(position, total)?;
        self.seen
            .find_scaled(position, 1, self.ratio)
            .ok_or(Error::PositionOutOfRange { position, total })
    }

    /// Saturates on overflow, so that the coder rejects the total.
    fn total_count(&self) -> Count {
        self.checked_total().unwrap_or(Count::MAX)
    }
}
