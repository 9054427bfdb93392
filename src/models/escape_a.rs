use crate::error::Result;
use crate::frequency_index::FrequencyIndex;
use crate::models::{check_ordinal, check_position, monotone_search, EscapeModel, ProbabilityModel};
use crate::{Count, FrequencyStats, Ordinal};

/// An adaptive model with an escape mechanism in the style of method "A".
///
/// With `U` distinct symbols seen so far, every unseen symbol has weight `1` and a symbol seen
/// `k` times has weight `k · (max_ord − U)`. Unseen symbols therefore share a total weight of
/// `max_ord − U`, exactly as much as a single observation of a seen symbol, and stay codable.
/// Once every symbol has been seen the multiplier stays at `1`.
#[derive(Clone, Debug)]
pub struct AdaptiveA {
    /// How many times each symbol has been observed.
    real: FrequencyIndex,

    /// `1` for each symbol observed at least once.
    unique: FrequencyIndex,
}

impl AdaptiveA {
    /// Returns the number of distinct symbols not yet seen.
    #[inline(always)]
    fn unseen(&self) -> Count {
        self.max_ord() - self.unique.total()
    }

    /// The weight of a single observation.
    #[inline(always)]
    fn multiplier(&self) -> Count {
        self.unseen().max(1)
    }

    /// Returns the cumulative weight of all the symbols `<= ordinal`.
    fn cumulative_high(&self, ordinal: Ordinal) -> Count {
        let unique = self.unique.prefix_sum(ordinal);
        (ordinal + 1 - unique) + self.multiplier() * self.real.prefix_sum(ordinal)
    }
}

impl EscapeModel for AdaptiveA {
    fn with_max_ord(max_ord: Ordinal) -> Self {
        Self {
            real: FrequencyIndex::new(max_ord),
            unique: FrequencyIndex::new(max_ord),
        }
    }

    fn observed(&self) -> Count {
        self.real.total()
    }
}

impl ProbabilityModel for AdaptiveA {
    fn max_ord(&self) -> Ordinal {
        self.real.max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        check_ordinal(ordinal, self.max_ord())?;
        let multiplier = self.multiplier();
        let unseen_below = ordinal - self.unique.sum_below(ordinal);
        let low = unseen_below + multiplier * self.real.sum_below(ordinal);
        let width = match self.real.count(ordinal) {
            0 => 1,
            seen => seen * multiplier,
        };
        Ok(FrequencyStats::new(low, low + width, self.total_count()))
    }

    fn commit(&mut self, ordinal: Ordinal) {
        if self.real.count(ordinal) == 0 {
            self.unique.update(ordinal, 1);
        }
        self.real.update(ordinal, 1);
    }

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        check_position(position, self.total_count())?;
        Ok(monotone_search(self.max_ord(), position, |ordinal| {
            self.cumulative_high(ordinal)
        }))
    }

    fn total_count(&self) -> Count {
        self.unseen() + self.multiplier() * self.real.total()
    }
}
