use crate::error::Result;
use crate::frequency_index::FrequencyIndex;
use crate::models::{check_ordinal, check_position, monotone_search, EscapeModel, ProbabilityModel};
use crate::{Count, FrequencyStats, Ordinal};

/// An adaptive model with an escape mechanism in the style of method "D".
///
/// With `U` distinct symbols and `R` observations so far, a symbol seen `k` times has weight
/// `(2k − 1) · (max_ord − U)` and every unseen symbol has weight `U`, for a total of
/// `2R · (max_ord − U)`. Equivalently, the lower bound of `o` is
///
/// ```text
/// 2 · (max_ord − U) · real_below(o) + o · U − max_ord · unique_below(o)
/// ```
///
/// Before the first observation the model is uniform over `max_ord`; once every symbol has been
/// seen the `max_ord − U` multiplier stays at `1`.
#[derive(Clone, Debug)]
pub struct AdaptiveD {
    /// How many times each symbol has been observed.
    real: FrequencyIndex,

    /// `1` for each symbol observed at least once.
    unique: FrequencyIndex,
}

impl AdaptiveD {
    #[inline(always)]
    fn unseen(&self) -> Count {
        self.max_ord() - self.unique.total()
    }

    #[inline(always)]
    fn multiplier(&self) -> Count {
        self.unseen().max(1)
    }

    /// Returns the cumulative weight of all the symbols `<= ordinal`, once at least one symbol
    /// has been seen.
    fn cumulative_high(&self, ordinal: Ordinal) -> Count {
        let distinct = self.unique.total();
        let unique = self.unique.prefix_sum(ordinal);
        let real = self.real.prefix_sum(ordinal);
        self.multiplier() * (2 * real - unique) + (ordinal + 1 - unique) * distinct
    }
}

impl EscapeModel for AdaptiveD {
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

impl ProbabilityModel for AdaptiveD {
    fn max_ord(&self) -> Ordinal {
        self.real.max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        check_ordinal(ordinal, self.max_ord())?;
        let distinct = self.unique.total();
        if distinct == 0 {
            return Ok(FrequencyStats::new(ordinal, ordinal + 1, self.max_ord()));
        }

        let multiplier = self.multiplier();
        let unique_below = self.unique.sum_below(ordinal);
        let real_below = self.real.sum_below(ordinal);
        let low = multiplier * (2 * real_below - unique_below) + (ordinal - unique_below) * distinct;
        let width = match self.real.count(ordinal) {
            0 => distinct,
            seen => (2 * seen - 1) * multiplier,
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
        if self.unique.total() == 0 {
            return Ok(position);
        }
        Ok(monotone_search(self.max_ord(), position, |ordinal| {
            self.cumulative_high(ordinal)
        }))
    }

    fn total_count(&self) -> Count {
        let distinct = self.unique.total();
        match distinct {
            0 => self.max_ord(),
            _ => self.multiplier() * (2 * self.real.total() - distinct) + self.unseen() * distinct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::assert_consistent;

    fn width_and_total(model: &mut AdaptiveD, symbol: char) -> (Count, Count) {
        let stats = model.stats_for(symbol as Ordinal).unwrap();
        (stats.width(), stats.total)
    }

    #[test]
    fn documented_sequence() {
        let mut model = AdaptiveD::with_max_ord(256);
        assert_eq!(width_and_total(&mut model, 'I'), (1, 256));
        assert_eq!(width_and_total(&mut model, 'F'), (1, 510));
        assert_eq!(width_and_total(&mut model, '_'), (2, 1016));
        assert_eq!(width_and_total(&mut model, 'W'), (3, 1518));
        assert_eq!(width_and_total(&mut model, 'E'), (4, 2016));
        // '_' again: seen once, weight (2·1 − 1) · (256 − 5)
        assert_eq!(width_and_total(&mut model, '_'), (251, 2510));
        assert_eq!(model.observed(), 6);
        assert_consistent(&model, 0..256);
    }

    #[test]
    fn lower_bound_matches_closed_form() {
        let mut model = AdaptiveD::with_max_ord(256);
        for symbol in "IF_WE_CA".chars() {
            let ordinal = symbol as Ordinal;
            let max_ord = 256_i64;
            let distinct = model.unique.total() as i64;
            let expected = 2 * (max_ord - distinct) * model.real.sum_below(ordinal) as i64
                + ordinal as i64 * distinct
                - max_ord * model.unique.sum_below(ordinal) as i64;
            let stats = model.stats_for(ordinal).unwrap();
            if distinct > 0 {
                assert_eq!(stats.low as i64, expected, "symbol {symbol}");
            }
        }
    }

    #[test]
    fn saturated_alphabet_stays_codable() {
        let mut model = AdaptiveD::with_max_ord(3);
        for ordinal in [2, 0, 1, 1] {
            model.stats_for(ordinal).unwrap();
            assert_consistent(&model, 0..3);
        }
        // weights 2·k − 1: [1, 3, 1]
        assert_eq!(model.total_count(), 5);
        assert_eq!(model.peek(1).unwrap(), FrequencyStats::new(1, 4, 5));
    }
}
