//! Models whose statistics come from a dictionary of symbol frequencies transmitted ahead of the
//! payload, rather than being learned while coding.

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::frequency_index::FrequencyIndex;
use crate::models::{check_ordinal, check_position, ProbabilityModel};
use crate::{Count, FrequencyStats, Ordinal};

/// The frequencies of the symbols of a sequence, as `(ordinal, count)` pairs with strictly
/// increasing ordinals and non-zero counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    max_ord: Ordinal,
    entries: Vec<(Ordinal, Count)>,
}

impl Dictionary {
    /// Validates and wraps the given entries.
    pub fn new(max_ord: Ordinal, entries: Vec<(Ordinal, Count)>) -> Result<Self> {
        if let Some((ordinal, _)) = entries.iter().find(|(_, count)| *count == 0) {
            return Err(Error::InvalidDictionary(format!("symbol {ordinal} has count zero")));
        }
        if let Some(((first, _), (second, _))) = entries.iter().tuple_windows().find(|(a, b)| a.0 >= b.0) {
            return Err(Error::InvalidDictionary(format!(
                "ordinal {second} follows ordinal {first}"
            )));
        }
        if let Some((last, _)) = entries.last() {
            if *last >= max_ord {
                return Err(Error::InvalidDictionary(format!(
                    "ordinal {last} exceeds the alphabet of {max_ord} symbols"
                )));
            }
        }
        Ok(Self { max_ord, entries })
    }

    /// Counts the occurrences of each symbol of `symbols`.
    pub fn from_symbols(max_ord: Ordinal, symbols: &[Ordinal]) -> Result<Self> {
        let entries = symbols
            .iter()
            .copied()
            .sorted_unstable()
            .dedup_with_count()
            .map(|(count, ordinal)| (ordinal, count as Count))
            .collect();
        Self::new(max_ord, entries)
    }

    pub fn max_ord(&self) -> Ordinal {
        self.max_ord
    }

    pub fn entries(&self) -> &[(Ordinal, Count)] {
        &self.entries
    }

    /// Returns the sum of all the counts.
    pub fn total(&self) -> Count {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    fn to_index(&self) -> FrequencyIndex {
        let mut index = FrequencyIndex::new(self.max_ord);
        for (ordinal, count) in &self.entries {
            index.update(*ordinal, *count as i64);
        }
        index
    }
}

/// Looks up the interval of `ordinal` in `index`, failing with `missing` if its count is zero.
fn lookup(index: &FrequencyIndex, ordinal: Ordinal, missing: fn(Ordinal) -> Error) -> Result<FrequencyStats> {
    check_ordinal(ordinal, index.max_ord())?;
    match index.count(ordinal) {
        0 => Err(missing(ordinal)),
        count => {
            let low = index.sum_below(ordinal);
            Ok(FrequencyStats::new(low, low + count, index.total()))
        }
    }
}

fn locate(index: &FrequencyIndex, position: Count) -> Result<Ordinal> {
    let total = index.total();
    check_position(position, total)?;
    index
        .find(position)
        .ok_or(Error::PositionOutOfRange { position, total })
}

/// Frequencies are frozen at construction: observing a symbol changes nothing.
#[derive(Clone, Debug)]
pub struct StaticModel {
    counts: FrequencyIndex,
}

impl StaticModel {
    pub fn new(dictionary: &Dictionary) -> Self {
        Self {
            counts: dictionary.to_index(),
        }
    }
}

impl ProbabilityModel for StaticModel {
    fn max_ord(&self) -> Ordinal {
        self.counts.max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        lookup(&self.counts, ordinal, Error::UnknownSymbol)
    }

    fn commit(&mut self, _ordinal: Ordinal) {}

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        locate(&self.counts, position)
    }

    fn total_count(&self) -> Count {
        self.counts.total()
    }
}

/// A finite supply of symbols: each observation consumes one occurrence. When the dictionary
/// describes the coded sequence exactly, the last symbols are coded almost for free.
#[derive(Clone, Debug)]
pub struct DecreasingModel {
    remaining: FrequencyIndex,
}

impl DecreasingModel {
    pub fn new(dictionary: &Dictionary) -> Self {
        Self {
            remaining: dictionary.to_index(),
        }
    }
}

impl ProbabilityModel for DecreasingModel {
    fn max_ord(&self) -> Ordinal {
        self.remaining.max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        lookup(&self.remaining, ordinal, Error::ExhaustedSymbol)
    }

    fn commit(&mut self, ordinal: Ordinal) {
        self.remaining.update(ordinal, -1);
    }

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        locate(&self.remaining, position)
    }

    fn total_count(&self) -> Count {
        self.remaining.total()
    }
}
