use log::debug;

use crate::error::Result;
use crate::models::ProbabilityModel;
use crate::range_coder::{narrow, CodingStats, Precision, Step, Tick};
use crate::stream::BitWriter;
use crate::{CodeValue, Ordinal};

/// Encodes words with the statistics of a [`ProbabilityModel`], appending the payload bits to a
/// [`BitWriter`].
///
/// The payload is only complete after [`finish`](Self::finish), which returns the counts the
/// decoder needs: how many words were coded and how many bits they occupy.
pub struct Encoder<'a, M: ProbabilityModel> {
    model: M,

    out: &'a mut BitWriter,

    precision: Precision,

    low: CodeValue,

    high: CodeValue,

    /// The number of deferred bits, to be emitted with the opposite value of the next settled
    /// one.
    bits_to_follow: u64,

    stats: CodingStats,
}

impl<'a, M: ProbabilityModel> Encoder<'a, M> {
    /// Creates an encoder with the default precision.
    pub fn new(model: M, out: &'a mut BitWriter) -> Self {
        Self::with_precision(model, out, Precision::default())
    }

    pub fn with_precision(model: M, out: &'a mut BitWriter, precision: Precision) -> Self {
        Self {
            model,
            out,
            precision,
            low: 0,
            high: precision.total,
            bits_to_follow: 0,
            stats: CodingStats::default(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Encodes a single word.
    pub fn encode(&mut self, ordinal: Ordinal) -> Result<()> {
        self.precision.check_total(self.model.total_count())?;
        let stats = self.model.stats_for(ordinal)?;

        (self.low, self.high) = narrow(self.low, self.high, &stats);

        while let Some((step, _)) = self.precision.step(&mut self.low, &mut self.high) {
            match step {
                Step::Lower => self.emit(false),
                Step::Upper => self.emit(true),
                Step::Middle => self.bits_to_follow += 1,
            }
        }
        self.stats.words += 1;
        Ok(())
    }

    /// Encodes every word of `words`, calling `tick` after each of them.
    pub fn encode_all(
        &mut self,
        words: impl IntoIterator<Item = Ordinal>,
        mut tick: Tick,
    ) -> Result<()> {
        for ordinal in words {
            self.encode(ordinal)?;
            if let Some(tick) = tick.as_mut() {
                tick(self.stats.words);
            }
        }
        Ok(())
    }

    /// Emits the bits that disambiguate the final range and returns the number of coded words
    /// and payload bits.
    pub fn finish(mut self) -> CodingStats {
        self.bits_to_follow += 1;
        let bit = self.low >= self.precision.quarter;
        self.emit(bit);
        debug!(
            "encoded {} words in {} bits",
            self.stats.words, self.stats.bits
        );
        self.stats
    }

    /// Emits a settled bit followed by the deferred ones.
    #[inline(always)]
    fn emit(&mut self, bit: bool) {
        self.out.put_bit(bit);
        self.out.put_bits_repeat(!bit, self.bits_to_follow);
        self.stats.bits += 1 + self.bits_to_follow;
        self.bits_to_follow = 0;
    }
}
