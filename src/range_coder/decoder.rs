use log::debug;

use crate::error::Result;
use crate::models::ProbabilityModel;
use crate::range_coder::{narrow, Precision, Tick};
use crate::stream::BitReader;
use crate::utils::scaled_math::mul_dec_div;
use crate::{CodeValue, Ordinal};

/// Decodes words produced by an [`Encoder`](crate::range_coder::Encoder) driven by an identical
/// model.
///
/// The decoder reads at most `coded_bits` bits from the reader, starting at its current position;
/// beyond that budget it behaves as if the stream continued with zeros, so that the bits that
/// follow the payload are left untouched.
pub struct Decoder<'a, 'b, M: ProbabilityModel> {
    model: M,

    input: &'b mut BitReader<'a>,

    /// How many payload bits are left to read.
    budget: u64,

    precision: Precision,

    low: CodeValue,

    high: CodeValue,

    /// The window of the coded stream aligned with `[low, high)`.
    value: CodeValue,
}

impl<'a, 'b, M: ProbabilityModel> Decoder<'a, 'b, M> {
    /// Creates a decoder with the default precision.
    pub fn new(model: M, input: &'b mut BitReader<'a>, coded_bits: u64) -> Self {
        Self::with_precision(model, input, coded_bits, Precision::default())
    }

    pub fn with_precision(
        model: M,
        input: &'b mut BitReader<'a>,
        coded_bits: u64,
        precision: Precision,
    ) -> Self {
        let mut decoder = Self {
            model,
            input,
            budget: coded_bits,
            precision,
            low: 0,
            high: precision.total,
            value: 0,
        };
        for _ in 0..precision.bits {
            decoder.value = (decoder.value << 1) | decoder.next_bit() as CodeValue;
        }
        decoder
    }

    /// Decodes a single word.
    pub fn decode(&mut self) -> Result<Ordinal> {
        let total = self.model.total_count();
        self.precision.check_total(total)?;

        let width = self.high - self.low;
        let offset = self.value - self.low + 1;
        let position = mul_dec_div(offset, total, width);
        let ordinal = self.model.ordinal_for(position)?;

        let stats = self.model.stats_for(ordinal)?;
        (self.low, self.high) = narrow(self.low, self.high, &stats);

        while let Some((_, offset)) = self.precision.step(&mut self.low, &mut self.high) {
            self.value = 2 * (self.value - offset) | self.next_bit() as CodeValue;
        }
        Ok(ordinal)
    }

    /// Decodes `words` words, calling `tick` after each of them.
    pub fn decode_all(&mut self, words: u64, mut tick: Tick) -> Result<Vec<Ordinal>> {
        let mut decoded = Vec::with_capacity(words as usize);
        for index in 0..words {
            decoded.push(self.decode()?);
            if let Some(tick) = tick.as_mut() {
                tick(index + 1);
            }
        }
        debug!("decoded {} words, {} payload bits unread", words, self.budget);
        Ok(decoded)
    }

    #[inline(always)]
    fn next_bit(&mut self) -> bool {
        match self.budget {
            0 => false,
            _ => {
                self.budget -= 1;
                self.input.take_bit()
            }
        }
    }
}
