//! Slicing a byte buffer into fixed-width words and packing them back.

use crate::error::{Error, Result};
use crate::stream::{BitRange, BitReader, BitWriter};
use crate::{Ordinal, MAX_WORD_BITS, MIN_WORD_BITS};

/// Fails with [`Error::UnsupportedWordWidth`] if `width` is outside
/// [`MIN_WORD_BITS`]`..=`[`MAX_WORD_BITS`].
pub fn check_width(width: u16) -> Result<()> {
    match (MIN_WORD_BITS..=MAX_WORD_BITS).contains(&width) {
        true => Ok(()),
        false => Err(Error::UnsupportedWordWidth(width)),
    }
}

/// Splits `bytes` into MSB-first words of `width` bits. The bits that don't fill a whole word
/// are returned as the tail.
pub fn split_words(bytes: &[u8], width: u16) -> Result<(Vec<Ordinal>, BitRange<'_>)> {
    check_width(width)?;
    let mut reader = BitReader::new(bytes);
    let count = reader.bit_len() / width as u64;

    let words = (0..count)
        .map(|_| reader.take_bits(width as u32))
        .collect::<Vec<_>>();
    let tail = reader.range_from(reader.position());
    Ok((words, tail))
}

/// The inverse of [`split_words`]: concatenates words of a fixed width, then the tail bits.
#[derive(Debug)]
pub struct WordPacker {
    width: u16,
    out: BitWriter,
}

impl WordPacker {
    pub fn new(width: u16) -> Result<Self> {
        check_width(width)?;
        Ok(Self {
            width,
            out: BitWriter::new(),
        })
    }

    /// Creates a packer whose buffer can hold `words` words without reallocating.
    pub fn with_capacity(width: u16, words: usize) -> Result<Self> {
        check_width(width)?;
        Ok(Self {
            width,
            out: BitWriter::with_capacity(words * width as usize / 8 + 1),
        })
    }

    #[inline(always)]
    pub fn push(&mut self, word: Ordinal) {
        debug_assert!(word >> self.width == 0, "word {word} wider than {} bits", self.width);
        self.out.put_bits(word, self.width as u32);
    }

    pub fn extend(&mut self, words: impl IntoIterator<Item = Ordinal>) {
        for word in words {
            self.push(word);
        }
    }

    /// Appends raw bits after the words.
    pub fn push_tail(&mut self, tail: BitRange) {
        for bit in tail {
            self.out.put_bit(bit);
        }
    }

    /// Returns the packed bytes. A partial last byte is padded with zeros.
    pub fn finish(self) -> Vec<u8> {
        self.out.into_bytes()
    }
}
