use crate::error::{Error, Result};
use crate::stream::FixedWidth;

#[inline(always)]
fn bit_at(bytes: &[u8], position: u64) -> bool {
    match bytes.get((position / 8) as usize) {
        Some(byte) => (byte >> (7 - (position % 8))) & 1 == 1,
        None => false,
    }
}

/// A seekable reader of bits and big-endian bytes over a borrowed buffer.
///
/// Reading bits past the end of the buffer yields `0`: the decoder runs a few bits beyond the
/// coded payload while draining its value register. Byte-level reads past the end are instead
/// reported as [`Error::Truncated`].
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],

    /// Absolute bit offset of the next bit to read.
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Returns the absolute bit offset of the next bit to read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the length of the underlying buffer in bits.
    pub fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }

    /// Moves the cursor to an absolute bit offset. Seeking past the end is allowed.
    pub fn seek(&mut self, bit_offset: u64) {
        self.position = bit_offset;
    }

    #[inline(always)]
    pub fn take_bit(&mut self) -> bool {
        let bit = bit_at(self.bytes, self.position);
        self.position += 1;
        bit
    }

    /// Reads `count` bits, most significant first, into the low bits of the result.
    pub fn take_bits(&mut self, count: u32) -> u64 {
        debug_assert!(count <= 64);
        (0..count).fold(0, |acc, _| (acc << 1) | self.take_bit() as u64)
    }

    pub fn take_byte(&mut self) -> Result<u8> {
        let offset = self.aligned_offset(1)?;
        self.position += 8;
        Ok(self.bytes[offset])
    }

    /// Reads a fixed-width big-endian integer.
    pub fn take_int<T: FixedWidth>(&mut self) -> Result<T> {
        let offset = self.aligned_offset(T::BYTES)?;
        self.position += 8 * T::BYTES as u64;
        Ok(T::read_be(&self.bytes[offset..offset + T::BYTES]))
    }

    /// Returns a repeatable view of the bits from `start` to the end of the buffer.
    pub fn range_from(&self, start: u64) -> BitRange<'a> {
        BitRange::new(self.bytes, start, self.bit_len().max(start))
    }

    /// Returns a repeatable view of the bits in `[start, end)`; bits past the buffer read as `0`.
    pub fn range(&self, start: u64, end: u64) -> BitRange<'a> {
        BitRange::new(self.bytes, start, end.max(start))
    }

    fn aligned_offset(&self, needed: usize) -> Result<usize> {
        if self.position % 8 != 0 {
            return Err(Error::MisalignedByteAccess(self.position));
        }
        let offset = (self.position / 8) as usize;
        if offset + needed > self.bytes.len() {
            return Err(Error::Truncated { offset, needed });
        }
        Ok(offset)
    }
}

/// A lazily-read range of bits of a buffer. Iterating does not consume the range, so it can be
/// walked several times.
#[derive(Clone, Copy, Debug)]
pub struct BitRange<'a> {
    bytes: &'a [u8],
    start: u64,
    end: u64,
}

impl<'a> BitRange<'a> {
    pub fn new(bytes: &'a [u8], start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { bytes, start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the first `len` bits of the range.
    pub fn take(&self, len: u64) -> BitRange<'a> {
        Self::new(self.bytes, self.start, self.start + len.min(self.len()))
    }

    pub fn iter(&self) -> Bits<'a> {
        Bits {
            bytes: self.bytes,
            position: self.start,
            end: self.end,
        }
    }
}

impl<'a> IntoIterator for BitRange<'a> {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &BitRange<'a> {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`BitRange`].
#[derive(Clone, Debug)]
pub struct Bits<'a> {
    bytes: &'a [u8],
    position: u64,
    end: u64,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    #[inline(always)]
    fn next(&mut self) -> Option<bool> {
        if self.position >= self.end {
            return None;
        }
        let bit = bit_at(self.bytes, self.position);
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.end - self.position) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Bits<'_> {}
