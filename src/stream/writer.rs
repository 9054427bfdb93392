use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::stream::FixedWidth;

/// A position inside a [`BitWriter`] reserved for a value of type `T` that is only known later,
/// such as the number of coded words.
#[derive(Debug)]
pub struct Slot<T: FixedWidth> {
    offset: usize,
    _marker: PhantomData<T>,
}

/// An append-only writer of bits and big-endian bytes over an owned buffer.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,

    /// How many bits of the last byte are already used; zero means byte-aligned.
    used_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            used_bits: 0,
        }
    }

    /// Returns the number of bits written so far.
    pub fn bit_len(&self) -> u64 {
        match self.used_bits {
            0 => self.bytes.len() as u64 * 8,
            used => (self.bytes.len() as u64 - 1) * 8 + used as u64,
        }
    }

    /// Returns `true` if no partial byte is pending.
    pub fn is_aligned(&self) -> bool {
        self.used_bits == 0
    }

    #[inline(always)]
    pub fn put_bit(&mut self, bit: bool) {
        if self.used_bits == 0 {
            self.bytes.push(0);
        }
        if bit {
            // the vector is non-empty: a byte was pushed above or is partially filled
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> self.used_bits;
        }
        self.used_bits = (self.used_bits + 1) & 7;
    }

    /// Writes the same bit `n` times.
    pub fn put_bits_repeat(&mut self, bit: bool, mut n: u64) {
        // fill the pending byte bit by bit, then whole bytes at once
        while n > 0 && self.used_bits != 0 {
            self.put_bit(bit);
            n -= 1;
        }
        let fill = if bit { 0xFF } else { 0x00 };
        let whole = (n / 8) as usize;
        self.bytes.resize(self.bytes.len() + whole, fill);
        for _ in 0..n % 8 {
            self.put_bit(bit);
        }
    }

    /// Writes the `count` least significant bits of `value`, most significant first.
    pub fn put_bits(&mut self, value: u64, count: u32) {
        debug_assert!(count <= 64);
        for shift in (0..count).rev() {
            self.put_bit((value >> shift) & 1 == 1);
        }
    }

    pub fn put_byte(&mut self, byte: u8) -> Result<()> {
        self.check_aligned()?;
        self.bytes.push(byte);
        Ok(())
    }

    /// Writes a fixed-width integer in big-endian order.
    pub fn put_int<T: FixedWidth>(&mut self, value: T) -> Result<()> {
        self.check_aligned()?;
        let start = self.bytes.len();
        self.bytes.resize(start + T::BYTES, 0);
        value.write_be(&mut self.bytes[start..]);
        Ok(())
    }

    /// Reserves room for a fixed-width integer to be written later with [`patch`](Self::patch).
    /// The slot holds zeros until then.
    pub fn reserve<T: FixedWidth>(&mut self) -> Result<Slot<T>> {
        self.check_aligned()?;
        let offset = self.bytes.len();
        self.bytes.resize(offset + T::BYTES, 0);
        Ok(Slot {
            offset,
            _marker: PhantomData,
        })
    }

    /// Overwrites a previously reserved slot.
    pub fn patch<T: FixedWidth>(&mut self, slot: Slot<T>, value: T) {
        value.write_be(&mut self.bytes[slot.offset..slot.offset + T::BYTES]);
    }

    /// Returns the written bytes; a pending partial byte is padded with zeros.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn check_aligned(&self) -> Result<()> {
        match self.is_aligned() {
            true => Ok(()),
            false => Err(Error::MisalignedByteAccess(self.bit_len())),
        }
    }
}
