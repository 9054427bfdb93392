//! Bit-exact stream I/O.
//!
//! Bits are packed MSB-first inside each byte and multi-byte integers are big-endian. Byte-level
//! fields can only be written or read at byte boundaries: mixing them with a pending partial byte
//! is rejected with [`Error::MisalignedByteAccess`](crate::Error::MisalignedByteAccess).

pub mod reader;
pub mod writer;

pub use reader::{BitRange, BitReader, Bits};
pub use writer::{BitWriter, Slot};

/// Unsigned integers that are stored as a fixed number of big-endian bytes.
pub trait FixedWidth: Copy {
    /// How many bytes the value occupies on the stream.
    const BYTES: usize;

    /// Writes the value into `out`, which is exactly [`Self::BYTES`] long.
    fn write_be(self, out: &mut [u8]);

    /// Reads a value from `bytes`, which is exactly [`Self::BYTES`] long.
    fn read_be(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const BYTES: usize = std::mem::size_of::<$ty>();

                #[inline(always)]
                fn write_be(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_be_bytes());
                }

                #[inline(always)]
                fn read_be(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(buf)
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32, u64);
