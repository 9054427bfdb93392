//! The archive header.
//!
//! ```text
//! u16 word_bits
//! u16 tail_bits
//! model parameters:
//!     plain:              u64 ratio
//!     ppm-*:              u8 cell_count, u8 cell_bits
//!     static, decreasing: u64 entry_count, entry_count × (u32 ordinal, u64 count)
//!     others:             nothing
//! u64 words
//! u64 coded_bits
//! ```
//!
//! The model kind itself is not stored: the reader must be told which one to expect.

use crate::archive::{check_ratio, ModelKind};
use crate::error::Result;
use crate::models::{
    AdaptiveA, AdaptiveD, ContextGate, ContextGeometry, DecreasingModel, Dictionary, EscapeModel,
    PlainAdaptive, PpmA, PpmD, ProbabilityModel, StaticModel, UniformModel,
};
use crate::range_coder::CodingStats;
use crate::stream::{BitReader, BitWriter, Slot};
use crate::{Count, Ordinal};

/// A model kind together with the parameters it is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelParams {
    Uniform,
    Static(Dictionary),
    Decreasing(Dictionary),
    Plain { ratio: Count },
    A,
    D,
    PpmA(ContextGeometry),
    PpmD(ContextGeometry),
    PpmDConfident(ContextGeometry),
}

impl ModelParams {
    /// Builds a fresh model over `[0, max_ord)`.
    pub fn build(&self, max_ord: Ordinal) -> Box<dyn ProbabilityModel> {
        match self {
            Self::Uniform => Box::new(UniformModel::new(max_ord)),
            Self::Static(dictionary) => Box::new(StaticModel::new(dictionary)),
            Self::Decreasing(dictionary) => Box::new(DecreasingModel::new(dictionary)),
            Self::Plain { ratio } => Box::new(PlainAdaptive::new(max_ord, *ratio)),
            Self::A => Box::new(AdaptiveA::with_max_ord(max_ord)),
            Self::D => Box::new(AdaptiveD::with_max_ord(max_ord)),
            Self::PpmA(geometry) => Box::new(PpmA::new(max_ord, *geometry, ContextGate::FirstHit)),
            Self::PpmD(geometry) => Box::new(PpmD::new(max_ord, *geometry, ContextGate::FirstHit)),
            Self::PpmDConfident(geometry) => {
                Box::new(PpmD::new(max_ord, *geometry, ContextGate::Confident))
            }
        }
    }

    fn write(&self, out: &mut BitWriter) -> Result<()> {
        match self {
            Self::Plain { ratio } => out.put_int(*ratio)?,
            Self::Static(dictionary) | Self::Decreasing(dictionary) => {
                out.put_int(dictionary.entries().len() as u64)?;
                for (ordinal, count) in dictionary.entries() {
                    // ordinals are below 2^32
                    out.put_int(*ordinal as u32)?;
                    out.put_int(*count)?;
                }
            }
            Self::PpmA(geometry) | Self::PpmD(geometry) | Self::PpmDConfident(geometry) => {
                out.put_int(geometry.cell_count())?;
                out.put_int(geometry.cell_bits())?;
            }
            Self::Uniform | Self::A | Self::D => {}
        }
        Ok(())
    }

    fn read(input: &mut BitReader, kind: ModelKind, max_ord: Ordinal) -> Result<Self> {
        let read_geometry = |input: &mut BitReader| -> Result<ContextGeometry> {
            let cell_count = input.take_int::<u8>()?;
            let cell_bits = input.take_int::<u8>()?;
            ContextGeometry::new(cell_bits, cell_count)
        };
        let read_dictionary = |input: &mut BitReader| -> Result<Dictionary> {
            let len = input.take_int::<u64>()?;
            let mut entries = Vec::new();
            for _ in 0..len {
                let ordinal = input.take_int::<u32>()?;
                let count = input.take_int::<u64>()?;
                entries.push((ordinal as Ordinal, count));
            }
            Dictionary::new(max_ord, entries)
        };

        Ok(match kind {
            ModelKind::Uniform => Self::Uniform,
            ModelKind::Static => Self::Static(read_dictionary(input)?),
            ModelKind::Decreasing => Self::Decreasing(read_dictionary(input)?),
            ModelKind::Plain => {
                let ratio = input.take_int()?;
                check_ratio(max_ord, ratio, 1)?;
                Self::Plain { ratio }
            }
            ModelKind::A => Self::A,
            ModelKind::D => Self::D,
            ModelKind::PpmA => Self::PpmA(read_geometry(input)?),
            ModelKind::PpmD => Self::PpmD(read_geometry(input)?),
            ModelKind::PpmDConfident => Self::PpmDConfident(read_geometry(input)?),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub word_bits: u16,

    /// How many raw bits follow the coded payload.
    pub tail_bits: u16,

    pub model: ModelParams,
}

/// The header fields that are only known once the payload has been coded.
#[derive(Debug)]
pub struct PendingCounts {
    words: Slot<u64>,
    coded_bits: Slot<u64>,
}

impl PendingCounts {
    pub fn fill(self, out: &mut BitWriter, stats: CodingStats) {
        out.patch(self.words, stats.words);
        out.patch(self.coded_bits, stats.bits);
    }
}

impl Header {
    /// The size of the alphabet of the coded words.
    pub fn max_ord(&self) -> Ordinal {
        1 << self.word_bits
    }

    /// Writes the header, leaving the word and bit counts to be filled after coding.
    pub fn write(&self, out: &mut BitWriter) -> Result<PendingCounts> {
        out.put_int(self.word_bits)?;
        out.put_int(self.tail_bits)?;
        self.model.write(out)?;
        Ok(PendingCounts {
            words: out.reserve()?,
            coded_bits: out.reserve()?,
        })
    }

    /// Reads a header written for a model of the given kind, returning it with the counts of
    /// the payload that follows.
    pub fn read(input: &mut BitReader, kind: ModelKind) -> Result<(Self, CodingStats)> {
        let word_bits = input.take_int::<u16>()?;
        crate::archive::words::check_width(word_bits)?;
        let tail_bits = input.take_int::<u16>()?;
        let model = ModelParams::read(input, kind, 1 << word_bits)?;
        let stats = CodingStats {
            words: input.take_int()?,
            bits: input.take_int()?,
        };
        Ok((
            Self {
                word_bits,
                tail_bits,
                model,
            },
            stats,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn written(header: &Header, stats: CodingStats) -> Vec<u8> {
        let mut out = BitWriter::new();
        let pending = header.write(&mut out).unwrap();
        pending.fill(&mut out, stats);
        out.into_bytes()
    }

    #[test]
    fn fields_are_laid_out_in_order() {
        let header = Header {
            word_bits: 12,
            tail_bits: 4,
            model: ModelParams::PpmD(ContextGeometry::new(6, 3).unwrap()),
        };
        let stats = CodingStats { words: 5, bits: 300 };
        let bytes = written(&header, stats);
        #[rustfmt::skip]
        let expected = [
            0, 12,
            0, 4,
            3, 6,
            0, 0, 0, 0, 0, 0, 0, 5,
            0, 0, 0, 0, 0, 0, 0x01, 0x2C,
        ];
        assert_eq!(bytes, expected);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(Header::read(&mut reader, ModelKind::PpmD).unwrap(), (header, stats));
        assert_eq!(reader.position(), 8 * expected.len() as u64);
    }

    #[test]
    fn dictionary_travels_with_the_header() {
        let dictionary = Dictionary::new(256, vec![(1, 10), (200, 3)]).unwrap();
        let header = Header {
            word_bits: 8,
            tail_bits: 0,
            model: ModelParams::Decreasing(dictionary),
        };
        let stats = CodingStats { words: 13, bits: 9 };
        let bytes = written(&header, stats);
        assert_eq!(bytes.len(), 4 + 8 + 2 * 12 + 16);

        let mut reader = BitReader::new(&bytes);
        let (read, _) = Header::read(&mut reader, ModelKind::Decreasing).unwrap();
        assert_eq!(read, header);
    }

    #[test]
    fn short_buffers_are_reported() {
        let header = Header {
            word_bits: 8,
            tail_bits: 0,
            model: ModelParams::Plain { ratio: 4 },
        };
        let bytes = written(&header, CodingStats::default());
        let mut reader = BitReader::new(&bytes[..10]);
        assert!(matches!(
            Header::read(&mut reader, ModelKind::Plain),
            Err(Error::Truncated { offset: 4, needed: 8 })
        ));
    }

    #[test]
    fn oversized_ratio_is_rejected_on_read() {
        let header = Header {
            word_bits: 16,
            tail_bits: 0,
            model: ModelParams::Plain { ratio: Count::MAX },
        };
        let bytes = written(&header, CodingStats::default());
        let mut reader = BitReader::new(&bytes);
        assert!(matches!(
            Header::read(&mut reader, ModelKind::Plain),
            Err(Error::TotalTooLarge { total: Count::MAX, .. })
        ));
    }

    #[test]
    fn bad_word_width_is_rejected() {
        let mut reader = BitReader::new(&[0, 40, 0, 0]);
        assert!(matches!(
            Header::read(&mut reader, ModelKind::A),
            Err(Error::UnsupportedWordWidth(40))
        ));
    }
}
