//! Compressing byte buffers: slicing them into words, coding the words and framing the payload
//! with a [header](header::Header).

pub mod header;
pub mod words;

use clap::ValueEnum;
use log::info;

use crate::error::{Error, Result};
use crate::models::{ContextGeometry, Dictionary};
use crate::range_coder::{Decoder, Encoder, Precision, Tick};
use crate::stream::{BitReader, BitWriter};
use crate::utils::entropy;
use crate::{Count, Ordinal};

use header::{Header, ModelParams};
use words::{check_width, split_words, WordPacker};

/// Which probability model codes the words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum ModelKind {
    /// Every word equally likely.
    Uniform,
    /// Word frequencies measured beforehand and stored in the header.
    Static,
    /// Like `static`, but every coded word is removed from the stored frequencies.
    Decreasing,
    /// Every occurrence adds a fixed weight to its word.
    Plain,
    /// Escape method A.
    A,
    /// Escape method D.
    D,
    /// Contexts of previous words, with method A statistics.
    PpmA,
    /// Contexts of previous words, with method D statistics.
    PpmD,
    /// Like `ppm-d`, but a context is only used once it has seen enough words.
    PpmDConfident,
}

/// How to compress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// The width of the coded words, in bits.
    pub word_bits: u16,

    pub model: ModelKind,

    /// The weight an occurrence adds, for [`ModelKind::Plain`].
    pub ratio: Count,

    /// The context shape, for the PPM kinds.
    pub context: ContextGeometry,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            word_bits: 8,
            model: ModelKind::PpmD,
            ratio: 16,
            context: ContextGeometry::default(),
        }
    }
}

impl ArchiveConfig {
    /// Checks the configuration before anything is coded.
    pub fn validate(&self) -> Result<()> {
        check_width(self.word_bits)?;
        match self.model {
            ModelKind::Plain => check_ratio(1 << self.word_bits, self.ratio, 1),
            _ => Ok(()),
        }
    }

    fn model_params(&self, words: &[Ordinal]) -> Result<ModelParams> {
        let max_ord = 1 << self.word_bits;
        Ok(match self.model {
            ModelKind::Uniform => ModelParams::Uniform,
            ModelKind::Static => ModelParams::Static(Dictionary::from_symbols(max_ord, words)?),
            ModelKind::Decreasing => {
                ModelParams::Decreasing(Dictionary::from_symbols(max_ord, words)?)
            }
            ModelKind::Plain => ModelParams::Plain { ratio: self.ratio },
            ModelKind::A => ModelParams::A,
            ModelKind::D => ModelParams::D,
            ModelKind::PpmA => ModelParams::PpmA(self.context),
            ModelKind::PpmD => ModelParams::PpmD(self.context),
            ModelKind::PpmDConfident => ModelParams::PpmDConfident(self.context),
        })
    }
}

/// Fails with [`Error::TotalTooLarge`] if `observations` words coded with the plain model push
/// its total beyond what the coder accepts.
pub(crate) fn check_ratio(max_ord: Ordinal, ratio: Count, observations: u64) -> Result<()> {
    let limit = Precision::default().max_model_total();
    let total = ratio
        .checked_mul(observations)
        .and_then(|weight| weight.checked_add(max_ord));
    match total {
        Some(total) if total <= limit => Ok(()),
        total => Err(Error::TotalTooLarge {
            total: total.unwrap_or(Count::MAX),
            limit,
        }),
    }
}

/// What a compression produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArchiveStats {
    pub input_bytes: usize,

    pub output_bytes: usize,

    pub words: u64,

    /// The length of the coded payload.
    pub payload_bits: u64,

    pub tail_bits: u64,

    /// The empirical order-0 entropy of the words, in bits per word.
    pub entropy: f64,
}

impl ArchiveStats {
    /// The average cost of a word in the payload.
    pub fn bits_per_word(&self) -> f64 {
        match self.words {
            0 => 0.0,
            words => self.payload_bits as f64 / words as f64,
        }
    }

    /// The size of the archive relative to the input.
    pub fn ratio(&self) -> f64 {
        match self.input_bytes {
            0 => 0.0,
            input => self.output_bytes as f64 / input as f64,
        }
    }
}

/// Compresses `data` according to `config`. `tick` is called after each coded word.
pub fn compress(data: &[u8], config: &ArchiveConfig, tick: Tick) -> Result<(Vec<u8>, ArchiveStats)> {
    config.validate()?;
    let (words, tail) = split_words(data, config.word_bits)?;
    if config.model == ModelKind::Plain {
        // the last word is coded before its own observation is counted
        let observations = words.len().saturating_sub(1) as u64;
        check_ratio(1 << config.word_bits, config.ratio, observations)?;
    }

    let header = Header {
        word_bits: config.word_bits,
        tail_bits: tail.len() as u16,
        model: config.model_params(&words)?,
    };
    let mut out = BitWriter::with_capacity(data.len() / 2 + 64);
    let pending = header.write(&mut out)?;

    let mut encoder = Encoder::new(header.model.build(header.max_ord()), &mut out);
    encoder.encode_all(words.iter().copied(), tick)?;
    let coding = encoder.finish();
    pending.fill(&mut out, coding);

    for bit in tail {
        out.put_bit(bit);
    }
    let archive = out.into_bytes();

    let counts = Dictionary::from_symbols(header.max_ord(), &words)?
        .entries()
        .iter()
        .map(|(_, count)| *count as usize)
        .collect::<Vec<_>>();
    let stats = ArchiveStats {
        input_bytes: data.len(),
        output_bytes: archive.len(),
        words: coding.words,
        payload_bits: coding.bits,
        tail_bits: tail.len(),
        entropy: entropy(&counts, words.len() as f64),
    };
    info!(
        "{:?}: {} words of {} bits in {} payload bits ({:.3} bits/word, entropy {:.3}), {} -> {} bytes",
        config.model,
        stats.words,
        config.word_bits,
        stats.payload_bits,
        stats.bits_per_word(),
        stats.entropy,
        stats.input_bytes,
        stats.output_bytes,
    );
    Ok((archive, stats))
}

/// Restores the data compressed into `archive` with a model of the given kind. `tick` is called
/// after each decoded word.
pub fn decompress(archive: &[u8], kind: ModelKind, tick: Tick) -> Result<Vec<u8>> {
    let mut input = BitReader::new(archive);
    let (header, coding) = Header::read(&mut input, kind)?;
    let payload_start = input.position();

    let mut decoder = Decoder::new(header.model.build(header.max_ord()), &mut input, coding.bits);
    let words = decoder.decode_all(coding.words, tick)?;

    let tail_start = payload_start + coding.bits;
    let tail = input.range(tail_start, tail_start + header.tail_bits as u64);

    let mut packer = WordPacker::with_capacity(header.word_bits, words.len())?;
    packer.extend(words);
    packer.push_tail(tail);
    let data = packer.finish();
    info!(
        "{:?}: decoded {} words of {} bits into {} bytes",
        kind,
        coding.words,
        header.word_bits,
        data.len()
    );
    Ok(data)
}
