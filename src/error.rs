//! Error types for configuring models, shaping streams and coding words.

use thiserror::Error;

use crate::{Count, Ordinal};

/// Every failure the library can report. All of them surface before or outside the coding
/// loop: a corrupted payload is not detected and simply decodes to different words.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured word width is outside the supported range.
    #[error("unsupported word width: {0} bits (expected {min}..={max})", min = crate::MIN_WORD_BITS, max = crate::MAX_WORD_BITS)]
    UnsupportedWordWidth(u16),

    /// The context geometry doesn't fit in the counter precision.
    #[error("context of {cell_count} cells of {cell_bits} bits exceeds the {max}-bit limit", max = crate::MAX_CONTEXT_BITS)]
    ContextTooWide { cell_bits: u8, cell_count: u8 },

    /// A finite-supply model was asked for a symbol it has no copies left of.
    #[error("symbol {0} has no remaining occurrences")]
    ExhaustedSymbol(Ordinal),

    /// A static model was asked for a symbol that has zero frequency.
    #[error("symbol {0} is not part of the model")]
    UnknownSymbol(Ordinal),

    /// A cumulative position at or beyond the model's total was looked up.
    #[error("cumulative position {position} is out of range (total is {total})")]
    PositionOutOfRange { position: Count, total: Count },

    /// A symbol outside `[0, max_ord)` was given to a model.
    #[error("symbol {ordinal} is out of range (max ordinal is {max_ord})")]
    SymbolOutOfRange { ordinal: Ordinal, max_ord: Ordinal },

    /// The weights of a model no longer fit in a counter.
    #[error("model weights overflow the counters")]
    WeightOverflow,

    /// A model total exceeds what the coder precision can split without losing symbols.
    #[error("model total {total} exceeds the coder limit {limit}")]
    TotalTooLarge { total: Count, limit: Count },

    /// A byte-aligned access was requested while a partial byte is pending.
    #[error("byte-aligned access at bit offset {0}")]
    MisalignedByteAccess(u64),

    /// The fixed fields of a header run past the end of the buffer.
    #[error("stream truncated: needed {needed} bytes at byte offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// A transmitted dictionary is empty, unordered or has a zero count.
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),
}

/// A specialized Result type for coding operations.
pub type Result<T> = std::result::Result<T, Error>;
