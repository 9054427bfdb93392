//! Context mixing in the style of PPM.
//!
//! A [`PpmModel`] keeps the last few coded symbols packed in a single integer key and, for every
//! context length and every context value actually met, an independent inner [`EscapeModel`].
//! The statistics used for the next symbol come from the longest context that has a model (and,
//! depending on the [`ContextGate`], enough observations), falling back to a context-free base
//! model. After each symbol, the models of every context length and the base model all learn it.

use std::collections::HashMap;

use log::debug;

use crate::error::{Error, Result};
use crate::models::{AdaptiveA, AdaptiveD, EscapeModel, ProbabilityModel};
use crate::{Count, FrequencyStats, Ordinal, MAX_CONTEXT_BITS};

/// A PPM model whose contexts use [`AdaptiveA`] statistics.
pub type PpmA = PpmModel<AdaptiveA>;

/// A PPM model whose contexts use [`AdaptiveD`] statistics.
pub type PpmD = PpmModel<AdaptiveD>;

/// The shape of the context: how many past symbols it remembers and how many bits of the key
/// each of them takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextGeometry {
    cell_bits: u8,
    cell_count: u8,
}

impl Default for ContextGeometry {
    /// Three cells of a byte each.
    fn default() -> Self {
        Self {
            cell_bits: 8,
            cell_count: 3,
        }
    }
}

impl ContextGeometry {
    /// Fails with [`Error::ContextTooWide`] if the key would exceed [`MAX_CONTEXT_BITS`].
    pub fn new(cell_bits: u8, cell_count: u8) -> Result<Self> {
        if cell_bits as u32 * cell_count as u32 > MAX_CONTEXT_BITS {
            return Err(Error::ContextTooWide {
                cell_bits,
                cell_count,
            });
        }
        Ok(Self {
            cell_bits,
            cell_count,
        })
    }

    pub fn cell_bits(&self) -> u8 {
        self.cell_bits
    }

    pub fn cell_count(&self) -> u8 {
        self.cell_count
    }

    /// The mask keeping the `length` most recent cells of a key.
    #[inline(always)]
    fn mask(&self, length: u8) -> u64 {
        let bits = self.cell_bits as u32 * length as u32;
        (1_u64 << bits) - 1
    }

    /// Shifts `ordinal` into `context`, dropping the oldest cell.
    #[inline(always)]
    fn push(&self, context: u64, ordinal: Ordinal) -> u64 {
        // only an empty context can have cells of 128 bits or more
        let shifted = (context as u128)
            .checked_shl(self.cell_bits as u32)
            .unwrap_or(0)
            + ordinal as u128;
        (shifted & self.mask(self.cell_count) as u128) as u64
    }
}

/// When a context that has a model is trusted to predict the next symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextGate {
    /// The longest context with a model always answers.
    #[default]
    FirstHit,

    /// A context answers only once it has observed at least as many symbols as its length;
    /// otherwise the next shorter one is tried.
    Confident,
}

pub struct PpmModel<M: EscapeModel> {
    /// The context-free model, used when no context answers.
    base: M,

    /// The models of each context length, `contexts[len - 1]` being keyed by the last `len`
    /// symbols.
    contexts: Vec<HashMap<u64, M>>,

    geometry: ContextGeometry,

    gate: ContextGate,

    /// The packed history of the last coded symbols, most recent in the lowest cell.
    context: u64,

    /// How many cells of `context` hold actual symbols.
    length: u8,
}

impl<M: EscapeModel> PpmModel<M> {
    pub fn new(max_ord: Ordinal, geometry: ContextGeometry, gate: ContextGate) -> Self {
        debug!(
            "PPM model over {} symbols: {} cells of {} bits, gate {:?}",
            max_ord, geometry.cell_count, geometry.cell_bits, gate
        );
        Self {
            base: M::with_max_ord(max_ord),
            contexts: (0..geometry.cell_count).map(|_| HashMap::new()).collect(),
            geometry,
            gate,
            context: 0,
            length: 0,
        }
    }

    /// Returns the number of context models created so far.
    pub fn context_models(&self) -> usize {
        self.contexts.iter().map(HashMap::len).sum()
    }

    /// Returns the model answering for the next symbol. The choice depends only on the history,
    /// so the encoder and the decoder make the same one.
    fn select(&self) -> &M {
        for length in (1..=self.length).rev() {
            let key = self.context & self.geometry.mask(length);
            if let Some(model) = self.contexts[length as usize - 1].get(&key) {
                let trusted = match self.gate {
                    ContextGate::FirstHit => true,
                    ContextGate::Confident => model.observed() >= length as Count,
                };
                if trusted {
                    return model;
                }
            }
        }
        &self.base
    }
}

impl<M: EscapeModel> ProbabilityModel for PpmModel<M> {
    fn max_ord(&self) -> Ordinal {
        self.base.max_ord()
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        self.select().peek(ordinal)
    }

    fn commit(&mut self, ordinal: Ordinal) {
        let max_ord = self.max_ord();
        for length in 1..=self.length {
            let key = self.context & self.geometry.mask(length);
            self.contexts[length as usize - 1]
                .entry(key)
                .or_insert_with(|| M::with_max_ord(max_ord))
                .commit(ordinal);
        }
        self.base.commit(ordinal);

        self.context = self.geometry.push(self.context, ordinal);
        if self.length < self.geometry.cell_count {
            self.length += 1;
        }
    }

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        self.select().ordinal_for(position)
    }

    fn total_count(&self) -> Count {
        self.select().total_count()
    }
}
