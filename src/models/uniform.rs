use crate::error::Result;
use crate::models::{check_ordinal, check_position, ProbabilityModel};
use crate::{Count, FrequencyStats, Ordinal};

/// Every symbol has the same probability, forever.
#[derive(Clone, Copy, Debug)]
pub struct UniformModel {
    max_ord: Ordinal,
}

impl UniformModel {
    pub fn new(max_ord: Ordinal) -> Self {
        Self { max_ord }
    }
}

impl ProbabilityModel for UniformModel {
    fn max_ord(&self) -> Ordinal {
        self.max_ord
    }

    fn peek(&self, ordinal: Ordinal) -> Result<FrequencyStats> {
        check_ordinal(ordinal, self.max_ord)?;
        Ok(FrequencyStats::new(ordinal, ordinal + 1, self.max_ord))
    }

    fn commit(&mut self, _ordinal: Ordinal) {}

    fn ordinal_for(&self, position: Count) -> Result<Ordinal> {
        check_position(position, self.max_ord)?;
        Ok(position)
    }

    fn total_count(&self) -> Count {
        self.max_ord
    }
}
