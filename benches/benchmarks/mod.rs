use ppm_arith::Ordinal;
use rand::prelude::{Distribution, StdRng};
use rand::SeedableRng;
use rand_distr::Zipf;

pub mod decoder;
pub mod encoder;
pub mod frequency_index;

/// Size of the list of words used to bench.
const WORD_LIST_LENGTH: usize = 200_000;

/// Maximum value that the zipfian distribution can output.
const MAXIMUM_WORD: u64 = 1 << 16;

/// Creates a sequence of [`WORD_LIST_LENGTH`] 16-bit words sampled from a Zipfian distribution.
fn get_words() -> Vec<Ordinal> {
    let mut rng = StdRng::seed_from_u64(0);
    let distribution = Zipf::new(MAXIMUM_WORD, 1.0).unwrap();
    (0..WORD_LIST_LENGTH)
        .map(|_| distribution.sample(&mut rng) as Ordinal - 1)
        .collect()
}
