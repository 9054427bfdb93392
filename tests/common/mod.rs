/*
 * Utility functions and consts used by the tests.
 *
 */

use ppm_arith::Ordinal;
use rand::prelude::{Distribution, SmallRng};
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;

/// Size of the list of words used to test.
#[allow(dead_code)]
pub const WORD_LIST_LENGTH: usize = 20_000;

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a sequence of `len` words of `width` bits, sampled from a Zipfian distribution with
/// the given exponent and scattered over the whole alphabet.
#[allow(dead_code)]
pub fn zipf_words(seed: u64, len: usize, width: u16, exponent: f64) -> Vec<Ordinal> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let max_ord = 1_u64 << width;
    // a few thousand distinct words at most, so that repetitions happen at every width
    let ranks = max_ord.min(1 << 12);
    let distribution = Zipf::new(ranks, exponent).unwrap();
    let scatter = rng.gen_range(1..max_ord) | 1;

    (0..len)
        .map(|_| {
            let rank = distribution.sample(&mut rng) as u64 - 1;
            rank.wrapping_mul(scatter) & (max_ord - 1)
        })
        .collect()
}

/// Creates `len` bytes of text-like data: Zipf-distributed letters, mostly made of copies of
/// earlier phrases.
#[allow(dead_code)]
pub fn zipf_bytes(seed: u64, len: usize) -> Vec<u8> {
    const PHRASE: usize = 16;
    let mut rng = SmallRng::seed_from_u64(seed);
    let distribution = Zipf::new(26, 1.1).unwrap();
    let mut bytes = Vec::with_capacity(len + PHRASE);

    while bytes.len() < len {
        if bytes.len() > 4 * PHRASE && rng.gen_bool(0.5) {
            let start = rng.gen_range(0..bytes.len() - PHRASE);
            let phrase = bytes[start..start + PHRASE].to_vec();
            bytes.extend(phrase);
        } else {
            bytes.push(b'a' + distribution.sample(&mut rng) as u8 - 1);
        }
    }
    bytes.truncate(len);
    bytes
}
