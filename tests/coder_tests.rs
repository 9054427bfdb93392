mod common;

use ppm_arith::models::*;
use ppm_arith::range_coder::{Decoder, Encoder, Precision};
use ppm_arith::stream::{BitReader, BitWriter};
use ppm_arith::Ordinal;
use rstest::rstest;

use crate::common::*;

/// Encodes `words` with one model, decodes them with another built the same way and checks that
/// nothing changed. Returns the payload length.
fn assert_round_trip<M: ProbabilityModel>(
    make_model: impl Fn() -> M,
    words: &[Ordinal],
    precision: Precision,
) -> u64 {
    let mut out = BitWriter::new();
    let mut encoder = Encoder::with_precision(make_model(), &mut out, precision);
    encoder.encode_all(words.iter().copied(), None).unwrap();
    let stats = encoder.finish();
    assert_eq!(stats.words, words.len() as u64);
    let bytes = out.into_bytes();

    let mut reader = BitReader::new(&bytes);
    let mut decoder = Decoder::with_precision(make_model(), &mut reader, stats.bits, precision);
    let decoded = decoder.decode_all(stats.words, None).unwrap();
    assert_eq!(decoded, words);
    stats.bits
}

#[rstest]
fn uniform_round_trips(#[values(8, 13, 16, 27, 32)] width: u16) {
    let words = zipf_words(width as u64, WORD_LIST_LENGTH, width, 1.0);
    let bits = assert_round_trip(|| UniformModel::new(1 << width), &words, Precision::default());
    // no learning: every word costs its full width
    assert!(bits >= words.len() as u64 * width as u64);
}

#[rstest]
fn fixed_models_round_trip(#[values(8, 12, 20, 32)] width: u16) {
    let words = zipf_words(width as u64, WORD_LIST_LENGTH, width, 1.2);
    let dictionary = Dictionary::from_symbols(1 << width, &words).unwrap();

    let static_bits =
        assert_round_trip(|| StaticModel::new(&dictionary), &words, Precision::default());
    let decreasing_bits =
        assert_round_trip(|| DecreasingModel::new(&dictionary), &words, Precision::default());
    assert!(decreasing_bits <= static_bits, "{decreasing_bits} > {static_bits}");
}

#[rstest]
fn plain_round_trips(#[values(8, 16, 24, 32)] width: u16, #[values(0, 1, 32)] ratio: u64) {
    let words = zipf_words(ratio + width as u64, WORD_LIST_LENGTH, width, 1.0);
    assert_round_trip(|| PlainAdaptive::new(1 << width, ratio), &words, Precision::default());
}

#[rstest]
fn escape_models_round_trip(#[values(8, 9, 15, 16, 23, 31, 32)] width: u16) {
    let words = zipf_words(100 + width as u64, WORD_LIST_LENGTH, width, 1.0);
    let raw_bits = words.len() as u64 * width as u64;
    let a_bits =
        assert_round_trip(|| AdaptiveA::with_max_ord(1 << width), &words, Precision::default());
    let d_bits =
        assert_round_trip(|| AdaptiveD::with_max_ord(1 << width), &words, Precision::default());
    assert!(a_bits < raw_bits, "{a_bits} >= {raw_bits}");
    assert!(d_bits < raw_bits, "{d_bits} >= {raw_bits}");
}

#[rstest]
#[case(8, 8, 3)]
#[case(8, 4, 1)]
#[case(16, 16, 3)]
#[case(24, 8, 7)]
#[case(32, 28, 2)]
fn ppm_models_round_trip(
    #[case] width: u16,
    #[case] cell_bits: u8,
    #[case] cell_count: u8,
    #[values(ContextGate::FirstHit, ContextGate::Confident)] gate: ContextGate,
) {
    let geometry = ContextGeometry::new(cell_bits, cell_count).unwrap();
    let words = zipf_words(200 + width as u64, WORD_LIST_LENGTH / 4, width, 1.1);
    assert_round_trip(|| PpmA::new(1 << width, geometry, gate), &words, Precision::default());
    assert_round_trip(|| PpmD::new(1 << width, geometry, gate), &words, Precision::default());
}

#[test]
fn ppm_learns_repetitive_text() {
    let words = zipf_bytes(7, 30_000)
        .into_iter()
        .map(Ordinal::from)
        .collect::<Vec<_>>();
    let geometry = ContextGeometry::new(8, 3).unwrap();

    let a_bits = assert_round_trip(|| AdaptiveA::with_max_ord(256), &words, Precision::default());
    let ppm_bits = assert_round_trip(
        || PpmD::new(256, geometry, ContextGate::FirstHit),
        &words,
        Precision::default(),
    );
    assert!(ppm_bits < a_bits, "{ppm_bits} >= {a_bits}");
}

/// Narrow ranges renormalize after almost every word, with long runs of deferred bits.
#[rstest]
fn narrow_precisions_stay_in_sync(#[values(12, 16, 20, 31)] bits: u32) {
    let precision = Precision::new(bits);
    let words = zipf_words(bits as u64, WORD_LIST_LENGTH, 8, 0.8);
    assert!(256 <= precision.max_model_total());
    assert_round_trip(|| UniformModel::new(256), &words, precision);
    assert_round_trip(|| PlainAdaptive::new(256, 0), &words, precision);
    // adaptive totals soon outgrow the narrowest ranges
    if bits >= 20 {
        assert_round_trip(|| PlainAdaptive::new(256, 1), &words[..1000], precision);
    }
}

#[test]
fn long_runs_of_a_single_word() {
    let words = vec![42; 100_000];
    let bits = assert_round_trip(|| AdaptiveD::with_max_ord(1 << 16), &words, Precision::default());
    assert!(bits < 1_000, "{bits}");
}

#[test]
fn total_beyond_the_precision_is_rejected() {
    let precision = Precision::new(10);
    let mut out = BitWriter::new();
    let mut encoder = Encoder::with_precision(UniformModel::new(257), &mut out, precision);
    assert!(matches!(
        encoder.encode(3),
        Err(ppm_arith::Error::TotalTooLarge { total: 257, limit: 256 })
    ));
}
