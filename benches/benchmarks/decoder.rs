use criterion::{criterion_group, Criterion};
use ppm_arith::models::*;
use ppm_arith::range_coder::{Decoder, Encoder};
use ppm_arith::stream::{BitReader, BitWriter};
use pprof::criterion::{Output, PProfProfiler};

use crate::benchmarks::get_words;

fn decoding_benchmark(c: &mut Criterion) {
    let words = get_words();
    let mut out = BitWriter::new();
    let mut encoder = Encoder::new(AdaptiveD::with_max_ord(1 << 16), &mut out);
    encoder.encode_all(words.iter().copied(), None).unwrap();
    let stats = encoder.finish();
    let bytes = out.into_bytes();

    let mut group = c.benchmark_group("decoder");
    group.sample_size(10);
    group.bench_function("method D", |b| {
        b.iter(|| {
            let mut reader = BitReader::new(&bytes);
            let mut decoder = Decoder::new(AdaptiveD::with_max_ord(1 << 16), &mut reader, stats.bits);
            decoder.decode_all(stats.words, None).unwrap()
        })
    });
    group.finish();
}

criterion_group! {
    name = decoder_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = decoding_benchmark
}
