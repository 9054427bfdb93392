use criterion::{criterion_group, Criterion};
use ppm_arith::models::*;
use ppm_arith::range_coder::Encoder;
use ppm_arith::stream::BitWriter;
use ppm_arith::Ordinal;
use pprof::criterion::{Output, PProfProfiler};

use crate::benchmarks::get_words;

fn encode<M: ProbabilityModel>(model: M, words: &[Ordinal]) -> BitWriter {
    let mut out = BitWriter::new();
    let mut encoder = Encoder::new(model, &mut out);
    encoder.encode_all(words.iter().copied(), None).unwrap();
    encoder.finish();
    out
}

fn encoding_benchmark(c: &mut Criterion) {
    let words = get_words();
    let geometry = ContextGeometry::new(16, 2).unwrap();
    let mut group = c.benchmark_group("encoder");

    // PPM runs are slow: reduce the sample size.
    group.sample_size(10);
    group.bench_function("uniform", |b| b.iter(|| encode(UniformModel::new(1 << 16), &words)));
    group.bench_function("method A", |b| b.iter(|| encode(AdaptiveA::with_max_ord(1 << 16), &words)));
    group.bench_function("method D", |b| b.iter(|| encode(AdaptiveD::with_max_ord(1 << 16), &words)));
    group.bench_function("ppm D", |b| {
        b.iter(|| encode(PpmD::new(1 << 16, geometry, ContextGate::FirstHit), &words))
    });
    group.finish();
}

criterion_group! {
    name = encoder_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = encoding_benchmark
}
