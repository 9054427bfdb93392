use criterion::{black_box, criterion_group, Criterion};
use ppm_arith::frequency_index::FrequencyIndex;
use pprof::criterion::{Output, PProfProfiler};

use crate::benchmarks::get_words;

fn update_and_query_benchmark(c: &mut Criterion) {
    let words = get_words();
    let mut group = c.benchmark_group("frequency index");

    group.bench_function("update", |b| {
        b.iter(|| {
            let mut index = FrequencyIndex::new(1 << 32);
            for word in &words {
                index.update(*word, 1);
            }
            index
        })
    });

    let mut index = FrequencyIndex::new(1 << 32);
    for word in &words {
        index.update(*word, 1);
    }
    group.bench_function("prefix sum", |b| {
        b.iter(|| words.iter().map(|word| index.prefix_sum(black_box(*word))).sum::<u64>())
    });
    group.bench_function("find", |b| {
        b.iter(|| (0..index.total()).step_by(7).filter_map(|pos| index.find(black_box(pos))).count())
    });
    group.finish();
}

criterion_group! {
    name = frequency_index_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = update_and_query_benchmark
}
