use chartkit::{histogram_by, BinningMode};
use criterion::{measurement::WallTime, BenchmarkGroup, Criterion, Throughput};
use rand::Rng;

pub fn histogram(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("histogram");
    bench_binning_mode(&mut group, BinningMode::Uniform);
    bench_binning_mode(&mut group, BinningMode::Quantized);
}

fn bench_binning_mode(group: &mut BenchmarkGroup<'_, WallTime>, binning_mode: BinningMode) {
    let mut rng = rand::thread_rng();
    // Whole numbers so quantized binning has something to collapse.
    let samples: Vec<f64> = (0..100_000)
        .map(|_| rng.gen_range(0..1_000) as f64)
        .collect();

    for bin_count in [10, 100, 1_000] {
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_function(format!("{binning_mode}-bins-{bin_count:04}"), |bencher| {
            bencher.iter(|| {
                histogram_by(samples.iter(), bin_count, binning_mode, |v| **v)
                    .expect("bin count is positive")
            });
        });
    }
}

criterion::criterion_group!(benches, histogram);
