use chartkit::interpolate;
use criterion::{Criterion, Throughput};

pub fn interpolation(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("interpolate");
    let series: Vec<f64> = (0..10_000).map(|i| (i as f64).sin()).collect();

    for multiple in [1, 4, 16] {
        group.throughput(Throughput::Elements((series.len() * multiple) as u64));
        group.bench_function(format!("multiple-{multiple:02}"), |bencher| {
            bencher.iter(|| interpolate(&series, multiple).expect("multiple is positive"));
        });
    }
}

criterion::criterion_group!(benches, interpolation);
