use chartkit::{debounce, throttle, RateLimited};
use criterion::Criterion;

pub fn rate_limit(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("rate_limit");
    group.throughput(criterion::Throughput::Elements(1));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .build()
        .expect("I can make a runtime");
    let _guard = runtime.enter();

    let throttled = throttle(|i: u64| i % 8).expect("inside a runtime");
    group.bench_function("throttle-call", |bencher| {
        let mut i = 0;
        bencher.iter(|| {
            i += 1;
            throttled.call(i)
        });
    });
    throttled.cancel();

    // Every call reschedules the timer.
    let debounced = debounce(|_: u64| {}).expect("inside a runtime");
    group.bench_function("debounce-call", |bencher| {
        let mut i = 0;
        bencher.iter(|| {
            i += 1;
            debounced.call(i)
        });
    });
    debounced.cancel();

    group.bench_function("debounce-flush", |bencher| {
        bencher.iter(|| {
            debounced.call(0);
            debounced.flush();
        });
    });
}

criterion::criterion_group!(benches, rate_limit);
