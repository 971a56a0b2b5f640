use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use snowcache::LruCache;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_1kb_hit", |b| {
        let cache = LruCache::new(1000).unwrap();
        let data = vec![b'x'; 1024];

        for key in 0..100u64 {
            cache.set(key, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 100)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let cache = LruCache::new(1000).unwrap();

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 2000)));
            } else {
                cache.set(counter % 2000, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_evicting_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("evict");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_always_evicts", |b| {
        let cache = LruCache::new(10).unwrap(); // Small cache

        let mut counter = 0u64;
        b.iter(|| {
            cache.set(counter, counter);
            counter += 1;
        });
    });

    group.finish();
}

fn bench_contended_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    group.sample_size(20);
    group.throughput(Throughput::Elements(4 * 1000));

    group.bench_function("4_threads_get", |b| {
        let cache = Arc::new(LruCache::new(1000).unwrap());
        for key in 0..1000u64 {
            cache.set(key, key);
        }

        b.iter(|| {
            let handles: Vec<_> = (0..4u64)
                .map(|t| {
                    let cache = Arc::clone(&cache);
                    thread::spawn(move || {
                        for key in 0..1000u64 {
                            black_box(cache.get(&((key + t * 250) % 1000)));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_get_hit,
    bench_mixed_50_50,
    bench_evicting_set,
    bench_contended_get
);
criterion_main!(benches);
