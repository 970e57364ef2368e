use core::hint::black_box;
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

use blog_id::{
    AtomicSnowflakeGenerator, BlogId, Epoch, LockSnowflakeGenerator, MonotonicClock,
    SnowflakeGenerator, TimeSource,
};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

/// A clock stuck at one millisecond. A fresh generator has exactly
/// `TOTAL_IDS` sequence slots there, so every poll in a run is `Ready`.
struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot path where every poll is `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator<BlogId, FixedMockTime>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.try_poll_id().unwrap().ready());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks contended generation with a real clock.
fn bench_generator_threaded<G>(
    c: &mut Criterion,
    group_name: &str,
    threads: usize,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator<BlogId, MonotonicClock> + Sync,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let generator = generator_factory();
            let barrier = Arc::new(Barrier::new(threads + 1));

            scope(|s| {
                for _ in 0..threads {
                    let barrier = Arc::clone(&barrier);
                    let generator = &generator;
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id().unwrap());
                            }
                        }
                    });
                }

                let start = Instant::now();
                barrier.wait();
                // Threads are joined when the scope ends.
                start
            })
            .elapsed()
        });
    });

    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    let epoch = Epoch::UNIX;

    bench_generator(c, "mock/lock", || {
        LockSnowflakeGenerator::new(1, epoch, FixedMockTime { millis: 1 }).unwrap()
    });
    bench_generator(c, "mock/atomic", || {
        AtomicSnowflakeGenerator::new(1, epoch, FixedMockTime { millis: 1 }).unwrap()
    });

    let clock = MonotonicClock::new();
    for threads in [1, 2, 4, 8] {
        bench_generator_threaded(c, "mono/lock", threads, || {
            LockSnowflakeGenerator::new(1, Epoch::BLOG, clock.clone()).unwrap()
        });
        bench_generator_threaded(c, "mono/atomic", threads, || {
            AtomicSnowflakeGenerator::new(1, Epoch::BLOG, clock.clone()).unwrap()
        });
    }
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
